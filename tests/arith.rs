use cody_basic::prelude::*;

/// Run a program against fresh in-memory buffers and return the screen.
fn screen(source: &str) -> Vec<String> {
    let mut interpreter = Interpreter::with_memory_io();
    interpreter.load(parse_program(source).expect("program should parse"));
    interpreter.run().expect("program should run");
    interpreter.io().screen().to_vec()
}

/// PRINT a single expression and return the one printed line.
fn print_expr(expr: &str) -> String {
    let lines = screen(&format!("10 PRINT {expr}"));
    assert_eq!(lines.len(), 1, "expected one line for {expr}");
    lines[0].clone()
}

fn run_err(source: &str) -> RuntimeError {
    let mut interpreter = Interpreter::with_memory_io();
    interpreter.load(parse_program(source).expect("program should parse"));
    interpreter.run().expect_err("program should fail")
}

#[test]
fn prints_sums() {
    assert_eq!(print_expr("3+4"), "7");
}

#[test]
fn addition_wraps_at_the_word_boundary() {
    assert_eq!(print_expr("32767+1"), "-32768");
    assert_eq!(print_expr("-32768-1"), "32767");
    assert_eq!(print_expr("20000+20000"), "-25536");
}

#[test]
fn multiplication_wraps() {
    assert_eq!(print_expr("1000*1000"), "16960");
    assert_eq!(print_expr("256*256"), "0");
}

#[test]
fn division_floors_toward_negative_infinity() {
    assert_eq!(print_expr("7/2"), "3");
    assert_eq!(print_expr("-1/2"), "-1");
    assert_eq!(print_expr("-7/2"), "-4");
    assert_eq!(print_expr("7/-2"), "-4");
}

#[test]
fn division_by_zero_fails() {
    assert!(matches!(
        run_err("10 PRINT 1/0"),
        RuntimeError::DivisionByZero
    ));
    assert!(matches!(
        run_err("10 PRINT MOD(1,0)"),
        RuntimeError::DivisionByZero
    ));
}

#[test]
fn unary_minus_wraps() {
    assert_eq!(print_expr("-(-32768)"), "-32768");
    assert_eq!(print_expr("--5"), "5");
}

#[test]
fn abs_sqr_mod() {
    assert_eq!(print_expr("ABS(-10)"), "10");
    assert_eq!(print_expr("SQR(10)"), "3");
    assert_eq!(print_expr("MOD(8,5)"), "3");
    assert_eq!(print_expr("MOD(-8,5)"), "2");
}

#[test]
fn sqr_rejects_negative_input() {
    assert!(matches!(
        run_err("10 PRINT SQR(-1)"),
        RuntimeError::NegativeSqrt(-1)
    ));
}

#[test]
fn bitwise_builtins() {
    assert_eq!(print_expr("NOT(0)"), "-1");
    assert_eq!(print_expr("AND(12,10)"), "8");
    assert_eq!(print_expr("OR(12,10)"), "14");
    assert_eq!(print_expr("XOR(12,10)"), "6");
}

#[test]
fn rnd_is_reproducible_for_a_fixed_seed() {
    let first = screen("10 PRINT RND(7)\n20 PRINT RND()\n30 PRINT RND()");
    let second = screen("10 PRINT RND(7)\n20 PRINT RND()\n30 PRINT RND()");
    assert_eq!(first, second);

    for line in &first {
        let n: i32 = line.parse().expect("RND prints integers");
        assert!((0..=255).contains(&n));
    }
}

#[test]
fn builtin_arity_is_checked() {
    assert!(matches!(
        run_err("10 PRINT ABS(1,2)"),
        RuntimeError::BuiltInArity("ABS")
    ));
    assert!(matches!(
        run_err("10 PRINT RND(1,2)"),
        RuntimeError::BuiltInArity("RND")
    ));
}

#[test]
fn string_concatenation() {
    assert_eq!(print_expr("\"FOO\"+\"BAR\""), "FOOBAR");
}

#[test]
fn concatenation_respects_the_capacity() {
    let a = "A".repeat(200);
    let b = "B".repeat(56);
    let source = format!("10 PRINT \"{a}\"+\"{b}\"");
    assert!(matches!(run_err(&source), RuntimeError::StringTooLong));
}

#[test]
fn mixed_operands_fail() {
    assert!(matches!(
        run_err("10 PRINT \"A\"+1"),
        RuntimeError::MixedOperands { .. }
    ));
    assert!(matches!(
        run_err("10 A=\"X\""),
        RuntimeError::ExpectedInteger(_)
    ));
    assert!(matches!(
        run_err("10 A$=1"),
        RuntimeError::ExpectedString(_)
    ));
}

#[test]
fn len_asc_chr() {
    assert_eq!(print_expr("LEN(\"HELLO\")"), "5");
    assert_eq!(print_expr("LEN(\"\")"), "0");
    assert_eq!(print_expr("ASC(\"A\")"), "65");
    assert_eq!(print_expr("ASC(\"\")"), "0");
    assert_eq!(print_expr("CHR$(72,73)"), "HI");
    assert_eq!(print_expr("CHR$(ASC(\"Q\"))"), "Q");
}

#[test]
fn chr_rejects_out_of_range_code_points() {
    assert!(matches!(
        run_err("10 PRINT CHR$(256)"),
        RuntimeError::CodePointRange(256)
    ));
    assert!(matches!(
        run_err("10 PRINT CHR$(-1)"),
        RuntimeError::CodePointRange(-1)
    ));
}

#[test]
fn str_and_val() {
    assert_eq!(print_expr("STR$(-32768)"), "-32768");
    assert_eq!(print_expr("VAL(\"42\")"), "42");
    assert_eq!(print_expr("VAL(\"-17 MORE\")"), "-17");
    assert_eq!(print_expr("VAL(\"\")"), "0");
    assert_eq!(print_expr("VAL(\"X\")"), "0");
}

#[test]
fn substring_bounds_are_strict() {
    assert_eq!(print_expr("SUB$(\"HELLO\",1,3)"), "ELL");
    assert_eq!(print_expr("SUB$(\"HELLO\",0,4)"), "HELL");

    // start + len may not reach the end of the string
    assert!(matches!(
        run_err("10 PRINT SUB$(\"HELLO\",0,5)"),
        RuntimeError::SubstringBounds
    ));
    assert!(matches!(
        run_err("10 PRINT SUB$(\"HELLO\",5,1)"),
        RuntimeError::SubstringBounds
    ));
    assert!(matches!(
        run_err("10 PRINT SUB$(\"HELLO\",-1,1)"),
        RuntimeError::SubstringBounds
    ));
}

#[test]
fn print_concatenates_without_separators() {
    assert_eq!(screen("10 PRINT ABS(-10), SQR(10), MOD(8,5)"), ["1033"]);
    assert_eq!(
        screen("10 PRINT \"CODY\",\" IS \",\"14\",\" YEARS OLD.\""),
        ["CODY IS 14 YEARS OLD."]
    );
    assert_eq!(screen("10 PRINT \"A=\",1+1"), ["A=2"]);
}

#[test]
fn print_semicolon_keeps_the_line_open() {
    assert_eq!(
        screen("10 PRINT \"A\";\n20 PRINT \"B\""),
        ["AB"]
    );
}

#[test]
fn chr_newline_splits_lines() {
    assert_eq!(
        screen("10 PRINT \"A\"+CHR$(10)+\"B\""),
        ["A", "B"]
    );
}

#[test]
fn variables_default_to_zero_and_empty() {
    assert_eq!(print_expr("Q"), "0");
    assert_eq!(print_expr("Q$"), "");
    assert_eq!(print_expr("Q(100)"), "0");
}

#[test]
fn arrays_accept_arbitrary_indices() {
    assert_eq!(
        screen("10 A(0)=10\n20 A(1)=20\n30 PRINT A+A(1)*3"),
        ["70"]
    );
    assert_eq!(
        screen("10 A(-3)=7\n20 PRINT A(-3)"),
        ["7"]
    );
}

#[test]
fn scenario_two_array_state_survives_the_run() {
    let mut interpreter = Interpreter::with_memory_io();
    interpreter.load(
        parse_program("10 A(0)=10\n20 A(1)=20\n30 PRINT A+A(1)*3").unwrap(),
    );
    interpreter.run().unwrap();

    assert_eq!(interpreter.io().screen(), ["70"]);

    let a = VarName::new('A').unwrap();
    assert_eq!(interpreter.int_value(a, 0), 10);
    assert_eq!(interpreter.int_value(a, 1), 20);
}
