use cody_basic::prelude::*;

fn repl() -> Interpreter<MemoryIo> {
    Interpreter::with_memory_io()
}

#[test]
fn numbered_lines_store_instead_of_executing() {
    let mut interpreter = repl();
    interpreter.execute_source("10 PRINT 1").unwrap();

    assert_eq!(interpreter.program().len(), 1);
    assert!(interpreter.io().screen().is_empty());
}

#[test]
fn duplicate_line_numbers_replace() {
    let mut interpreter = repl();
    interpreter.execute_source("10 PRINT 1").unwrap();
    interpreter.execute_source("10 PRINT 2").unwrap();
    interpreter.execute_source("RUN").unwrap();

    assert_eq!(interpreter.io().screen(), ["2"]);
}

#[test]
fn a_bare_line_number_deletes() {
    let mut interpreter = repl();
    interpreter.execute_source("10 PRINT 1").unwrap();
    interpreter.execute_source("20 PRINT 2").unwrap();
    interpreter.execute_source("10").unwrap();

    assert_eq!(interpreter.program().len(), 1);
    assert_eq!(
        interpreter.program().get(0).and_then(|l| l.number),
        Some(20)
    );
}

#[test]
fn lines_store_sorted_regardless_of_entry_order() {
    let mut interpreter = repl();
    interpreter.execute_source("30 PRINT 3").unwrap();
    interpreter.execute_source("10 PRINT 1").unwrap();
    interpreter.execute_source("20 PRINT 2").unwrap();
    interpreter.execute_source("RUN").unwrap();

    assert_eq!(interpreter.io().screen(), ["1", "2", "3"]);
}

#[test]
fn immediate_commands_execute_directly() {
    let mut interpreter = repl();
    interpreter.execute_source("PRINT 3+4").unwrap();

    assert_eq!(interpreter.io().screen(), ["7"]);
    assert!(interpreter.program().is_empty());
}

#[test]
fn list_prints_retained_source_in_order() {
    let mut interpreter = repl();
    interpreter.execute_source("20 PRINT \"B\"").unwrap();
    interpreter.execute_source("10 PRINT \"A\"").unwrap();
    interpreter.execute_source("LIST").unwrap();

    assert_eq!(interpreter.io().screen(), ["10 PRINT \"A\"", "20 PRINT \"B\""]);
}

#[test]
fn list_bounds_are_inclusive() {
    let mut interpreter = repl();
    for line in ["10 REM A", "20 REM B", "30 REM C", "40 REM D"] {
        interpreter.execute_source(line).unwrap();
    }

    interpreter.execute_source("LIST 20,30").unwrap();
    assert_eq!(interpreter.io().screen(), ["20 REM B", "30 REM C"]);
}

#[test]
fn list_with_one_bound_lists_the_tail() {
    let mut interpreter = repl();
    for line in ["10 REM A", "20 REM B", "30 REM C"] {
        interpreter.execute_source(line).unwrap();
    }

    interpreter.execute_source("LIST 20").unwrap();
    assert_eq!(interpreter.io().screen(), ["20 REM B", "30 REM C"]);
}

#[test]
fn run_clears_variables_and_stacks() {
    let mut interpreter = repl();
    interpreter.execute_source("A=5").unwrap();
    interpreter.execute_source("A$=\"KEEP\"").unwrap();

    let a = VarName::new('A').unwrap();
    assert_eq!(interpreter.int_value(a, 0), 5);

    interpreter.execute_source("RUN").unwrap();

    assert_eq!(interpreter.int_value(a, 0), 0);
    assert!(interpreter.string_value(a).is_empty());
    assert!(interpreter.call_stack().is_empty());
    assert_eq!(interpreter.loop_depth(), 0);
}

#[test]
fn new_clears_the_program_too() {
    let mut interpreter = repl();
    interpreter.execute_source("10 PRINT 1").unwrap();
    interpreter.execute_source("A=5").unwrap();
    interpreter.execute_source("NEW").unwrap();

    assert!(interpreter.program().is_empty());

    let a = VarName::new('A').unwrap();
    assert_eq!(interpreter.int_value(a, 0), 0);
}

#[test]
fn variables_survive_between_immediate_commands() {
    let mut interpreter = repl();
    interpreter.execute_source("A=5").unwrap();
    interpreter.execute_source("PRINT A*2").unwrap();

    assert_eq!(interpreter.io().screen(), ["10"]);
}

#[test]
fn errors_keep_the_stored_program() {
    let mut interpreter = repl();
    interpreter.execute_source("10 PRINT 1").unwrap();

    let error = interpreter
        .execute_source("PRINT 1/0")
        .expect_err("division should fail");
    assert!(matches!(
        error,
        InterpreterError::Runtime(RuntimeError::DivisionByZero)
    ));

    assert_eq!(interpreter.program().len(), 1);
    assert!(interpreter.mode().is_repl());

    interpreter.execute_source("RUN").unwrap();
    assert_eq!(interpreter.io().screen(), ["1"]);
}

#[test]
fn parse_errors_never_touch_the_program() {
    let mut interpreter = repl();
    interpreter.execute_source("10 PRINT 1").unwrap();

    let error = interpreter
        .execute_source("10 FROB")
        .expect_err("unknown command should fail");
    assert!(matches!(error, InterpreterError::Parse(_)));

    // the stored line 10 is untouched
    interpreter.execute_source("RUN").unwrap();
    assert_eq!(interpreter.io().screen(), ["1"]);
}

#[test]
fn run_on_an_empty_program_is_a_no_op() {
    let mut interpreter = repl();
    interpreter.execute_source("RUN").unwrap();

    assert!(interpreter.io().screen().is_empty());
    assert!(interpreter.mode().is_repl());
}

#[test]
fn stored_empty_lines_are_ignored_for_missing_numbers() {
    let mut interpreter = repl();
    // deleting a line that was never stored is fine
    interpreter.execute_source("10").unwrap();
    assert!(interpreter.program().is_empty());
}

#[test]
fn if_runs_immediately_without_a_line_number() {
    let mut interpreter = repl();
    interpreter.execute_source("IF 1<=1 THEN PRINT 13").unwrap();
    interpreter.execute_source("IF 2<=1 THEN PRINT 33").unwrap();

    assert_eq!(interpreter.io().screen(), ["13"]);
}
