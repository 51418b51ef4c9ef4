//! Platform parameters of the emulated machine.

/* PROGRAM STORE */

/// Highest line number a stored program line may carry.
pub const MAX_LINE_NUMBER: u16 = 65534;

/* VALUES */

/// Capacity of a string value, in bytes.
pub const MAX_STRING_LEN: usize = 255;

/// Letter-named variable slots of each kind (`A`..`Z`).
pub const VARIABLE_COUNT: usize = 26;

/* TIMER */

/// Platform timer ticks per second; `TI` counts these.
pub const JIFFIES_PER_SECOND: f64 = 60.0;

/* SCREEN METACODES */

/// Code point emitted for a line break.
pub const CODE_NEWLINE: u8 = 10;

/// Metacode that clears the screen.
pub const CODE_CLEAR_SCREEN: u8 = 222;

/// Metacode that toggles the reverse field.
pub const CODE_REVERSE_FIELD: u8 = 223;

/// First metacode of the background color range.
pub const CODE_BACKGROUND_BASE: u8 = 224;

/// Last metacode of the background color range.
pub const CODE_BACKGROUND_LAST: u8 = 239;

/// First metacode of the foreground color range.
pub const CODE_FOREGROUND_BASE: u8 = 240;

/// Last metacode of the foreground color range.
pub const CODE_FOREGROUND_LAST: u8 = 255;

/* SERIAL CHANNELS */

/// Lowest serial channel addressable by OPEN.
pub const UART_MIN: i16 = 1;

/// Highest serial channel addressable by OPEN.
pub const UART_MAX: i16 = 2;

/// Lowest bit-rate selector accepted by OPEN.
pub const BIT_RATE_MIN: i16 = 1;

/// Highest bit-rate selector accepted by OPEN.
pub const BIT_RATE_MAX: i16 = 15;

/// Bit rate used by the LOAD/SAVE text streams (19200 baud).
pub const TEXT_TRANSFER_BIT_RATE: u8 = 15;

/* MEMORY MAP */

/// Size of the linear address space.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// First address of the write-protected ROM window.
pub const ROM_BASE: u16 = 0xe000;

/* INPUT */

/// Prompt character INPUT prefixes to its reads.
pub const PROMPT_CHAR: char = '?';
