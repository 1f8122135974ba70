
/// Size of a machine word in bytes. Variables occupy one word, array elements are one word apart.
pub const WORD_SIZE: i64 = 8;

/// Size of one encoded instruction record: opcode word plus three operand words.
pub const RECORD_SIZE: i64 = 4 * WORD_SIZE;

/// Byte code file magic.
pub const MAGIC: &[ u8; 6 ] = b"LO46BC";

/// Byte code format version.
pub const VERSION: &[ u8; 2 ] = b"10";

/// Offset of the first instruction within a byte code file.
pub const HEADER_SIZE: usize = MAGIC.len() + VERSION.len() + 1 + 2 * WORD_SIZE as usize;

/// Option bit selecting the "all bindings are global" VM mode.
pub const OPTION_ALL_GLOBAL: u8 = 0x01;

/// Exit code used when a GOTO or GOSUB targets a line that was never compiled.
pub const LINE_NOT_FOUND_EXIT: i64 = 1234;

/// Label given to the first instruction of a program.
pub const START_LABEL: &str = "START";

/// Reserved name of the generated line lookup function.
pub const LINE_LOOKUP: &str = "BASICLINES";
