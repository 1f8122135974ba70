//! Three-address code generation, byte code encoding and execution.

pub mod address;
pub mod symbols;
pub mod opcodes;
pub mod tac;
pub mod writer;
#[cfg(feature="compiler")]
#[path="compiler/compiler.rs"]
pub mod compiler;
#[cfg(feature="runtime")]
#[path="runtime/runtime.rs"]
pub mod runtime;

use crate::prelude::*;
use crate::config::{MAGIC, VERSION, HEADER_SIZE, RECORD_SIZE, WORD_SIZE, OPTION_ALL_GLOBAL};
use address::AddressBase;
use opcodes::OpCode;
use writer::{FLAG_LONG, FLAG_DOUBLE, SLOT_SHIFT};

#[cfg(feature="compiler")]
pub use compiler::compile;

/// Options influencing code generation and execution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompileOptions {
    /// Treat all bindings as global: frames write through to the root frame and reads search outward.
    pub all_global: bool,
}

impl CompileOptions {
    /// Options byte as stored in the byte code header.
    pub fn to_byte(self: &Self) -> u8 {
        if self.all_global { OPTION_ALL_GLOBAL } else { 0 }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions { all_global: true }
    }
}

/// A byte code program: code segment followed by the constant segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub(crate) options      : u8,
    pub(crate) program_size : i64,
    pub(crate) code_size    : i64,
    pub(crate) segments     : Vec<u8>,
}

/// Reads given number of bytes from the slice, advancing it.
fn read<'a>(slice: &mut &'a[ u8 ], num_bytes: usize) -> Option<&'a[ u8 ]> {
    if slice.len() < num_bytes {
        None
    } else {
        let result = &slice[0..num_bytes];
        *slice = &slice[num_bytes..];
        Some(result)
    }
}

impl Program {
    pub(crate) fn new(options: u8) -> Self {
        Program {
            options         : options,
            program_size    : 0,
            code_size       : 0,
            segments        : Vec::new(),
        }
    }
    /// Serializes the program to a byte vector, e.g. to be saved to a file.
    pub fn to_bytes(self: &Self) -> Vec<u8> {
        let mut result = Vec::with_capacity(HEADER_SIZE + self.segments.len());
        result.extend_from_slice(&MAGIC[..]);
        result.extend_from_slice(&VERSION[..]);
        result.push(self.options);
        result.extend_from_slice(&self.program_size.to_le_bytes()[..]);
        result.extend_from_slice(&self.code_size.to_le_bytes()[..]);
        result.extend_from_slice(&self.segments[..]);
        result
    }
    /// Deserializes a program from a byte vector, rejecting files with a wrong magic or version.
    pub fn from_bytes(program: &[ u8 ]) -> Result<Program, LoadError> {
        let mut input = program;
        let offset = |input: &[ u8 ]| program.len() - input.len();
        // verify header
        let magic = read(&mut input, MAGIC.len()).ok_or(LoadError::new(LoadErrorKind::Truncated, 0))?;
        if magic != &MAGIC[..] {
            return Err(LoadError::new(LoadErrorKind::BadMagic, 0));
        }
        let version = read(&mut input, VERSION.len()).ok_or(LoadError::new(LoadErrorKind::Truncated, offset(input)))?;
        if version != &VERSION[..] {
            return Err(LoadError::new(LoadErrorKind::BadVersion, MAGIC.len()));
        }
        let options = read(&mut input, 1).ok_or(LoadError::new(LoadErrorKind::Truncated, offset(input)))?[0];
        // sizes
        let program_size = read_i64(&mut input).ok_or(LoadError::new(LoadErrorKind::Truncated, offset(input)))?;
        let code_size = read_i64(&mut input).ok_or(LoadError::new(LoadErrorKind::Truncated, offset(input)))?;
        if code_size < 0 || program_size < code_size || code_size % RECORD_SIZE != 0 {
            return Err(LoadError::new(LoadErrorKind::InvalidSizes, offset(input)));
        }
        // segments
        let segments = read(&mut input, program_size as usize).ok_or(LoadError::new(LoadErrorKind::Truncated, offset(input)))?;
        Ok(Program {
            options,
            program_size,
            code_size,
            segments: segments.to_vec(),
        })
    }
    /// Whether the program runs with all bindings global.
    pub fn all_global(self: &Self) -> bool {
        self.options & OPTION_ALL_GLOBAL != 0
    }
    /// Size of code and constant segments in bytes.
    pub fn program_size(self: &Self) -> i64 {
        self.program_size
    }
    /// Size of the code segment in bytes.
    pub fn code_size(self: &Self) -> i64 {
        self.code_size
    }
    /// Number of instructions in the code segment.
    pub fn len(self: &Self) -> usize {
        (self.code_size / RECORD_SIZE) as usize
    }
    /// Reads the word at given byte offset.
    fn word(self: &Self, offset: i64) -> Option<u64> {
        let start = usize::try_from(offset).ok()?;
        let bytes = self.segments.get(start .. start + WORD_SIZE as usize)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }
    /// Decodes the instruction at given code offset.
    pub(crate) fn decode(self: &Self, offset: i64) -> Option<Instruction> {
        if offset < 0 || offset % RECORD_SIZE != 0 || offset >= self.code_size {
            return None;
        }
        let head = self.word(offset)?;
        let mut operands = [ Operand::Null; 3 ];
        for slot in 0..3 {
            let bits = self.word(offset + WORD_SIZE * (slot as i64 + 1))?;
            let flags = head >> SLOT_SHIFT[slot];
            operands[slot] = if flags & FLAG_LONG != 0 {
                Operand::Integer(bits as i64)
            } else if flags & FLAG_DOUBLE != 0 {
                Operand::Float(f64::from_bits(bits))
            } else {
                self.classify(bits as i64)
            };
        }
        Some(Instruction { code: (head & 0xFFFF_FFFF) as u32, operands })
    }
    /// Maps an absolute address onto the address space it belongs to.
    fn classify(self: &Self, address: i64) -> Operand {
        if address < 0 {
            Operand::Frame(-(address + 1))
        } else if address == 0 {
            Operand::Null
        } else if address >= self.program_size {
            Operand::Heap(address)
        } else if address >= self.code_size {
            Operand::Constant(address)
        } else {
            Operand::Code(address)
        }
    }
    /// Reads the NUL terminated string at given absolute address within the constant segment.
    pub(crate) fn c_string(self: &Self, address: i64) -> Option<String> {
        if address < self.code_size || address >= self.program_size {
            return None;
        }
        let bytes = &self.segments[address as usize .. self.program_size as usize];
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
    /// Disassembles the instruction at given code offset.
    #[cfg(feature="debugging")]
    pub fn format_instruction(self: &Self, offset: i64) -> Option<String> {
        let instruction = self.decode(offset)?;
        let name = instruction.opcode().map(|o| o.mnemonic().to_string()).unwrap_or_else(|| format!("<{}>", instruction.code));
        let [ a1, a2, r ] = instruction.operands;
        Some(format!("{}:\t{}\t{}\t{}\t{}", offset, name, a1, a2, r))
    }
    /// Disassembles the code segment.
    #[cfg(feature="debugging")]
    pub fn disassemble(self: &Self) -> String {
        let mut result = String::new();
        let mut offset = 0;
        while let Some(line) = self.format_instruction(offset) {
            result.push_str(&line);
            result.push('\n');
            offset += RECORD_SIZE;
        }
        result
    }
}

fn read_i64(input: &mut &[ u8 ]) -> Option<i64> {
    Some(i64::from_le_bytes(read(input, WORD_SIZE as usize)?.try_into().ok()?))
}

/// A decoded instruction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Instruction {
    pub code    : u32,
    pub operands: [ Operand; 3 ],
}

impl Instruction {
    pub fn opcode(self: &Self) -> Option<OpCode> {
        OpCode::from_u32(self.code)
    }
}

/// A decoded operand, tagged with the address space it refers to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Operand {
    /// Absent operand, encoded as address 0.
    Null,
    /// Frame relative slot offset in bytes.
    Frame(i64),
    /// Absolute address within the code segment.
    Code(i64),
    /// Absolute address within the constant segment.
    Constant(i64),
    /// Absolute heap address.
    Heap(i64),
    Integer(i64),
    Float(f64),
}

impl Operand {
    /// The address space a location operand refers to. Null and immediates refer to none.
    pub fn base(self: &Self) -> Option<AddressBase> {
        match self {
            Operand::Frame(_) => Some(AddressBase::MemoryContext),
            Operand::Code(_) => Some(AddressBase::ProgramStart),
            Operand::Constant(_) => Some(AddressBase::ProgramEnd),
            Operand::Heap(_) => Some(AddressBase::Heap),
            Operand::Null | Operand::Integer(_) | Operand::Float(_) => None,
        }
    }
}

impl Display for Operand {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Null => write!(f, "NULL"),
            Operand::Frame(offset) => write!(f, "#{}", offset),
            Operand::Code(address) | Operand::Constant(address) | Operand::Heap(address) => write!(f, "@{}", address),
            Operand::Integer(value) => write!(f, "{}", value),
            Operand::Float(value) => write!(f, "{:?}", value),
        }
    }
}

/// Represents the various possible byte code loading error-kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoadErrorKind {
    BadMagic,
    BadVersion,
    Truncated,
    InvalidSizes,
}

/// An error reported while loading byte code.
#[derive(Clone, Debug)]
pub struct LoadError {
    kind: LoadErrorKind,
    offset: usize,
}

impl LoadError {
    pub(crate) fn new(kind: LoadErrorKind, offset: usize) -> LoadError {
        Self { kind, offset }
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &LoadErrorKind {
        &self.kind
    }
    /// Byte offset of the error within the file.
    pub fn offset(self: &Self) -> usize {
        self.offset
    }
}

impl Display for LoadError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LoadErrorKind::BadMagic => write!(f, "Not a byte code file (bad magic)"),
            LoadErrorKind::BadVersion => write!(f, "Unsupported byte code version"),
            LoadErrorKind::Truncated => write!(f, "Byte code file truncated at offset {}", self.offset),
            LoadErrorKind::InvalidSizes => write!(f, "Invalid segment sizes in byte code header"),
        }
    }
}

impl std::error::Error for LoadError { }
