//! Byte code encoder.

use std::io::{self, Write};
use tracing::debug;
use crate::config::RECORD_SIZE;
use crate::bytecode::{Program, CompileOptions};
use crate::bytecode::address::{Address, AddressBase};
use crate::bytecode::symbols::SymbolTable;
use crate::bytecode::opcodes::ThreeAddressRecord;
use crate::bytecode::tac::ThreeAddressCode;

/// Operand kind flags of the instruction word. Each operand slot uses three consecutive bits starting at `SLOT_SHIFT[slot]`.
pub(crate) const FLAG_ADDRESS: u64 = 0b001;
pub(crate) const FLAG_DOUBLE: u64 = 0b010;
pub(crate) const FLAG_LONG: u64 = 0b100;
pub(crate) const SLOT_SHIFT: [ u32; 3 ] = [ 32, 35, 38 ];

/// Bit pattern and kind flag of an encoded operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EncodedOperand {
    pub flag: u64,
    pub bits: u64,
}

/// Byte code buffer and writer.
#[derive(Debug)]
pub struct Writer {
    pub(crate) program: Program,
    pub(crate) position: u64,
}

impl Writer {
    /// Creates a new writer instance.
    pub fn new(options: CompileOptions) -> Self {
        Writer {
            program: Program::new(options.to_byte()),
            position: 0,
        }
    }
    /// Returns the current length of the program.
    pub fn len(self: &Self) -> u64 {
        self.program.segments.len() as u64
    }
    /// Returns the current write position.
    pub fn position(self: &Self) -> u64 {
        self.position
    }
    /// Converts the writer into the underlying program.
    pub fn into_program(self: Self) -> Program {
        self.program
    }
    /// Encodes finalized three-address code into the code and constant segments.
    pub fn write_code(self: &mut Self, code: &ThreeAddressCode) -> io::Result<()> {
        assert!(code.is_finalized(), "Three-address code must be finalized before encoding");
        let symbols = code.symbols();
        let code_size = code.code_size();
        let program_size = code_size + symbols.constants_size();
        self.program.code_size = code_size;
        self.program.program_size = program_size;
        for record in code.records() {
            self.write_record(record, symbols, code_size, program_size)?;
        }
        for constant in symbols.constants() {
            debug_assert!(code_size + constant.offset() == self.position as i64, "constant segment out of order");
            self.write_all(constant.value().unwrap_or("").as_bytes())?;
            self.write_all(&[ 0u8 ])?;
        }
        debug!("encoded {} records, code size {}, program size {}", code.records().len(), code_size, program_size);
        Ok(())
    }
    /// Writes a single record as four words.
    fn write_record(self: &mut Self, record: &ThreeAddressRecord, symbols: &SymbolTable, code_size: i64, program_size: i64) -> io::Result<()> {
        let mut instruction = record.opcode() as u32 as u64;
        let mut words = [ 0u64; 3 ];
        for (slot, operand) in record.operands().iter().enumerate() {
            let encoded = encode_operand(*operand, symbols, code_size, program_size);
            instruction |= encoded.flag << SLOT_SHIFT[slot];
            words[slot] = encoded.bits;
        }
        self.write_all(&instruction.to_le_bytes())?;
        for word in &words {
            self.write_all(&word.to_le_bytes())?;
        }
        debug_assert!(self.position as i64 == record.address() + RECORD_SIZE);
        Ok(())
    }
}

/// Encodes an operand. A missing operand is encoded as address 0.
pub(crate) fn encode_operand(address: Option<&Address>, symbols: &SymbolTable, code_size: i64, program_size: i64) -> EncodedOperand {
    match address {
        None => EncodedOperand { flag: FLAG_ADDRESS, bits: 0 },
        Some(&Address::IntegerConstant(value)) => EncodedOperand { flag: FLAG_LONG, bits: value as u64 },
        Some(&Address::FloatConstant(value)) => EncodedOperand { flag: FLAG_DOUBLE, bits: value.to_bits() },
        Some(Address::Symbolic { name, offset, base }) => {
            let absolute = match base {
                AddressBase::ProgramStart => *offset,
                AddressBase::ProgramEnd => {
                    // the symbol table is authoritative for constant placement
                    let offset = symbols.lookup(name).map(|id| symbols.entry(id).offset()).unwrap_or(*offset);
                    code_size + offset
                },
                AddressBase::Heap => program_size + *offset,
                AddressBase::MemoryContext => -(*offset + 1),
            };
            EncodedOperand { flag: FLAG_ADDRESS, bits: absolute as u64 }
        },
        Some(Address::Label { name }) => panic!("Unresolved label {} reached the byte code encoder", name),
    }
}

impl Write for Writer {
    fn write(self: &mut Self, buf: &[u8]) -> io::Result<usize> {
        self.program.segments.extend_from_slice(buf);
        self.position += buf.len() as u64;
        Ok(buf.len())
    }
    fn flush(self: &mut Self) -> io::Result<()> {
        Ok(())
    }
}
