//! Three-address code builder.

use tracing::{debug, trace};
use crate::prelude::*;
use crate::config::{RECORD_SIZE, WORD_SIZE, START_LABEL, LINE_LOOKUP, LINE_NOT_FOUND_EXIT};
use crate::shared::numeric::Numeric;
use crate::bytecode::address::Address;
use crate::bytecode::symbols::SymbolTable;
use crate::bytecode::opcodes::{OpCode, ThreeAddressRecord};

/// Append-only builder of three-address code.
///
/// Records are stamped with their byte offset in the eventual code segment as they are appended. Jump targets
/// that are not known yet are emitted as label references and backpatched by `finalize`.
#[derive(Clone, Debug)]
pub struct ThreeAddressCode {
    records         : Vec<ThreeAddressRecord>,
    symbols         : SymbolTable,
    constants       : UnorderedMap<String, String>,
    labels          : UnorderedMap<String, i64>,
    lines           : Vec<(i64, usize)>,
    next_label      : Option<String>,
    next_comment    : Option<String>,
    temp_count      : usize,
    label_count     : usize,
    uses_line_lookup: bool,
    finalized       : bool,
}

impl ThreeAddressCode {
    /// Creates an empty builder.
    pub fn new() -> Self {
        ThreeAddressCode {
            records         : Vec::new(),
            symbols         : SymbolTable::new(),
            constants       : UnorderedMap::new(),
            labels          : UnorderedMap::new(),
            lines           : Vec::new(),
            next_label      : None,
            next_comment    : None,
            temp_count      : 0,
            label_count     : 0,
            uses_line_lookup: false,
            finalized       : false,
        }
    }

    /// Returns a fresh temporary variable name.
    pub fn create_temp_variable(self: &mut Self) -> String {
        self.temp_count += 1;
        format!("@t{}", self.temp_count)
    }

    /// Returns a fresh, not yet bound label name.
    pub fn create_label(self: &mut Self) -> String {
        self.label_count += 1;
        format!("L{}", self.label_count)
    }

    /// Stamps the next appended record with given label. Replaces a previously pending label.
    pub fn set_next_label(self: &mut Self, name: &str) {
        self.next_label = Some(name.to_string());
    }

    /// The label the next appended record will be stamped with, if any.
    pub fn pending_label(self: &Self) -> Option<&str> {
        self.next_label.as_deref()
    }

    /// Attaches a comment to the next appended record unless it already carries one.
    pub fn set_next_comment(self: &mut Self, comment: &str) {
        self.next_comment = Some(comment.to_string());
    }

    /// Returns the constant for a numeric token or the symbolic address of a variable, declaring it on first use.
    pub fn address_of(self: &mut Self, token: &str) -> Address {
        if let Some(value) = Numeric::parse(token) {
            return Address::constant(value);
        }
        let id = match self.symbols.lookup(token) {
            Some(id) => id,
            None => self.symbols.declare_variable(token, WORD_SIZE),
        };
        self.symbols.address(id)
    }

    /// Returns the resolved code address of a label or a reference to be backpatched on finalization.
    pub fn label_address(self: &mut Self, name: &str) -> Address {
        if name == LINE_LOOKUP {
            self.uses_line_lookup = true;
        }
        match self.labels.get(name) {
            Some(&offset) => Address::code(name, offset),
            None => Address::Label { name: name.to_string() },
        }
    }

    /// Returns the name of a string constant, declaring it on first sight.
    pub fn create_constant(self: &mut Self, text: &str) -> String {
        if let Some(name) = self.constants.get(text) {
            return name.clone();
        }
        let name = format!("@s{}", self.constants.len() + 1);
        self.symbols.declare_constant(&name, text);
        self.constants.insert(text.to_string(), name.clone());
        name
    }

    /// Returns the address of a string constant, declaring it on first sight.
    pub fn constant_address(self: &mut Self, text: &str) -> Address {
        let name = self.create_constant(text);
        self.address_of(&name)
    }

    /// Appends a record, stamping its address and the pending label.
    pub fn add_record(self: &mut Self, mut record: ThreeAddressRecord) {
        assert!(!self.finalized, "Three-address code appended after finalization");
        record.address = RECORD_SIZE * self.records.len() as i64;
        let label = match self.next_label.take() {
            Some(label) => Some(label),
            None if self.records.is_empty() => Some(START_LABEL.to_string()),
            None => None,
        };
        if let Some(label) = &label {
            let previous = self.labels.insert(label.clone(), record.address);
            assert!(previous.is_none(), "Label {} bound twice", label);
        }
        record.label = label;
        if let Some(comment) = self.next_comment.take() {
            record.comment.get_or_insert(comment);
        }
        trace!("{}", record);
        self.records.push(record);
    }

    /// Maps a source line to the next record. Lines <= 0 are synthetic and ignored.
    pub fn start_instruction(self: &mut Self, line: i64) {
        if line > 0 {
            self.lines.push((line, self.records.len()));
        }
    }

    /// Completes the code: adds a final exit, generates the line lookup function if it was referenced and backpatches all labels.
    pub fn finalize(self: &mut Self) {
        assert!(!self.finalized, "Three-address code finalized twice");
        let ends_with_exit = self.records.last().map(|r| r.opcode == OpCode::Exit).unwrap_or(false);
        let line_past_end = self.lines.last().map(|&(_, index)| index == self.records.len()).unwrap_or(false);
        if !ends_with_exit || self.next_label.is_some() || line_past_end {
            self.add_record(ThreeAddressRecord::exit(None));
        }
        if self.uses_line_lookup {
            self.generate_line_lookup();
        }
        self.backpatch();
        self.finalized = true;
        debug!("finalized {} records, {} symbols, {} labels", self.records.len(), self.symbols.len(), self.labels.len());
    }

    /// Generates the function mapping a source line to the code address of its first record.
    fn generate_line_lookup(self: &mut Self) {
        let param = self.address_of("@param1");
        let return_value = self.address_of("@returnVal");
        let temp = self.address_of("@tmp");
        self.set_next_label(LINE_LOOKUP);
        self.add_record(ThreeAddressRecord::formal_parameter(Address::IntegerConstant(0), param.clone()));
        for (line, index) in self.lines.clone() {
            let next = self.create_label();
            let target = self.records.get(index).map(|r| r.address).unwrap_or(RECORD_SIZE * index as i64);
            self.add_record(ThreeAddressRecord::eq(param.clone(), Address::IntegerConstant(line), temp.clone()));
            let next_address = self.label_address(&next);
            self.add_record(ThreeAddressRecord::jump_if_false(next_address, temp.clone()));
            self.add_record(ThreeAddressRecord::set(Address::code("@line", target), return_value.clone()));
            self.add_record(ThreeAddressRecord::ret(Some(return_value.clone())));
            self.set_next_label(&next);
        }
        let message = self.constant_address("Line not found: ");
        let newline = self.constant_address("\n");
        self.add_record(ThreeAddressRecord::print(message));
        self.add_record(ThreeAddressRecord::print(param));
        self.add_record(ThreeAddressRecord::print(newline));
        self.add_record(ThreeAddressRecord::exit(Some(Address::IntegerConstant(LINE_NOT_FOUND_EXIT))));
        self.add_record(ThreeAddressRecord::ret(None));
    }

    /// Rewrites all label references to their code address.
    fn backpatch(self: &mut Self) {
        let labels = &self.labels;
        for record in &mut self.records {
            for slot in record.operands_mut() {
                let name = match slot {
                    Some(Address::Label { name }) => name.clone(),
                    _ => continue,
                };
                let offset = match labels.get(&name) {
                    Some(&offset) => offset,
                    None => panic!("Unresolved label {} after finalization", name),
                };
                *slot = Some(Address::code(&name, offset));
            }
        }
    }

    /// The records in emission order.
    pub fn records(self: &Self) -> &[ ThreeAddressRecord ] {
        &self.records
    }

    /// The symbol table owning variable and constant storage.
    pub fn symbols(self: &Self) -> &SymbolTable {
        &self.symbols
    }

    /// Byte offset of a bound label.
    pub fn label_offset(self: &Self, name: &str) -> Option<i64> {
        self.labels.get(name).copied()
    }

    /// Source line to record index pairs in the order they were started.
    pub fn line_mapping(self: &Self) -> &[ (i64, usize) ] {
        &self.lines
    }

    /// Whether `finalize` has been called.
    pub fn is_finalized(self: &Self) -> bool {
        self.finalized
    }

    /// Size of the code segment in bytes.
    pub fn code_size(self: &Self) -> i64 {
        RECORD_SIZE * self.records.len() as i64
    }
}

impl Display for ThreeAddressCode {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}
