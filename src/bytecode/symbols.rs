//! Symbol table allocating storage within the address spaces.

use crate::prelude::*;
use crate::bytecode::address::{Address, AddressBase};

/// Handle of a symbol table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(usize);

/// Handle of a (nested) symbol table scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScopeId(usize);

/// A declared variable or constant.
#[derive(Clone, Debug)]
pub struct SymbolTableEntry {
    identifier  : String,
    size        : i64,
    base        : AddressBase,
    offset      : i64,
    is_constant : bool,
    value       : Option<String>,
}

impl SymbolTableEntry {
    pub fn identifier(self: &Self) -> &str {
        &self.identifier
    }
    /// Size of the symbol in bytes.
    pub fn size(self: &Self) -> i64 {
        self.size
    }
    pub fn base(self: &Self) -> AddressBase {
        self.base
    }
    /// Offset of the symbol relative to its base.
    pub fn offset(self: &Self) -> i64 {
        self.offset
    }
    pub fn is_constant(self: &Self) -> bool {
        self.is_constant
    }
    /// Text of a string constant.
    pub fn value(self: &Self) -> Option<&str> {
        self.value.as_deref()
    }
    /// Symbolic address of the entry.
    pub fn address(self: &Self) -> Address {
        Address::Symbolic { name: self.identifier.clone(), offset: self.offset, base: self.base }
    }
}

#[derive(Clone, Debug)]
struct Scope {
    parent      : Option<ScopeId>,
    names       : UnorderedMap<String, SymbolId>,
    next_offset : i64,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope { parent, names: UnorderedMap::new(), next_offset: 0 }
    }
}

/// Nested symbol tables backed by a single arena of entries.
///
/// Mutable variables receive `MemoryContext` offsets from the scope they are declared in. Constants always
/// live in the root scope and receive `ProgramEnd` offsets from a separate counter.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    entries             : Vec<SymbolTableEntry>,
    scopes              : Vec<Scope>,
    current             : ScopeId,
    next_constant_offset: i64,
}

impl SymbolTable {
    const ROOT: ScopeId = ScopeId(0);

    pub fn new() -> Self {
        SymbolTable {
            entries             : Vec::new(),
            scopes              : vec![ Scope::new(None) ],
            current             : Self::ROOT,
            next_constant_offset: 0,
        }
    }
    /// Enters a new child scope of the current scope.
    pub fn push_scope(self: &mut Self) {
        let scope = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(Some(self.current)));
        self.current = scope;
    }
    /// Returns to the parent of the current scope. Returns false when already in the root scope.
    pub fn pop_scope(self: &mut Self) -> bool {
        match self.scopes[self.current.0].parent {
            Some(parent) => {
                self.current = parent;
                true
            },
            None => false,
        }
    }
    /// Whether the current scope is the root scope.
    pub fn is_root(self: &Self) -> bool {
        self.current == Self::ROOT
    }
    /// Declares a mutable variable of given size in the current scope. Redeclaring a name already
    /// declared in the current scope returns the existing entry.
    pub fn declare_variable(self: &mut Self, identifier: &str, size: i64) -> SymbolId {
        if let Some(&id) = self.scopes[self.current.0].names.get(identifier) {
            return id;
        }
        let scope = &mut self.scopes[self.current.0];
        let offset = scope.next_offset;
        scope.next_offset += size;
        let id = SymbolId(self.entries.len());
        scope.names.insert(identifier.to_string(), id);
        self.entries.push(SymbolTableEntry {
            identifier  : identifier.to_string(),
            size        : size,
            base        : AddressBase::MemoryContext,
            offset      : offset,
            is_constant : false,
            value       : None,
        });
        id
    }
    /// Declares a string constant in the root scope. The constant occupies its text plus a NUL terminator.
    pub fn declare_constant(self: &mut Self, identifier: &str, value: &str) -> SymbolId {
        if let Some(&id) = self.scopes[Self::ROOT.0].names.get(identifier) {
            return id;
        }
        let size = value.len() as i64 + 1;
        let offset = self.next_constant_offset;
        self.next_constant_offset += size;
        let id = SymbolId(self.entries.len());
        self.scopes[Self::ROOT.0].names.insert(identifier.to_string(), id);
        self.entries.push(SymbolTableEntry {
            identifier  : identifier.to_string(),
            size        : size,
            base        : AddressBase::ProgramEnd,
            offset      : offset,
            is_constant : true,
            value       : Some(value.to_string()),
        });
        id
    }
    /// Looks up a name, walking outward from the current scope to the root.
    pub fn lookup(self: &Self, identifier: &str) -> Option<SymbolId> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let scope_data = &self.scopes[id.0];
            if let Some(&symbol) = scope_data.names.get(identifier) {
                return Some(symbol);
            }
            scope = scope_data.parent;
        }
        None
    }
    /// Returns the entry for the given handle.
    pub fn entry(self: &Self, id: SymbolId) -> &SymbolTableEntry {
        &self.entries[id.0]
    }
    /// Returns the symbolic address of the given handle.
    pub fn address(self: &Self, id: SymbolId) -> Address {
        self.entry(id).address()
    }
    /// Iterates all string constants in ascending offset order.
    pub fn constants(self: &Self) -> impl Iterator<Item=&SymbolTableEntry> {
        let mut constants: Vec<_> = self.entries.iter().filter(|e| e.is_constant).collect();
        constants.sort_by_key(|e| e.offset);
        constants.into_iter()
    }
    /// Total size of the constant segment in bytes.
    pub fn constants_size(self: &Self) -> i64 {
        self.next_constant_offset
    }
    /// Number of bytes allocated for variables in the current scope.
    pub fn frame_size(self: &Self) -> i64 {
        self.scopes[self.current.0].next_offset
    }
    /// Number of declared entries.
    pub fn len(self: &Self) -> usize {
        self.entries.len()
    }
}
