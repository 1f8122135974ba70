use tracing::debug;
use crate::prelude::*;
use crate::bytecode::runtime::Value;

/// A single heap slot.
#[derive(Clone, Debug, PartialEq)]
pub enum MemoryUnit {
    Long(i64),
    Double(f64),
    Address(i64),
    String(String),
}

impl MemoryUnit {
    pub fn to_value(self: &Self) -> Value {
        match self {
            MemoryUnit::Long(v) => Value::Integer(*v),
            MemoryUnit::Double(v) => Value::Float(*v),
            MemoryUnit::Address(v) => Value::Address(*v),
            MemoryUnit::String(v) => Value::String(v.clone()),
        }
    }
}

impl From<Value> for MemoryUnit {
    fn from(value: Value) -> MemoryUnit {
        match value {
            Value::Integer(v) => MemoryUnit::Long(v),
            Value::Float(v) => MemoryUnit::Double(v),
            Value::Address(v) => MemoryUnit::Address(v),
            Value::String(v) => MemoryUnit::String(v),
        }
    }
}

/// A growable block of memory units. Never shrinks.
#[derive(Clone, Debug)]
pub struct HeapRegion {
    address : i64,
    units   : Vec<MemoryUnit>,
}

impl HeapRegion {
    fn new(address: i64) -> Self {
        HeapRegion { address, units: Vec::new() }
    }
    /// Absolute address of the region.
    pub fn address(self: &Self) -> i64 {
        self.address
    }
    /// Number of units, including unset units below the highest written index.
    pub fn len(self: &Self) -> usize {
        self.units.len()
    }
    /// Returns the unit at given index. Unset units within the region read as integer zero.
    pub fn get(self: &Self, index: i64) -> Option<Value> {
        let index = usize::try_from(index).ok()?;
        self.units.get(index).map(|unit| unit.to_value())
    }
    /// Writes the unit at given index, growing the region as required. Returns false for a negative index.
    pub fn set(self: &mut Self, index: i64, value: Value) -> bool {
        let index = match usize::try_from(index) {
            Ok(index) => index,
            Err(_) => return false,
        };
        if index >= self.units.len() {
            self.units.resize(index + 1, MemoryUnit::Long(0));
        }
        self.units[index] = value.into();
        true
    }
    /// The region read as a single value: zero when empty, the unit itself when it holds exactly one unit, a list otherwise.
    pub fn value(self: &Self) -> Value {
        match self.units.len() {
            0 => Value::Integer(0),
            1 => self.units[0].to_value(),
            _ => {
                let parts: Vec<String> = self.units.iter().map(|unit| unit.to_value().to_string()).collect();
                Value::String(format!("[{}]", parts.join(", ")))
            }
        }
    }
}

/// Linear, never freeing region allocator. Region addresses start right after the program.
#[derive(Clone, Debug)]
pub struct HeapManager {
    base    : i64,
    regions : Vec<HeapRegion>,
}

impl HeapManager {
    pub fn new(base: i64) -> Self {
        HeapManager { base, regions: Vec::new() }
    }
    /// Allocates a new region and returns its address.
    pub fn new_region(self: &mut Self) -> i64 {
        let address = self.base + self.regions.len() as i64;
        self.regions.push(HeapRegion::new(address));
        debug!("allocated heap region {}", address);
        address
    }
    /// Allocates the region at given address if it is the next one to be allocated. Returns whether the address refers to a region.
    pub fn ensure(self: &mut Self, address: i64) -> bool {
        if address == self.base + self.regions.len() as i64 {
            self.new_region();
        }
        self.contains(address)
    }
    /// Whether the address refers to an allocated region.
    pub fn contains(self: &Self, address: i64) -> bool {
        address >= self.base && address < self.base + self.regions.len() as i64
    }
    pub fn region(self: &Self, address: i64) -> Option<&HeapRegion> {
        if self.contains(address) {
            self.regions.get((address - self.base) as usize)
        } else {
            None
        }
    }
    pub fn region_mut(self: &mut Self, address: i64) -> Option<&mut HeapRegion> {
        if self.contains(address) {
            self.regions.get_mut((address - self.base) as usize)
        } else {
            None
        }
    }
    /// Number of allocated regions.
    pub fn len(self: &Self) -> usize {
        self.regions.len()
    }
    /// Frees all regions.
    pub fn reset(self: &mut Self) {
        self.regions.clear();
    }
}
