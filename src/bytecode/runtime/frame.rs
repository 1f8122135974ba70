use crate::prelude::*;
use crate::bytecode::Operand;
use crate::bytecode::runtime::Value;

/// A call frame.
#[derive(Clone, Debug)]
pub(crate) struct CallFrame {
    pub program_counter     : i64,
    pub pending_parameters  : VecDeque<Value>,
    pub formal_parameters   : Vec<Value>,
    pub return_target       : Option<Operand>,
    pub bindings            : UnorderedMap<i64, Value>,
}

impl CallFrame {
    /// Creates the root frame.
    pub fn root() -> Self {
        Self::new(0, Vec::new(), None)
    }
    pub fn new(program_counter: i64, formal_parameters: Vec<Value>, return_target: Option<Operand>) -> Self {
        CallFrame {
            program_counter,
            pending_parameters  : VecDeque::new(),
            formal_parameters,
            return_target,
            bindings            : UnorderedMap::new(),
        }
    }
    /// Removes the first `count` queued call parameters.
    pub fn consume_parameters(self: &mut Self, count: usize) -> Option<Vec<Value>> {
        if self.pending_parameters.len() < count {
            None
        } else {
            Some(self.pending_parameters.drain(..count).collect())
        }
    }
}
