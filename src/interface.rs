
pub use crate::shared::error::Error;

#[cfg(feature="compiler")]
pub mod parser {
    //! Sourcecode parsing.
    pub use crate::frontend::parser::{parse, types::ParsedProgram, error::{ParseError, ParseErrorKind}};
}

#[cfg(feature="compiler")]
pub mod ast {
    //! Abstract syntax tree representation.
    pub use crate::frontend::ast::*;
}

#[cfg(feature="compiler")]
pub mod compiler {
    //! Lowering of the AST into three-address code and byte code.
    pub use crate::bytecode::{compile, CompileOptions, Program};
    pub use crate::bytecode::compiler::{lower, Compiler, Generate, GenerateStatement, error::{CompileError, CompileErrorKind}};
}

pub mod tac {
    //! Three-address intermediate representation.
    pub use crate::bytecode::address::{Address, AddressBase};
    pub use crate::bytecode::symbols::{SymbolTable, SymbolTableEntry, SymbolId};
    pub use crate::bytecode::tac::ThreeAddressCode;
    pub use crate::bytecode::opcodes::{OpCode, ThreeAddressRecord};
    pub use crate::bytecode::writer::Writer;
}

#[cfg(feature="runtime")]
pub mod runtime {
    //! Byte code execution.
    pub use crate::bytecode::{Program, LoadError, LoadErrorKind};
    pub use crate::bytecode::runtime::{VM, VMState, Console, StdConsole, Value, error::{RuntimeError, RuntimeErrorKind}};
    pub mod heap {
        //! Virtual machine heap.
        pub use crate::bytecode::runtime::heap::{HeapManager, HeapRegion, MemoryUnit};
    }
}
