//! Tinybasic, a three-address code compiler and byte code virtual machine for a tiny BASIC dialect.
//!
//! Source text is parsed into an AST, lowered into three-address code with backpatched labels,
//! encoded into fixed-width byte code and finally executed by a frame and heap based virtual machine.

pub(crate) mod prelude {
    pub use std::collections::{HashMap as UnorderedMap, VecDeque};
    pub use std::fmt::{self, Debug, Display};
}

pub mod config;
#[path="shared/shared.rs"]
pub mod shared;
#[cfg(feature="compiler")]
#[path="frontend/frontend.rs"]
pub mod frontend;
#[path="bytecode/bytecode.rs"]
pub mod bytecode;
mod interface;

pub use interface::*;

/// One stop shop to `parse` and `compile` given BASIC source code into a byte code program.
///
/// All variables are treated as global, which is what the BASIC dialect expects from `GOSUB` subroutines.
#[cfg(feature="compiler")]
pub fn build(source: &str) -> Result<bytecode::Program, Error> {
    build_with(source, bytecode::CompileOptions::default())
}

/// Parses and compiles given BASIC source code with the given compile options.
#[cfg(feature="compiler")]
pub fn build_with(source: &str, options: bytecode::CompileOptions) -> Result<bytecode::Program, Error> {
    let parsed = frontend::parser::parse(source)?;
    let program = bytecode::compile(&parsed, options)?;
    Ok(program)
}

/// Builds and runs given BASIC source code on the process console. Returns the exit code of the program.
#[cfg(all(feature="compiler", feature="runtime"))]
pub fn run(source: &str) -> Result<i64, Error> {
    use bytecode::runtime::{VM, StdConsole};
    let program = build(source)?;
    let mut vm = VM::new(&program);
    let exit_code = vm.run(&mut StdConsole::new())?;
    Ok(exit_code)
}
