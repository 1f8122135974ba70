//! Frontend: BASIC source parsing into an AST.

pub mod ast;
#[path="parser/parser.rs"]
pub mod parser;
