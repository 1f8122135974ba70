use crate::prelude::*;
#[cfg(feature="compiler")]
use crate::frontend::parser::error::ParseError;
#[cfg(feature="compiler")]
use crate::bytecode::compiler::error::CompileError;
use crate::bytecode::LoadError;
#[cfg(feature="runtime")]
use crate::bytecode::runtime::error::RuntimeError;

/// An error generated during program compilation, loading or execution.
#[derive(Clone, Debug)]
pub enum Error {
    #[cfg(feature="compiler")]
    ParseErrors(Vec<ParseError>),
    #[cfg(feature="compiler")]
    CompileErrors(Vec<CompileError>),
    LoadError(LoadError),
    #[cfg(feature="runtime")]
    RuntimeError(RuntimeError),
}

impl Error {
    /// Computes 1-based line/column numbers of all errors that refer to a source position.
    pub fn locs(self: &Self, input: &str) -> Vec<(u32, u32)> {
        match self {
            #[cfg(feature="compiler")]
            Self::ParseErrors(errors) => errors.iter().map(|e| e.loc(input)).collect(),
            #[cfg(feature="compiler")]
            Self::CompileErrors(errors) => errors.iter().map(|e| e.loc(input)).collect(),
            _ => Vec::new(),
        }
    }
}

impl Display for Error {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature="compiler")]
            Self::ParseErrors(errors) => write_list(f, errors),
            #[cfg(feature="compiler")]
            Self::CompileErrors(errors) => write_list(f, errors),
            Self::LoadError(e) => write!(f, "{}", e),
            #[cfg(feature="runtime")]
            Self::RuntimeError(e) => write!(f, "{}", e),
        }
    }
}

#[allow(dead_code)]
fn write_list<T: Display>(f: &mut fmt::Formatter<'_>, errors: &[ T ]) -> fmt::Result {
    for (index, error) in errors.iter().enumerate() {
        if index > 0 {
            writeln!(f)?;
        }
        write!(f, "{}", error)?;
    }
    Ok(())
}

impl std::error::Error for Error { }

#[cfg(feature="compiler")]
impl From<Vec<ParseError>> for Error {
    fn from(errors: Vec<ParseError>) -> Error {
        Error::ParseErrors(errors)
    }
}

#[cfg(feature="compiler")]
impl From<Vec<CompileError>> for Error {
    fn from(errors: Vec<CompileError>) -> Error {
        Error::CompileErrors(errors)
    }
}

impl From<LoadError> for Error {
    fn from(error: LoadError) -> Error {
        Error::LoadError(error)
    }
}

#[cfg(feature="runtime")]
impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Error {
        Error::RuntimeError(error)
    }
}
