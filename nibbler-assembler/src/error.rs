//! Assembler errors

use nibbler_spec::{Address, NibblerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("Invalid directive at line {line}: .{name}")]
    InvalidDirective { line: usize, name: String },

    #[error("Value {value} out of range at line {line} (max {max})")]
    ValueOutOfRange { line: usize, value: u64, max: u64 },

    #[error("{section} section overflows its window at line {line}")]
    SectionOverflow { line: usize, section: &'static str },

    #[error("Cell {address} written twice (line {line})")]
    Overlap { line: usize, address: Address },

    #[error("Image error: {0}")]
    Image(#[from] NibblerError),
}

impl AssemblerError {
    /// Source line the error points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::SyntaxError { line, .. }
            | AssemblerError::UnknownInstruction { line, .. }
            | AssemblerError::InvalidDirective { line, .. }
            | AssemblerError::ValueOutOfRange { line, .. }
            | AssemblerError::SectionOverflow { line, .. }
            | AssemblerError::Overlap { line, .. } => Some(*line),
            AssemblerError::Image(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
