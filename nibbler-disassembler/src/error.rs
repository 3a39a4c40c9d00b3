//! Disassembler errors

use nibbler_spec::NibblerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] NibblerError),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
