//! # Nibbler Disassembler
//!
//! Turn a memory image back into text.
//!
//! ## Output Modes
//!
//! - **Listing** ([`disassemble`]): one line per cell with its address and
//!   raw value, for reading alongside the debug outputs
//! - **Source** ([`to_source`]): assembler input that rebuilds the same image
//!
//! ## Example
//!
//! ```rust
//! use nibbler_spec::{MemoryImage, Opcode};
//! use nibbler_disassembler::disassemble;
//!
//! let image = MemoryImage::from_opcodes(&[Opcode::Nop, Opcode::Stop]).unwrap();
//! let listing = disassemble(&image).unwrap();
//! assert!(listing.contains("0x001:  7  stop"));
//! ```

pub mod error;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use disassembler::{disassemble, to_source};
pub use formatter::{format, format_cell};

#[cfg(test)]
mod tests {
    use super::*;
    use nibbler_spec::{Address, MemoryImage, Nibble, Opcode};

    #[test]
    fn test_public_exports() {
        let _ = DisassemblerError::from(nibbler_spec::NibblerError::InvalidNibble(0x10));
    }

    #[test]
    fn test_format_function() {
        assert_eq!(format(Opcode::Stop), "stop");
        assert_eq!(format(Opcode::Reserved(5)), "op 5");
    }

    #[test]
    fn test_format_cell_function() {
        assert_eq!(format_cell(Address::data(2), Nibble::truncate(0xa)), "0x402:  a");
    }

    #[test]
    fn test_disassemble_empty() {
        let output = disassemble(&MemoryImage::new()).unwrap();
        assert!(output.contains("0 code cells"));
    }
}
