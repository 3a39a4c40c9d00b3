//! Nibbler Assembler
//!
//! Assemble Nibbler assembly into a [`MemoryImage`](nibbler_spec::MemoryImage).
//!
//! ## Example
//!
//! ```rust
//! use nibbler_assembler::assemble;
//!
//! let source = r#"
//!     nop
//!     stop
//!     .data
//!     .nibble 0xa, 0xb
//! "#;
//!
//! let image = assemble(source).unwrap();
//! assert_eq!(image.code.len(), 2);
//! assert_eq!(image.data.len(), 2);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod assembler;

pub use error::{AssemblerError, Result};
pub use assembler::{assemble, Assembler};
pub use parser::{parse, parse_statement, Line, Statement};
