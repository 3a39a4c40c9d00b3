//! # Memory Images
//!
//! A memory image is what a programmer loads into the core: the contents
//! of the CPU code window and the CPU data window.
//!
//! Binary format (bincode, little endian):
//! ```text
//! header   magic "NIBB", version, code_len, data_len
//! code     code_len cells, one nibble per byte
//! data     data_len cells, one nibble per byte
//! ```

use crate::address::{Address, Region};
use crate::error::NibblerError;
use crate::nibble::Nibble;
use crate::opcode::Opcode;
use crate::WINDOW_SIZE;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Magic number for image files: "NIBB" = 0x4E494242
pub const MAGIC: u32 = 0x4E49_4242;

/// Version: v1.0 = 0x00010000
pub const VERSION: u32 = 0x0001_0000;

/// Image header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHeader {
    /// Magic number: "NIBB"
    pub magic: u32,

    /// Format version
    pub version: u32,

    /// Number of code cells
    pub code_len: u16,

    /// Number of data cells
    pub data_len: u16,
}

impl ImageHeader {
    pub fn new() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            code_len: 0,
            data_len: 0,
        }
    }

    pub fn validate(&self) -> Result<(), NibblerError> {
        if self.magic != MAGIC {
            return Err(NibblerError::InvalidMagic(self.magic));
        }
        if self.version != VERSION {
            return Err(NibblerError::InvalidVersion {
                expected: VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

impl Default for ImageHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Contents of the code and data windows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryImage {
    pub header: ImageHeader,
    pub code: Vec<Nibble>,
    pub data: Vec<Nibble>,
}

impl MemoryImage {
    pub fn new() -> Self {
        Self {
            header: ImageHeader::new(),
            code: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build an image from code and data cells
    pub fn from_sections(code: Vec<Nibble>, data: Vec<Nibble>) -> Result<Self, NibblerError> {
        check_section("code", code.len())?;
        check_section("data", data.len())?;
        let mut image = Self::new();
        image.header.code_len = code.len() as u16;
        image.header.data_len = data.len() as u16;
        image.code = code;
        image.data = data;
        Ok(image)
    }

    /// Build a code-only image from opcodes
    pub fn from_opcodes(ops: &[Opcode]) -> Result<Self, NibblerError> {
        Self::from_sections(ops.iter().map(|op| op.to_cell()).collect(), Vec::new())
    }

    /// Every (address, cell) pair the image defines, code first
    pub fn cells(&self) -> impl Iterator<Item = (Address, Nibble)> + '_ {
        let code = self
            .code
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Address::code(i as u8), cell));
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &cell)| (Address::data(i as u8), cell));
        code.chain(data)
    }

    /// Cell at `addr`, if the image defines it
    pub fn get(&self, addr: Address) -> Option<Nibble> {
        let offset = addr.offset() as usize;
        match addr.region() {
            Region::Code => self.code.get(offset).copied(),
            Region::Data => self.data.get(offset).copied(),
        }
    }

    /// Total defined cells
    pub fn len(&self) -> usize {
        self.code.len() + self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.data.is_empty()
    }

    pub fn validate(&self) -> Result<(), NibblerError> {
        self.header.validate()?;
        check_section("code", self.code.len())?;
        check_section("data", self.data.len())?;
        if self.header.code_len as usize != self.code.len() {
            return Err(NibblerError::SectionLengthMismatch {
                section: "code",
                expected: self.header.code_len as usize,
                found: self.code.len(),
            });
        }
        if self.header.data_len as usize != self.data.len() {
            return Err(NibblerError::SectionLengthMismatch {
                section: "data",
                expected: self.header.data_len as usize,
                found: self.data.len(),
            });
        }
        Ok(())
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, NibblerError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from bytes; cells wider than a nibble are rejected
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NibblerError> {
        let image: MemoryImage = bincode::deserialize(bytes)?;
        image.validate()?;
        Ok(image)
    }

    /// SHA-256 of the serialized image, hex encoded
    pub fn digest(&self) -> Result<String, NibblerError> {
        let hash = Sha256::digest(self.to_bytes()?);
        Ok(hash.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemoryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nibbler Memory Image")?;
        writeln!(f, "  Magic:   {:#010x}", self.header.magic)?;
        writeln!(f, "  Version: {:#010x}", self.header.version)?;
        writeln!(f, "  Code:    {} cells", self.code.len())?;
        write!(f, "  Data:    {} cells", self.data.len())
    }
}

fn check_section(section: &'static str, len: usize) -> Result<(), NibblerError> {
    if len > WINDOW_SIZE {
        return Err(NibblerError::SectionTooLarge {
            section,
            found: len,
            max: WINDOW_SIZE,
        });
    }
    Ok(())
}
