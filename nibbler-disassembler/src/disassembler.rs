//! Main disassembler logic

use crate::error::Result;
use crate::formatter::{format_cell, source_line};
use nibbler_spec::{MemoryImage, Region};

/// Disassemble an image into an address listing
pub fn disassemble(image: &MemoryImage) -> Result<String> {
    image.validate()?;

    let mut output = String::new();
    output.push_str("; Nibbler Disassembly\n");
    output.push_str(&format!(
        "; {} code cells, {} data cells\n",
        image.code.len(),
        image.data.len()
    ));

    let mut region = None;
    for (addr, cell) in image.cells() {
        if region != Some(addr.region()) {
            region = Some(addr.region());
            output.push_str(&format!("\n; {}\n", addr.region().name()));
        }
        output.push_str(&format_cell(addr, cell));
        output.push('\n');
    }

    Ok(output)
}

/// Produce assembler source that rebuilds `image` exactly
pub fn to_source(image: &MemoryImage) -> Result<String> {
    image.validate()?;

    let mut output = String::new();
    for (region, cells) in [(Region::Code, &image.code), (Region::Data, &image.data)] {
        if cells.is_empty() {
            continue;
        }
        output.push_str(match region {
            Region::Code => ".code\n",
            Region::Data => ".data\n",
        });
        for &cell in cells.iter() {
            output.push_str(&source_line(region, cell));
            output.push('\n');
        }
    }

    Ok(output)
}
