//! Main assembler logic

use crate::error::{AssemblerError, Result};
use crate::parser::{parse, Line, Statement};
use nibbler_spec::{Address, MemoryImage, Nibble, Region, WINDOW_SIZE};

/// Assemble source code into a memory image
pub fn assemble(source: &str) -> Result<MemoryImage> {
    let lines = parse(source)?;
    let mut assembler = Assembler::new();
    for line in &lines {
        assembler.apply(line)?;
    }
    let image = assembler.finish()?;
    tracing::debug!(code = image.code.len(), data = image.data.len(), "assembled image");
    Ok(image)
}

/// One window being filled
#[derive(Debug, Default)]
struct Section {
    cells: Vec<Nibble>,
    written: Vec<bool>,
    cursor: usize,
}

impl Section {
    fn emit(&mut self, region: Region, cell: Nibble, line: usize) -> Result<()> {
        if self.cursor >= WINDOW_SIZE {
            return Err(AssemblerError::SectionOverflow {
                line,
                section: region.name(),
            });
        }
        if self.cursor >= self.cells.len() {
            self.cells.resize(self.cursor + 1, Nibble::ZERO);
            self.written.resize(self.cursor + 1, false);
        }
        if self.written[self.cursor] {
            return Err(AssemblerError::Overlap {
                line,
                address: Address::truncate(region.base() + self.cursor as u16),
            });
        }
        self.cells[self.cursor] = cell;
        self.written[self.cursor] = true;
        self.cursor += 1;
        Ok(())
    }
}

/// Statement-at-a-time image builder. Cells skipped over by `.org` are 0.
#[derive(Debug)]
pub struct Assembler {
    code: Section,
    data: Section,
    region: Region,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            code: Section::default(),
            data: Section::default(),
            region: Region::Code,
        }
    }

    /// Section new cells go to
    pub fn region(&self) -> Region {
        self.region
    }

    fn section(&mut self) -> &mut Section {
        match self.region {
            Region::Code => &mut self.code,
            Region::Data => &mut self.data,
        }
    }

    pub fn apply(&mut self, line: &Line) -> Result<()> {
        let region = self.region;
        match &line.statement {
            Statement::Instruction(opcode) => {
                if region != Region::Code {
                    return Err(AssemblerError::SyntaxError {
                        line: line.number,
                        column: 1,
                        message: format!("Instruction {} outside .code", opcode),
                    });
                }
                self.section().emit(region, opcode.to_cell(), line.number)
            }
            Statement::Section(next) => {
                self.region = *next;
                Ok(())
            }
            Statement::Org(offset) => {
                self.section().cursor = *offset as usize;
                Ok(())
            }
            Statement::Nibbles(cells) => {
                for &cell in cells {
                    self.section().emit(region, cell, line.number)?;
                }
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Result<MemoryImage> {
        Ok(MemoryImage::from_sections(self.code.cells, self.data.cells)?)
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}
