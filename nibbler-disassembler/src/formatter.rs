//! Cell formatting to listing text

use nibbler_spec::{Address, Nibble, Opcode, Region};

/// Format an opcode as its mnemonic
pub fn format(opcode: Opcode) -> String {
    opcode.mnemonic()
}

/// One listing line: address, raw cell, and for code cells the decoded opcode
pub fn format_cell(addr: Address, cell: Nibble) -> String {
    match addr.region() {
        Region::Code => {
            let opcode = Opcode::from_cell(cell);
            let mut line = format!("{}:  {:x}  {}", addr, cell, format(opcode));
            // The engine decodes 3 bits; the 4th is stored but never executed
            if cell.bit(3) {
                line.push_str(&format!("  ; raw {:#x}", cell.value()));
            }
            line
        }
        Region::Data => format!("{}:  {:x}", addr, cell),
    }
}

/// One assembler source line that reproduces `cell`
pub(crate) fn source_line(region: Region, cell: Nibble) -> String {
    match region {
        Region::Code if !cell.bit(3) => format(Opcode::from_cell(cell)),
        _ => format!(".nibble {:#x}", cell.value()),
    }
}
