//! Memory bank
//!
//! One flat array of nibbles indexed by the full 11-bit address. The SPI
//! interface owns the only write port; the SPI interface and the execution
//! engine each read through `read`. Writes take effect immediately, so the
//! next read from either side sees them.

use nibbler_spec::{Address, MemoryImage, Nibble, Region, ADDRESS_SPACE, WINDOW_SIZE};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct MemoryBank {
    cells: Vec<Nibble>,
}

impl MemoryBank {
    /// Bank with every cell set to `fill`
    pub fn new(fill: Nibble) -> Self {
        MemoryBank {
            cells: vec![fill; ADDRESS_SPACE],
        }
    }

    #[inline]
    pub fn read(&self, addr: Address) -> Nibble {
        self.cells[addr.index()]
    }

    #[inline]
    pub fn write(&mut self, addr: Address, value: Nibble) {
        self.cells[addr.index()] = value;
    }

    pub fn fill(&mut self, value: Nibble) {
        self.cells.fill(value);
    }

    /// The cells the instruction pointer can reach
    pub fn code_window(&self) -> &[Nibble] {
        let base = Region::Code.base() as usize;
        &self.cells[base..base + WINDOW_SIZE]
    }

    /// The cells the data pointer can reach
    pub fn data_window(&self) -> &[Nibble] {
        let base = Region::Data.base() as usize;
        &self.cells[base..base + WINDOW_SIZE]
    }

    /// Copy every cell an image defines into the bank
    pub fn load_image(&mut self, image: &MemoryImage) {
        for (addr, cell) in image.cells() {
            self.write(addr, cell);
        }
    }

    /// Snapshot the first `code_len` / `data_len` cells of each window
    pub fn to_image(&self, code_len: usize, data_len: usize) -> MemoryImage {
        let code = self.code_window()[..code_len.min(WINDOW_SIZE)].to_vec();
        let data = self.data_window()[..data_len.min(WINDOW_SIZE)].to_vec();
        let mut image = MemoryImage::new();
        image.header.code_len = code.len() as u16;
        image.header.data_len = data.len() as u16;
        image.code = code;
        image.data = data;
        image
    }

    /// Number of cells differing from `fill`
    pub fn count_not(&self, fill: Nibble) -> usize {
        self.cells.iter().filter(|&&cell| cell != fill).count()
    }
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new(Nibble::ZERO)
    }
}

impl fmt::Debug for MemoryBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBank")
            .field("cells", &self.cells.len())
            .field("nonzero", &self.count_not(Nibble::ZERO))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nibbler_spec::Opcode;

    #[test]
    fn test_new_bank_is_filled() {
        let mem = MemoryBank::new(Nibble::truncate(0x7));
        assert_eq!(mem.read(Address::MIN), Nibble::truncate(0x7));
        assert_eq!(mem.read(Address::MAX), Nibble::truncate(0x7));
        assert_eq!(mem.count_not(Nibble::truncate(0x7)), 0);
    }

    #[test]
    fn test_write_then_read() {
        let mut mem = MemoryBank::default();
        mem.write(Address::truncate(0x123), Nibble::truncate(0xA));
        assert_eq!(mem.read(Address::truncate(0x123)), Nibble::truncate(0xA));
        assert_eq!(mem.read(Address::truncate(0x124)), Nibble::ZERO);
    }

    #[test]
    fn test_reserved_cells_are_storable() {
        let mut mem = MemoryBank::default();
        mem.write(Address::truncate(0x3FF), Nibble::truncate(0x5));
        mem.write(Address::truncate(0x7FF), Nibble::truncate(0x6));
        assert_eq!(mem.read(Address::truncate(0x3FF)).value(), 0x5);
        assert_eq!(mem.read(Address::truncate(0x7FF)).value(), 0x6);
    }

    #[test]
    fn test_windows() {
        let mut mem = MemoryBank::default();
        mem.write(Address::code(0xFF), Nibble::truncate(0x1));
        mem.write(Address::data(0x00), Nibble::truncate(0x2));
        assert_eq!(mem.code_window().len(), WINDOW_SIZE);
        assert_eq!(mem.code_window()[0xFF].value(), 0x1);
        assert_eq!(mem.data_window()[0x00].value(), 0x2);
    }

    #[test]
    fn test_fill_overwrites_everything() {
        let mut mem = MemoryBank::default();
        mem.write(Address::data(3), Nibble::MAX);
        mem.fill(Nibble::ZERO);
        assert_eq!(mem.count_not(Nibble::ZERO), 0);
    }

    #[test]
    fn test_image_roundtrip_through_bank() {
        let image = MemoryImage::from_sections(
            vec![Opcode::Nop.to_cell(), Opcode::Stop.to_cell()],
            vec![Nibble::truncate(0xC)],
        )
        .unwrap();
        let mut mem = MemoryBank::default();
        mem.load_image(&image);
        assert_eq!(mem.read(Address::data(0)).value(), 0xC);
        assert_eq!(mem.to_image(2, 1), image);
    }

    #[test]
    fn test_debug_is_compact() {
        let debug = format!("{:?}", MemoryBank::default());
        assert!(debug.contains("cells: 2048"));
    }
}
