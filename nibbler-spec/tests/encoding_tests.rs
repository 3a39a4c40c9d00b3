//! Frame and image encoding tests that go through the public API only

use nibbler_spec::frame::FRAME_BITS;
use nibbler_spec::{Address, Direction, MemoryImage, Nibble, NibblerError, Opcode, SpiFrame};
use proptest::prelude::*;

// ============================================================================
// Frame layout
// ============================================================================

#[test]
fn test_every_word_decodes_to_the_same_word() {
    // The frame format has no invalid encodings
    for word in [0x0000u16, 0x0007, 0x4000, 0x7FFF, 0x8000, 0xFFFF] {
        assert_eq!(SpiFrame::decode(word).encode(), word);
    }
}

#[test]
fn test_bit_stream_matches_word() {
    let frame = SpiFrame::write(Address::truncate(0x5A5), Nibble::truncate(0x3));
    let word = frame
        .bits()
        .fold(0u16, |acc, bit| (acc << 1) | bit as u16);
    assert_eq!(word, frame.encode());
    assert_eq!(frame.bits().count(), FRAME_BITS as usize);
}

proptest! {
    #[test]
    fn test_frame_fields_survive_encoding(
        read in any::<bool>(),
        addr in 0u16..0x800,
        data in 0u8..16,
    ) {
        let frame = SpiFrame {
            direction: Direction::from_bit(read),
            address: Address::new(addr).unwrap(),
            data: Nibble::new(data).unwrap(),
        };
        let decoded = SpiFrame::decode(frame.encode());
        prop_assert_eq!(decoded.direction, frame.direction);
        prop_assert_eq!(decoded.address, frame.address);
        prop_assert_eq!(decoded.data, frame.data);
    }
}

// ============================================================================
// Image loading
// ============================================================================

#[test]
fn test_image_rejects_cell_wider_than_nibble() {
    let image = MemoryImage::from_opcodes(&[Opcode::Stop]).unwrap();
    let mut bytes = image.to_bytes().unwrap();

    // header (4 + 4 + 2 + 2) + code vec length prefix (8)
    let first_cell = 12 + 8;
    assert_eq!(bytes[first_cell], 0x7);
    bytes[first_cell] = 0x10;

    assert!(matches!(
        MemoryImage::from_bytes(&bytes),
        Err(NibblerError::Serialization(_))
    ));
}

#[test]
fn test_image_rejects_truncated_bytes() {
    let image = MemoryImage::from_opcodes(&[Opcode::Nop, Opcode::Stop]).unwrap();
    let bytes = image.to_bytes().unwrap();
    assert!(MemoryImage::from_bytes(&bytes[..bytes.len() - 1]).is_err());
}

#[test]
fn test_image_keeps_bit3_of_code_cells() {
    let code = vec![Nibble::truncate(0xF), Nibble::truncate(0x8)];
    let image = MemoryImage::from_sections(code.clone(), Vec::new()).unwrap();
    let loaded = MemoryImage::from_bytes(&image.to_bytes().unwrap()).unwrap();
    assert_eq!(loaded.code, code);
    assert_eq!(Opcode::from_cell(loaded.code[0]), Opcode::Stop);
}
