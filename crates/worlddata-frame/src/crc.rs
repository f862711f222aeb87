//! CRC-16 used by WorldData frames.
//!
//! Reflected polynomial 0xA001, register seeded with 0xFFFF, no final XOR,
//! computed bit by bit. The protocol documentation calls this CRC-16/ARC;
//! the common catalogue name for this exact parameter set is CRC-16/MODBUS.

/// Reflected form of the 0x8005 polynomial.
pub const POLYNOMIAL: u16 = 0xA001;

/// Initial register value.
pub const INITIAL: u16 = 0xFFFF;

/// Checksum of `data[start..start + len]`.
///
/// # Panics
///
/// Panics if the range does not lie within `data`. Callers own the range
/// arithmetic; an out-of-range request is a bug, not a protocol error.
pub fn checksum_range(data: &[u8], start: usize, len: usize) -> u16 {
    checksum(&data[start..start + len])
}

/// Checksum of a whole slice.
pub fn checksum(data: &[u8]) -> u16 {
    update(INITIAL, data)
}

fn update(register: u16, data: &[u8]) -> u16 {
    data.iter().fold(register, |mut crc, &byte| {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if crc & 0x0001 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
        }
        crc
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const CHECK_INPUT: &[u8] = b"123456789";

    #[test]
    fn check_value_with_ffff_register() {
        assert_eq!(checksum(CHECK_INPUT), 0x4B37);
    }

    #[test]
    fn zero_register_gives_arc_check_value() {
        assert_eq!(update(0x0000, CHECK_INPUT), 0xBB3D);
    }

    #[test]
    fn matches_reference_implementation() {
        let reference = ::crc::Crc::<u16>::new(&::crc::CRC_16_MODBUS);
        assert_eq!(checksum(CHECK_INPUT), reference.checksum(CHECK_INPUT));
    }

    #[test]
    fn empty_input_is_initial_register() {
        assert_eq!(checksum(&[]), INITIAL);
        assert_eq!(checksum_range(b"abc", 1, 0), INITIAL);
    }

    #[test]
    fn range_covers_only_requested_bytes() {
        let frame = [0x23, 0x01, 0x00, 0x2A, 0x00, 0x05, 0x10, 0x20, 0xAA, 0xBB];
        assert_eq!(
            checksum_range(&frame, 1, frame.len() - 3),
            checksum(&frame[1..frame.len() - 2])
        );
    }

    #[test]
    #[should_panic]
    fn range_past_end_panics() {
        let _ = checksum_range(&[1, 2, 3], 2, 5);
    }

    proptest! {
        #[test]
        fn agrees_with_reference_for_any_input(
            data in proptest::collection::vec(any::<u8>(), 0..300)
        ) {
            let reference = ::crc::Crc::<u16>::new(&::crc::CRC_16_MODBUS);
            prop_assert_eq!(checksum(&data), reference.checksum(&data));
        }

        #[test]
        fn repeated_calls_agree_and_leave_input_untouched(
            data in proptest::collection::vec(any::<u8>(), 1..64),
            split in 0usize..64
        ) {
            let start = split % data.len();
            let len = data.len() - start;
            let before = data.clone();
            let first = checksum_range(&data, start, len);
            let second = checksum_range(&data, start, len);
            prop_assert_eq!(first, second);
            prop_assert_eq!(data, before);
        }
    }
}
