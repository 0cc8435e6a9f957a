//! Lookup tables indexed by a control byte.
//!
//! All four tables are built by `const fn` at compile time, so they are plain
//! read-only statics at runtime. A shuffle entry of `0xff` means "write a zero
//! byte here"; both `pshufb` and `tbl` treat an index with the high bit set
//! that way.

/// Shuffle index that zeroes the destination byte.
pub const ZERO: u8 = 0xff;

/// Byte length of each of the four values described by a control byte.
pub static PER_NUM_LEN_TABLE: [[u8; 4]; 256] = build_per_num_len_table();

/// Total number of data bytes described by a control byte.
pub static PER_CONTROL_LEN_TABLE: [u8; 256] = build_per_control_len_table();

/// Masks that pack four little-endian `u32` lanes into their minimal bytes.
pub static ENCODE_SHUFFLE_TABLE: [[u8; 16]; 256] = build_encode_shuffle_table();

/// Masks that spread packed bytes back out into four `u32` lanes.
pub static DECODE_SHUFFLE_TABLE: [[u8; 16]; 256] = build_decode_shuffle_table();

const fn sizes(ctrl: usize) -> [usize; 4] {
    [
        (ctrl & 3) + 1,
        ((ctrl >> 2) & 3) + 1,
        ((ctrl >> 4) & 3) + 1,
        ((ctrl >> 6) & 3) + 1,
    ]
}

const fn build_per_num_len_table() -> [[u8; 4]; 256] {
    let mut table = [[0u8; 4]; 256];
    let mut ctrl = 0;
    while ctrl < 256 {
        let s = sizes(ctrl);
        table[ctrl] = [s[0] as u8, s[1] as u8, s[2] as u8, s[3] as u8];
        ctrl += 1;
    }
    table
}

const fn build_per_control_len_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut ctrl = 0;
    while ctrl < 256 {
        let s = sizes(ctrl);
        table[ctrl] = (s[0] + s[1] + s[2] + s[3]) as u8;
        ctrl += 1;
    }
    table
}

const fn build_encode_shuffle_table() -> [[u8; 16]; 256] {
    let mut table = [[ZERO; 16]; 256];
    let mut ctrl = 0;
    while ctrl < 256 {
        let s = sizes(ctrl);
        let mut out = 0;
        let mut lane = 0;
        while lane < 4 {
            let mut byte = 0;
            while byte < s[lane] {
                table[ctrl][out] = (4 * lane + byte) as u8;
                out += 1;
                byte += 1;
            }
            lane += 1;
        }
        ctrl += 1;
    }
    table
}

const fn build_decode_shuffle_table() -> [[u8; 16]; 256] {
    let mut table = [[ZERO; 16]; 256];
    let mut ctrl = 0;
    while ctrl < 256 {
        let s = sizes(ctrl);
        let mut packed = 0;
        let mut lane = 0;
        while lane < 4 {
            let mut byte = 0;
            while byte < s[lane] {
                table[ctrl][4 * lane + byte] = packed as u8;
                packed += 1;
                byte += 1;
            }
            lane += 1;
        }
        ctrl += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_sum_to_control_length() {
        for ctrl in 0..256 {
            let sum: u8 = PER_NUM_LEN_TABLE[ctrl].iter().sum();
            assert_eq!(sum, PER_CONTROL_LEN_TABLE[ctrl], "ctrl={:#04x}", ctrl);
            assert!((4..=16).contains(&sum));
        }
    }

    #[test]
    fn decode_masks_cover_packed_prefix() {
        for ctrl in 0..256 {
            let mut used: Vec<u8> = DECODE_SHUFFLE_TABLE[ctrl]
                .iter()
                .copied()
                .filter(|&b| b != ZERO)
                .collect();
            used.sort_unstable();
            let expected: Vec<u8> = (0..PER_CONTROL_LEN_TABLE[ctrl]).collect();
            assert_eq!(used, expected, "ctrl={:#04x}", ctrl);
        }
    }

    #[test]
    fn encode_mask_inverts_decode_mask() {
        for ctrl in 0..256 {
            let enc = &ENCODE_SHUFFLE_TABLE[ctrl];
            let dec = &DECODE_SHUFFLE_TABLE[ctrl];
            let len = PER_CONTROL_LEN_TABLE[ctrl] as usize;
            for (packed, &src) in enc.iter().enumerate() {
                if packed < len {
                    assert_eq!(dec[src as usize] as usize, packed);
                } else {
                    assert_eq!(src, ZERO);
                }
            }
        }
    }

    #[test]
    fn known_entries() {
        assert_eq!(PER_NUM_LEN_TABLE[0b1000_0111], [4, 2, 1, 3]);
        assert_eq!(PER_CONTROL_LEN_TABLE[0], 4);
        assert_eq!(PER_CONTROL_LEN_TABLE[0xff], 16);
        assert_eq!(
            DECODE_SHUFFLE_TABLE[0b0000_0001],
            [0, 1, ZERO, ZERO, 2, ZERO, ZERO, ZERO, 3, ZERO, ZERO, ZERO, 4, ZERO, ZERO, ZERO]
        );
        assert_eq!(
            ENCODE_SHUFFLE_TABLE[0b0000_0001],
            [0, 1, 4, 8, 12, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO]
        );
    }
}
