use super::metadata::{ECLevel, Version};

// Block layout & capacity
//------------------------------------------------------------------------------

impl Version {
    /// Block layout for the level as
    /// `(block1_count, block2_count, data_block_words, ecc_per_block)`.
    /// Group 2 blocks carry one more data codeword than group 1 blocks.
    pub fn ec_blocks(self, ec_level: ECLevel) -> (usize, usize, usize, usize) {
        let (b1, b2, d, e) = EC_BLOCKS[*self - 1][ec_level as usize];
        (b1 as usize, b2 as usize, d as usize, e as usize)
    }

    pub fn ecc_per_block(self, ec_level: ECLevel) -> usize {
        self.ec_blocks(ec_level).3
    }

    pub fn block_count(self, ec_level: ECLevel) -> usize {
        let (b1, b2, _, _) = self.ec_blocks(ec_level);
        b1 + b2
    }

    pub fn data_codewords(self, ec_level: ECLevel) -> usize {
        let (b1, b2, d, _) = self.ec_blocks(ec_level);
        (b1 + b2) * d + b2
    }

    pub fn total_codewords(self) -> usize {
        let (b1, b2, d, e) = self.ec_blocks(ECLevel::L);
        (b1 + b2) * (d + e) + b2
    }

    pub fn remainder_bits(self) -> usize {
        match *self {
            1 | 7..=13 | 35..=40 => 0,
            2..=6 => 7,
            14..=20 | 28..=34 => 3,
            21..=27 => 4,
            _ => unreachable!("Invalid version"),
        }
    }

    /// Bit length of the byte mode character count indicator.
    pub fn char_count_bits(self) -> usize {
        if *self <= 9 {
            8
        } else {
            16
        }
    }

    /// Longest byte-mode value the version holds at the level.
    pub fn byte_capacity(self, ec_level: ECLevel) -> usize {
        let header_bits = MODE_INDICATOR_BIT_LEN + self.char_count_bits();
        (self.data_codewords(ec_level) * 8 - header_bits) >> 3
    }

    /// Row/column coordinates of alignment pattern centres, ascending.
    pub fn alignment_pattern(self) -> Vec<i16> {
        if *self == 1 {
            return Vec::new();
        }
        let count = *self / 7 + 2;
        let pitch = ALIGNMENT_PITCH[*self] as i16;
        let last = self.width() as i16 - 7;
        let mut poses = Vec::with_capacity(count);
        poses.push(6);
        poses.extend((0..count as i16 - 1).rev().map(|k| last - k * pitch));
        poses
    }

    pub fn info(self) -> u32 {
        VERSION_INFOS[*self]
    }
}

// Format & version info
//------------------------------------------------------------------------------

pub fn format_info_qr(ec_level: ECLevel, mask: u8) -> u32 {
    debug_assert!(mask < 8, "Invalid mask {mask}");
    FORMAT_INFOS_QR[ec_level as usize][mask as usize]
}

/// Resolves a format number read off a symbol into `(ec level, mask)`.
pub fn parse_format_info_qr(info: u32) -> Option<(ECLevel, u8)> {
    let flat = FORMAT_INFOS_QR.iter().flatten().copied().collect::<Vec<_>>();
    let idx = rectify_info(info, &flat, FORMAT_ERROR_CAPACITY)?;
    Some((ECLevel::from_index(idx / 8), (idx % 8) as u8))
}

/// Resolves a version number read off a symbol. Versions below 7 carry none.
pub fn parse_version_info(info: u32) -> Option<Version> {
    let idx = rectify_info(info, &VERSION_INFOS[7..], VERSION_ERROR_CAPACITY)?;
    Version::new(idx + 7).ok()
}

// Index of the closest table entry, if within the error capacity
pub fn rectify_info(info: u32, table: &[u32], err_capacity: u32) -> Option<usize> {
    table
        .iter()
        .enumerate()
        .map(|(i, &valid)| (i, (info ^ valid).count_ones()))
        .filter(|&(_, dist)| dist <= err_capacity)
        .min_by_key(|&(_, dist)| dist)
        .map(|(i, _)| i)
}

#[cfg(test)]
mod version_db_tests {
    use test_case::test_case;

    use super::{format_info_qr, parse_format_info_qr, parse_version_info, rectify_info};
    use crate::common::metadata::{ECLevel, Version};

    #[test_case(1, ECLevel::L, 17)]
    #[test_case(1, ECLevel::M, 14)]
    #[test_case(1, ECLevel::Q, 11)]
    #[test_case(1, ECLevel::H, 7)]
    #[test_case(9, ECLevel::L, 230)]
    #[test_case(10, ECLevel::L, 271)]
    #[test_case(10, ECLevel::H, 119)]
    #[test_case(27, ECLevel::M, 1125)]
    #[test_case(40, ECLevel::L, 2953)]
    #[test_case(40, ECLevel::M, 2331)]
    #[test_case(40, ECLevel::Q, 1663)]
    #[test_case(40, ECLevel::H, 1273)]
    fn test_byte_capacity(v: usize, ecl: ECLevel, exp: usize) {
        assert_eq!(Version::new(v).unwrap().byte_capacity(ecl), exp);
    }

    #[test]
    fn test_capacity_monotonic() {
        for ecl in ECLevel::ALL {
            let caps = Version::all().map(|v| v.byte_capacity(ecl)).collect::<Vec<_>>();
            assert!(caps.windows(2).all(|w| w[0] < w[1]), "{ecl:?}");
        }
        for v in Version::all() {
            let caps = ECLevel::ALL.map(|ecl| v.byte_capacity(ecl));
            assert!(caps.windows(2).all(|w| w[0] > w[1]), "{v}");
        }
    }

    #[test]
    fn test_total_codewords_same_for_all_levels() {
        for v in Version::all() {
            for ecl in ECLevel::ALL {
                let (b1, b2, d, e) = v.ec_blocks(ecl);
                assert_eq!((b1 + b2) * (d + e) + b2, v.total_codewords(), "{v} {ecl:?}");
            }
        }
    }

    #[test]
    fn test_total_codewords() {
        let totals = [26, 44, 70, 100, 134, 172, 196, 242, 292, 346];
        for (v, exp) in Version::all().zip(totals) {
            assert_eq!(v.total_codewords(), exp);
        }
        assert_eq!(Version::MAX.total_codewords(), 3706);
    }

    #[test_case(1, vec![])]
    #[test_case(2, vec![6, 18])]
    #[test_case(7, vec![6, 22, 38])]
    #[test_case(14, vec![6, 26, 46, 66])]
    #[test_case(32, vec![6, 34, 60, 86, 112, 138])]
    #[test_case(36, vec![6, 24, 50, 76, 102, 128, 154])]
    #[test_case(40, vec![6, 30, 58, 86, 114, 142, 170])]
    fn test_alignment_pattern(v: usize, exp: Vec<i16>) {
        assert_eq!(Version::new(v).unwrap().alignment_pattern(), exp);
    }

    #[test]
    fn test_format_info_round_trip() {
        for ecl in ECLevel::ALL {
            for m in 0..8 {
                let info = format_info_qr(ecl, m);
                assert_eq!(parse_format_info_qr(info), Some((ecl, m)));
                // Survives up to 3 bit flips
                assert_eq!(parse_format_info_qr(info ^ 0b100_0000_0100_0001), Some((ecl, m)));
            }
        }
        assert_eq!(format_info_qr(ECLevel::M, 0), 0x5412);
    }

    #[test]
    fn test_version_info_round_trip() {
        for v in Version::all().filter(|v| **v >= 7) {
            assert_eq!(parse_version_info(v.info()), Some(v));
            assert_eq!(parse_version_info(v.info() ^ 0b10_0000_0001_0000_0001), Some(v));
        }
        assert_eq!(Version::new(7).unwrap().info(), 0x07C94);
    }

    #[test]
    fn test_rectify_info_rejects_far_values() {
        assert_eq!(rectify_info(0b1111, &[0, 0b1111_0000], 3), None);
        assert_eq!(rectify_info(0b0111, &[0, 0b1111_0000], 3), Some(0));
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const MAX_QR_SIZE: usize = 177 * 177;

pub const MODE_INDICATOR_BIT_LEN: usize = 4;

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const VERSION_INFO_BIT_LEN: usize = 18;

pub const FORMAT_ERROR_CAPACITY: u32 = 3;

pub const VERSION_ERROR_CAPACITY: u32 = 3;

pub static FORMAT_INFO_COORDS_QR_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

pub static FORMAT_INFO_COORDS_QR_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

const fn version_info_coords(transpose: bool) -> [(i16, i16); 18] {
    let mut coords = [(0, 0); 18];
    let mut i = 0;
    while i < 18 {
        let bit = 17 - i;
        let near = (bit / 3) as i16;
        let far = (bit % 3) as i16 - 11;
        coords[i] = if transpose { (far, near) } else { (near, far) };
        i += 1;
    }
    coords
}

pub static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = version_info_coords(false);

pub static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = version_info_coords(true);

// Final 15 bit format info, indexed by ec level & mask
static FORMAT_INFOS_QR: [[u32; 8]; 4] = [
    [0x77C4, 0x72F3, 0x7DAA, 0x789D, 0x662F, 0x6318, 0x6C41, 0x6976], // L
    [0x5412, 0x5125, 0x5E7C, 0x5B4B, 0x45F9, 0x40CE, 0x4F97, 0x4AA0], // M
    [0x355F, 0x3068, 0x3F31, 0x3A06, 0x24B4, 0x2183, 0x2EDA, 0x2BED], // Q
    [0x1689, 0x13BE, 0x1CE7, 0x19D0, 0x0762, 0x0255, 0x0D0C, 0x083B], // H
];

// 18 bit version info, indexed by version
static VERSION_INFOS: [u32; 41] = [
    0x00000, 0x00000, 0x00000, 0x00000, 0x00000, 0x00000,
    0x00000, 0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6,
    0x0C762, 0x0D847, 0x0E60D, 0x0F928, 0x10B78, 0x1145D,
    0x12A17, 0x13532, 0x149A6, 0x15683, 0x168C9, 0x177EC,
    0x18EC4, 0x191E1, 0x1AFAB, 0x1B08E, 0x1CC1A, 0x1D33F,
    0x1ED75, 0x1F250, 0x209D5, 0x216F0, 0x228BA, 0x2379F,
    0x24B0B, 0x2542E, 0x26A64, 0x27541, 0x28C69,
];

// Distance between adjacent alignment pattern centres, indexed by version
static ALIGNMENT_PITCH: [u8; 41] = [
    0, 0, 12, 16, 20, 24, 28, 16, 18, 20, 22, 24, 26, 28,
    20, 22, 24, 24, 26, 28, 28, 22, 24, 24, 26, 26, 28, 28,
    24, 24, 26, 26, 26, 28, 28, 24, 26, 26, 26, 28, 28,
];

// (block1_count, block2_count, data_block_words, ecc_per_block) for L, M, Q, H
static EC_BLOCKS: [[(u8, u8, u8, u8); 4]; 40] = [
    [(1, 0, 19, 7), (1, 0, 16, 10), (1, 0, 13, 13), (1, 0, 9, 17)], // 1
    [(1, 0, 34, 10), (1, 0, 28, 16), (1, 0, 22, 22), (1, 0, 16, 28)], // 2
    [(1, 0, 55, 15), (1, 0, 44, 26), (2, 0, 17, 18), (2, 0, 13, 22)], // 3
    [(1, 0, 80, 20), (2, 0, 32, 18), (2, 0, 24, 26), (4, 0, 9, 16)], // 4
    [(1, 0, 108, 26), (2, 0, 43, 24), (2, 2, 15, 18), (2, 2, 11, 22)], // 5
    [(2, 0, 68, 18), (4, 0, 27, 16), (4, 0, 19, 24), (4, 0, 15, 28)], // 6
    [(2, 0, 78, 20), (4, 0, 31, 18), (2, 4, 14, 18), (4, 1, 13, 26)], // 7
    [(2, 0, 97, 24), (2, 2, 38, 22), (4, 2, 18, 22), (4, 2, 14, 26)], // 8
    [(2, 0, 116, 30), (3, 2, 36, 22), (4, 4, 16, 20), (4, 4, 12, 24)], // 9
    [(2, 2, 68, 18), (4, 1, 43, 26), (6, 2, 19, 24), (6, 2, 15, 28)], // 10
    [(4, 0, 81, 20), (1, 4, 50, 30), (4, 4, 22, 28), (3, 8, 12, 24)], // 11
    [(2, 2, 92, 24), (6, 2, 36, 22), (4, 6, 20, 26), (7, 4, 14, 28)], // 12
    [(4, 0, 107, 26), (8, 1, 37, 22), (8, 4, 20, 24), (12, 4, 11, 22)], // 13
    [(3, 1, 115, 30), (4, 5, 40, 24), (11, 5, 16, 20), (11, 5, 12, 24)], // 14
    [(5, 1, 87, 22), (5, 5, 41, 24), (5, 7, 24, 30), (11, 7, 12, 24)], // 15
    [(5, 1, 98, 24), (7, 3, 45, 28), (15, 2, 19, 24), (3, 13, 15, 30)], // 16
    [(1, 5, 107, 28), (10, 1, 46, 28), (1, 15, 22, 28), (2, 17, 14, 28)], // 17
    [(5, 1, 120, 30), (9, 4, 43, 26), (17, 1, 22, 28), (2, 19, 14, 28)], // 18
    [(3, 4, 113, 28), (3, 11, 44, 26), (17, 4, 21, 26), (9, 16, 13, 26)], // 19
    [(3, 5, 107, 28), (3, 13, 41, 26), (15, 5, 24, 30), (15, 10, 15, 28)], // 20
    [(4, 4, 116, 28), (17, 0, 42, 26), (17, 6, 22, 28), (19, 6, 16, 30)], // 21
    [(2, 7, 111, 28), (17, 0, 46, 28), (7, 16, 24, 30), (34, 0, 13, 24)], // 22
    [(4, 5, 121, 30), (4, 14, 47, 28), (11, 14, 24, 30), (16, 14, 15, 30)], // 23
    [(6, 4, 117, 30), (6, 14, 45, 28), (11, 16, 24, 30), (30, 2, 16, 30)], // 24
    [(8, 4, 106, 26), (8, 13, 47, 28), (7, 22, 24, 30), (22, 13, 15, 30)], // 25
    [(10, 2, 114, 28), (19, 4, 46, 28), (28, 6, 22, 28), (33, 4, 16, 30)], // 26
    [(8, 4, 122, 30), (22, 3, 45, 28), (8, 26, 23, 30), (12, 28, 15, 30)], // 27
    [(3, 10, 117, 30), (3, 23, 45, 28), (4, 31, 24, 30), (11, 31, 15, 30)], // 28
    [(7, 7, 116, 30), (21, 7, 45, 28), (1, 37, 23, 30), (19, 26, 15, 30)], // 29
    [(5, 10, 115, 30), (19, 10, 47, 28), (15, 25, 24, 30), (23, 25, 15, 30)], // 30
    [(13, 3, 115, 30), (2, 29, 46, 28), (42, 1, 24, 30), (23, 28, 15, 30)], // 31
    [(17, 0, 115, 30), (10, 23, 46, 28), (10, 35, 24, 30), (19, 35, 15, 30)], // 32
    [(17, 1, 115, 30), (14, 21, 46, 28), (29, 19, 24, 30), (11, 46, 15, 30)], // 33
    [(13, 6, 115, 30), (14, 23, 46, 28), (44, 7, 24, 30), (59, 1, 16, 30)], // 34
    [(12, 7, 121, 30), (12, 26, 47, 28), (39, 14, 24, 30), (22, 41, 15, 30)], // 35
    [(6, 14, 121, 30), (6, 34, 47, 28), (46, 10, 24, 30), (2, 64, 15, 30)], // 36
    [(17, 4, 122, 30), (29, 14, 46, 28), (49, 10, 24, 30), (24, 46, 15, 30)], // 37
    [(4, 18, 122, 30), (13, 32, 46, 28), (48, 14, 24, 30), (42, 32, 15, 30)], // 38
    [(20, 4, 117, 30), (40, 7, 47, 28), (43, 22, 24, 30), (10, 67, 15, 30)], // 39
    [(19, 6, 118, 30), (18, 31, 47, 28), (34, 34, 24, 30), (20, 61, 15, 30)], // 40
];
