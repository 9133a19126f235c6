use std::ops::Deref;

use tracing::trace;

use crate::common::{
    bitstream::BitStream,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::{compute_total_penalty, MaskPattern},
    metadata::{Color, ECLevel, Metadata, Version},
    version_db::{
        format_info_qr, parse_format_info_qr, parse_version_info, FORMAT_INFO_BIT_LEN,
        FORMAT_INFO_COORDS_QR_MAIN, FORMAT_INFO_COORDS_QR_SIDE, MAX_QR_SIZE, VERSION_INFO_BIT_LEN,
        VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
    },
};

/// A single cell of the symbol, tagged with the role it was drawn for.
/// Everything except `Data` is reserved and never touched by masking.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

/// Module grid of a QR symbol. Cells are addressed by `(row, col)`; negative
/// indices count back from the far edge, so `(-1, -1)` is the bottom right.
///
/// Only [`QRBuilder::build`](crate::QRBuilder::build) produces a `QR`, and the
/// finished grid is read only:
///
/// ```compile_fail
/// use qrframe::{ECLevel, Version, QR};
///
/// let blank = QR::new(Version::new(1).unwrap(), ECLevel::L);
/// ```
///
/// ```compile_fail
/// use qrframe::{builder::Module, Color, QRBuilder};
///
/// let mut qr = QRBuilder::new(b"TEST").build().unwrap();
/// qr.set(3, 3, Module::Data(Color::Light));
/// ```
#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module; MAX_QR_SIZE]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: Box::new([Module::Empty; MAX_QR_SIZE]), w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid[..self.w * self.w]
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> Metadata {
        Metadata::new(self.ver, self.ecl, self.mask)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid().iter().filter(|&m| **m == Color::Dark).count()
    }

    pub fn is_reserved(&self, r: i16, c: i16) -> bool {
        !matches!(self.get(r, c), Module::Data(_))
    }

    pub fn is_dark(&self, r: i16, c: i16) -> bool {
        *self.get(r, c) == Color::Dark
    }

    /// Row-major copy of the grid, `1` for dark and `0` for light modules.
    pub fn buffer(&self) -> Vec<u8> {
        self.grid().iter().map(|m| m.select(1, 0)).collect()
    }

    pub fn penalty(&self) -> u32 {
        compute_total_penalty(self)
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        assert!(-w <= r && r < w, "Row out of bounds: Row {r}, Width {w}");
        assert!(-w <= c && c < w, "Column out of bounds: Column {c}, Width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}

#[cfg(test)]
mod qr_util_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    fn blank(v: usize) -> QR {
        QR::new(Version::new(v).unwrap(), ECLevel::L)
    }

    #[test]
    fn test_index_wrap() {
        let mut qr = blank(1);
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = blank(1);
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_out_of_bound() {
        let qr = blank(1);
        let w = qr.w as i16;
        qr.get(0, w);
    }

    #[test]
    #[should_panic]
    fn test_row_index_overwrap() {
        let qr = blank(1);
        let w = qr.w as i16;
        qr.get(-(w + 1), 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let qr = blank(1);
        let w = qr.w as i16;
        qr.get(0, -(w + 1));
    }

    #[test]
    fn test_module_roles() {
        let mut qr = blank(1);
        assert_eq!(*qr.get(3, 3), Color::Light);
        assert!(qr.is_reserved(3, 3));
        qr.set(3, 3, Module::Data(Color::Dark));
        assert!(!qr.is_reserved(3, 3));
        assert!(qr.is_dark(3, 3));
        qr.set(4, 4, Module::Version(Color::Dark));
        assert!(qr.is_reserved(4, 4));
        assert_eq!(qr.count_dark_modules(), 2);
    }

    #[test]
    fn test_buffer() {
        let mut qr = blank(1);
        qr.set(0, 1, Module::Func(Color::Dark));
        qr.set(-1, -1, Module::Data(Color::Dark));
        let buf = qr.buffer();
        assert_eq!(buf.len(), 21 * 21);
        assert_eq!(buf.iter().filter(|&&b| b == 1).count(), 2);
        assert_eq!(buf[1], 1);
        assert_eq!(buf[21 * 21 - 1], 1);
        assert_eq!(qr.grid().len(), 21 * 21);
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 finder centred at (r, c) along with its light separator
    // on the sides facing the symbol interior
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        let (off, last) = (6, w - 9);
        self.draw_line(off, 8, off, last);
        self.draw_line(8, off, last, off);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in &poses {
            for &c in &poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    // Skips the three centres that would overlap a finder
    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    // Marks both format strips as reserved before data is placed
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_QR_SIDE);
        // Dark module
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
        self.draw_number(ver_info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
    }

    // Writes number MSB first over the coords
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            if number & mask == 0 {
                self.set(r, c, off_clr);
            } else {
                self.set(r, c, on_clr);
            }
            mask >>= 1;
        }
    }

    fn get_number(&self, coords: &[(i16, i16)]) -> u32 {
        coords.iter().fold(0, |acc, &(r, c)| (acc << 1) | self.is_dark(r, c) as u32)
    }

    /// Decodes the format strips, trying the strip around the top left finder
    /// first and the split strip second.
    pub fn read_format_info(&self) -> QRResult<(ECLevel, MaskPattern)> {
        for coords in [&FORMAT_INFO_COORDS_QR_MAIN, &FORMAT_INFO_COORDS_QR_SIDE] {
            let info = self.get_number(coords);
            if let Some((ecl, mask)) = parse_format_info_qr(info) {
                return Ok((ecl, MaskPattern::new(mask)?));
            }
        }
        Err(QRError::InvalidFormatInfo)
    }

    /// Decodes the version blocks. Symbols below version 7 carry none, so the
    /// version comes from the width instead.
    pub fn read_version_info(&self) -> QRResult<Version> {
        if *self.ver < 7 {
            return Version::from_width(self.w).ok_or(QRError::InvalidVersionInfo);
        }
        for coords in [&VERSION_INFO_COORDS_BL, &VERSION_INFO_COORDS_TR] {
            if let Some(v) = parse_version_info(self.get_number(coords)) {
                return Ok(v);
            }
        }
        Err(QRError::InvalidVersionInfo)
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);
        self.fill_remainder_bits();

        debug_assert!(!self.grid().contains(&Module::Empty), "Empty module left after encoding");
    }

    fn draw_payload(&mut self, payload: BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    break;
                }
            }
        }
    }

    // Modules left over once codewords run out are light data
    fn fill_remainder_bits(&mut self) {
        let mut filled = 0;
        for (r, c) in EncRegionIter::new(self.ver) {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
                filled += 1;
            }
        }
        debug_assert_eq!(filled, self.ver.remainder_bits(), "Remainder bits mismatch");
    }

    /// Flips every data module the mask selects and writes the matching
    /// format info.
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.flip_data(pattern);
        self.mask = Some(pattern);
        self.draw_format_info(format_info_qr(self.ecl, *pattern));
        trace!(mask = *pattern, "Applied mask");
    }

    /// Undoes `apply_mask` with the same pattern.
    pub(crate) fn revert_mask(&mut self, pattern: MaskPattern) {
        self.flip_data(pattern);
        self.mask = None;
        self.reserve_format_area();
    }

    fn flip_data(&mut self, pattern: MaskPattern) {
        let mask_fn = pattern.mask_functions();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
    }
}
