use std::ops::Deref;

use tracing::trace;

use super::{
    error::{QRError, QRResult},
    metadata::Color,
};
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        match pattern {
            0..=7 => Ok(Self(pattern)),
            _ => Err(QRError::InvalidMaskingPattern),
        }
    }

    pub fn all() -> impl Iterator<Item = MaskPattern> {
        (0..8).map(MaskPattern)
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(pattern: u8) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_functions(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

/// Tries all 8 masks on the grid in place and keeps the one with the lowest
/// penalty, preferring the lowest id on ties.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let mut best = (u32::MAX, MaskPattern(0));
    for m in MaskPattern::all() {
        qr.apply_mask(m);
        let pen = compute_total_penalty(qr);
        trace!(mask = *m, penalty = pen, "Scored mask");
        if pen < best.0 {
            best = (pen, m);
        }
        qr.revert_mask(m);
    }
    let (_, best_mask) = best;
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr.count_dark_modules(), qr.width() * qr.width());
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// Runs of same colored modules along a row (is_hor) or column
fn line_runs(qr: &QR, i: i16, is_hor: bool) -> Vec<(Color, u32)> {
    let w = qr.width() as i16;
    let mut runs: Vec<(Color, u32)> = Vec::with_capacity(w as usize);
    for j in 0..w {
        let clr = if is_hor { *qr.get(i, j) } else { *qr.get(j, i) };
        match runs.last_mut() {
            Some((last, len)) if *last == clr => *len += 1,
            _ => runs.push((clr, 1)),
        }
    }
    runs
}

fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    (0..w)
        .flat_map(|i| [line_runs(qr, i, true), line_runs(qr, i, false)])
        .map(|runs| run_penalty(&runs))
        .sum()
}

fn run_penalty(runs: &[(Color, u32)]) -> u32 {
    runs.iter().filter(|(_, len)| *len >= 5).map(|(_, len)| PENALTY_N1 + len - 5).sum()
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += PENALTY_N2;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    let w = qr.width() as i16;
    (0..w).map(|i| finder_like_count(&line_runs(qr, i, is_hor)) * PENALTY_N3).sum()
}

// Counts dark:light:dark:light:dark runs in 1:1:3:1:1 ratio with a light
// run of at least 4 units, or the symbol edge, on one side
fn finder_like_count(runs: &[(Color, u32)]) -> u32 {
    let mut cnt = 0;
    for k in 2..runs.len().saturating_sub(2) {
        let (clr, len) = runs[k];
        if clr != Color::Dark || len % 3 != 0 {
            continue;
        }
        let n = len / 3;
        if [k - 2, k - 1, k + 1, k + 2].iter().any(|&i| runs[i].1 != n) {
            continue;
        }
        let quiet_before = k < 3 || runs[k - 3].1 >= 4 * n;
        let quiet_after = k + 3 >= runs.len() || runs[k + 3].1 >= 4 * n;
        if quiet_before || quiet_after {
            cnt += 1;
        }
    }
    cnt
}

// N4 for every full 5% step the dark ratio strays from 50%
fn compute_balance_penalty(dark_cnt: usize, total: usize) -> u32 {
    let dev = (dark_cnt * 2).abs_diff(total) * 10 / total;
    dev as u32 * PENALTY_N4
}

#[cfg(test)]
mod mask_tests {
    use test_case::test_case;

    use super::{
        apply_best_mask, compute_balance_penalty, compute_total_penalty, finder_like_count,
        run_penalty, MaskPattern,
    };
    use crate::{
        builder::{QRBuilder, QR},
        common::{
            error::QRError,
            metadata::{Color, ECLevel, Version},
        },
    };

    const D: Color = Color::Dark;
    const L: Color = Color::Light;

    #[test]
    fn test_mask_pattern_bounds() {
        assert_eq!(MaskPattern::new(7).map(|m| *m), Ok(7));
        assert_eq!(MaskPattern::new(8), Err(QRError::InvalidMaskingPattern));
        assert_eq!(MaskPattern::try_from(255), Err(QRError::InvalidMaskingPattern));
        assert_eq!(MaskPattern::all().count(), 8);
    }

    #[test_case(0, &[(0, 0), (1, 1), (2, 4)], &[(0, 1), (3, 4)])]
    #[test_case(1, &[(0, 3), (2, 1)], &[(1, 0), (3, 3)])]
    #[test_case(2, &[(1, 0), (4, 3)], &[(0, 1), (3, 4)])]
    #[test_case(3, &[(0, 0), (1, 2), (2, 4)], &[(0, 1), (1, 1)])]
    #[test_case(4, &[(0, 0), (1, 2), (2, 3)], &[(0, 3), (2, 0)])]
    #[test_case(5, &[(0, 5), (6, 1), (6, 6)], &[(1, 1), (2, 5)])]
    #[test_case(6, &[(0, 5), (1, 1), (1, 2)], &[(2, 2), (2, 5)])]
    #[test_case(7, &[(0, 0), (1, 3), (0, 2)], &[(0, 1), (1, 1)])]
    fn test_mask_functions(m: u8, on: &[(i16, i16)], off: &[(i16, i16)]) {
        let mask_fn = MaskPattern::new(m).unwrap().mask_functions();
        assert!(on.iter().all(|&(r, c)| mask_fn(r, c)), "Mask {m}");
        assert!(off.iter().all(|&(r, c)| !mask_fn(r, c)), "Mask {m}");
    }

    #[test]
    fn test_run_penalty() {
        assert_eq!(run_penalty(&[(D, 4), (L, 1)]), 0);
        assert_eq!(run_penalty(&[(D, 5)]), 3);
        assert_eq!(run_penalty(&[(D, 7), (L, 2), (D, 5)]), 8);
    }

    #[test]
    fn test_finder_like_count() {
        let quiet_both = [(L, 4), (D, 1), (L, 1), (D, 3), (L, 1), (D, 1), (L, 4)];
        assert_eq!(finder_like_count(&quiet_both), 1);
        let scaled = [(L, 8), (D, 2), (L, 2), (D, 6), (L, 2), (D, 2), (L, 1)];
        assert_eq!(finder_like_count(&scaled), 1);
        let at_edge = [(D, 1), (L, 1), (D, 3), (L, 1), (D, 1), (L, 1)];
        assert_eq!(finder_like_count(&at_edge), 1);
        let no_quiet = [(L, 1), (D, 1), (L, 1), (D, 3), (L, 1), (D, 1), (L, 1)];
        assert_eq!(finder_like_count(&no_quiet), 0);
        let bad_ratio = [(L, 4), (D, 1), (L, 2), (D, 3), (L, 1), (D, 1), (L, 4)];
        assert_eq!(finder_like_count(&bad_ratio), 0);
        let inverted = [(D, 4), (L, 1), (D, 1), (L, 3), (D, 1), (L, 1), (D, 4)];
        assert_eq!(finder_like_count(&inverted), 0);
    }

    #[test_case(50, 100, 0)]
    #[test_case(54, 100, 0)]
    #[test_case(55, 100, 10)]
    #[test_case(45, 100, 10)]
    #[test_case(61, 100, 20)]
    #[test_case(0, 100, 100)]
    #[test_case(0, 441, 100)]
    fn test_balance_penalty(dark: usize, total: usize, exp: u32) {
        assert_eq!(compute_balance_penalty(dark, total), exp);
    }

    #[test]
    fn test_total_penalty_blank() {
        // All light v1: 400 blocks, 42 runs of 21, 0% dark
        let qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        assert_eq!(compute_total_penalty(&qr), 400 * 3 + 42 * 19 + 100);
    }

    #[test]
    fn test_revert_mask_restores_grid() {
        let mut qr = QRBuilder::new(b"Hello, world!").mask(MaskPattern::new(0).unwrap()).build().unwrap();
        qr.revert_mask(MaskPattern::new(0).unwrap());
        let unmasked = qr.clone();
        for m in MaskPattern::all() {
            qr.apply_mask(m);
            qr.revert_mask(m);
            assert_eq!(qr.grid(), unmasked.grid(), "Mask {}", *m);
        }
    }

    #[test_case(b"TEST", ECLevel::L)]
    #[test_case(b"Hello, world!", ECLevel::M)]
    #[test_case(b"https://example.com/some/longer/path?query=1", ECLevel::Q)]
    #[test_case(&[0u8; 120], ECLevel::H)]
    #[test_case(&[0xffu8; 300], ECLevel::L)]
    fn test_best_mask_has_lowest_penalty(data: &[u8], ecl: ECLevel) {
        let qr = QRBuilder::new(data).ec_level(ecl).build().unwrap();
        let best = qr.mask().unwrap();

        let mut unmasked = qr.clone();
        unmasked.revert_mask(best);
        let penalties = MaskPattern::all()
            .map(|m| {
                let mut trial = unmasked.clone();
                trial.apply_mask(m);
                compute_total_penalty(&trial)
            })
            .collect::<Vec<_>>();

        let min = *penalties.iter().min().unwrap();
        assert_eq!(penalties[*best as usize], min);
        assert_eq!(penalties.iter().position(|&p| p == min), Some(*best as usize));
        assert_eq!(compute_total_penalty(&qr), min);

        let mut reapplied = unmasked.clone();
        assert_eq!(apply_best_mask(&mut reapplied), best);
        assert_eq!(reapplied.grid(), qr.grid());
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const PENALTY_N1: u32 = 3;

pub const PENALTY_N2: u32 = 3;

pub const PENALTY_N3: u32 = 40;

pub const PENALTY_N4: u32 = 10;
