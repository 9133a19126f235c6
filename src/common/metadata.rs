use std::{
    fmt::{Display, Formatter},
    ops::{Deref, Not},
    str::FromStr,
};

use super::{
    error::{QRError, QRResult},
    mask::MaskPattern,
};

// Metadata
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Metadata {
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl Metadata {
    pub fn new(version: Version, ec_level: ECLevel, mask: Option<MaskPattern>) -> Self {
        Self { version, ec_level, mask }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }
}

impl Display for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.mask {
            Some(m) => write!(
                f,
                "{{ Version: {}, Ec level: {:?}, Mask: {} }}",
                *self.version, self.ec_level, *m
            ),
            None => write!(
                f,
                "{{ Version: {}, Ec level: {:?}, Mask: None }}",
                *self.version, self.ec_level
            ),
        }
    }
}

// Version
//------------------------------------------------------------------------------

/// QR symbol size class. Version `v` is a `17 + 4v` modules wide square.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(version: usize) -> QRResult<Self> {
        match version {
            1..=40 => Ok(Self(version)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    /// Inverse of `width`; `None` for widths no version produces.
    pub fn from_width(width: usize) -> Option<Self> {
        if width < 21 || (width - 17) % 4 != 0 {
            return None;
        }
        Self::new((width - 17) / 4).ok()
    }

    pub fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }
}

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    pub(crate) fn from_index(idx: usize) -> Self {
        debug_assert!(idx < 4, "Invalid ec level index {idx}");
        Self::ALL[idx]
    }
}

impl TryFrom<char> for ECLevel {
    type Error = QRError;
    fn try_from(code: char) -> Result<Self, Self::Error> {
        match code.to_ascii_uppercase() {
            'L' => Ok(Self::L),
            'M' => Ok(Self::M),
            'Q' => Ok(Self::Q),
            'H' => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub fn select<T>(self, dark: T, light: T) -> T {
        match self {
            Self::Dark => dark,
            Self::Light => light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}
