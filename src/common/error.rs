use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // QR builder
    #[error("Data too long")]
    DataTooLong,
    #[error("Invalid version")]
    InvalidVersion,
    #[error("Invalid error correction level")]
    InvalidECLevel,
    #[error("Invalid masking pattern")]
    InvalidMaskingPattern,

    // Symbol inspection
    #[error("Invalid format info detected")]
    InvalidFormatInfo,
    #[error("Invalid version info detected")]
    InvalidVersionInfo,
}

pub type QRResult<T> = Result<T, QRError>;
