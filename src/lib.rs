//! # qrframe
//!
//! A Rust library for building QR code symbols in byte mode with Reed-Solomon
//! error correction.
//!
//! ## Features
//!
//! - **Byte Mode Encoding**: Arbitrary bytes, versions 1 through 40
//! - **Reed-Solomon Error Correction**: All four levels (L, M, Q, H)
//! - **Automatic Sizing & Masking**: Smallest fitting version and lowest penalty mask by default
//! - **Rendering**: Grayscale or RGB images and terminal strings
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust
//! use qrframe::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! assert_eq!(qr.width(), 21);
//! let img = qr.to_image(4); // 4x scale factor
//! assert_eq!(img.width(), (21 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrframe::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = "Hello, World!";
//! let qr = QRBuilder::new(data.as_bytes())
//!     .version(Version::new(2)?)      // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level("q".parse()?)         // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)?)     // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! assert_eq!(qr.ec_level(), ECLevel::Q);
//! assert_eq!(qr.read_format_info()?, (ECLevel::Q, MaskPattern::new(3)?));
//!
//! // One byte per module, row-major, 1 for dark
//! let cells = qr.buffer();
//! assert_eq!(cells.len(), qr.width() * qr.width());
//! # Ok(())
//! # }
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ### Masks
//! Eight XOR patterns over the data modules. Unless one is forced, every
//! pattern is scored and the one with the lowest penalty is kept.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
