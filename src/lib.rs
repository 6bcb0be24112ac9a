//! QR Code Model 2 encoder.
//!
//! Encodes text or pre-built segments into an immutable symbol covering
//! versions 1 to 40 and all four error correction levels, then renders it
//! as an SVG document or a raster image.
//!
//! ```
//! use qr_encoder::{ErrorCorrection, QrCode};
//!
//! let qr = QrCode::encode_text("HELLO WORLD", ErrorCorrection::Q).unwrap();
//! assert_eq!(qr.size(), 21);
//! assert!(qr.get_module(0, 0));
//! ```

pub mod alignment;
pub mod bits;
pub mod ecc;
pub mod ecc_data;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod mask;
pub mod render;
pub mod types;

pub use encoding::Segment;
pub use error::QrError;
pub use generator::QrCode;
pub use types::{DataMode, ErrorCorrection, MaskPattern, OutputFormat, QrConfig, Version};
