use std::path::Path;

use serde::Serialize;

use crate::error::QrError;

/// A QR code version number in the range 1 to 40.
///
/// The version fixes the symbol size: `size = version * 4 + 17` modules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Version(u8);

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(number: u8) -> Result<Self, QrError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&number) {
            Ok(Version(number))
        } else {
            Err(QrError::InvalidArgument(format!("version {} is outside 1-40", number)))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Symbol width and height in modules, always odd, between 21 and 177.
    pub fn size(self) -> usize {
        usize::from(self.0) * 4 + 17
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorCorrection {
    L, // Low (~7%)
    M, // Medium (~15%)
    Q, // Quartile (~25%)
    H, // High (~30%)
}

impl ErrorCorrection {
    /// Row index into the capacity tables.
    pub fn ordinal(self) -> usize {
        match self {
            ErrorCorrection::L => 0,
            ErrorCorrection::M => 1,
            ErrorCorrection::Q => 2,
            ErrorCorrection::H => 3,
        }
    }

    /// The 2-bit value stored in the format information word.
    pub fn format_bits(self) -> u8 {
        match self {
            ErrorCorrection::L => 1,
            ErrorCorrection::M => 0,
            ErrorCorrection::Q => 3,
            ErrorCorrection::H => 2,
        }
    }
}

/// Encoding mode of a data segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DataMode {
    Numeric,
    Alphanumeric,
    Byte,
    Eci,
}

impl DataMode {
    /// The 4-bit mode indicator placed before each segment.
    pub fn mode_bits(self) -> u32 {
        match self {
            DataMode::Numeric => 0x1,
            DataMode::Alphanumeric => 0x2,
            DataMode::Byte => 0x4,
            DataMode::Eci => 0x7,
        }
    }

    /// Width of the character count field for this mode at the given version.
    pub fn char_count_bits(self, version: Version) -> u8 {
        let widths = match self {
            DataMode::Numeric => [10, 12, 14],
            DataMode::Alphanumeric => [9, 11, 13],
            DataMode::Byte => [8, 16, 16],
            DataMode::Eci => [0, 0, 0],
        };
        widths[usize::from((version.number() + 7) / 17)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MaskPattern {
    Pattern0,
    Pattern1,
    Pattern2,
    Pattern3,
    Pattern4,
    Pattern5,
    Pattern6,
    Pattern7,
}

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        MaskPattern::Pattern0,
        MaskPattern::Pattern1,
        MaskPattern::Pattern2,
        MaskPattern::Pattern3,
        MaskPattern::Pattern4,
        MaskPattern::Pattern5,
        MaskPattern::Pattern6,
        MaskPattern::Pattern7,
    ];

    pub fn from_value(value: u8) -> Result<Self, QrError> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| QrError::InvalidArgument(format!("mask pattern {} is outside 0-7", value)))
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Svg,
}

impl OutputFormat {
    /// Picks the output format from a filename extension.
    pub fn from_path(path: &str) -> Result<Self, QrError> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg),
            Some("svg") => Ok(OutputFormat::Svg),
            _ => Err(QrError::InvalidArgument(format!(
                "cannot infer an output format from {:?} (expected .png, .jpg or .svg)",
                path
            ))),
        }
    }
}

pub struct QrConfig {
    pub error_correction: ErrorCorrection,
    pub mask_pattern: Option<MaskPattern>,
    pub boost_ecl: bool,
    pub output_filename: String,
    pub pixel_size: u32,
    pub border: u32,
    pub foreground: String,
    pub background: String,
    pub highlight_finders: bool,
    pub json: bool,
    pub data: String,
    pub verbose: bool,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::M,
            mask_pattern: None,
            boost_ecl: true,
            output_filename: "qr-code.png".to_string(),
            pixel_size: 512,
            border: 4,
            foreground: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            highlight_finders: false,
            json: false,
            data: "https://www.example.com/".to_string(),
            verbose: false,
        }
    }
}
