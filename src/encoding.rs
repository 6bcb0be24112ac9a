use crate::bits::BitBuffer;
use crate::ecc_data::num_data_codewords;
use crate::error::QrError;
use crate::types::{DataMode, ErrorCorrection, Version};

/// The 45 characters representable in alphanumeric mode; the index of a
/// character is its encoded value.
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// One run of input characters encoded in a single mode.
///
/// `bits` holds only the payload; the mode indicator and character count
/// header are added when the segments are assembled into codewords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    mode: DataMode,
    num_chars: usize,
    bits: Vec<u8>,
}

impl Segment {
    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Pre-encoding character count: digits, characters, or bytes depending
    /// on the mode.
    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Encodes a string of decimal digits, three digits per 10-bit group.
    pub fn make_numeric(text: &str) -> Result<Segment, QrError> {
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QrError::InvalidArgument(
                "numeric mode accepts only the digits 0-9".to_string(),
            ));
        }
        let mut bits = BitBuffer::new();
        for chunk in text.as_bytes().chunks(3) {
            let mut value: u32 = 0;
            for &digit in chunk {
                value = value * 10 + u32::from(digit - b'0');
            }
            bits.append_bits(value, chunk.len() as u8 * 3 + 1)?;
        }
        Ok(Segment {
            mode: DataMode::Numeric,
            num_chars: text.len(),
            bits: bits.bits().to_vec(),
        })
    }

    /// Encodes alphanumeric text, two characters per 11-bit group.
    pub fn make_alphanumeric(text: &str) -> Result<Segment, QrError> {
        let values = text
            .chars()
            .map(alphanumeric_value)
            .collect::<Result<Vec<u32>, QrError>>()?;
        let mut bits = BitBuffer::new();
        for pair in values.chunks(2) {
            if pair.len() == 2 {
                bits.append_bits(pair[0] * 45 + pair[1], 11)?;
            } else {
                bits.append_bits(pair[0], 6)?;
            }
        }
        Ok(Segment {
            mode: DataMode::Alphanumeric,
            num_chars: text.chars().count(),
            bits: bits.bits().to_vec(),
        })
    }

    /// Encodes arbitrary bytes, 8 bits each.
    pub fn make_bytes(data: &[u8]) -> Segment {
        let mut bits = Vec::with_capacity(data.len() * 8);
        for &byte in data {
            for i in (0..8).rev() {
                bits.push((byte >> i) & 1);
            }
        }
        Segment {
            mode: DataMode::Byte,
            num_chars: data.len(),
            bits,
        }
    }

    /// Encodes an Extended Channel Interpretation designator.
    pub fn make_eci(assign_value: u32) -> Result<Segment, QrError> {
        let mut bits = BitBuffer::new();
        if assign_value < 1 << 7 {
            bits.append_bits(assign_value, 8)?;
        } else if assign_value < 1 << 14 {
            bits.append_bits(0b10, 2)?;
            bits.append_bits(assign_value, 14)?;
        } else if assign_value < 1_000_000 {
            bits.append_bits(0b110, 3)?;
            bits.append_bits(assign_value, 21)?;
        } else {
            return Err(QrError::InvalidArgument(format!(
                "ECI assignment value {} is too large",
                assign_value
            )));
        }
        Ok(Segment {
            mode: DataMode::Eci,
            num_chars: 0,
            bits: bits.bits().to_vec(),
        })
    }

    /// Splits text into segments using the cheapest single mode that covers
    /// every character: numeric, then alphanumeric, then UTF-8 bytes.
    pub fn make_segments(text: &str) -> Result<Vec<Segment>, QrError> {
        if text.is_empty() {
            Ok(Vec::new())
        } else if Segment::is_numeric(text) {
            Ok(vec![Segment::make_numeric(text)?])
        } else if Segment::is_alphanumeric(text) {
            Ok(vec![Segment::make_alphanumeric(text)?])
        } else {
            Ok(vec![Segment::make_bytes(text.as_bytes())])
        }
    }

    pub fn is_numeric(text: &str) -> bool {
        text.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }

    /// Total encoded length of the segments at the given version, including
    /// the per-segment headers. `None` means some character count does not
    /// fit its field, which callers treat like a capacity overflow.
    pub fn get_total_bits(segments: &[Segment], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segments {
            let cc_bits = seg.mode.char_count_bits(version);
            if seg.num_chars >= 1usize << cc_bits {
                return None;
            }
            result = result.checked_add(4 + usize::from(cc_bits))?;
            result = result.checked_add(seg.bits.len())?;
        }
        Some(result)
    }
}

fn alphanumeric_value(c: char) -> Result<u32, QrError> {
    match ALPHANUMERIC_CHARSET.find(c) {
        Some(index) => Ok(index as u32),
        None => Err(QrError::InvalidArgument(format!(
            "character {:?} cannot be encoded in alphanumeric mode",
            c
        ))),
    }
}

/// Concatenates segment headers and payloads, then fills the remaining
/// capacity with the terminator and the alternating pad bytes.
///
/// The caller must already have chosen a version with enough room.
pub(crate) fn assemble_data_codewords(
    segments: &[Segment],
    version: Version,
    ecl: ErrorCorrection,
) -> Result<Vec<u8>, QrError> {
    let capacity_bits = num_data_codewords(version, ecl) * 8;
    let mut bb = BitBuffer::new();
    for seg in segments {
        bb.append_bits(seg.mode().mode_bits(), 4)?;
        bb.append_bits(seg.num_chars() as u32, seg.mode().char_count_bits(version))?;
        bb.extend_from_bits(seg.bits());
    }
    assert!(bb.len() <= capacity_bits, "segments exceed the chosen capacity");

    // Terminator, shortened if capacity is tight, then align to a byte
    let terminator = (capacity_bits - bb.len()).min(4);
    bb.append_bits(0, terminator as u8)?;
    bb.append_bits(0, ((8 - bb.len() % 8) % 8) as u8)?;

    for &pad in [0xEC, 0x11].iter().cycle() {
        if bb.len() >= capacity_bits {
            break;
        }
        bb.append_bits(pad, 8)?;
    }
    Ok(bb.to_bytes())
}
