use crate::alignment::get_alignment_positions;
use crate::ecc::add_ecc_and_interleave;
use crate::ecc_data::{num_data_codewords, num_raw_data_modules};
use crate::encoding::{assemble_data_codewords, Segment};
use crate::error::QrError;
use crate::mask;
use crate::types::{ErrorCorrection, MaskPattern, Version};

/// A finished QR code symbol: an immutable square grid of dark and light
/// modules together with the parameters it was built with.
pub struct QrCode {
    version: Version,
    size: usize,
    error_correction: ErrorCorrection,
    mask_pattern: MaskPattern,
    modules: Vec<Vec<bool>>,
    data_codewords: Vec<u8>,
}

impl QrCode {
    /// Encodes a text string at the smallest version that fits it.
    ///
    /// The mode is selected automatically and the error correction level may
    /// be raised above `ecl` when that costs nothing.
    pub fn encode_text(text: &str, ecl: ErrorCorrection) -> Result<QrCode, QrError> {
        let segments = Segment::make_segments(text)?;
        QrCode::encode_segments(&segments, ecl, Version::MIN, Version::MAX, None, true)
    }

    /// Encodes pre-built segments.
    ///
    /// The smallest version in `[min_version, max_version]` whose capacity at
    /// `ecl` holds the segments is chosen, or `DataTooLong` when none does.
    /// With `boost_ecl` the level is raised through Medium, Quartile and High
    /// as long as the data still fits at the chosen version. A `mask_pattern`
    /// of `None` selects the pattern with the lowest penalty score.
    pub fn encode_segments(
        segments: &[Segment],
        ecl: ErrorCorrection,
        min_version: Version,
        max_version: Version,
        mask_pattern: Option<MaskPattern>,
        boost_ecl: bool,
    ) -> Result<QrCode, QrError> {
        if min_version > max_version {
            return Err(QrError::InvalidArgument(format!(
                "minimum version {} exceeds maximum version {}",
                min_version.number(),
                max_version.number()
            )));
        }

        // Smallest version that fits the data
        let mut version = min_version;
        let data_used_bits = loop {
            let capacity_bits = num_data_codewords(version, ecl) * 8;
            match Segment::get_total_bits(segments, version) {
                Some(needed) if needed <= capacity_bits => break needed,
                total => {
                    if version >= max_version {
                        return Err(QrError::DataTooLong(match total {
                            Some(needed) => format!(
                                "{} bits needed, version {} holds {} bits",
                                needed,
                                max_version.number(),
                                capacity_bits
                            ),
                            None => "a segment is too long for its character count field"
                                .to_string(),
                        }));
                    }
                    version = Version::new(version.number() + 1)?;
                }
            }
        };

        // Raise the error correction level while the data still fits
        let mut ecl = ecl;
        if boost_ecl {
            for candidate in [ErrorCorrection::M, ErrorCorrection::Q, ErrorCorrection::H] {
                if data_used_bits <= num_data_codewords(version, candidate) * 8 {
                    ecl = candidate;
                }
            }
        }

        let data_codewords = assemble_data_codewords(segments, version, ecl)?;
        let all_codewords = add_ecc_and_interleave(&data_codewords, version, ecl)?;

        let mut builder = MatrixBuilder::new(version);
        builder.draw_function_patterns(ecl);
        builder.place_codewords(&all_codewords);
        let chosen = mask::choose_mask(&mut builder, ecl, mask_pattern);
        mask::apply_mask(&mut builder, chosen);
        builder.draw_format_bits(ecl, chosen);

        Ok(builder.finish(ecl, chosen, data_codewords))
    }

    /// Width and height in modules.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn error_correction(&self) -> ErrorCorrection {
        self.error_correction
    }

    pub fn mask_pattern(&self) -> MaskPattern {
        self.mask_pattern
    }

    /// The data codewords the symbol was built from, before error
    /// correction, kept so a build can be reproduced exactly.
    pub fn data_codewords(&self) -> &[u8] {
        &self.data_codewords
    }

    /// Color of the module at (x, y): `true` is dark. Coordinates outside
    /// the symbol are light.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.size
            && (y as usize) < self.size
            && self.modules[y as usize][x as usize]
    }
}

/// Mutable scratch state for building one symbol. The `is_function` grid
/// marks cells owned by function patterns; it exists only during
/// construction and is dropped by [`MatrixBuilder::finish`].
pub(crate) struct MatrixBuilder {
    version: Version,
    pub(crate) size: usize,
    pub(crate) modules: Vec<Vec<bool>>,
    pub(crate) is_function: Vec<Vec<bool>>,
}

impl MatrixBuilder {
    pub(crate) fn new(version: Version) -> Self {
        let size = version.size();
        Self {
            version,
            size,
            modules: vec![vec![false; size]; size],
            is_function: vec![vec![false; size]; size],
        }
    }

    fn set_function_module(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[y][x] = dark;
        self.is_function[y][x] = true;
    }

    /// Draws every function pattern: timing, finders, alignment grid,
    /// version information, and a format stub that reserves the format
    /// cells until the real mask is known.
    pub(crate) fn draw_function_patterns(&mut self, ecl: ErrorCorrection) {
        for i in 0..self.size {
            self.set_function_module(6, i, i % 2 == 0);
            self.set_function_module(i, 6, i % 2 == 0);
        }

        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(self.size - 4, 3);
        self.draw_finder_pattern(3, self.size - 4);

        let positions = get_alignment_positions(self.version);
        if !positions.is_empty() {
            let last = positions.len() - 1;
            for (i, &cx) in positions.iter().enumerate() {
                for (j, &cy) in positions.iter().enumerate() {
                    // The three finder corners have no alignment pattern
                    let in_corner = (i == 0 && j == 0)
                        || (i == 0 && j == last)
                        || (i == last && j == 0);
                    if !in_corner {
                        self.draw_alignment_pattern(cx, cy);
                    }
                }
            }
        }

        self.draw_format_bits(ecl, MaskPattern::Pattern0);
        self.draw_version_info();
    }

    /// 9x9 finder neighborhood centered at (cx, cy): dark at Chebyshev
    /// distance 0, 1 and 3, light at 2 and 4, clipped at the symbol edge.
    fn draw_finder_pattern(&mut self, cx: usize, cy: usize) {
        let limit = self.size as i32;
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                if (0..limit).contains(&x) && (0..limit).contains(&y) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function_module(x as usize, y as usize, dist != 2 && dist != 4);
                }
            }
        }
    }

    /// 5x5 alignment pattern centered at (cx, cy): dark except the ring at
    /// Chebyshev distance 1.
    fn draw_alignment_pattern(&mut self, cx: usize, cy: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let x = (cx as i32 + dx) as usize;
                let y = (cy as i32 + dy) as usize;
                self.set_function_module(x, y, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Writes both copies of the 15-bit format word for the given error
    /// correction level and mask.
    pub(crate) fn draw_format_bits(&mut self, ecl: ErrorCorrection, pattern: MaskPattern) {
        let bits = format_info_bits(ecl, pattern);

        // First copy, wrapped around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, bit(bits, i));
        }
        self.set_function_module(8, 7, bit(bits, 6));
        self.set_function_module(8, 8, bit(bits, 7));
        self.set_function_module(7, 8, bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, bit(bits, i));
        }

        // Second copy, split between the other two finders
        let size = self.size;
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    /// Writes both copies of the 18-bit version word. Versions below 7
    /// carry none.
    fn draw_version_info(&mut self) {
        if self.version.number() < 7 {
            return;
        }
        let bits = version_info_bits(self.version);
        for i in 0..18 {
            let long = self.size - 11 + i % 3;
            let short = i / 3;
            self.set_function_module(long, short, bit(bits, i));
            self.set_function_module(short, long, bit(bits, i));
        }
    }

    /// Lays the interleaved codeword bits over every non-function module in
    /// the two-column zig-zag order, most significant bit first. The few
    /// remainder modules past the last codeword stay light.
    pub(crate) fn place_codewords(&mut self, data: &[u8]) {
        assert_eq!(data.len(), num_raw_data_modules(self.version) / 8);
        let size = self.size as i32;
        let mut i = 0usize;
        let mut right = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5; // the vertical timing column is skipped entirely
            }
            let upward = ((right + 1) & 2) == 0;
            for vert in 0..size {
                let y = (if upward { size - 1 - vert } else { vert }) as usize;
                for j in 0..2 {
                    let x = (right - j) as usize;
                    if !self.is_function[y][x] && i < data.len() * 8 {
                        self.modules[y][x] = (data[i >> 3] >> (7 - (i & 7))) & 1 != 0;
                        i += 1;
                    }
                }
            }
            right -= 2;
        }
        assert_eq!(i, data.len() * 8);
    }

    /// Consumes the builder into an immutable symbol, discarding the
    /// function-pattern grid.
    pub(crate) fn finish(
        self,
        ecl: ErrorCorrection,
        pattern: MaskPattern,
        data_codewords: Vec<u8>,
    ) -> QrCode {
        QrCode {
            version: self.version,
            size: self.size,
            error_correction: ecl,
            mask_pattern: pattern,
            modules: self.modules,
            data_codewords,
        }
    }
}

fn bit(value: u32, index: usize) -> bool {
    (value >> index) & 1 != 0
}

/// The masked 15-bit format word: 2 ECC bits and 3 mask bits protected by a
/// BCH(15,5) remainder over generator 0x537, XORed with 0x5412.
fn format_info_bits(ecl: ErrorCorrection, pattern: MaskPattern) -> u32 {
    let data = u32::from(ecl.format_bits()) << 3 | u32::from(pattern.value());
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    let bits = (data << 10 | rem) ^ 0x5412;
    assert!(bits >> 15 == 0, "format word exceeds 15 bits");
    bits
}

/// The 18-bit version word: 6 version bits protected by a BCH(18,6)
/// remainder over generator 0x1F25.
fn version_info_bits(version: Version) -> u32 {
    let data = u32::from(version.number());
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    let bits = data << 12 | rem;
    assert!(bits >> 18 == 0, "version word exceeds 18 bits");
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_words_match_the_published_table() {
        assert_eq!(
            format_info_bits(ErrorCorrection::L, MaskPattern::Pattern0),
            0b111011111000100
        );
        assert_eq!(
            format_info_bits(ErrorCorrection::M, MaskPattern::Pattern0),
            0b101010000010010
        );
        assert_eq!(
            format_info_bits(ErrorCorrection::Q, MaskPattern::Pattern7),
            0b010101111101101
        );
        assert_eq!(
            format_info_bits(ErrorCorrection::H, MaskPattern::Pattern7),
            0b000100000111011
        );
    }

    #[test]
    fn version_words_match_the_published_table() {
        assert_eq!(version_info_bits(Version::new(7).unwrap()), 0x07C94);
        assert_eq!(version_info_bits(Version::new(12).unwrap()), 0x0C762);
        assert_eq!(version_info_bits(Version::new(20).unwrap()), 0x149A6);
    }

    #[test]
    fn function_patterns_cover_the_expected_cells() {
        let mut builder = MatrixBuilder::new(Version::MIN);
        builder.draw_function_patterns(ErrorCorrection::L);
        // Finder corners and centers
        assert!(builder.modules[0][0]);
        assert!(builder.modules[3][3]);
        assert!(!builder.modules[1][1]);
        assert!(builder.modules[0][20]);
        assert!(builder.modules[20][0]);
        // Timing pattern alternates starting dark
        assert!(builder.modules[6][8]);
        assert!(!builder.modules[6][9]);
        assert!(builder.modules[8][6]);
        // Separator between finder and interior is light
        assert!(!builder.modules[7][7]);
        // The interior is still free for data
        assert!(!builder.is_function[10][10]);
    }

    #[test]
    fn version_one_has_no_alignment_or_version_info() {
        let mut builder = MatrixBuilder::new(Version::MIN);
        builder.draw_function_patterns(ErrorCorrection::L);
        // Where version 2 would center its alignment pattern
        assert!(!builder.is_function[18][18]);
    }

    #[test]
    fn version_two_draws_one_alignment_pattern() {
        let mut builder = MatrixBuilder::new(Version::new(2).unwrap());
        builder.draw_function_patterns(ErrorCorrection::L);
        assert!(builder.is_function[18][18]);
        assert!(builder.modules[18][18]); // center dark
        assert!(!builder.modules[17][17]); // ring light
        assert!(builder.modules[16][16]); // border dark
    }

    #[test]
    fn version_seven_reserves_version_blocks() {
        let mut builder = MatrixBuilder::new(Version::new(7).unwrap());
        builder.draw_function_patterns(ErrorCorrection::L);
        let size = builder.size;
        for i in 0..18 {
            assert!(builder.is_function[i / 3][size - 11 + i % 3]);
            assert!(builder.is_function[size - 11 + i % 3][i / 3]);
        }
    }

    #[test]
    fn placement_fills_every_non_function_module() {
        let version = Version::MIN;
        let mut builder = MatrixBuilder::new(version);
        builder.draw_function_patterns(ErrorCorrection::L);
        let data = vec![0xFFu8; num_raw_data_modules(version) / 8];
        builder.place_codewords(&data);
        // v1 has no remainder bits, so every non-function cell went dark
        for y in 0..builder.size {
            for x in 0..builder.size {
                if !builder.is_function[y][x] {
                    assert!(builder.modules[y][x], "unfilled cell at ({}, {})", x, y);
                }
            }
        }
    }
}
