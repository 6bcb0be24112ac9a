use crate::types::{ErrorCorrection, Version};

// Capacity tables indexed by [ecl.ordinal()][version]. Index 0 is a sentinel
// because there is no version 0.

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // L
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // M
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Q
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // H
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // L
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // M
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Q
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // H
];

fn table_get(table: &'static [[i8; 41]; 4], version: Version, ecl: ErrorCorrection) -> usize {
    let entry = table[ecl.ordinal()][usize::from(version.number())];
    debug_assert!(entry > 0);
    entry as usize
}

/// Number of ECC codewords appended to each block.
pub fn ecc_codewords_per_block(version: Version, ecl: ErrorCorrection) -> usize {
    table_get(&ECC_CODEWORDS_PER_BLOCK, version, ecl)
}

/// Number of error correction blocks the symbol is split into.
pub fn num_error_correction_blocks(version: Version, ecl: ErrorCorrection) -> usize {
    table_get(&NUM_ERROR_CORRECTION_BLOCKS, version, ecl)
}

/// Number of modules available for codeword data after all function
/// patterns are placed, computed in closed form from the version.
pub fn num_raw_data_modules(version: Version) -> usize {
    let v = usize::from(version.number());
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Number of 8-bit data codewords available before error correction.
pub fn num_data_codewords(version: Version, ecl: ErrorCorrection) -> usize {
    num_raw_data_modules(version) / 8
        - ecc_codewords_per_block(version, ecl) * num_error_correction_blocks(version, ecl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: [ErrorCorrection; 4] = [
        ErrorCorrection::L,
        ErrorCorrection::M,
        ErrorCorrection::Q,
        ErrorCorrection::H,
    ];

    #[test]
    fn raw_data_modules_known_values() {
        assert_eq!(num_raw_data_modules(Version::MIN), 208);
        assert_eq!(num_raw_data_modules(Version::new(2).unwrap()), 359);
        assert_eq!(num_raw_data_modules(Version::new(7).unwrap()), 1568);
        assert_eq!(num_raw_data_modules(Version::MAX), 29648);
    }

    #[test]
    fn raw_data_modules_stay_in_bounds() {
        let mut previous = 0;
        for v in 1..=40 {
            let raw = num_raw_data_modules(Version::new(v).unwrap());
            assert!((208..=29648).contains(&raw));
            assert!(raw > previous);
            previous = raw;
        }
    }

    #[test]
    fn data_codewords_version_one() {
        let v1 = Version::MIN;
        assert_eq!(num_data_codewords(v1, ErrorCorrection::L), 19);
        assert_eq!(num_data_codewords(v1, ErrorCorrection::M), 16);
        assert_eq!(num_data_codewords(v1, ErrorCorrection::Q), 13);
        assert_eq!(num_data_codewords(v1, ErrorCorrection::H), 9);
    }

    #[test]
    fn data_plus_ecc_fills_every_symbol() {
        for v in 1..=40 {
            let version = Version::new(v).unwrap();
            let raw_codewords = num_raw_data_modules(version) / 8;
            for ecl in LEVELS {
                let data = num_data_codewords(version, ecl);
                let ecc = ecc_codewords_per_block(version, ecl)
                    * num_error_correction_blocks(version, ecl);
                assert!(data > 0);
                assert_eq!(data + ecc, raw_codewords);
            }
        }
    }
}
