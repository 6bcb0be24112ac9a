use crate::ecc_data::{
    ecc_codewords_per_block, num_data_codewords, num_error_correction_blocks, num_raw_data_modules,
};
use crate::error::QrError;
use crate::types::{ErrorCorrection, Version};

/// Multiplies two field elements in GF(2^8) reduced by the QR polynomial
/// x^8 + x^4 + x^3 + x^2 + 1 (0x11D), using Russian peasant multiplication.
pub fn gf_multiply(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1D);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

/// Coefficients of the Reed-Solomon generator polynomial of the given
/// degree, highest power first, with the leading 1 term omitted.
///
/// The polynomial is the product of (x - a^i) for i in 0..degree, where
/// a = 0x02 generates the field.
pub fn rs_generator_poly(degree: usize) -> Result<Vec<u8>, QrError> {
    if !(1..=255).contains(&degree) {
        return Err(QrError::ValueOutOfRange("generator polynomial degree must be 1-255"));
    }
    let mut divisor = vec![0u8; degree];
    divisor[degree - 1] = 1;
    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            divisor[j] = gf_multiply(divisor[j], root);
            if j + 1 < degree {
                divisor[j] ^= divisor[j + 1];
            }
        }
        root = gf_multiply(root, 0x02);
    }
    Ok(divisor)
}

/// Remainder of the data polynomial divided by the generator polynomial.
/// The result has exactly `divisor.len()` bytes: the ECC codewords.
pub fn rs_remainder(data: &[u8], divisor: &[u8]) -> Vec<u8> {
    assert!(!divisor.is_empty(), "empty generator polynomial");
    let mut result = vec![0u8; divisor.len()];
    for &b in data {
        let factor = b ^ result[0];
        result.copy_within(1.., 0);
        let last = result.len() - 1;
        result[last] = 0;
        for (r, &d) in result.iter_mut().zip(divisor.iter()) {
            *r ^= gf_multiply(d, factor);
        }
    }
    result
}

/// Splits the data codewords into the standard block structure, appends the
/// per-block ECC, and interleaves the blocks into the final codeword stream.
pub(crate) fn add_ecc_and_interleave(
    data: &[u8],
    version: Version,
    ecl: ErrorCorrection,
) -> Result<Vec<u8>, QrError> {
    assert_eq!(data.len(), num_data_codewords(version, ecl));
    let num_blocks = num_error_correction_blocks(version, ecl);
    let block_ecc_len = ecc_codewords_per_block(version, ecl);
    let raw_codewords = num_raw_data_modules(version) / 8;
    let num_short_blocks = num_blocks - raw_codewords % num_blocks;
    let short_block_len = raw_codewords / num_blocks;
    let short_data_len = short_block_len - block_ecc_len;

    let divisor = rs_generator_poly(block_ecc_len)?;
    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(num_blocks);
    let mut k = 0;
    for i in 0..num_blocks {
        let data_len = short_data_len + usize::from(i >= num_short_blocks);
        let dat = &data[k..k + data_len];
        k += data_len;
        // Pad short blocks with a placeholder the interleaver skips
        let mut block = dat.to_vec();
        block.resize(short_data_len + 1, 0);
        block.extend(rs_remainder(dat, &divisor));
        blocks.push(block);
    }
    debug_assert_eq!(k, data.len());

    // Emit one byte per block per column; short blocks sit out the last
    // data column, ECC columns are always full
    let mut result = Vec::with_capacity(raw_codewords);
    for column in 0..short_block_len + 1 {
        for (i, block) in blocks.iter().enumerate() {
            if column != short_data_len || i >= num_short_blocks {
                result.push(block[column]);
            }
        }
    }
    assert_eq!(result.len(), raw_codewords);
    Ok(result)
}
