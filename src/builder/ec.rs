use std::ops::Deref;

use crate::common::{
    ec::ReedSolomon,
    metadata::{ECLevel, Version},
};

// ECC: Error Correction Codeword generator
pub fn ecc(data: &[u8], version: Version, ec_level: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, version, ec_level);

    let rs = ReedSolomon::new(version.ecc_per_block(ec_level));
    let ecc_blocks = data_blocks.iter().map(|b| rs.ecc(b)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

// Splits data codewords into group 1 blocks followed by the one codeword
// longer group 2 blocks
pub fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_count, block2_count, block1_size, _) = version.ec_blocks(ec_level);
    let block2_size = block1_size + 1;

    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(block1_count + block2_count);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_count > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// Takes the i-th codeword of every block in turn, skipping blocks that are
// already exhausted
pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if i < b.len() {
                res.push(b[i]);
            }
        }
    }
    res
}
