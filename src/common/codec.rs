pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use tracing::trace;

    use super::writer::{pad_remaining_capacity, push_byte_segment, push_terminator};
    use crate::common::{
        bitstream::BitStream,
        error::{QRError, QRResult},
        metadata::{ECLevel, Version},
    };

    /// Encodes data in byte mode into the smallest version that holds it.
    pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let ver = find_version(data.len(), ecl)?;
        let bs = encode_with_version(data, ver, ecl)?;
        Ok((bs, ver))
    }

    pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
        if data.len() > ver.byte_capacity(ecl) {
            return Err(QRError::DataTooLong);
        }

        let bcap = ver.data_codewords(ecl) << 3;
        let mut bs = BitStream::new(bcap);
        push_byte_segment(data, ver, &mut bs);
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        Ok(bs)
    }

    pub fn find_version(data_len: usize, ecl: ECLevel) -> QRResult<Version> {
        let ver = Version::all()
            .find(|v| v.byte_capacity(ecl) >= data_len)
            .ok_or(QRError::DataTooLong)?;
        trace!(data_len, version = *ver, "Found smallest version");
        Ok(ver)
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use super::{MODE_BYTE, MODE_INDICATOR_BIT_LEN, PADDING_CODEWORDS};
    use crate::common::{bitstream::BitStream, metadata::Version};

    pub fn push_byte_segment(data: &[u8], ver: Version, out: &mut BitStream) {
        push_header(data.len(), ver, out);
        push_byte_data(data, out);
    }

    fn push_header(char_cnt: usize, ver: Version, out: &mut BitStream) {
        let len_bits = ver.char_count_bits();
        out.push_bits(MODE_BYTE, MODE_INDICATOR_BIT_LEN);
        debug_assert!(
            char_cnt < (1 << len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
        );
        out.push_bits(char_cnt as u16, len_bits);
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        if out.len() & 7 == 0 {
            out.extend(data);
            return;
        }
        for &b in data {
            out.push_bits(b, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(offset == 0, "Bit offset should be zero before padding codewords: {offset}");

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}

// Global constants
//------------------------------------------------------------------------------

pub use super::version_db::MODE_INDICATOR_BIT_LEN;

pub const MODE_BYTE: u8 = 0b0100;

pub static PADDING_CODEWORDS: [u8; 2] = [0b11101100, 0b00010001];
