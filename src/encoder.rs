//! Base64 chunk encoding
//!
//! Each chunk is encoded as an independent RFC 4648 block with its own
//! padding; the receiver decodes chunk by chunk and concatenates the decoded
//! bytes. The concatenation of the *encoded* chunks is deliberately not a
//! valid Base64 stream as a whole.

use base64::{engine::general_purpose::STANDARD, EncodeSliceError, Engine as _};

/// Encoded size of `len` input bytes, padding included
pub(crate) fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Encode `src` into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least [`encoded_len`]`(src.len())` bytes; the sizer
/// allocates the session buffer accordingly.
pub(crate) fn encode_into(src: &[u8], dst: &mut [u8]) -> Result<usize, EncodeSliceError> {
    STANDARD.encode_slice(src, dst)
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    use super::{encode_into, encoded_len};

    #[test]
    fn encoded_len_matches_rfc4648() {
        assert_eq!(encoded_len(0), 0);
        assert_eq!(encoded_len(1), 4);
        assert_eq!(encoded_len(2), 4);
        assert_eq!(encoded_len(3), 4);
        assert_eq!(encoded_len(4), 8);
        assert_eq!(encoded_len(300), 400);
        assert_eq!(encoded_len(768), 1024);
    }

    #[test]
    fn round_trips_every_padding_case() {
        for len in [1, 2, 3, 100, 299, 300] {
            let src: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut dst = vec![0; encoded_len(src.len())];

            let written = encode_into(&src, &mut dst).unwrap();
            assert_eq!(written, encoded_len(src.len()));
            assert_eq!(STANDARD.decode(&dst[..written]).unwrap(), src);
        }
    }

    #[test]
    fn rejects_undersized_output() {
        let src = [0u8; 6];
        let mut dst = [0u8; 7];

        assert!(encode_into(&src, &mut dst).is_err());
    }
}
