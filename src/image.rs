//! Core dump image metadata and chunk geometry
//!
//! The [`CoreDumpInfo`] descriptor pins down everything the upload loop
//! needs: where the image lives, how it is cut into chunks, and how large
//! each chunk is on the wire once optional Base64 encoding is applied.

use serde::{Deserialize, Serialize};

use crate::{config::UploadConfig, encoder, error::Error, platform::ImageRegion};

/// Default raw chunk size: 768 = 3 * 256, so Base64 chunks carry no internal
/// padding
pub const DEFAULT_CHUNK_SIZE: usize = 3 * 256;

/// Encoded sizes of a chunked image when Base64 is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base64Sizes {
    /// Encoded size of every chunk except possibly the last
    pub chunk_size: usize,
    /// Encoded size of the last chunk
    pub last_chunk_size: usize,
    /// Total bytes on the wire, summed over the chunks
    pub total_size: usize,
}

/// Where the core dump image lives and how it is cut into chunks
///
/// Produced by [`CoreDumpInfo::from_region`] (usually through
/// [`Uploader::image_info`](crate::Uploader::image_info)) and consumed
/// read-only by the upload loop. Hosts often forward parts of it to the
/// collector, e.g. announcing `chunk_count` before the first chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDumpInfo {
    /// Byte offset into flash where the image begins
    pub flash_addr: u32,
    /// Raw image length in bytes
    pub total_size: usize,
    /// Raw bytes per chunk, except possibly the last
    pub chunk_size: usize,
    /// Number of chunks, at least 1
    pub chunk_count: usize,
    /// Raw size of the last chunk, in `1..=chunk_size`
    pub last_chunk_size: usize,
    /// Encoded sizes when the upload is Base64 encoded
    pub base64: Option<Base64Sizes>,
}

impl CoreDumpInfo {
    /// Derive the chunk geometry for an image region.
    ///
    /// Fails with [`Error::NoImage`] when the region is empty. A configured
    /// chunk size of 0 selects [`DEFAULT_CHUNK_SIZE`]; with Base64 enabled
    /// the chunk size is rounded down to a multiple of 3 (minimum 3) so that
    /// only the final chunk can carry padding.
    pub fn from_region(region: ImageRegion, config: &UploadConfig) -> Result<Self, Error> {
        if region.len == 0 {
            return Err(Error::NoImage);
        }

        let mut chunk_size = if config.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            config.chunk_size
        };
        if config.use_base64 && chunk_size % 3 != 0 {
            chunk_size -= chunk_size % 3;
            if chunk_size == 0 {
                chunk_size = 3;
            }
        }

        let total_size = region.len;
        let chunk_count = total_size.div_ceil(chunk_size);
        let last_chunk_size = match total_size % chunk_size {
            0 => chunk_size,
            rem => rem,
        };

        // The encoded total is the sum over the chunks, not enc(total_size):
        // every chunk is padded independently, and the sum is what the
        // receiver actually observes.
        let base64 = config.use_base64.then(|| {
            let enc_chunk = encoder::encoded_len(chunk_size);
            let enc_last = encoder::encoded_len(last_chunk_size);

            Base64Sizes {
                chunk_size: enc_chunk,
                last_chunk_size: enc_last,
                total_size: enc_chunk * (chunk_count - 1) + enc_last,
            }
        });

        Ok(CoreDumpInfo {
            flash_addr: region.addr,
            total_size,
            chunk_size,
            chunk_count,
            last_chunk_size,
            base64,
        })
    }

    /// Whether chunks are Base64 encoded before transmission
    pub fn use_base64(&self) -> bool {
        self.base64.is_some()
    }

    /// Raw size of chunk `index`
    pub fn bytes_in_chunk(&self, index: usize) -> usize {
        if index == self.chunk_count - 1 {
            self.last_chunk_size
        } else {
            self.chunk_size
        }
    }

    /// Flash address where chunk `index` begins
    pub fn chunk_addr(&self, index: usize) -> u32 {
        self.flash_addr + (index * self.chunk_size) as u32
    }

    /// Bytes chunk `index` occupies on the wire
    pub fn wire_chunk_size(&self, index: usize) -> usize {
        match &self.base64 {
            Some(sizes) if index == self.chunk_count - 1 => sizes.last_chunk_size,
            Some(sizes) => sizes.chunk_size,
            None => self.bytes_in_chunk(index),
        }
    }

    /// Total bytes the transport will observe across all chunks
    pub fn wire_total_size(&self) -> usize {
        match &self.base64 {
            Some(sizes) => sizes.total_size,
            None => self.total_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreDumpInfo, DEFAULT_CHUNK_SIZE};
    use crate::{config::UploadConfig, error::Error, platform::ImageRegion};

    fn region(len: usize) -> ImageRegion {
        ImageRegion { addr: 0x11_0000, len }
    }

    fn config(chunk_size: usize, use_base64: bool) -> UploadConfig {
        UploadConfig {
            chunk_size,
            use_base64,
        }
    }

    #[track_caller]
    fn assert_consistent(info: &CoreDumpInfo) {
        assert!(info.chunk_count >= 1);
        assert!(info.last_chunk_size >= 1);
        assert!(info.last_chunk_size <= info.chunk_size);
        assert_eq!(
            info.chunk_size * (info.chunk_count - 1) + info.last_chunk_size,
            info.total_size
        );

        if let Some(sizes) = &info.base64 {
            assert_eq!(sizes.chunk_size, info.chunk_size.div_ceil(3) * 4);
            assert_eq!(sizes.last_chunk_size, info.last_chunk_size.div_ceil(3) * 4);
            assert_eq!(
                sizes.total_size,
                sizes.chunk_size * (info.chunk_count - 1) + sizes.last_chunk_size
            );
        }

        let wire_sum: usize = (0..info.chunk_count).map(|i| info.wire_chunk_size(i)).sum();
        assert_eq!(wire_sum, info.wire_total_size());
    }

    #[test]
    fn empty_region_is_no_image() {
        let err = CoreDumpInfo::from_region(region(0), &config(0, false)).unwrap_err();
        assert!(matches!(err, Error::NoImage));
    }

    #[test]
    fn zero_selects_default_chunk_size() {
        let info = CoreDumpInfo::from_region(region(5), &config(0, false)).unwrap();

        assert_eq!(info.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(info.chunk_count, 1);
        assert_eq!(info.last_chunk_size, 5);
        assert_consistent(&info);
    }

    #[test]
    fn single_byte_image() {
        let info = CoreDumpInfo::from_region(region(1), &config(300, false)).unwrap();

        assert_eq!(info.chunk_count, 1);
        assert_eq!(info.last_chunk_size, 1);
        assert_consistent(&info);
    }

    #[test]
    fn exact_multiple_fills_the_last_chunk() {
        let info = CoreDumpInfo::from_region(region(600), &config(300, false)).unwrap();

        assert_eq!(info.chunk_count, 2);
        assert_eq!(info.last_chunk_size, 300);
        assert_consistent(&info);
    }

    #[test]
    fn one_byte_over_adds_a_short_chunk() {
        let info = CoreDumpInfo::from_region(region(301), &config(300, false)).unwrap();

        assert_eq!(info.chunk_count, 2);
        assert_eq!(info.last_chunk_size, 1);
        assert_consistent(&info);
    }

    #[test]
    fn base64_rounds_chunk_size_down_to_multiple_of_three() {
        let info = CoreDumpInfo::from_region(region(100), &config(2, true)).unwrap();
        assert_eq!(info.chunk_size, 3);
        assert_consistent(&info);

        let info = CoreDumpInfo::from_region(region(100), &config(1, true)).unwrap();
        assert_eq!(info.chunk_size, 3);
        assert_consistent(&info);

        let info = CoreDumpInfo::from_region(region(100), &config(32, true)).unwrap();
        assert_eq!(info.chunk_size, 30);
        assert_consistent(&info);
    }

    #[test]
    fn raw_chunk_size_is_not_rounded() {
        let info = CoreDumpInfo::from_region(region(100), &config(32, false)).unwrap();
        assert_eq!(info.chunk_size, 32);
        assert_consistent(&info);
    }

    #[test]
    fn thousand_byte_image_in_300_byte_chunks() {
        let info = CoreDumpInfo::from_region(region(1000), &config(300, false)).unwrap();

        assert_eq!(info.chunk_count, 4);
        assert_eq!(info.last_chunk_size, 100);
        assert_eq!(info.bytes_in_chunk(0), 300);
        assert_eq!(info.bytes_in_chunk(3), 100);
        assert_eq!(info.chunk_addr(0), 0x11_0000);
        assert_eq!(info.chunk_addr(3), 0x11_0000 + 900);
        assert_eq!(info.wire_total_size(), 1000);
        assert_consistent(&info);
    }

    #[test]
    fn base64_sizes_follow_the_per_chunk_sum() {
        let info = CoreDumpInfo::from_region(region(1000), &config(300, true)).unwrap();
        let sizes = info.base64.unwrap();

        assert_eq!(info.chunk_size, 300);
        assert_eq!(sizes.chunk_size, 400);
        assert_eq!(sizes.last_chunk_size, 136);
        // Four independently padded chunks, not enc(1000) = 1336.
        assert_eq!(sizes.total_size, 3 * 400 + 136);
        assert_eq!(info.wire_chunk_size(0), 400);
        assert_eq!(info.wire_chunk_size(3), 136);
    }

    #[test]
    fn geometry_is_pure() {
        let a = CoreDumpInfo::from_region(region(1000), &config(300, true)).unwrap();
        let b = CoreDumpInfo::from_region(region(1000), &config(300, true)).unwrap();

        assert_eq!(a, b);
    }
}
