//! Platform access to the core dump partition

use crate::{error::HostError, reset::ResetCause};

/// Location and size of the core dump image within flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRegion {
    /// Byte offset into flash where the image begins
    pub addr: u32,
    /// Raw image length in bytes
    pub len: usize,
}

/// Operations the engine needs from the platform runtime
///
/// On an ESP32 these map directly onto `esp_reset_reason`,
/// `esp_core_dump_image_get`, `esp_flash_read` and
/// `esp_core_dump_image_erase`. The engine drives them through this seam so
/// it can be exercised off-target against an in-memory implementation.
pub trait CoreDumpPlatform {
    /// Cause of the most recent reset
    fn last_reset_reason(&mut self) -> ResetCause;

    /// Locate the current core dump image
    fn image_region(&mut self) -> Result<ImageRegion, HostError>;

    /// Read exactly `buf.len()` bytes of flash starting at `addr`.
    ///
    /// A short read must be reported as an error, never silently padded.
    fn read_image(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), HostError>;

    /// Erase the image, retiring it from the partition
    fn erase_image(&mut self) -> Result<(), HostError>;
}
