//! Engine configuration

use serde::{Deserialize, Serialize};

/// How an upload cuts the image into chunks
///
/// Firmware typically carves this out of its own configuration blob; both
/// fields fall back to their defaults when absent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Desired raw chunk size in bytes. `0` selects the built-in default of
    /// 768. When `use_base64` is set, values that are not a multiple of 3
    /// are rounded down, with a minimum of 3.
    #[serde(default)]
    pub chunk_size: usize,
    /// Base64-encode each chunk before handing it to the transport
    #[serde(default)]
    pub use_base64: bool,
}
