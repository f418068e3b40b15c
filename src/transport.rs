//! Host transport surface for core dump uploads

use crate::{error::HostError, image::CoreDumpInfo};

/// Where the engine hands off chunks for delivery
///
/// Implementors own the wire: a message broker client, an HTTP request body,
/// a raw socket. The engine guarantees that the bytes passed to successive
/// [`write`](UploadTransport::write) calls, concatenated in call order,
/// equal the raw image, or, with Base64 enabled, a sequence of
/// `chunk_count` independently encoded and padded blocks. In the latter
/// case the concatenated text is *not* itself valid Base64; the receiver
/// must decode chunk by chunk.
///
/// `start`, `progress` and `end` default to no-ops, so a minimal transport
/// only supplies `write`. All callbacks run synchronously on the caller's
/// task; they may block, and any transport-level timeout policy belongs in
/// the host (typically by failing `progress`).
pub trait UploadTransport {
    /// Called once before the first chunk.
    ///
    /// Failing here aborts the upload before any data moves and also skips
    /// [`end`](UploadTransport::end); a transport that relies on `end` for
    /// cleanup must not fail `start`.
    fn start(&mut self) -> Result<(), HostError> {
        Ok(())
    }

    /// Deliver one chunk. Called once per chunk, in ascending offset order.
    fn write(&mut self, data: &[u8]) -> Result<(), HostError>;

    /// Called after each successful [`write`](UploadTransport::write) with
    /// the wire-side byte count of that chunk.
    ///
    /// Returning an error cancels the upload cooperatively: streaming stops,
    /// [`end`](UploadTransport::end) still runs, and the image stays in
    /// flash for the next boot.
    fn progress(
        &mut self,
        info: &CoreDumpInfo,
        chunk_index: usize,
        bytes_sent: usize,
    ) -> Result<(), HostError> {
        let _ = (info, chunk_index, bytes_sent);
        Ok(())
    }

    /// Called once after streaming, whether or not it succeeded, provided
    /// [`start`](UploadTransport::start) succeeded.
    fn end(&mut self) -> Result<(), HostError> {
        Ok(())
    }
}
