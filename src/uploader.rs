//! Stream a core dump image out of flash and retire it
//!
//! The [`Uploader`] struct drives the whole post-mortem flow: it classifies
//! the last reset, locates and sizes the image, streams it chunk by chunk
//! through a host-supplied [`UploadTransport`], and erases the image from
//! flash only once the entire transfer has succeeded. Any failure leaves the
//! image in place so the next boot can retry.

use log::{debug, info, warn};

use crate::{
    config::UploadConfig, encoder, error::Error, image::CoreDumpInfo, platform::CoreDumpPlatform,
    transport::UploadTransport,
};

/// Buffers owned by one upload call.
///
/// Sized once from the descriptor and sufficient for every chunk; dropped on
/// every exit path.
struct UploadSession {
    read_buf: Vec<u8>,
    b64_buf: Option<Vec<u8>>,
}

impl UploadSession {
    fn new(info: &CoreDumpInfo) -> Result<Self, Error> {
        let read_buf = alloc_buffer(info.chunk_size)?;
        let b64_buf = match &info.base64 {
            Some(sizes) => Some(alloc_buffer(sizes.chunk_size + 1)?),
            None => None,
        };

        Ok(UploadSession { read_buf, b64_buf })
    }
}

fn alloc_buffer(bytes: usize) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| Error::OutOfMemory { bytes })?;
    buf.resize(bytes, 0);

    Ok(buf)
}

/// Drives core dump uploads against a platform
pub struct Uploader<P> {
    platform: P,
}

impl<P: CoreDumpPlatform> Uploader<P> {
    /// Create an uploader over the given platform handle
    pub fn new(platform: P) -> Self {
        Uploader { platform }
    }

    /// The platform handle the uploader drives
    pub fn platform(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Consume the uploader, returning the platform handle
    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Whether the previous reset is expected to have produced a core dump.
    ///
    /// Safe to call before any peripheral bring-up; asking twice gives the
    /// same answer.
    pub fn needs_upload(&mut self) -> bool {
        let cause = self.platform.last_reset_reason();
        info!("Reset reason: {cause}");

        cause.requires_upload()
    }

    /// Locate the current image and derive its chunk geometry
    pub fn image_info(&mut self, config: &UploadConfig) -> Result<CoreDumpInfo, Error> {
        let region = self.platform.image_region().map_err(Error::Platform)?;

        CoreDumpInfo::from_region(region, config)
    }

    /// Classify the last reset and, if it calls for one, run an upload.
    ///
    /// This is the one-call boot-time entry point. Returns `Ok(None)` when
    /// the reset was benign, or when it looked like a fault but the
    /// partition holds no image; returns `Ok(Some(info))` after a
    /// successful upload of the described image.
    pub fn check_and_upload<T>(
        &mut self,
        transport: &mut T,
        config: &UploadConfig,
    ) -> Result<Option<CoreDumpInfo>, Error>
    where
        T: UploadTransport + ?Sized,
    {
        if !self.needs_upload() {
            info!("Normal boot, no core dump to send");
            return Ok(None);
        }
        warn!("Fault condition detected, attempting core dump upload");

        let info = match self.image_info(config) {
            Ok(info) => info,
            Err(Error::NoImage) => {
                info!("No core dump image found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        self.upload(transport, Some(&info))?;

        Ok(Some(info))
    }

    /// Upload the image described by `info`, erasing it from flash on
    /// success.
    ///
    /// When `info` is `None` the image is located with the default
    /// configuration (768 byte chunks, no Base64). On success the image has
    /// been delivered *and* erased; [`Error::EraseFailed`] means the
    /// transfer completed but the image could not be retired, so the next
    /// boot will send it again.
    pub fn upload<T>(&mut self, transport: &mut T, info: Option<&CoreDumpInfo>) -> Result<(), Error>
    where
        T: UploadTransport + ?Sized,
    {
        let located;
        let info = match info {
            Some(info) => info,
            None => {
                located = self.image_info(&UploadConfig::default())?;
                &located
            }
        };

        info!(
            "Core dump: {} bytes @{:#010x} in {} chunks (chunk={}, last={}, base64={})",
            info.total_size,
            info.flash_addr,
            info.chunk_count,
            info.chunk_size,
            info.last_chunk_size,
            info.use_base64()
        );

        let mut session = UploadSession::new(info)?;

        // A start failure skips the stream loop *and* the end callback.
        transport.start().map_err(Error::StartFailed)?;

        let mut result = self.stream_chunks(transport, info, &mut session);

        // `end` runs whether or not streaming succeeded, but its failure
        // only surfaces when the session was otherwise clean.
        if let Err(end_err) = transport.end() {
            match result {
                Ok(()) => result = Err(Error::EndFailed(end_err)),
                Err(_) => warn!("Transport end hook failed after an earlier error: {end_err}"),
            }
        }

        match result {
            Ok(()) => {
                info!("Core dump sent, erasing image from flash");
                self.platform.erase_image().map_err(Error::EraseFailed)?;

                Ok(())
            }
            Err(err) => {
                warn!("Upload incomplete, core dump kept for the next attempt");

                Err(err)
            }
        }
    }

    fn stream_chunks<T>(
        &mut self,
        transport: &mut T,
        info: &CoreDumpInfo,
        session: &mut UploadSession,
    ) -> Result<(), Error>
    where
        T: UploadTransport + ?Sized,
    {
        for chunk_index in 0..info.chunk_count {
            let bytes_to_read = info.bytes_in_chunk(chunk_index);
            let addr = info.chunk_addr(chunk_index);

            self.platform
                .read_image(addr, &mut session.read_buf[..bytes_to_read])
                .map_err(|source| Error::FlashRead {
                    offset: addr,
                    len: bytes_to_read,
                    source,
                })?;

            let payload: &[u8] = match session.b64_buf.as_mut() {
                Some(b64_buf) => {
                    let written = encoder::encode_into(&session.read_buf[..bytes_to_read], b64_buf)
                        .map_err(|source| Error::EncodeFailed {
                            chunk: chunk_index,
                            source,
                        })?;

                    &b64_buf[..written]
                }
                None => &session.read_buf[..bytes_to_read],
            };

            transport.write(payload).map_err(|source| Error::WriteFailed {
                chunk: chunk_index,
                source,
            })?;

            let bytes_sent = payload.len();
            debug!(
                "Chunk {}/{} delivered ({} bytes on the wire)",
                chunk_index + 1,
                info.chunk_count,
                bytes_sent
            );

            // Fires after the write for the same chunk, with the wire-side
            // length; an error here is a cooperative cancellation.
            transport
                .progress(info, chunk_index, bytes_sent)
                .map_err(|source| Error::Canceled {
                    chunk: chunk_index,
                    source,
                })?;
        }

        Ok(())
    }
}
