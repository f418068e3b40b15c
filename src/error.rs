//! Library error types

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error produced by a host-supplied platform or transport hook.
///
/// The engine never interprets these; they are carried verbatim as the
/// source of the corresponding [`Error`] variant.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can occur while locating or uploading a core dump
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    #[error("No core dump image is present in the flash partition")]
    #[diagnostic(
        code(espdump::no_image),
        help("The panic handler only writes an image when a core dump partition is configured")
    )]
    NoImage,
    #[error("Failed to locate the core dump image")]
    #[diagnostic(code(espdump::platform))]
    Platform(#[source] HostError),
    #[error("Failed to read {len} bytes of the core dump image at {offset:#010x}")]
    #[diagnostic(
        code(espdump::flash_read),
        help("The image is left in place; the next boot will retry")
    )]
    FlashRead {
        offset: u32,
        len: usize,
        #[source]
        source: HostError,
    },
    #[error("Failed to allocate a {bytes} byte upload buffer")]
    #[diagnostic(code(espdump::out_of_memory), help("Reduce the configured chunk size"))]
    OutOfMemory { bytes: usize },
    #[error("The transport rejected the upload handshake")]
    #[diagnostic(code(espdump::start_failed))]
    StartFailed(#[source] HostError),
    #[error("The transport failed to deliver chunk {chunk}")]
    #[diagnostic(
        code(espdump::write_failed),
        help("The image is left in place; the next boot will retry")
    )]
    WriteFailed {
        chunk: usize,
        #[source]
        source: HostError,
    },
    #[error("The transport failed to finalize the upload")]
    #[diagnostic(code(espdump::end_failed))]
    EndFailed(#[source] HostError),
    #[error("Upload canceled by the progress callback at chunk {chunk}")]
    #[diagnostic(code(espdump::canceled))]
    Canceled {
        chunk: usize,
        #[source]
        source: HostError,
    },
    #[error("Base64 encoding of chunk {chunk} failed")]
    #[diagnostic(code(espdump::encode_failed))]
    EncodeFailed {
        chunk: usize,
        #[source]
        source: base64::EncodeSliceError,
    },
    #[error("The core dump was delivered but could not be erased from flash")]
    #[diagnostic(
        code(espdump::erase_failed),
        help("The next boot will re-send the same image")
    )]
    EraseFailed(#[source] HostError),
}
