//! A library for streaming ESP32 core dumps to an external collector
//!
//! After an abnormal reset the ESP-IDF runtime leaves a post-mortem image of
//! memory in a dedicated flash partition. [espdump] classifies the reset,
//! locates and sizes the image, then streams it chunk by chunk (optionally
//! Base64 encoding each chunk) to a host-supplied [`UploadTransport`]. The
//! image is erased only after the entire transfer has succeeded; any failure
//! leaves it in place for the next boot to retry.
//!
//! The engine never owns a socket: the host supplies the transport (MQTT,
//! HTTP, a raw stream) and the platform primitives behind the
//! [`CoreDumpPlatform`] seam.
//!
//! ```no_run
//! use espdump::{
//!     CoreDumpPlatform, HostError, ImageRegion, ResetCause, UploadConfig, UploadTransport,
//!     Uploader,
//! };
//!
//! struct Esp32Platform;
//!
//! impl CoreDumpPlatform for Esp32Platform {
//!     fn last_reset_reason(&mut self) -> ResetCause {
//!         // esp_reset_reason()
//!         ResetCause::Panic
//!     }
//!
//!     fn image_region(&mut self) -> Result<ImageRegion, HostError> {
//!         // esp_core_dump_image_get()
//!         Ok(ImageRegion { addr: 0x11_0000, len: 4096 })
//!     }
//!
//!     fn read_image(&mut self, _addr: u32, _buf: &mut [u8]) -> Result<(), HostError> {
//!         // esp_flash_read()
//!         Ok(())
//!     }
//!
//!     fn erase_image(&mut self) -> Result<(), HostError> {
//!         // esp_core_dump_image_erase()
//!         Ok(())
//!     }
//! }
//!
//! struct BrokerTransport;
//!
//! impl UploadTransport for BrokerTransport {
//!     fn write(&mut self, _data: &[u8]) -> Result<(), HostError> {
//!         // publish one chunk
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), espdump::Error> {
//!     let mut uploader = Uploader::new(Esp32Platform);
//!     let config = UploadConfig { chunk_size: 0, use_base64: true };
//!
//!     if let Some(info) = uploader.check_and_upload(&mut BrokerTransport, &config)? {
//!         log::info!("uploaded {} chunks", info.chunk_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [espdump]: https://github.com/esp-rs/espdump

pub mod config;
mod encoder;
pub mod error;
pub mod image;
pub mod platform;
pub mod reset;
pub mod transport;
pub mod uploader;

pub use self::{
    config::UploadConfig,
    error::{Error, HostError},
    image::{Base64Sizes, CoreDumpInfo, DEFAULT_CHUNK_SIZE},
    platform::{CoreDumpPlatform, ImageRegion},
    reset::ResetCause,
    transport::UploadTransport,
    uploader::Uploader,
};
