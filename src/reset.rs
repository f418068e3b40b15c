//! Reset-cause classification
//!
//! After an abnormal reset the ESP-IDF panic handler leaves a post-mortem
//! image in the core dump partition. Whether the previous reset was abnormal
//! is decided here, from the platform's last-reset-reason code, before any
//! peripheral bring-up.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, VariantNames};

/// Cause of the most recent reset
///
/// Mirrors `esp_reset_reason_t`. Platforms that cannot map a reason code
/// onto one of the named variants should report [`ResetCause::Unknown`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, VariantNames, Serialize, Deserialize,
)]
#[non_exhaustive]
pub enum ResetCause {
    /// Power-on event
    PowerOn,
    /// Reset by an external pin
    External,
    /// Software reset via `esp_restart`
    SoftwareReset,
    /// Software reset due to a panic or exception
    Panic,
    /// Interrupt watchdog
    InterruptWatchdog,
    /// Task watchdog
    TaskWatchdog,
    /// Other watchdogs
    GenericWatchdog,
    /// Wakeup from deep sleep
    DeepSleepWake,
    /// Brownout reset
    Brownout,
    /// Reset over SDIO
    Sdio,
    /// Reset reason could not be determined
    Unknown,
}

impl ResetCause {
    /// Whether this reset cause is expected to have produced a core dump.
    ///
    /// Panics and watchdog timeouts produce an image; an unknown cause is
    /// classified the same way, since retrying on a corrupted reason code
    /// is cheaper than suppressing a real dump.
    pub fn requires_upload(self) -> bool {
        matches!(
            self,
            ResetCause::Panic
                | ResetCause::InterruptWatchdog
                | ResetCause::TaskWatchdog
                | ResetCause::GenericWatchdog
                | ResetCause::Unknown
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::ResetCause;

    #[test]
    fn faults_require_upload() {
        assert!(ResetCause::Panic.requires_upload());
        assert!(ResetCause::InterruptWatchdog.requires_upload());
        assert!(ResetCause::TaskWatchdog.requires_upload());
        assert!(ResetCause::GenericWatchdog.requires_upload());
        assert!(ResetCause::Unknown.requires_upload());
    }

    #[test]
    fn benign_resets_do_not() {
        assert!(!ResetCause::PowerOn.requires_upload());
        assert!(!ResetCause::External.requires_upload());
        assert!(!ResetCause::SoftwareReset.requires_upload());
        assert!(!ResetCause::DeepSleepWake.requires_upload());
        assert!(!ResetCause::Brownout.requires_upload());
        assert!(!ResetCause::Sdio.requires_upload());
    }

    #[test]
    fn classification_is_stable() {
        for cause in ResetCause::iter() {
            assert_eq!(cause.requires_upload(), cause.requires_upload());
        }
    }
}
