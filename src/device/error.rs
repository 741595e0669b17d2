use thiserror::Error;

use super::sg::SenseData;

/// Failure of a single READ ATTRIBUTE exchange.
///
/// The caller decides whether to abort or carry on; this layer never
/// retries.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The sg driver rejected the submission outright.
    #[error("SG_IO ioctl failed: {0}")]
    Submit(#[source] nix::Error),

    /// The device completed the command with a non-recoverable status.
    #[error(
        "device error: masked status 0x{masked_status:02x}, \
         host 0x{host_status:04x}, driver 0x{driver_status:04x}, sense {sense}"
    )]
    Device {
        masked_status: u8,
        host_status: u16,
        driver_status: u16,
        sense: SenseData,
    },

    /// A binary attribute longer than 8 bytes has no u64 representation.
    #[error("binary attribute of {len} bytes does not fit into 64 bits")]
    ValueTooWide { len: usize },
}
