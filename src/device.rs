mod attribute;
mod error;
mod sg;

use anyhow::{bail, Result};
use std::os::fd::RawFd;

pub use attribute::MamReader;
pub use error::TransportError;
pub use sg::SenseData;

/// Oldest sg driver version the tool will talk to.
const MIN_SG_VERSION: i32 = 30_000;

/// An open, version-checked SCSI generic passthrough handle to one tape
/// drive. The fd is owned exclusively and closed on drop.
pub struct SgTapeDevice {
    fd: RawFd,
    verbose: bool,
}

impl SgTapeDevice {
    /// Open an sg node and check it speaks a current sg protocol.
    ///
    /// Drives exposed through the older interface report a version below
    /// 30000 and cannot carry the 16-byte READ ATTRIBUTE command reliably.
    pub fn open<P: nix::NixPath + ?Sized>(path: &P) -> Result<Self> {
        use nix::fcntl::OFlag;
        use nix::sys::stat::Mode;

        let fd = nix::fcntl::open(path, OFlag::O_RDWR, Mode::all())?;
        let device = Self { fd, verbose: false };

        let version = device.sg_driver_version()?;
        if version < MIN_SG_VERSION {
            bail!("not a modern sg device (driver version {version})");
        }
        Ok(device)
    }

    /// Log per-command diagnostics to stderr.
    pub fn verbose(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }
}

impl Drop for SgTapeDevice {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}
