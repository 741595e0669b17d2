//! Thin wrapper over the Linux SCSI generic (sg) passthrough interface.

use std::ffi::c_void;
use std::fmt;
use std::mem;

use libc::{c_int, c_uchar, c_uint, c_ushort};

use super::{SgTapeDevice, TransportError};

/// Total reply allocation handed to the driver for one exchange.
pub const REPLY_LEN: usize = 512;
/// Sense allocation handed to the driver.
pub const SENSE_LEN: usize = 32;

// Bare ioctl request numbers from <scsi/sg.h>, not _IO-encoded.
const SG_IO: libc::c_ulong = 0x2285;
const SG_GET_VERSION_NUM: libc::c_ulong = 0x2282;

const SG_DXFER_FROM_DEV: c_int = -3;

const SENSE_KEY_RECOVERED_ERROR: u8 = 0x01;

/// `sg_io_hdr` from `<scsi/sg.h>`.
#[repr(C)]
struct SgIoHdr {
    /// 'S' for SCSI generic (required)
    interface_id: c_int,
    /// Data transfer direction
    dxfer_direction: c_int,
    /// SCSI command length (<= 16 bytes)
    cmd_len: c_uchar,
    /// Max length to write to sbp
    mx_sb_len: c_uchar,
    /// 0 implies no scatter gather
    iovec_count: c_ushort,
    /// Byte count of data transfer
    dxfer_len: c_uint,
    /// Points to data transfer memory
    dxferp: *mut c_void,
    /// Points to command to perform
    cmdp: *mut c_uchar,
    /// Points to sense buffer memory
    sbp: *mut c_uchar,
    /// MAX_UINT -> no timeout (unit: millisec)
    timeout: c_uint,
    /// 0 -> default
    flags: c_uint,
    /// Unused internally (normally)
    pack_id: c_int,
    /// Unused internally
    usr_ptr: *mut c_void,
    /// SCSI status
    status: c_uchar,
    /// Shifted, masked SCSI status
    masked_status: c_uchar,
    /// Messaging level data (optional)
    msg_status: c_uchar,
    /// Byte count actually written to sbp
    sb_len_wr: c_uchar,
    /// Errors from host adapter
    host_status: c_ushort,
    /// Errors from software driver
    driver_status: c_ushort,
    /// dxfer_len - actual transferred
    resid: c_int,
    /// Time taken by command (unit: millisec)
    duration: c_uint,
    /// Auxiliary information
    info: c_uint,
}

mod ioctl_func {
    use super::SgIoHdr;

    nix::ioctl_readwrite_bad!(sg_io, super::SG_IO, SgIoHdr);
    nix::ioctl_read_bad!(sg_version, super::SG_GET_VERSION_NUM, libc::c_int);
}

/// Sense bytes latched by the driver for a non-clean completion.
#[derive(Clone)]
pub struct SenseData {
    bytes: [u8; SENSE_LEN],
    len: usize,
}

impl SenseData {
    pub(crate) fn new(raw: &[u8]) -> Self {
        let mut bytes = [0u8; SENSE_LEN];
        let len = raw.len().min(SENSE_LEN);
        bytes[..len].copy_from_slice(&raw[..len]);
        Self { bytes, len }
    }

    /// Sense key, if the response code announces a format we know.
    /// Fixed format keeps the key in byte 2, descriptor format in byte 1.
    pub fn key(&self) -> Option<u8> {
        match (self.len, self.bytes[0] & 0x7f) {
            (3.., 0x70 | 0x71) => Some(self.bytes[2] & 0x0f),
            (2.., 0x72 | 0x73) => Some(self.bytes[1] & 0x0f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Display for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => write!(f, "key 0x{key:02x}")?,
            None => f.write_str("unavailable")?,
        }
        if self.len > 0 {
            f.write_str(" [")?;
            for (i, byte) in self.as_bytes().iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{byte:02x}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for SenseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SenseData({self})")
    }
}

/// Completion of one SG_IO exchange, before any decoding.
pub struct SgCompletion {
    pub masked_status: u8,
    pub msg_status: u8,
    pub host_status: u16,
    pub driver_status: u16,
    pub resid: i32,
    pub duration: u32,
    pub sense: SenseData,
}

/// The three completion classes the tool distinguishes.
#[derive(Debug, PartialEq, Eq)]
pub enum SgCategory {
    /// Command completed, data is valid.
    Clean,
    /// Device corrected an internal error; data is still valid.
    Recovered,
    /// Everything else. Not worth telling apart here.
    Other,
}

impl SgCompletion {
    pub fn category(&self) -> SgCategory {
        if self.masked_status == 0 && self.host_status == 0 && self.driver_status == 0 {
            return SgCategory::Clean;
        }
        match self.sense.key() {
            Some(SENSE_KEY_RECOVERED_ERROR) => SgCategory::Recovered,
            _ => SgCategory::Other,
        }
    }

    pub fn to_error(&self) -> TransportError {
        TransportError::Device {
            masked_status: self.masked_status,
            host_status: self.host_status,
            driver_status: self.driver_status,
            sense: self.sense.clone(),
        }
    }
}

impl SgTapeDevice {
    /// Issue one command expecting `reply.len()` bytes back from the device.
    /// Blocks until the device answers or the driver gives up at `timeout_ms`.
    pub(crate) fn submit_from_device(
        &self,
        cdb: &mut [u8],
        reply: &mut [u8],
        timeout_ms: u32,
    ) -> Result<SgCompletion, TransportError> {
        assert_eq!(mem::size_of::<SgIoHdr>(), 88);

        let mut sense = [0u8; SENSE_LEN];

        let mut hdr: SgIoHdr = unsafe { mem::zeroed() };
        hdr.interface_id = 'S' as c_int;
        hdr.cmd_len = cdb.len() as c_uchar;
        hdr.mx_sb_len = sense.len() as c_uchar;
        hdr.dxfer_direction = SG_DXFER_FROM_DEV;
        hdr.dxfer_len = reply.len() as c_uint;
        hdr.dxferp = reply.as_mut_ptr() as *mut c_void;
        hdr.cmdp = cdb.as_mut_ptr();
        hdr.sbp = sense.as_mut_ptr();
        hdr.timeout = timeout_ms;

        unsafe { ioctl_func::sg_io(self.fd, &mut hdr) }.map_err(TransportError::Submit)?;

        let latched = (hdr.sb_len_wr as usize).min(SENSE_LEN);
        Ok(SgCompletion {
            masked_status: hdr.masked_status,
            msg_status: hdr.msg_status,
            host_status: hdr.host_status,
            driver_status: hdr.driver_status,
            resid: hdr.resid,
            duration: hdr.duration,
            sense: SenseData::new(&sense[..latched]),
        })
    }

    pub(crate) fn sg_driver_version(&self) -> nix::Result<i32> {
        let mut version: libc::c_int = 0;
        unsafe { ioctl_func::sg_version(self.fd, &mut version)? };
        Ok(version)
    }
}
