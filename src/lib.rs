//! Read the Medium Auxiliary Memory (MAM) of an LTO tape cartridge through
//! the Linux SCSI generic (sg) passthrough driver.
//!
//! The drive answers one READ ATTRIBUTE command per attribute; the catalog
//! says how long each answer is and how it is to be interpreted.

mod catalog;
mod device;
mod report;

pub use catalog::{AttributeId, AttributeSpec, AttributeType, AttributeValue, Density};
pub use device::{MamReader, SenseData, SgTapeDevice, TransportError};
pub use report::{print_report, ReportEntry, DEFAULT_REPORT};
