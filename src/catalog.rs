//! Static catalog of the MAM attributes this tool knows how to request.

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

/// MAM attribute identifiers, as assigned by the LTO SCSI reference.
/// The discriminant is the on-wire identifier.
///
/// https://www.ibm.com/support/pages/system/files/support/ssg/ssgdocs.nsf/0/4d430d4b4e1f09b18525787300607b1d/$FILE/LTO%20SCSI%20Reference%20(EXTERNAL%20-%2020171024).pdf
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u16)]
pub enum AttributeId {
    /// Maximum capacity of the medium, in MB
    MaximumCapacity = 0x0001,
    /// Times the cartridge has been loaded
    LoadCount = 0x0003,
    /// Times the cartridge has been initialized
    InitCount = 0x0007,
    /// World-wide unique cartridge identifier
    UniqueIdentifier = 0x0008,
    /// MB written over the cartridge lifetime
    TotalMbWritten = 0x0220,
    /// MB read over the cartridge lifetime
    TotalMbRead = 0x0221,
    /// MB written since the last load
    LastMbWritten = 0x0222,
    /// MB read since the last load
    LastMbRead = 0x0223,
    /// Cartridge manufacturer name
    Manufacturer = 0x0400,
    /// Manufacturer-assigned serial number
    SerialNumber = 0x0401,
    /// Density code the medium was formatted with
    DensityCode = 0x0405,
    /// Date of manufacture, YYYYMMDD
    ManufactureDate = 0x0406,
    /// Timestamp of the last write
    LastWritten = 0x0804,
    /// Human-readable barcode label
    Barcode = 0x0806,
}

/// How the raw attribute bytes are to be interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeType {
    /// Big-endian unsigned integer
    Binary,
    /// Fixed-length text, nul-padded by the drive
    Ascii,
}

/// Everything needed to request one attribute and decode the answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub id: AttributeId,
    /// Declared length in bytes, never above 32.
    pub len: usize,
    pub kind: AttributeType,
}

impl AttributeId {
    /// On-wire identifier.
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Catalog lookup. Total over the enum: every identifier carries the
    /// declared length and type from the standard.
    pub fn spec(self) -> AttributeSpec {
        use AttributeType::*;

        let (len, kind) = match self {
            Self::MaximumCapacity => (8, Binary),
            Self::LoadCount => (8, Binary),
            Self::InitCount => (2, Binary),
            Self::UniqueIdentifier => (32, Ascii),
            Self::TotalMbWritten => (8, Binary),
            Self::TotalMbRead => (8, Binary),
            Self::LastMbWritten => (8, Binary),
            Self::LastMbRead => (8, Binary),
            Self::Manufacturer => (8, Ascii),
            Self::SerialNumber => (32, Ascii),
            Self::DensityCode => (1, Binary),
            Self::ManufactureDate => (8, Ascii),
            Self::LastWritten => (12, Ascii),
            Self::Barcode => (12, Ascii),
        };
        AttributeSpec { id: self, len, kind }
    }
}

/// One decoded attribute. The variant always matches the declared
/// [`AttributeType`]: text for `Ascii`, number for `Binary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Number(u64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::Number(value) => write!(f, "{value}"),
        }
    }
}

/// LTO generation behind a medium density code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, FromRepr)]
#[repr(u8)]
pub enum Density {
    #[strum(serialize = "ULTRIUM 3")]
    Ultrium3 = 0x44,
    #[strum(serialize = "ULTRIUM 4")]
    Ultrium4 = 0x46,
    #[strum(serialize = "ULTRIUM 5")]
    Ultrium5 = 0x58,
    #[strum(serialize = "ULTRIUM 6")]
    Ultrium6 = 0x5a,
    #[strum(serialize = "ULTRIUM 7")]
    Ultrium7 = 0x5c,
    #[strum(serialize = "ULTRIUM M8")]
    UltriumM8 = 0x5d,
    #[strum(serialize = "ULTRIUM 8")]
    Ultrium8 = 0x5e,
}
