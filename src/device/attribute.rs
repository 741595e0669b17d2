//! READ ATTRIBUTE (16): request one MAM attribute and decode the answer.

use super::sg::{SgCategory, REPLY_LEN};
use super::{SgTapeDevice, TransportError};
use crate::catalog::{AttributeSpec, AttributeType, AttributeValue};

/// READ ATTRIBUTE opcode.
const READ_ATTRIBUTE: u8 = 0x8c;
/// Attribute data starts after the 9-byte reply header.
const ATTRIBUTE_OFFSET: usize = 9;
/// How long one command may wait on a stalled or offline drive.
const TIMEOUT_MS: u32 = 20_000;

/// A source of decoded MAM attribute values.
///
/// [`SgTapeDevice`] is the real implementation. Reports are written
/// against this trait so they can also run against canned replies.
pub trait MamReader {
    fn read_attribute(&self, spec: AttributeSpec) -> Result<AttributeValue, TransportError>;
}

/// The 16-byte command block. Only the identifier and the length vary;
/// the rest is the fixed template the standard mandates.
fn read_attribute_cdb(id: u16, len: usize) -> [u8; 16] {
    let mut cdb = [0u8; 16];
    cdb[0] = READ_ATTRIBUTE;
    // byte 1 stays 0x00: service action "attribute values"
    cdb[8] = (id >> 8) as u8;
    cdb[9] = (id & 0xff) as u8;
    cdb[12] = len as u8;
    cdb[14] = 0x9f;
    cdb
}

fn decode_ascii(data: &[u8]) -> AttributeValue {
    // The drive nul-pads short values; cut at the first nul.
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    AttributeValue::Text(String::from_utf8_lossy(&data[..end]).into_owned())
}

fn decode_binary(data: &[u8]) -> Result<AttributeValue, TransportError> {
    if data.len() > 8 {
        return Err(TransportError::ValueTooWide { len: data.len() });
    }
    let value = data.iter().fold(0u64, |acc, &b| acc << 8 | u64::from(b));
    Ok(AttributeValue::Number(value))
}

fn decode(reply: &[u8], spec: AttributeSpec) -> Result<AttributeValue, TransportError> {
    let data = &reply[ATTRIBUTE_OFFSET..ATTRIBUTE_OFFSET + spec.len];
    match spec.kind {
        AttributeType::Ascii => Ok(decode_ascii(data)),
        AttributeType::Binary => decode_binary(data),
    }
}

impl SgTapeDevice {
    /// Fetch and decode one attribute. One command, one reply, no retry.
    pub fn read_attribute(&self, spec: AttributeSpec) -> Result<AttributeValue, TransportError> {
        let mut cdb = read_attribute_cdb(spec.id.id(), spec.len);
        let mut reply = [0u8; REPLY_LEN];

        let completion = self.submit_from_device(&mut cdb, &mut reply, TIMEOUT_MS)?;
        match completion.category() {
            SgCategory::Clean => {}
            SgCategory::Recovered => {
                eprintln!(
                    "recovered error on attribute 0x{:04x}, continuing",
                    spec.id.id()
                );
            }
            SgCategory::Other => return Err(completion.to_error()),
        }

        if self.verbose {
            eprintln!(
                "read attribute 0x{:04x}: duration={} ms, resid={}, msg_status={}",
                spec.id.id(),
                completion.duration,
                completion.resid,
                completion.msg_status
            );
            let raw: Vec<String> = reply[ATTRIBUTE_OFFSET..ATTRIBUTE_OFFSET + spec.len]
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect();
            eprintln!("raw value for 0x{:04x}: {}", spec.id.id(), raw.join(" "));
        }

        decode(&reply, spec)
    }
}

impl MamReader for SgTapeDevice {
    fn read_attribute(&self, spec: AttributeSpec) -> Result<AttributeValue, TransportError> {
        SgTapeDevice::read_attribute(self, spec)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::AttributeId;

    #[test]
    fn test_cdb_round_trip() {
        let cdb = read_attribute_cdb(0x0400, 8);
        assert_eq!(cdb[0], 0x8c);
        assert_eq!((cdb[8], cdb[9], cdb[12]), (0x04, 0x00, 0x08));
        assert_eq!(cdb[14], 0x9f);
        for i in [1, 2, 3, 4, 5, 6, 7, 10, 11, 13, 15] {
            assert_eq!(cdb[i], 0, "byte {i} should stay zero");
        }
    }

    #[test]
    fn test_cdb_barcode() {
        let cdb = read_attribute_cdb(0x0806, 12);
        assert_eq!((cdb[8], cdb[9], cdb[12]), (0x08, 0x06, 12));
    }

    #[test]
    fn test_decode_binary() {
        let mut reply = [0u8; REPLY_LEN];
        reply[9..17].copy_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0x2a]);

        let value = decode(&reply, AttributeId::TotalMbWritten.spec()).unwrap();
        assert_eq!(value, AttributeValue::Number(42));
    }

    #[test]
    fn test_decode_binary_short() {
        assert_eq!(decode_binary(&[0x00, 0x2a]).unwrap(), AttributeValue::Number(42));
        assert_eq!(decode_binary(&[0x01, 0x00]).unwrap(), AttributeValue::Number(256));
        assert_eq!(decode_binary(&[0x5a]).unwrap(), AttributeValue::Number(0x5a));
    }

    #[test]
    fn test_decode_binary_too_wide() {
        let data = [0u8; 9];
        assert!(matches!(
            decode_binary(&data),
            Err(TransportError::ValueTooWide { len: 9 })
        ));
    }

    #[test]
    fn test_decode_ascii() {
        let mut reply = [0u8; REPLY_LEN];
        reply[9..17].copy_from_slice(b"ACME SRL");

        let value = decode(&reply, AttributeId::Manufacturer.spec()).unwrap();
        assert_eq!(value, AttributeValue::Text("ACME SRL".into()));
    }

    #[test]
    fn test_decode_ascii_keeps_trailing_blanks() {
        assert_eq!(
            decode_ascii(b"IBM     "),
            AttributeValue::Text("IBM     ".into())
        );
    }

    #[test]
    fn test_decode_ascii_nul_padded() {
        assert_eq!(
            decode_ascii(b"ABC123L5\0\0\0\0"),
            AttributeValue::Text("ABC123L5".into())
        );
    }
}
