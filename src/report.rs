//! The human-readable cartridge report.

use std::io::{self, Write};

use crate::catalog::{AttributeId, AttributeType, AttributeValue, Density};
use crate::device::MamReader;

/// One line of the report.
pub struct ReportEntry {
    pub label: &'static str,
    pub attribute: AttributeId,
}

/// The attributes worth printing for every cartridge, in output order.
/// Adding or removing a line is a data change; the loop below stays as is.
pub const DEFAULT_REPORT: &[ReportEntry] = &[
    ReportEntry { label: "Manufacturer", attribute: AttributeId::Manufacturer },
    ReportEntry { label: "Serial", attribute: AttributeId::SerialNumber },
    ReportEntry { label: "Manuf. Date", attribute: AttributeId::ManufactureDate },
    ReportEntry { label: "Barcode", attribute: AttributeId::Barcode },
    ReportEntry { label: "Init count", attribute: AttributeId::InitCount },
    ReportEntry { label: "Total MB written", attribute: AttributeId::TotalMbWritten },
    ReportEntry { label: "Total MB read", attribute: AttributeId::TotalMbRead },
    ReportEntry { label: "Last MB written", attribute: AttributeId::LastMbWritten },
    ReportEntry { label: "Last MB read", attribute: AttributeId::LastMbRead },
    ReportEntry { label: "Density code", attribute: AttributeId::DensityCode },
];

fn render(attribute: AttributeId, value: &AttributeValue) -> String {
    match (attribute, value) {
        (AttributeId::DensityCode, AttributeValue::Number(code)) => {
            match Density::from_repr(*code as u8) {
                Some(generation) => format!("{code:02X} ({generation})"),
                None => format!("{code:02X}"),
            }
        }
        _ => value.to_string(),
    }
}

fn placeholder(kind: AttributeType) -> &'static str {
    match kind {
        AttributeType::Ascii => "",
        AttributeType::Binary => "0",
    }
}

/// Print one line per report entry. A failed read costs its line a
/// placeholder and a stderr notice, never the rest of the report.
pub fn print_report<R, W>(reader: &R, out: &mut W) -> io::Result<()>
where
    R: MamReader + ?Sized,
    W: Write,
{
    for entry in DEFAULT_REPORT {
        let spec = entry.attribute.spec();
        match reader.read_attribute(spec) {
            Ok(value) => {
                writeln!(out, "{}: {}", entry.label, render(entry.attribute, &value))?;
            }
            Err(e) => {
                eprintln!(
                    "error: reading {} (0x{:04x}) failed: {e}",
                    entry.label,
                    spec.id.id()
                );
                writeln!(out, "{}: {}", entry.label, placeholder(spec.kind))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::AttributeSpec;
    use crate::device::{SenseData, TransportError};

    /// Canned replies keyed by identifier. Anything absent fails the way
    /// a drive rejecting the command would: CHECK CONDITION with an
    /// ILLEGAL REQUEST sense key.
    struct StubDrive {
        replies: Vec<(AttributeId, AttributeValue)>,
    }

    impl MamReader for StubDrive {
        fn read_attribute(&self, spec: AttributeSpec) -> Result<AttributeValue, TransportError> {
            self.replies
                .iter()
                .find(|(id, _)| *id == spec.id)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| TransportError::Device {
                    masked_status: 0x01,
                    host_status: 0,
                    driver_status: 0x08,
                    sense: SenseData::new(&[0x70, 0x00, 0x05, 0, 0, 0, 0, 0x0a]),
                })
        }
    }

    fn full_stub() -> StubDrive {
        StubDrive {
            replies: vec![
                (AttributeId::Manufacturer, AttributeValue::Text("IBM     ".into())),
                (AttributeId::SerialNumber, AttributeValue::Text("HJ1234K5".into())),
                (AttributeId::ManufactureDate, AttributeValue::Text("20200131".into())),
                (AttributeId::Barcode, AttributeValue::Text("ABC123L5".into())),
                (AttributeId::InitCount, AttributeValue::Number(3)),
                (AttributeId::TotalMbWritten, AttributeValue::Number(123456)),
                (AttributeId::TotalMbRead, AttributeValue::Number(54321)),
                (AttributeId::LastMbWritten, AttributeValue::Number(1024)),
                (AttributeId::LastMbRead, AttributeValue::Number(2048)),
                (AttributeId::DensityCode, AttributeValue::Number(0x58)),
            ],
        }
    }

    #[test]
    fn test_full_report() {
        let mut out = Vec::new();
        print_report(&full_stub(), &mut out).unwrap();

        let expected = "Manufacturer: IBM     \n\
                        Serial: HJ1234K5\n\
                        Manuf. Date: 20200131\n\
                        Barcode: ABC123L5\n\
                        Init count: 3\n\
                        Total MB written: 123456\n\
                        Total MB read: 54321\n\
                        Last MB written: 1024\n\
                        Last MB read: 2048\n\
                        Density code: 58 (ULTRIUM 5)\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_failed_read_keeps_going() {
        let mut stub = full_stub();
        stub.replies.retain(|(id, _)| *id != AttributeId::Manufacturer);

        let mut out = Vec::new();
        print_report(&stub, &mut out).unwrap();

        let report = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), DEFAULT_REPORT.len());
        assert_eq!(lines[0], "Manufacturer: ");
        assert_eq!(lines[1], "Serial: HJ1234K5");
        assert_eq!(lines[9], "Density code: 58 (ULTRIUM 5)");
    }

    #[test]
    fn test_binary_placeholder_is_zero() {
        let stub = StubDrive { replies: Vec::new() };

        let mut out = Vec::new();
        print_report(&stub, &mut out).unwrap();

        let report = String::from_utf8(out).unwrap();
        assert!(report.contains("Init count: 0\n"));
        assert!(report.contains("Density code: 0\n"));
    }

    #[test]
    fn test_unknown_density_code_prints_hex_only() {
        assert_eq!(
            render(AttributeId::DensityCode, &AttributeValue::Number(0x42)),
            "42"
        );
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let stub = full_stub();
        let spec = AttributeId::Barcode.spec();

        let first = stub.read_attribute(spec).unwrap();
        let second = stub.read_attribute(spec).unwrap();
        assert_eq!(first, second);
    }
}
