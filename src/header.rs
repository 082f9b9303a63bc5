use std::io::Read;

pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// Plausible range for the major version byte; 44 is the Java 1.0 era floor,
/// anything at 100 or above is assumed to be a corrupted file.
pub const MIN_MAJOR: u8 = 44;
pub const MAX_MAJOR_EXCLUSIVE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Valid(u8),
    InvalidHeader,
    SuspiciousVersion(u8),
}

/// Reads the fixed 8-byte class file prelude: 4-byte magic, 2-byte minor
/// version and the high major byte (consumed without inspection), then the
/// low major byte. Never reads past those 8 bytes.
pub fn parse_class_header(reader: &mut impl Read) -> HeaderCheck {
    let mut prelude = [0u8; 8];
    if reader.read_exact(&mut prelude).is_err() {
        return HeaderCheck::InvalidHeader;
    }

    let magic = u32::from_be_bytes([prelude[0], prelude[1], prelude[2], prelude[3]]);
    if magic != CLASS_MAGIC {
        return HeaderCheck::InvalidHeader;
    }

    let major = prelude[7];
    if major < MIN_MAJOR || major >= MAX_MAJOR_EXCLUSIVE {
        return HeaderCheck::SuspiciousVersion(major);
    }
    HeaderCheck::Valid(major)
}
