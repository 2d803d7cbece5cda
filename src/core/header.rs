//! Firmware metadata header
//!
//! The header sits between the bootloader and the application in a combined
//! image. The bootloader reads it to validate the application and to pick the
//! most recent image when several are available.
//!
//! Layout (little-endian, no padding, 56 bytes):
//!
//! | offset | field              | type     |
//! |-------:|--------------------|----------|
//! | 0      | `magic`            | u32      |
//! | 4      | `version`          | u32      |
//! | 8      | `checksum`         | u32      |
//! | 12     | `total_size`       | u32      |
//! | 16     | `firmware_version` | u64      |
//! | 24     | `firmware_sha256`  | [u8; 32] |

use serde::Serialize;
use sha2::{Digest, Sha256};
use zerocopy::byteorder::little_endian::{U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::config::defaults::{FIRMWARE_HEADER_MAGIC, FIRMWARE_HEADER_VERSION, SHA256_SIZE};
use crate::error::FormatError;

/// Serialized size of [`FirmwareHeader`]
pub const FIRMWARE_HEADER_SIZE: usize = std::mem::size_of::<FirmwareHeader>();

/// Magic code and layout revision stamped into every header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFormat {
    /// Header-specific magic code
    pub magic: u32,
    /// Revision number of the header layout
    pub version: u32,
}

impl Default for HeaderFormat {
    fn default() -> Self {
        Self {
            magic: FIRMWARE_HEADER_MAGIC,
            version: FIRMWARE_HEADER_VERSION,
        }
    }
}

/// Firmware metadata header
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct FirmwareHeader {
    /// Header-specific magic code
    pub magic: U32,
    /// Revision number of the header layout
    pub version: U32,
    /// CRC32 of the header, computed with this field zeroed
    pub checksum: U32,
    /// Size in bytes of the application payload
    pub total_size: U32,
    /// Version of the accompanying firmware; larger is more recent
    pub firmware_version: U64,
    /// SHA-256 of the application payload
    pub firmware_sha256: [u8; SHA256_SIZE],
}

impl FirmwareHeader {
    /// Build the header for `payload` using the default header format
    pub fn new(payload: &[u8], firmware_version: u64) -> Result<Self, FormatError> {
        Self::with_format(HeaderFormat::default(), payload, firmware_version)
    }

    /// Build the header for `payload` with an explicit magic and revision
    ///
    /// The checksum is computed over the serialized header with the checksum
    /// field zeroed, then stored in place.
    pub fn with_format(
        format: HeaderFormat,
        payload: &[u8],
        firmware_version: u64,
    ) -> Result<Self, FormatError> {
        let total_size = size_field(payload.len())?;

        let mut header = Self {
            magic: U32::new(format.magic),
            version: U32::new(format.version),
            checksum: U32::new(0),
            total_size: U32::new(total_size),
            firmware_version: U64::new(firmware_version),
            firmware_sha256: Sha256::digest(payload).into(),
        };
        header.checksum = U32::new(header.compute_checksum());

        tracing::debug!(
            size = total_size,
            version = firmware_version,
            checksum = header.checksum.get(),
            "Built firmware header"
        );

        Ok(header)
    }

    /// Decode a header from the start of `bytes`
    ///
    /// Only the layout is decoded; use [`FirmwareHeader::verify`] to check
    /// the magic, revision and checksum.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        Self::read_from_prefix(bytes)
            .map(|(header, _)| header)
            .map_err(|_| FormatError::Truncated {
                what: "firmware header",
                offset: 0,
                needed: FIRMWARE_HEADER_SIZE as u64,
                available: bytes.len() as u64,
            })
    }

    /// CRC32 over the serialized header with the checksum field zeroed
    pub fn compute_checksum(&self) -> u32 {
        let mut zeroed = *self;
        zeroed.checksum = U32::new(0);
        crc32fast::hash(zeroed.as_bytes())
    }

    /// Check magic, revision and self-checksum
    pub fn verify(&self, format: &HeaderFormat) -> Result<(), FormatError> {
        self.check_magic(format)?;
        self.check_version(format)?;
        self.check_checksum()
    }

    /// Check the magic code against `format`
    pub fn check_magic(&self, format: &HeaderFormat) -> Result<(), FormatError> {
        if self.magic.get() != format.magic {
            return Err(FormatError::BadMagic {
                expected: format.magic,
                found: self.magic.get(),
            });
        }
        Ok(())
    }

    /// Check the layout revision against `format`
    pub fn check_version(&self, format: &HeaderFormat) -> Result<(), FormatError> {
        if self.version.get() != format.version {
            return Err(FormatError::UnsupportedVersion {
                expected: format.version,
                found: self.version.get(),
            });
        }
        Ok(())
    }

    /// Check the stored checksum against a recomputed one
    pub fn check_checksum(&self) -> Result<(), FormatError> {
        let computed = self.compute_checksum();
        if computed != self.checksum.get() {
            return Err(FormatError::ChecksumMismatch {
                stored: self.checksum.get(),
                computed,
            });
        }
        Ok(())
    }

    /// Check that `payload` matches the recorded size and digest
    pub fn verify_payload(&self, payload: &[u8]) -> Result<(), FormatError> {
        let expected_len = self.total_size.get() as usize;
        if payload.len() < expected_len {
            return Err(FormatError::Truncated {
                what: "application payload",
                offset: 0,
                needed: u64::from(self.total_size.get()),
                available: payload.len() as u64,
            });
        }

        let actual: [u8; SHA256_SIZE] = Sha256::digest(&payload[..expected_len]).into();
        if actual != self.firmware_sha256 {
            return Err(FormatError::DigestMismatch {
                expected: self.sha256_hex(),
                actual: hex::encode(actual),
            });
        }

        Ok(())
    }

    /// Whether this header should be preferred over `other`
    ///
    /// Selection is by firmware version only; equal versions are not newer.
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.firmware_version.get() > other.firmware_version.get()
    }

    /// Lowercase hex encoding of the payload digest
    pub fn sha256_hex(&self) -> String {
        hex::encode(self.firmware_sha256)
    }

    /// Serialized header bytes
    pub fn to_bytes(&self) -> [u8; FIRMWARE_HEADER_SIZE] {
        let mut out = [0u8; FIRMWARE_HEADER_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }
}

/// Plain-value view of a header for display and JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSummary {
    pub magic: String,
    pub version: u32,
    pub checksum: String,
    pub total_size: u32,
    pub firmware_version: u64,
    pub firmware_sha256: String,
}

impl From<&FirmwareHeader> for HeaderSummary {
    fn from(header: &FirmwareHeader) -> Self {
        Self {
            magic: format!("0x{:08x}", header.magic.get()),
            version: header.version.get(),
            checksum: format!("0x{:08x}", header.checksum.get()),
            total_size: header.total_size.get(),
            firmware_version: header.firmware_version.get(),
            firmware_sha256: header.sha256_hex(),
        }
    }
}

/// Serialized header for `payload` using the default header format
pub fn compute_header(
    payload: &[u8],
    firmware_version: u64,
) -> Result<[u8; FIRMWARE_HEADER_SIZE], FormatError> {
    FirmwareHeader::new(payload, firmware_version).map(|header| header.to_bytes())
}

/// Payload length as stored in the 32-bit size field
fn size_field(len: usize) -> Result<u32, FormatError> {
    u32::try_from(len).map_err(|_| FormatError::PayloadTooLarge {
        size: len as u64,
        max: u64::from(u32::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::MIN_PROPTEST_ITERATIONS;
    use crate::test_utils::generators::payload;
    use proptest::prelude::*;

    #[test]
    fn test_size_field_limit() {
        assert_eq!(size_field(0).unwrap(), 0);
        assert_eq!(size_field(u32::MAX as usize).unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_size_field_rejects_oversized_payload() {
        let len = u32::MAX as usize + 1;
        let err = size_field(len).unwrap_err();
        assert!(matches!(
            err,
            FormatError::PayloadTooLarge { size, max } if size == 1 << 32 && max == u64::from(u32::MAX)
        ));
        assert_eq!(
            err.to_string(),
            "Application payload is 4294967296 bytes, the header can describe at most 4294967295"
        );
    }

    #[test]
    fn test_header_size() {
        assert_eq!(FIRMWARE_HEADER_SIZE, 56);
    }

    #[test]
    fn test_header_field_offsets() {
        let header = FirmwareHeader::new(&[0xaa, 0xbb, 0xcc], 42).unwrap();
        let bytes = header.to_bytes();

        assert_eq!(&bytes[0..4], &0x5a51_b3d4u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &header.checksum.get().to_le_bytes());
        assert_eq!(&bytes[12..16], &3u32.to_le_bytes());
        assert_eq!(&bytes[16..24], &42u64.to_le_bytes());
        assert_eq!(&bytes[24..56], Sha256::digest([0xaa_u8, 0xbb, 0xcc]).as_slice());
    }

    #[test]
    fn test_reference_checksum() {
        let header = FirmwareHeader::new(&[0xaa, 0xbb, 0xcc], 42).unwrap();
        assert_eq!(header.checksum.get(), 0xc1dd_f7e2);
        assert_eq!(
            header.sha256_hex(),
            "fa22dfe1da9013b3c1145040acae9089e0c08bc1c1a0719614f4b73add6f6ef5"
        );
    }

    #[test]
    fn test_checksum_over_zeroed_field() {
        let header = FirmwareHeader::new(b"application", 7).unwrap();
        let mut bytes = header.to_bytes();
        bytes[8..12].fill(0);
        assert_eq!(crc32fast::hash(&bytes), header.checksum.get());
        assert_ne!(header.checksum.get(), 0);
    }

    #[test]
    fn test_empty_payload() {
        let header = FirmwareHeader::new(&[], 1).unwrap();
        assert_eq!(header.total_size.get(), 0);
        assert_eq!(
            header.sha256_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(header.verify(&HeaderFormat::default()).is_ok());
    }

    #[test]
    fn test_custom_format() {
        let format = HeaderFormat {
            magic: 0xdead_beef,
            version: 3,
        };
        let header = FirmwareHeader::with_format(format, b"x", 1).unwrap();
        assert_eq!(header.magic.get(), 0xdead_beef);
        assert_eq!(header.version.get(), 3);
        assert!(header.verify(&format).is_ok());
        assert_eq!(
            header.verify(&HeaderFormat::default()),
            Err(FormatError::BadMagic {
                expected: FIRMWARE_HEADER_MAGIC,
                found: 0xdead_beef,
            })
        );
    }

    #[test]
    fn test_parse_truncated() {
        let err = FirmwareHeader::parse(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            FormatError::Truncated {
                what: "firmware header",
                offset: 0,
                needed: 56,
                available: 10,
            }
        );
    }

    #[test]
    fn test_verify_detects_corruption() {
        let mut bytes = compute_header(b"payload", 9).unwrap();
        bytes[20] ^= 0x01;
        let header = FirmwareHeader::parse(&bytes).unwrap();
        assert!(matches!(
            header.verify(&HeaderFormat::default()),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_rejects_other_revision() {
        let format = HeaderFormat {
            version: 2,
            ..HeaderFormat::default()
        };
        let header = FirmwareHeader::with_format(format, b"x", 1).unwrap();
        assert_eq!(
            header.verify(&HeaderFormat::default()),
            Err(FormatError::UnsupportedVersion {
                expected: 1,
                found: 2,
            })
        );
    }

    #[test]
    fn test_verify_payload() {
        let header = FirmwareHeader::new(b"firmware", 1).unwrap();
        assert!(header.verify_payload(b"firmware").is_ok());
        // Trailing bytes past total_size are ignored
        assert!(header.verify_payload(b"firmware\0\0").is_ok());
        assert!(matches!(
            header.verify_payload(b"firmwarf"),
            Err(FormatError::DigestMismatch { .. })
        ));
        assert!(matches!(
            header.verify_payload(b"firm"),
            Err(FormatError::Truncated { .. })
        ));
    }

    #[test]
    fn test_summary_formats_fields() {
        let header = FirmwareHeader::new(&[], 5).unwrap();
        let summary = HeaderSummary::from(&header);
        assert_eq!(summary.magic, "0x5a51b3d4");
        assert_eq!(summary.version, 1);
        assert_eq!(summary.total_size, 0);
        assert_eq!(summary.firmware_version, 5);
        assert_eq!(summary.firmware_sha256.len(), 64);
    }

    #[test]
    fn test_is_newer_than() {
        let old = FirmwareHeader::new(b"a", 100).unwrap();
        let new = FirmwareHeader::new(b"a", 200).unwrap();
        assert!(new.is_newer_than(&old));
        assert!(!old.is_newer_than(&new));
        assert!(!old.is_newer_than(&old));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(MIN_PROPTEST_ITERATIONS))]

        #[test]
        fn prop_total_size_matches_payload(data in payload(), version in any::<u64>()) {
            let header = FirmwareHeader::new(&data, version).unwrap();
            prop_assert_eq!(header.total_size.get() as usize, data.len());
        }

        #[test]
        fn prop_checksum_recomputes(data in payload(), version in any::<u64>()) {
            let bytes = compute_header(&data, version).unwrap();
            let mut zeroed = bytes;
            zeroed[8..12].fill(0);
            let stored = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            prop_assert_eq!(crc32fast::hash(&zeroed), stored);
        }

        #[test]
        fn prop_digest_matches_payload(data in payload(), version in any::<u64>()) {
            let header = FirmwareHeader::new(&data, version).unwrap();
            let expected: [u8; 32] = Sha256::digest(&data).into();
            prop_assert_eq!(header.firmware_sha256, expected);
        }

        #[test]
        fn prop_parse_recovers_fields(data in payload(), version in any::<u64>()) {
            let header = FirmwareHeader::new(&data, version).unwrap();
            let parsed = FirmwareHeader::parse(&header.to_bytes()).unwrap();
            prop_assert_eq!(parsed, header);
            prop_assert!(parsed.verify(&HeaderFormat::default()).is_ok());
            prop_assert!(parsed.verify_payload(&data).is_ok());
        }
    }
}
