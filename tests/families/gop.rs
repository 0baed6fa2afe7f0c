//! Intel and ASPEED graphics output protocol drivers.

use fwver::{DecodeError, ExitStatus, FwverError};

use super::{expect_error, expect_record};
use crate::common::images::{self, GOP_AT};
use crate::common::{signature, utf16le, ImageBuilder};

#[test]
fn gop_signature_is_utf16_driver_name() {
    let expected: Vec<u8> = utf16le("Intel(R) GOP Driver");
    assert_eq!(expected.len(), 38);
    assert_eq!(signature("Intel GOP"), expected.as_slice());
}

#[test]
fn sandy_bridge_without_revision() {
    let image = images::gop_sandy_bridge("0", "1024");
    let record = expect_record(&image);
    assert_eq!(
        record.to_string(),
        "     EFI GOP Driver SandyBridge - 2.0.1024"
    );
}

#[test]
fn sandy_bridge_with_revision() {
    // "2.1.102.1009": the dot after the major selects the revision layout,
    // whose build field starts 16 bytes after the major digit.
    let image = ImageBuilder::new(0x200)
        .put(GOP_AT, signature("Intel GOP"))
        .wide(GOP_AT + 0x98, "2.1.102.1009")
        .build();
    let record = expect_record(&image);
    assert_eq!(record.label, "EFI GOP Driver SandyBridge");
    assert_eq!(record.version, "2.1.1009");
}

#[test]
fn ivy_bridge() {
    let image = ImageBuilder::new(0x200)
        .put(GOP_AT, signature("Intel GOP"))
        .wide(GOP_AT + 0xA0, "3")
        .wide(GOP_AT + 0xA4, "1")
        .wide(GOP_AT + 0xA8, "1050")
        .build();
    let record = expect_record(&image);
    assert_eq!(record.label, "EFI GOP Driver IvyBridge");
    assert_eq!(record.version, "3.1.1050");
}

#[test]
fn haswell() {
    let image = ImageBuilder::new(0x200)
        .put(GOP_AT, signature("Intel GOP"))
        .wide(GOP_AT + 0xC0, "5")
        .wide(GOP_AT + 0xC4, "0")
        .wide(GOP_AT + 0xC8, "1032")
        .build();
    let record = expect_record(&image);
    assert_eq!(record.to_string(), "     EFI GOP Driver Haswell     - 5.0.1032");
}

#[test]
fn broadwell_has_no_minor() {
    let image = ImageBuilder::new(0x200)
        .put(GOP_AT, signature("Intel GOP"))
        .wide(GOP_AT + 0xF4, "5")
        .wide(GOP_AT + 0xF8, "1034")
        .build();
    let record = expect_record(&image);
    assert_eq!(record.label, "EFI GOP Driver Broadwell");
    assert_eq!(record.version, "5.1034");
}

#[test]
fn sandy_bridge_probe_wins_over_later_generations() {
    let image = ImageBuilder::new(0x200)
        .put(GOP_AT, signature("Intel GOP"))
        .wide(GOP_AT + 0x98, "2")
        .wide(GOP_AT + 0x9C, "0")
        .wide(GOP_AT + 0xA0, "3")
        .wide(GOP_AT + 0xC0, "5")
        .build();
    let record = expect_record(&image);
    assert_eq!(record.label, "EFI GOP Driver SandyBridge");
    // The build field overlaps the Ivy Bridge probe digit.
    assert_eq!(record.version, "2.0.3");
}

#[test]
fn unknown_generation_is_unrecognized() {
    let image = ImageBuilder::new(0x200)
        .put(GOP_AT, signature("Intel GOP"))
        .build();
    let err = expect_error(&image);
    assert!(matches!(
        err,
        FwverError::Decode {
            source: DecodeError::UnrecognizedVariant,
            ..
        }
    ));
    assert_eq!(err.exit_status(), ExitStatus::UnknownVersion);
}

#[test]
fn truncated_image_is_out_of_bounds() {
    // Signature at the very end: every generation probe lies past the buffer.
    let image = ImageBuilder::new(4).put(4, signature("Intel GOP")).build();
    let err = expect_error(&image);
    assert!(matches!(
        err,
        FwverError::Decode {
            source: DecodeError::OutOfBounds { .. },
            ..
        }
    ));
    assert_eq!(err.exit_status(), ExitStatus::UnknownVersion);
}

#[test]
fn aspeed_plain_version() {
    let image = images::aspeed(0x03, 0x05, 0x01).build();
    let record = expect_record(&image);
    assert_eq!(record.label, "EFI GOP ASPEED");
    assert_eq!(record.version, "1.05.03");
}

#[test]
fn aspeed_in_option_rom() {
    let image = images::aspeed(0x10, 0x92, 0x00)
        .put(0xC0, b"\x00PCIR")
        .build();
    let record = expect_record(&image);
    assert_eq!(record.label, "EFI GOP-in-OROM ASPEED");
    assert_eq!(record.version, "0.92.10");
}

#[test]
fn aspeed_coded_versions() {
    for (code, expected) in [(37, "0.93.08"), (33, "0.96.00"), (144, "0.97.06")] {
        let image = images::aspeed(0xAA, code, 0xBB).build();
        let record = expect_record(&image);
        assert_eq!(record.version, expected, "code {code}");
    }
}

#[test]
fn aspeed_patch_leaves_the_image_untouched() {
    let image = images::aspeed(0xAA, 37, 0xBB).build();
    let before = image.clone();
    expect_record(&image);
    assert_eq!(image, before);
}
