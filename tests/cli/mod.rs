//! Command line behavior: output lines and exit statuses.

use std::process::{Command, Output};

use fwver::VersionRecord;

use crate::common::images;
use crate::common::{signature, temp_image, ImageBuilder};

fn fwver_bin() -> String {
    env!("CARGO_BIN_EXE_fwver").to_string()
}

fn run_fwver(args: &[&str]) -> Output {
    Command::new(fwver_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute fwver")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn code(output: &Output) -> i32 {
    output.status.code().expect("terminated by signal")
}

// =============================================================================
// scan
// =============================================================================

#[test]
fn scan_prints_one_version_line() {
    let file = temp_image(&images::gop_sandy_bridge("0", "1024"));
    let output = run_fwver(&["scan", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 0);
    assert_eq!(stdout(&output), "     EFI GOP Driver SandyBridge - 2.0.1024\n");
}

#[test]
fn scan_json_output() {
    let file = temp_image(&images::aspeed(0x03, 0x05, 0x01).build());
    let output = run_fwver(&["scan", "--json", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 0);
    let record: VersionRecord = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(record.label, "EFI GOP ASPEED");
    assert_eq!(record.version, "1.05.03");
}

#[test]
fn scan_without_signature_exits_1() {
    let file = temp_image(&[0x11u8; 512]);
    let output = run_fwver(&["scan", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 1);
    assert!(output.stdout.is_empty());
}

#[test]
fn scan_unknown_lan_layout_prints_notice() {
    let image = ImageBuilder::new(0x80)
        .put(0x10, signature("Intel UNDI"))
        .build();
    let file = temp_image(&image);
    let output = run_fwver(&["scan", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 1);
    assert_eq!(stdout(&output), "     Unknown Intel LAN version.\n");
}

#[test]
fn scan_unknown_gop_generation_exits_6() {
    let image = ImageBuilder::new(0x200)
        .put(0x10, signature("Intel GOP"))
        .build();
    let file = temp_image(&image);
    let output = run_fwver(&["scan", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 6);
    assert!(output.stdout.is_empty());
}

#[test]
fn scan_empty_file_exits_5() {
    let file = temp_image(&[]);
    let output = run_fwver(&["scan", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 5);
    assert_eq!(stdout(&output), "Can't allocate memory for file contents.\n");
}

#[test]
fn scan_respects_max_file_size() {
    let file = temp_image(&images::gop_sandy_bridge("0", "1024"));
    let output = run_fwver(&[
        "--max-file-size",
        "16",
        "scan",
        file.path().to_str().unwrap(),
    ]);
    assert_eq!(code(&output), 5);
}

#[test]
fn scan_missing_file_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.efi");
    let output = run_fwver(&["scan", path.to_str().unwrap()]);
    assert_eq!(code(&output), 2);
    assert_eq!(stdout(&output), "File can't be opened.\n");
}

#[test]
fn scan_list_names_every_family() {
    let output = run_fwver(&["scan", "--list"]);
    assert_eq!(code(&output), 0);
    let text = stdout(&output);
    for label in [
        "EFI GOP Driver Broadwell",
        "EFI GOP-in-OROM ASPEED",
        "EFI IRST SATA",
        "EFI Marvell SATA RAID",
        "EFI Broadcom UNDI",
        "EFI Realtek UNDI",
    ] {
        assert!(text.lines().any(|l| l == label), "missing {label}");
    }
}

#[test]
fn bad_invocations_exit_4() {
    assert_eq!(code(&run_fwver(&["scan"])), 4);
    assert_eq!(code(&run_fwver(&["frobnicate"])), 4);
    assert_eq!(code(&run_fwver(&[])), 4);
}

#[test]
fn help_exits_0() {
    let output = run_fwver(&["--help"]);
    assert_eq!(code(&output), 0);
    assert!(stdout(&output).contains("extract"));
}

// =============================================================================
// extract
// =============================================================================

fn extract(file: &str, offset: &str, end_marker: &str, max_length: &str) -> Output {
    // "$VER" as hex.
    run_fwver(&[
        "extract", "BIOS ", "24564552", offset, end_marker, max_length, file,
    ])
}

#[test]
fn extract_prints_prefix_and_text() {
    let file = temp_image(b"\x00\x00$VER1.2.3 trailing\x00");
    let output = extract(file.path().to_str().unwrap(), "4", "20", "32");
    assert_eq!(code(&output), 0);
    assert_eq!(stdout(&output), "BIOS 1.2.3\n");
}

#[test]
fn extract_accepts_negative_offset_and_length() {
    let file = temp_image(b"v7.01;$VER");
    let output = extract(file.path().to_str().unwrap(), "-6", "3B", "-3");
    assert_eq!(code(&output), 0);
    assert_eq!(stdout(&output), "BIOS v7.\n");
}

#[test]
fn extract_failures_exit_1() {
    let file = temp_image(b"no marker here");
    let output = extract(file.path().to_str().unwrap(), "0", "00", "8");
    assert_eq!(code(&output), 1);

    // Text start before the buffer.
    let file = temp_image(b"$VER");
    let output = extract(file.path().to_str().unwrap(), "-100", "00", "8");
    assert_eq!(code(&output), 1);
}

#[test]
fn extract_rejects_bad_arguments() {
    let file = temp_image(b"$VER1.0");
    let path = file.path().to_str().unwrap();
    assert_eq!(code(&extract(path, "4", "2020", "8")), 4);
    assert_eq!(code(&extract(path, "4", "00", "0")), 4);
    assert_eq!(code(&extract(path, "four", "00", "8")), 4);

    let output = run_fwver(&["extract", "BIOS ", "2456455", "4", "00", "8", path]);
    assert_eq!(code(&output), 4);
    assert_eq!(stdout(&output), "Pattern can't be parsed as hex.\n");

    let output = run_fwver(&["extract", "BIOS ", "", "0", "00", "8", path]);
    assert_eq!(code(&output), 4);
    assert_eq!(stdout(&output), "pattern must not be empty\n");
}

// =============================================================================
// count
// =============================================================================

#[test]
fn count_reports_overlapping_matches() {
    let file = temp_image(b"ABCDABCD");
    let output = run_fwver(&["count", "41424344", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 0);
    assert_eq!(stdout(&output), "2\n");

    let file = temp_image(b"AAAA");
    let output = run_fwver(&["count", "4141", file.path().to_str().unwrap()]);
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn count_without_matches_exits_1() {
    let file = temp_image(b"ABCDABCD");
    let output = run_fwver(&["count", "5A5A", file.path().to_str().unwrap()]);
    assert_eq!(code(&output), 1);
    assert!(output.stdout.is_empty());
}

#[test]
fn count_rejects_malformed_patterns() {
    let file = temp_image(b"ABCD");
    let path = file.path().to_str().unwrap();
    for pattern in ["414", "4G", "zz"] {
        let output = run_fwver(&["count", pattern, path]);
        assert_eq!(code(&output), 4, "pattern {pattern}");
    }
}
