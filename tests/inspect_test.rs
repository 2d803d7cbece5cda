//! Integration tests for `fwtools inspect`
//!
//! - Decoded fields and passing checks for a freshly combined image
//! - Corruption is reported per check with a non-zero exit
//! - The newest of several images is reported as preferred

mod common;

use assert_fs::prelude::*;
use common::{stderr, stdout, TestProject, APP, APP_SHA256, BOOTLOADER};
use predicates::prelude::*;

fn combine(project: &TestProject, output: &str, version: &str) {
    let result = project.run(&[
        "combine", "-b", "bootloader.bin", "-a", "app.bin", "-d", "4", "-c", "60", "-o", output,
        "-s", version,
    ]);
    assert!(result.status.success(), "stderr: {}", stderr(&result));
}

fn setup() -> TestProject {
    let project = TestProject::new();
    project.create_bytes("bootloader.bin", &BOOTLOADER);
    project.create_bytes("app.bin", &APP);
    project
}

#[test]
fn test_inspect_valid_image() {
    let project = setup();
    combine(&project, "combined.bin", "42");

    let output = project.run(&["inspect", "combined.bin", "-d", "4", "-c", "60"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("magic:           0x5a51b3d4"));
    assert!(out.contains("totalSize:       3"));
    assert!(out.contains("firmwareVersion: 42"));
    assert!(out.contains(&format!("firmwareSHA256:  {APP_SHA256}")));
    assert!(out.contains("✓ digest"));
    assert!(!out.contains("✗"));
}

#[test]
fn test_inspect_detects_corruption() {
    let project = setup();
    combine(&project, "combined.bin", "42");

    let mut image = project.read_bytes("combined.bin");
    let last = image.len() - 1;
    image[last] ^= 0xff;
    project.create_bytes("combined.bin", &image);

    let output = project.run(&["inspect", "combined.bin", "-d", "4", "-c", "60"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("✗ digest"));
    assert!(stdout(&output).contains("✓ checksum"));
    assert!(stderr(&output).contains("Verification failed for combined.bin"));
}

#[test]
fn test_inspect_truncated_image() {
    let project = setup();
    project.create_bytes("short.bin", &[0u8; 20]);

    let output = project.run(&["inspect", "short.bin", "-d", "4"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(predicate::str::contains("✗ Cannot decode header of short.bin").eval(&stdout(&output)));
    assert!(predicate::str::contains("truncated").eval(&stdout(&output)));
    assert!(stderr(&output).contains("Verification failed for short.bin"));
}

#[test]
fn test_inspect_continues_past_bad_image() {
    let project = setup();
    combine(&project, "old.bin", "100");
    combine(&project, "new.bin", "200");
    project.create_bytes("short.bin", &[0u8; 20]);

    let output = project.run(&["inspect", "old.bin", "short.bin", "new.bin", "-d", "4"]);
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("old.bin:\n  magic:"));
    assert!(out.contains("new.bin:\n  magic:"));
    assert!(out.contains("short.bin:\n  ✗ Cannot decode header"));
    assert!(out.ends_with("Preferred image: new.bin\n"));
    assert!(stderr(&output).contains("Verification failed for short.bin"));
}

#[test]
fn test_inspect_json_records_missing_image() {
    let project = setup();
    combine(&project, "a.bin", "1");

    let output = project.run(&["--json", "inspect", "a.bin", "gone.bin", "-d", "4"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["preferred"], "a.bin");
    assert_eq!(report["images"][0]["valid"], true);
    assert_eq!(report["images"][1]["path"], "gone.bin");
    assert_eq!(report["images"][1]["valid"], false);
    assert!(report["images"][1]["error"]
        .as_str()
        .unwrap()
        .contains("Cannot read image gone.bin"));
}

#[test]
fn test_inspect_prefers_newest() {
    let project = setup();
    combine(&project, "old.bin", "100");
    combine(&project, "new.bin", "200");
    combine(&project, "same.bin", "200");

    let output = project.run(&["inspect", "old.bin", "new.bin", "same.bin", "-d", "4"]);
    assert!(output.status.success());
    assert!(stdout(&output).ends_with("Preferred image: new.bin\n"));
}

#[test]
fn test_inspect_json() {
    let project = setup();
    combine(&project, "a.bin", "1");
    combine(&project, "b.bin", "2");

    let output = project.run(&["--json", "inspect", "a.bin", "b.bin", "-d", "4", "-c", "60"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["preferred"], "b.bin");
    assert_eq!(report["images"][0]["valid"], true);
    assert_eq!(report["images"][1]["fields"]["firmware_version"], 2);
    assert_eq!(report["images"][1]["checks"].as_array().unwrap().len(), 4);
}

#[test]
fn test_inspect_custom_magic_from_settings() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("bootloader.bin").write_binary(&BOOTLOADER).unwrap();
    temp.child("app.bin").write_binary(&APP).unwrap();
    temp.child("fwtools.toml")
        .write_str("[header]\nmagic = 0xcafef00d\n")
        .unwrap();

    let project = TestProject::new();
    let run = |args: &[&str]| {
        project
            .command()
            .current_dir(temp.path())
            .args(args)
            .output()
            .unwrap()
    };

    let result = run(&[
        "combine", "-b", "bootloader.bin", "-a", "app.bin", "-d", "4", "-c", "60", "-o", "fw.bin",
    ]);
    assert!(result.status.success(), "stderr: {}", stderr(&result));
    temp.child("fw.bin").assert(predicate::path::exists());

    let result = run(&["inspect", "fw.bin", "-d", "4"]);
    assert!(result.status.success());
    assert!(stdout(&result).contains("magic:           0xcafef00d"));

    // Without the project settings the default magic no longer matches
    temp.child("fwtools.toml").write_str("").unwrap();
    let result = run(&["inspect", "fw.bin", "-d", "4"]);
    assert!(!result.status.success());
    assert!(stdout(&result).contains("✗ magic"));
}
