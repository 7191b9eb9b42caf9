mod common;

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

use quotation_pdf::LOGO_ENV;

fn quotation_pdf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quotation-pdf"))
        .args(args)
        .env_remove(LOGO_ENV)
        .env_remove("RUST_LOG")
        .output()
        .expect("run quotation-pdf")
}

fn records_dir() -> String {
    common::fixture("").display().to_string()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn export_succeeds_with_logo() {
    let dir = common::scratch_dir("cli_export_succeeds_with_logo");
    let logo = dir.join("logo.png");
    std::fs::write(&logo, common::logo_png()).expect("write logo");
    let out = dir.join("q.pdf");

    let output = quotation_pdf(&[
        "quotation",
        "--records",
        &records_dir(),
        "--logo",
        &path_arg(&logo),
        "-o",
        &path_arg(&out),
    ]);

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(common::page_count(&std::fs::read(&out).expect("read output")) >= 1);
}

#[test]
fn rejected_token_exits_for_login_even_without_logo() {
    let output = quotation_pdf(&[
        "quotation",
        "--records",
        &records_dir(),
        "--require-token",
        "s3cret",
        "--token",
        "stale",
    ]);

    assert_eq!(output.status.code(), Some(3), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("log in again"), "{stderr}");
}

#[test]
fn empty_quotation_exits_with_empty_state_without_logo() {
    let dir = common::scratch_dir("cli_empty_quotation");
    let out = dir.join("empty.pdf");

    let output = quotation_pdf(&[
        "empty_quotation",
        "--records",
        &records_dir(),
        "-o",
        &path_arg(&out),
    ]);

    assert_eq!(output.status.code(), Some(2), "{output:?}");
    assert!(!out.exists());
}

#[test]
fn missing_quotation_and_missing_logo_are_failures() {
    let output = quotation_pdf(&["missing", "--records", &records_dir()]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");

    let output = quotation_pdf(&["quotation", "--records", &records_dir()]);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(LOGO_ENV), "{stderr}");
}
