use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const SPACE_4: &str = "root = true\n\n[*.md]\nindent_style = space\nindent_size = 4\n";

#[test]
fn test_check_reports_unformatted_file() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(".editorconfig"), SPACE_4).unwrap();
    let file = temp_dir.path().join("test.md");
    fs::write(&file, "- Item 1\n  - Nested item\n").unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.arg("--check").arg(&file);

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Would reformat"))
        .stdout(predicate::str::contains("test.md"));

    // Check mode never writes
    assert_eq!(fs::read_to_string(&file).unwrap(), "- Item 1\n  - Nested item\n");
}

#[test]
fn test_formats_file_in_place() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(".editorconfig"), SPACE_4).unwrap();
    let file = temp_dir.path().join("test.md");
    fs::write(&file, "* Item 1\n  with continuation\n* Item 2\n").unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.arg(&file);

    cmd.assert().success().stdout(predicate::str::contains("Reformatted"));
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "- Item 1\n    with continuation\n- Item 2\n"
    );

    let mut again = Command::cargo_bin("mdfmt").unwrap();
    again.arg("--check").arg(&file);
    again.assert().success();
}

#[test]
fn test_directory_walk_skips_other_files() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("notes.md"), "Title\n=====\n").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "Title\n=====\n").unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.arg(temp_dir.path());
    cmd.assert().success();

    assert_eq!(fs::read_to_string(temp_dir.path().join("notes.md")).unwrap(), "# Title\n");
    assert_eq!(fs::read_to_string(temp_dir.path().join("notes.txt")).unwrap(), "Title\n=====\n");
}

#[test]
fn test_no_editorconfig_flag() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(".editorconfig"), SPACE_4).unwrap();
    let file = temp_dir.path().join("test.md");
    fs::write(&file, "- Item 1\n    - Nested item\n").unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.arg("--no-editorconfig").arg(&file);
    cmd.assert().success();

    assert_eq!(fs::read_to_string(&file).unwrap(), "- Item 1\n  - Nested item\n");
}

#[test]
fn test_stdin_uses_working_directory_editorconfig() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join(".editorconfig"),
        "root = true\n\n[*.md]\nindent_style = tab\nindent_size = 4\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("-")
        .write_stdin("- Item 1\n  - Nested item\n- Item 2\n");

    cmd.assert()
        .success()
        .stdout("- Item 1\n\t- Nested item\n- Item 2\n");
}

#[test]
fn test_number_flag_and_mdformat_toml() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(".mdformat.toml"), "number = true\n").unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("-")
        .write_stdin("1. a\n1. b\n1. c\n");
    cmd.assert().success().stdout("1. a\n2. b\n3. c\n");

    let mut flag = Command::cargo_bin("mdfmt").unwrap();
    flag.current_dir(temp_dir.path())
        .args(["--wrap", "keep", "-"])
        .write_stdin("3. a\n3. b\n");
    flag.assert().success().stdout("3. a\n4. b\n");
}

#[test]
fn test_missing_file_is_tool_error() {
    let temp_dir = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.arg(temp_dir.path().join("missing.md"));

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_invalid_wrap_value_is_rejected() {
    let mut cmd = Command::cargo_bin("mdfmt").unwrap();
    cmd.args(["--wrap", "sometimes", "-"]);
    cmd.assert().failure();
}
