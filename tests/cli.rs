use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

/// `archive-builder` with the config/env lookups pointed at an empty directory.
fn builder(workdir: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("archive-builder")?;
    cmd.current_dir(workdir)
        .env_remove("KCONFIG_CONFIG")
        .env_remove("ZOS_PATH")
        .env_remove("EXTRA_ROMDISK_FILES")
        .env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_cli_pack_and_list_cycle() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup: two source files
    let source_dir = tempdir()?;
    let a = source_dir.path().join("a.txt");
    let b = source_dir.path().join("b.bin");
    fs::write(&a, b"abc")?;
    fs::write(&b, b"")?;

    let out_dir = tempdir()?;
    let image = out_dir.path().join("disk.img");

    // 2. Pack
    builder(out_dir.path())?
        .arg("-v")
        .arg(&image)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stderr(predicate::str::contains("Packed 2 files (3B)"));

    let data = fs::read(&image)?;
    assert_eq!(data.len(), 69);
    assert_eq!(&data[..2], &[2, 0]);
    assert_eq!(&data[66..], b"abc");

    // 3. List
    let mut cmd = Command::cargo_bin("romdisk-list")?;
    cmd.arg(&image);
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("a.txt")
                .and(predicate::str::contains("b.bin"))
                .and(predicate::str::contains("2 files")),
        );

    let mut cmd = Command::cargo_bin("romdisk-list")?;
    cmd.arg("--json").arg(&image);
    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("\"offset\": 66")
                .and(predicate::str::contains("\"offset\": 69")),
        );

    Ok(())
}

#[test]
fn test_cli_usage_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let image = dir.path().join("disk.img");

    // no arguments at all
    builder(dir.path())?.assert().code(1);

    // output but no inputs: rejected before the output is created
    builder(dir.path())?.arg(&image).assert().code(1);
    assert!(!image.exists());

    // an empty directory expands to nothing
    let empty = dir.path().join("empty");
    fs::create_dir(&empty)?;
    builder(dir.path())?
        .arg(&image)
        .arg(&empty)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no input files"));
    assert!(!image.exists());

    Ok(())
}

#[test]
fn test_cli_missing_source_is_io_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let image = dir.path().join("disk.img");
    let missing = dir.path().join("does-not-exist.bin");

    builder(dir.path())?
        .arg(&image)
        .arg(&missing)
        .assert()
        .code(2)
        .stderr(
            predicate::str::contains("cannot stat")
                .and(predicate::str::contains("does-not-exist.bin")),
        );
    Ok(())
}

#[test]
fn test_cli_uncreatable_destination_is_io_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let src = dir.path().join("a.txt");
    fs::write(&src, b"abc")?;
    let image = dir.path().join("no").join("such").join("dir").join("disk.img");

    builder(dir.path())?
        .arg(&image)
        .arg(&src)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot create output file"));
    Ok(())
}

#[test]
fn test_cli_extra_files_from_config_and_env() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("first.txt"), b"1")?;
    fs::write(dir.path().join("second.txt"), b"22")?;
    fs::write(dir.path().join("third.txt"), b"333")?;
    fs::write(
        dir.path().join("os.conf"),
        "CONFIG_ROMDISK_EXTRA_FILES=\"second.txt\"\nCONFIG_ROMDISK_IGNORE_HIDDEN=y\n",
    )?;

    builder(dir.path())?
        .env("EXTRA_ROMDISK_FILES", "third.txt")
        .arg("disk.img")
        .arg("first.txt")
        .assert()
        .success();

    let data = fs::read(dir.path().join("disk.img"))?;
    assert_eq!(u16::from_le_bytes([data[0], data[1]]), 3);
    assert_eq!(&data[2 + 96..], b"122333");
    assert_eq!(&data[2..2 + 9], b"first.txt");
    assert_eq!(&data[2 + 32..2 + 32 + 10], b"second.txt");
    Ok(())
}

#[test]
fn test_cli_help_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    builder(dir.path())?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--buffer-size"));
    Ok(())
}
