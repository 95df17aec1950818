//! Scratch directories and failure expectations for the CLI tests.

use std::{fs, io, path::PathBuf};

use tempfile::TempDir;

use super::{Cli, CliError, run_cli};

/// Fresh scratch directory removed when dropped.
pub(super) fn temp_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("plexus-cli")
        .tempdir()
        .unwrap_or_else(|err| panic!("scratch directory unavailable: {err}"))
}

/// Writes `contents` to `dir/name` and returns the full path.
pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Runs `cli` and hands back its error, panicking with `reason` on success.
pub(super) fn run_cli_expecting_error(cli: Cli, reason: &str) -> CliError {
    run_cli(cli).err().unwrap_or_else(|| panic!("{reason}"))
}
