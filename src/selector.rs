//! Locating scene collections and the interactive numeric selection.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use walkdir::WalkDir;

/// Fatal conditions the entry point maps to exit codes.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("Scenes folder not found: \"{}\"", .0.display())]
    ScenesDirMissing(PathBuf),
    #[error("No JSON files found in \"{}\"", .0.display())]
    NoSceneFiles(PathBuf),
    #[error("Selection input closed")]
    Interrupted,
    #[error("Failed to read selection input")]
    Io(#[from] io::Error),
}

/// OBS keeps scene collections under the per-user roaming config dir
/// (`%APPDATA%\obs-studio\basic\scenes` on Windows).
pub fn scenes_dir() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(config.join("obs-studio").join("basic").join("scenes"))
}

/// List the `.json` scene collections directly inside `dir`, sorted by name.
pub fn scan_scene_files(dir: &Path) -> Result<Vec<PathBuf>, SelectError> {
    if !dir.is_dir() {
        return Err(SelectError::ScenesDirMissing(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(SelectError::NoSceneFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Pick one of the candidates: automatic when there is a single file,
/// otherwise a blocking read-validate-retry prompt over `input`.
pub fn choose_scene_file<'a>(
    files: &'a [PathBuf],
    input: &mut impl BufRead,
) -> Result<&'a Path, SelectError> {
    tracing::info!("Found {} JSON files", files.len());
    for (i, file) in files.iter().enumerate() {
        tracing::info!("{}: {}", i + 1, file_name(file));
    }

    if let [only] = files {
        tracing::debug!("Automatically selected the only JSON file: {}", file_name(only));
        return Ok(only);
    }

    loop {
        print!("Please select a JSON file by number: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF mid-prompt: the operator closed stdin.
            return Err(SelectError::Interrupted);
        }
        match parse_selection(&line, files.len()) {
            Some(n) => return Ok(&files[n - 1]),
            None => tracing::error!("Invalid selection. Please try again."),
        }
    }
}

/// 1-indexed selection; `None` for anything that is not a number in range.
fn parse_selection(line: &str, count: usize) -> Option<usize> {
    match line.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n),
        _ => None,
    }
}

fn file_name(path: &Path) -> std::borrow::Cow<'_, str> {
    path.file_name().unwrap_or(path.as_os_str()).to_string_lossy()
}
