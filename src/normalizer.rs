//! Tidies an image root before validation: images are gathered into the
//! folder named after their parent directory, emptied directories are
//! pruned, and SKU folders carrying a known two-character suffix are
//! trimmed back to their canonical length.

use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Folder name lengths that carry a trailing two-character SKU suffix.
pub const SUFFIXED_FOLDER_NAME_LENGTHS: [usize; 2] = [19, 22];

const SUFFIX_LEN: usize = 2;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub files_moved: usize,
    pub move_failures: usize,
    pub folders_removed: usize,
    pub removal_failures: usize,
    /// Directories that could not be walked or listed and were left as they are.
    pub read_failures: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub renamed: usize,
    pub skipped: usize,
    pub failures: usize,
}

/// Moves every `.jpg` into `<base>/<name of its parent directory>/` and
/// removes directories left empty. The base directory itself is kept.
pub fn move_and_prune(base: &Path) -> Result<NormalizeStats> {
    let mut stats = NormalizeStats::default();

    if !base.is_dir() {
        warn!("Image root '{}' does not exist", base.display());
        return Ok(stats);
    }

    // Collected up front so destination folders created below are not walked.
    let mut directories: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(base).contents_first(true) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => directories.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => {
                stats.read_failures += 1;
                warn!("Failed to walk '{}', error: {}", base.display(), e);
            }
        }
    }

    for dir in directories {
        tidy_directory(base, &dir, &mut stats);
    }

    Ok(stats)
}

/// Strips the trailing two characters from immediate subfolders whose name
/// is 19 or 22 characters long. Every other folder is left alone.
pub fn strip_sku_suffixes(base: &Path) -> Result<RenameStats> {
    let mut stats = RenameStats::default();

    if !base.is_dir() {
        warn!("Image root '{}' does not exist", base.display());
        return Ok(stats);
    }

    let mut folders: Vec<PathBuf> = Vec::new();
    for entry in
        fs::read_dir(base).with_context(|| format!("Failed to read {}", base.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            folders.push(path);
        }
    }

    for folder in folders {
        let name = folder
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(new_name) = stripped_name(&name) else {
            stats.skipped += 1;
            info!("Skipped '{}', length does not carry a suffix", name);
            continue;
        };

        match fs::rename(&folder, base.join(&new_name)) {
            Ok(()) => {
                stats.renamed += 1;
                info!("Renamed '{}' -> '{}'", name, new_name);
            }
            Err(e) => {
                stats.failures += 1;
                warn!("Failed to rename '{}' -> '{}', error: {}", name, new_name, e);
            }
        }
    }

    Ok(stats)
}

/// The canonical name for a suffixed folder, or `None` when the name has no suffix.
pub fn stripped_name(name: &str) -> Option<String> {
    let length = name.chars().count();
    if !SUFFIXED_FOLDER_NAME_LENGTHS.contains(&length) {
        return None;
    }
    Some(name.chars().take(length - SUFFIX_LEN).collect())
}

/// Moves the images out of one directory, then removes it if it is left empty.
fn tidy_directory(base: &Path, dir: &Path, stats: &mut NormalizeStats) {
    let Some(sku) = dir.file_name().map(|name| name.to_os_string()) else {
        return;
    };
    let dest_folder = base.join(&sku);

    if dir != dest_folder.as_path() {
        match jpg_files(dir) {
            Ok(files) => {
                for file in files {
                    move_into(&file, &dest_folder, stats);
                }
            }
            Err(e) => {
                stats.read_failures += 1;
                warn!("Skipping '{}', error: {:#}", dir.display(), e);
                return;
            }
        }
    }

    if dir == base {
        return;
    }
    match is_empty_dir(dir) {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            stats.read_failures += 1;
            warn!("Skipping '{}', error: {:#}", dir.display(), e);
            return;
        }
    }

    match fs::remove_dir(dir) {
        Ok(()) => {
            stats.folders_removed += 1;
            info!("Removed empty folder '{}'", dir.display());
        }
        Err(e) => {
            stats.removal_failures += 1;
            warn!("Failed to remove '{}', error: {}", dir.display(), e);
        }
    }
}

fn move_into(file: &Path, dest_folder: &Path, stats: &mut NormalizeStats) {
    let Some(file_name) = file.file_name() else {
        return;
    };

    if let Err(e) = fs::create_dir_all(dest_folder) {
        stats.move_failures += 1;
        warn!("Failed to create '{}', error: {}", dest_folder.display(), e);
        return;
    }

    let dest_path = dest_folder.join(file_name);
    if dest_path.exists() {
        stats.move_failures += 1;
        warn!(
            "Not moving '{}', '{}' already exists",
            file.display(),
            dest_path.display()
        );
        return;
    }

    match fs::rename(file, &dest_path) {
        Ok(()) => {
            stats.files_moved += 1;
            info!("Moved '{}' -> '{}'", file.display(), dest_path.display());
        }
        Err(e) => {
            stats.move_failures += 1;
            warn!("Failed to move '{}', error: {}", file.display(), e);
        }
    }
}

fn jpg_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() && entry.file_name().to_string_lossy().ends_with(".jpg") {
            files.push(entry.path());
        }
    }
    Ok(files)
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    Ok(fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .next()
        .is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_suffixed_lengths() {
        assert_eq!(
            stripped_name("abcdefghijklmnopqXY"),
            Some("abcdefghijklmnopq".to_string())
        );
        assert_eq!(
            stripped_name("abcdefghijklmnopqrstXY"),
            Some("abcdefghijklmnopqrst".to_string())
        );
        assert_eq!(stripped_name("abcdefghijklmnopq"), None);
        assert_eq!(stripped_name("abcdefghijklmnopqrst"), None);
        assert_eq!(stripped_name("abcdefghijklmnopqrstu"), None);
    }

    #[test]
    fn unreadable_directory_is_counted_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let vanished = dir.path().join("batch").join("abcdefghijklmnopq");
        let mut stats = NormalizeStats::default();

        tidy_directory(dir.path(), &vanished, &mut stats);

        assert_eq!(stats.read_failures, 1);
        assert_eq!(stats.files_moved, 0);
        assert_eq!(stats.folders_removed, 0);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let name = "\u{e9}".repeat(19);
        assert_eq!(stripped_name(&name), Some("\u{e9}".repeat(17)));
    }
}
