//! Brand asset discovery. The logo lives in a conventional `asset/`
//! directory next to the process working directory; a missing
//! directory or an empty one simply means "no logo".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devis_idf::SharedData;

/// The conventional asset directory, relative to the application root.
pub const ASSET_DIR: &str = "asset";

/// Picks the brand asset file: any `Elios.*` file wins, then the first
/// `*.png`, then the first `*.jpg` / `*.jpeg`, each in name order.
pub fn find_brand_asset(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let file_name = |path: &PathBuf| {
        path.file_name().and_then(|n| n.to_str()).map(str::to_string).unwrap_or_default()
    };
    if let Some(preferred) = files.iter().find(|p| file_name(p).starts_with("Elios.")) {
        return Some(preferred.clone());
    }

    let with_extension = |ext: &str| {
        files.iter().find(|p| p.extension().and_then(|e| e.to_str()) == Some(ext)).cloned()
    };
    with_extension("png")
        .or_else(|| with_extension("jpg"))
        .or_else(|| with_extension("jpeg"))
}

/// Reads the resolved brand asset, if any. A read failure on a file
/// that was just found is a real error, not an absent asset.
pub fn load_brand_asset(dir: &Path) -> io::Result<Option<SharedData>> {
    match find_brand_asset(dir) {
        None => Ok(None),
        Some(path) => Ok(Some(Arc::new(fs::read(&path)?))),
    }
}
