use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file of loan requests (one object, or an array for `batch`).
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let location = resolve_path(path)?;
    let contents = fs::read_to_string(&location)
        .map_err(|e| format!("Failed to read '{}': {}", location.display(), e))?;
    let parsed = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", location.display(), e))?;
    Ok(parsed)
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let location = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !location.exists() {
        return Err(format!("File not found: {}", location.display()).into());
    }
    if !location.is_file() {
        return Err(format!("Not a file: {}", location.display()).into());
    }
    Ok(location)
}
