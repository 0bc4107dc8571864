//! Loader for the sample files under `samples/`

use std::fs;
use std::io;
use std::path::PathBuf;

/// Access to the curated `.ex` fixtures shipped with the crate
pub struct Samples;

impl Samples {
    /// Directory holding the samples
    pub fn dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    pub fn path(name: &str) -> PathBuf {
        Self::dir().join(name)
    }

    /// Read a sample by file name (`post_resource.ex`)
    pub fn get_string(name: &str) -> io::Result<String> {
        fs::read_to_string(Self::path(name))
    }

    /// File names of every `.ex` sample, sorted
    pub fn list() -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(Self::dir())? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ex") {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
