//! Shared helpers for building throwaway monorepos on disk

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Monorepo {
    pub dir: TempDir,
}

impl Monorepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("components")).expect("Failed to create components");
        fs::create_dir_all(dir.path().join("packages")).expect("Failed to create packages");
        Self { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir")
    }

    /// Writes `package.json` and, when `with_entry` is set, `src/index.js`
    pub fn add(&self, root: &str, name: &str, version: &str, with_entry: bool) -> PathBuf {
        let dir = self.dir.path().join(root).join(name);
        fs::create_dir_all(&dir).expect("Failed to create package dir");
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name": "{}", "version": "{}", "main": "lib/index.js"}}"#, name, version),
        )
        .expect("Failed to write package.json");

        if with_entry {
            fs::create_dir_all(dir.join("src")).expect("Failed to create src");
            fs::write(dir.join("src/index.js"), "export default {};\n")
                .expect("Failed to write entry");
        }
        dir
    }
}
