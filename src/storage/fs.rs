//! Filesystem storage implementation
//!
//! Layout under the output directory:
//!
//! ```text
//! <dir>/pages/<key>.json   CrawlRecord
//! <dir>/pages/<key>.html   raw document
//! <dir>/pages/<key>.md     rendered document
//! <dir>/manifest.json
//! <dir>/corpus.md
//! ```

use crate::config::OutputConfig;
use crate::state::CrawlRecord;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::PageArtifacts;
use crate::url::record_key;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const RECORD_EXT: &str = "json";
const RAW_EXT: &str = "html";
const RENDERED_EXT: &str = "md";

/// Filesystem storage backend
pub struct FsStorage {
    pages_dir: PathBuf,
    manifest_path: PathBuf,
    corpus_path: PathBuf,
    root: PathBuf,
}

impl FsStorage {
    /// Creates a storage rooted at `dir`; nothing is touched until `initialize`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let root = dir.into();
        Self {
            pages_dir: root.join("pages"),
            manifest_path: root.join("manifest.json"),
            corpus_path: root.join("corpus.md"),
            root,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self {
            pages_dir: config.pages_dir(),
            manifest_path: config.manifest_path(),
            corpus_path: config.corpus_path(),
            root: config.directory(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages_dir(&self) -> &Path {
        &self.pages_dir
    }

    fn artifact_path(&self, key: &str, ext: &str) -> PathBuf {
        self.pages_dir.join(format!("{}.{}", key, ext))
    }
}

/// Reads a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> StorageResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn create_dir(path: &Path) -> StorageResult<()> {
    std::fs::create_dir_all(path).map_err(|source| StorageError::CreateDir {
        path: path.display().to_string(),
        source,
    })
}

impl Storage for FsStorage {
    fn initialize(&mut self) -> StorageResult<()> {
        create_dir(&self.root)?;
        create_dir(&self.pages_dir)?;
        tracing::debug!("Storage initialized at {}", self.root.display());
        Ok(())
    }

    fn list_record_keys(&self) -> StorageResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.pages_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = BTreeSet::new();
        for entry in entries {
            let path = entry?.path();
            let known_ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == RECORD_EXT || e == RAW_EXT || e == RENDERED_EXT)
                .unwrap_or(false);
            if !known_ext {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.insert(stem.to_string());
            }
        }

        Ok(keys.into_iter().collect())
    }

    fn read_artifacts(&self, key: &str) -> StorageResult<PageArtifacts> {
        Ok(PageArtifacts {
            key: key.to_string(),
            record_json: read_optional(&self.artifact_path(key, RECORD_EXT))?,
            raw_html: read_optional(&self.artifact_path(key, RAW_EXT))?,
            rendered: read_optional(&self.artifact_path(key, RENDERED_EXT))?,
        })
    }

    fn save_page(
        &mut self,
        record: &CrawlRecord,
        raw_html: &str,
        rendered: &str,
    ) -> StorageResult<String> {
        let key = record_key(&record.url);
        let json = record.to_json()?;

        // The record goes last: an interrupted write leaves no record file,
        // and the loader treats the companions alone as stale.
        std::fs::write(self.artifact_path(&key, RAW_EXT), raw_html)?;
        std::fs::write(self.artifact_path(&key, RENDERED_EXT), rendered)?;
        std::fs::write(self.artifact_path(&key, RECORD_EXT), json)?;

        Ok(key)
    }

    fn write_manifest(&mut self, manifest_json: &str) -> StorageResult<()> {
        std::fs::write(&self.manifest_path, manifest_json)?;
        Ok(())
    }

    fn read_manifest(&self) -> StorageResult<Option<String>> {
        read_optional(&self.manifest_path)
    }

    fn write_corpus(&mut self, corpus: &str) -> StorageResult<()> {
        std::fs::write(&self.corpus_path, corpus)?;
        Ok(())
    }
}
