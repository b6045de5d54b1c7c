use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ferry_core::{Environment, FerryConfig, Fingerprint, HashAlgorithm, LogicalPath};

use crate::digest::ContentDigest;
use crate::error::{io_err, TransferError};
use crate::pathset::PathSet;
use crate::traits::{ContentStore, StoreConnector};

use super::is_contained;

/// Connects to a [`LocalStore`] over per-environment root directories.
#[derive(Debug, Clone, Default)]
pub struct LocalStoreConnector {
    roots: BTreeMap<Environment, PathBuf>,
    algorithm: HashAlgorithm,
}

impl LocalStoreConnector {
    pub fn new(roots: BTreeMap<Environment, PathBuf>, algorithm: HashAlgorithm) -> Self {
        LocalStoreConnector { roots, algorithm }
    }

    pub fn from_config(config: &FerryConfig) -> Self {
        LocalStoreConnector::new(config.store_roots.clone(), config.hash_type)
    }
}

impl StoreConnector for LocalStoreConnector {
    type Store = LocalStore;

    fn connect(&self) -> Result<LocalStore, TransferError> {
        Ok(LocalStore {
            roots: self.roots.clone(),
            digest: ContentDigest::new(self.algorithm),
        })
    }
}

/// `remote://<rel>` is `<root of env>/<rel>`; bare paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalStore {
    roots: BTreeMap<Environment, PathBuf>,
    digest: ContentDigest,
}

impl LocalStore {
    /// Local location backing `path` in `env`.
    pub fn locate(&self, path: &LogicalPath, env: &Environment) -> Result<PathBuf, TransferError> {
        let Some(rel) = path.remote_relative() else {
            return Ok(PathBuf::from(path.as_str()));
        };
        let root = self
            .roots
            .get(env)
            .ok_or_else(|| TransferError::Store(format!("no store root for environment '{env}'")))?;
        if rel.is_empty() {
            return Ok(root.clone());
        }
        if !is_contained(Path::new(rel)) {
            return Err(TransferError::Store(format!("{path} escapes the store root")));
        }
        Ok(root.join(rel))
    }
}

impl ContentStore for LocalStore {
    fn resolve_fingerprint(
        &mut self,
        path: &LogicalPath,
        env: &Environment,
    ) -> Result<Option<Fingerprint>, TransferError> {
        let source = self.locate(path, env)?;
        self.digest.digest_file(&source)
    }

    fn fetch_file(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        makedirs: bool,
        env: &Environment,
    ) -> Result<PathBuf, TransferError> {
        let source = self.locate(path, env)?;
        if !source.is_file() {
            return Err(TransferError::Store(format!("{path} is not a file in '{env}'")));
        }
        let target = match source.file_name() {
            Some(name) if dest.is_dir() => dest.join(name),
            _ => dest.to_path_buf(),
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                if !makedirs {
                    return Err(TransferError::Store(format!(
                        "destination directory {} does not exist",
                        parent.display()
                    )));
                }
                std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
        }
        copy_atomic(&source, &target)?;
        Ok(target)
    }

    fn fetch_dir(
        &mut self,
        path: &LogicalPath,
        dest: &Path,
        env: &Environment,
    ) -> Result<Vec<PathBuf>, TransferError> {
        let source = self.locate(path, env)?;
        if !source.is_dir() {
            tracing::debug!("{path} is not a directory in '{env}'");
            return Ok(Vec::new());
        }
        let source = std::fs::canonicalize(&source).map_err(|e| io_err(&source, e))?;
        let base = match source.file_name() {
            Some(name) => dest.join(name),
            None => dest.to_path_buf(),
        };

        let mut written = Vec::new();
        for file in PathSet::new(&source)?.walk() {
            let Ok(rel) = file.strip_prefix(&source) else {
                continue;
            };
            let target = base.join(rel);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            }
            copy_atomic(&file, &target)?;
            written.push(target);
        }
        Ok(written)
    }
}

/// Copy through `<target>.ferry.tmp` and rename into place.
fn copy_atomic(source: &Path, target: &Path) -> Result<(), TransferError> {
    let tmp = PathBuf::from(format!("{}.ferry.tmp", target.display()));
    std::fs::copy(source, &tmp).map_err(|e| io_err(source, e))?;
    if let Err(e) = std::fs::rename(&tmp, target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(target, e));
    }
    Ok(())
}
