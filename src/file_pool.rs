use log::{debug, warn};
use rand::seq::IndexedRandom;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::PoolError;

// @module: Directory-backed work pools

/// Directory listing used as a work queue
///
/// Each pool is a flat directory; every regular file in it is one pending
/// work item. There is no locking: one consumer per pool is assumed, and two
/// processes picking from the same pool can both pick a file before either
/// moves it.
pub struct FilePool;

impl FilePool {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), PoolError> {
        let path = path.as_ref();
        if !path.is_dir() {
            fs::create_dir_all(path).map_err(|e| PoolError::io(path, e))?;
        }
        Ok(())
    }

    /// Names of the regular files directly inside `dir`
    ///
    /// A missing directory yields `PoolError::Empty`. Entries that cannot be
    /// resolved, such as dangling symlinks, are skipped with a warning; only a
    /// failure to read `dir` itself is an error.
    pub fn list_pending<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, PoolError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PoolError::Empty(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(PoolError::io(dir, e.into())),
                Err(e) => {
                    warn!("Skipping unreadable pool entry {:?}: {}", e.path().unwrap_or(dir), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => files.push(name.to_string()),
                None => warn!("Skipping pool entry with a non UTF-8 name: {:?}", entry.path()),
            }
        }

        Ok(files)
    }

    // @checks: Pool has at least one pending file
    pub fn has_pending<P: AsRef<Path>>(dir: P) -> bool {
        Self::list_pending(dir).is_ok_and(|files| !files.is_empty())
    }

    /// Pick one pending filename uniformly at random
    pub fn pick_pending<P: AsRef<Path>>(dir: P) -> Result<String, PoolError> {
        let dir = dir.as_ref();
        let files = Self::list_pending(dir)?;
        let picked = files
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| PoolError::Empty(dir.to_path_buf()))?;
        debug!("Picked {} out of {} pending file(s) in {:?}", picked, files.len(), dir);
        Ok(picked)
    }

    /// Read a pending work item as text
    pub fn read_pending<P: AsRef<Path>>(dir: P, filename: &str) -> Result<String, PoolError> {
        let path = dir.as_ref().join(filename);
        fs::read_to_string(&path).map_err(|e| PoolError::io(path, e))
    }

    /// Write `content` as the full contents of `dir/filename`, replacing any existing file
    pub fn write_output<P: AsRef<Path>>(dir: P, filename: &str, content: &str) -> Result<PathBuf, PoolError> {
        let dir = dir.as_ref();
        Self::ensure_dir(dir)?;

        let path = dir.join(filename);
        fs::write(&path, content).map_err(|e| PoolError::io(&path, e))?;
        Ok(path)
    }

    /// Move `input_dir/filename` into `completed_dir`
    ///
    /// Returns `Ok(false)` when the source is already gone; that case is only
    /// logged since the translation has been written by then.
    pub fn move_to_completed<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_dir: P1,
        completed_dir: P2,
        filename: &str,
    ) -> Result<bool, PoolError> {
        let source = input_dir.as_ref().join(filename);
        let completed_dir = completed_dir.as_ref();
        Self::ensure_dir(completed_dir)?;
        let destination = completed_dir.join(filename);

        if !source.exists() {
            warn!("Original input file {:?} not found for moving", source);
            return Ok(false);
        }

        debug!("Moving {:?} to {:?}", source, destination);
        if let Err(rename_error) = fs::rename(&source, &destination) {
            // Pools on different filesystems cannot be renamed across
            fs::copy(&source, &destination)
                .and_then(|_| fs::remove_file(&source))
                .map_err(|_| PoolError::io(&source, rename_error))?;
        }

        Ok(true)
    }
}
