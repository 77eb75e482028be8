// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Workchart-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Workchart and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use super::StoreError;

/// A single durable key holding the serialized diagram.
pub trait DurableSlot {
    /// Returns `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, contents: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without fsync.
    #[default]
    BestEffort,

    /// Also syncs the file and its parent directory. Exact guarantees depend on the filesystem.
    Durable,
}

#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    durability: WriteDurability,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }
}

impl DurableSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        write_atomic(&self.path, contents.as_bytes(), self.durability)
    }
}

/// In-process slot, used by demo mode and tests.
#[derive(Debug, Default)]
pub struct MemorySlot {
    contents: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        let mut guard = self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(contents.to_owned());
        Ok(())
    }
}

impl<S: DurableSlot + ?Sized> DurableSlot for &S {
    fn read(&self) -> Result<Option<String>, StoreError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        (**self).write(contents)
    }
}

impl<S: DurableSlot + ?Sized> DurableSlot for std::sync::Arc<S> {
    fn read(&self) -> Result<Option<String>, StoreError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        (**self).write(contents)
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Removes the temp file when `result` is an error, then passes the result through.
pub(super) fn discard_tmp_on_err<T>(tmp_path: &Path, result: Result<T, StoreError>) -> Result<T, StoreError> {
    if result.is_err() {
        let _ = fs::remove_file(tmp_path);
    }
    result
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err(parent))?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(io_err(path)(source)),
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".workchart.tmp.{}.{}.{nanos}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(io_err(&tmp_path))?;

    let filled = file.write_all(contents).and_then(|()| match durability {
        WriteDurability::Durable => file.sync_all(),
        WriteDurability::BestEffort => Ok(()),
    });
    drop(file);
    discard_tmp_on_err(&tmp_path, filled.map_err(io_err(&tmp_path)))?;

    discard_tmp_on_err(&tmp_path, rename_overwrite(&tmp_path, path).map_err(io_err(path)))?;

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(io_err(parent))?;
            dir.sync_all().map_err(io_err(parent))?;
        }
    }

    Ok(())
}
