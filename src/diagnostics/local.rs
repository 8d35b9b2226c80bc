// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs,
    io::{self, Read as _, Seek as _, SeekFrom},
    path::{Path, PathBuf},
};

use super::{tail_offset, FileInfo, FileSystem};

const CHUNK_SIZE: u64 = 8192;

/// The real file system.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Local;

impl FileSystem for Local {
    fn list_dir(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>> {
        if !dir.is_dir() {
            return Ok(None);
        }
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map(Some)
    }

    fn info(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        Ok(FileInfo {
            regular: metadata.is_file(),
            len: metadata.len(),
        })
    }

    fn tail(&self, path: &Path, lines: usize) -> io::Result<Vec<u8>> {
        let mut file = fs::File::open(path)?;
        let mut pos = file.seek(SeekFrom::End(0))?;
        let mut suffix = Vec::new();

        // Read backwards until the suffix holds enough lines or the whole file.
        while pos > 0 {
            let step = CHUNK_SIZE.min(pos);
            pos -= step;
            let _ = file.seek(SeekFrom::Start(pos))?;

            let mut chunk = vec![0_u8; usize::try_from(step).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, e)
            })?];
            file.read_exact(&mut chunk)?;
            chunk.append(&mut suffix);
            suffix = chunk;

            if let Some(start) = tail_offset(&suffix, lines) {
                return Ok(suffix.split_off(start));
            }
        }
        Ok(suffix)
    }
}
