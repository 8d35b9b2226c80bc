// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Best-effort collection of server log excerpts after a failed probe.

mod local;
#[cfg(test)]
mod memory;

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::metadata;

pub(crate) use local::Local;
#[cfg(test)]
pub(crate) use memory::Memory;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FileInfo {
    pub(crate) regular: bool,
    pub(crate) len: u64,
}

pub(crate) trait FileSystem {
    /// Lists the entries of `dir` in the order the file system reports them,
    /// or `None` if `dir` is not an existing directory.
    fn list_dir(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>>;
    fn info(&self, path: &Path) -> io::Result<FileInfo>;
    /// Returns the last `lines` lines of the file at `path`.
    fn tail(&self, path: &Path, lines: usize) -> io::Result<Vec<u8>>;
}

/// Finds where the last `lines` lines of `data` begin. A trailing newline does
/// not start a line of its own. `None` means `data` holds fewer lines than
/// requested.
pub(crate) fn tail_offset(data: &[u8], lines: usize) -> Option<usize> {
    if lines == 0 {
        return Some(data.len());
    }
    let body = data.strip_suffix(b"\n").unwrap_or(data);
    body.iter()
        .enumerate()
        .rev()
        .filter(|&(_, &b)| b == b'\n')
        .nth(lines - 1)
        .map(|(i, _)| i + 1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) enabled: bool,
    pub(crate) directories: Vec<PathBuf>,
    pub(crate) tail_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            directories: metadata::DEFAULT_LOG_DIRS
                .iter()
                .map(PathBuf::from)
                .collect(),
            tail_lines: metadata::DEFAULT_TAIL_LINES,
        }
    }
}

pub(crate) struct Harvester<F> {
    config: Config,
    fs: F,
}

impl<F: FileSystem> Harvester<F> {
    pub(crate) fn new(config: Config, fs: F) -> Self {
        Self { config, fs }
    }

    /// Writes log excerpts for `failure` to `out` and hands the failure back
    /// untouched.
    pub(crate) fn observe<E, W: Write + ?Sized>(&self, failure: E, out: &mut W) -> E {
        if self.config.enabled {
            let count = self.harvest(out);
            debug!("Wrote excerpts of {} log files", count);
        }
        failure
    }

    /// Returns how many files were written out.
    pub(crate) fn harvest<W: Write + ?Sized>(&self, out: &mut W) -> usize {
        let mut count = 0;
        for dir in &self.config.directories {
            let entries = match self.fs.list_dir(dir) {
                Ok(Some(entries)) => entries,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Could not list log directory {}: {}", dir.display(), e);
                    continue;
                }
            };

            for path in entries {
                match self.fs.info(&path) {
                    Ok(FileInfo { regular: true, len }) if len > 0 => {}
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("Could not inspect {}: {}", path.display(), e);
                        continue;
                    }
                }

                match self.excerpt(&path, out) {
                    Ok(()) => count += 1,
                    Err(e) => warn!("Could not write an excerpt of {}: {}", path.display(), e),
                }
            }
        }
        count
    }

    fn excerpt<W: Write + ?Sized>(&self, path: &Path, out: &mut W) -> io::Result<()> {
        let tail = self.fs.tail(path, self.config.tail_lines)?;
        let name = path.display().to_string();
        // One dash per byte of the path, not per character.
        let rule = "-".repeat(name.len());

        writeln!(out, "{}", rule)?;
        writeln!(out, "{}", name)?;
        writeln!(out, "{}", rule)?;
        out.write_all(&tail)?;
        writeln!(out)?;
        out.flush()
    }
}
