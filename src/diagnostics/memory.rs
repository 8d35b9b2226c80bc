// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    path::{Path, PathBuf},
};

use super::{tail_offset, FileInfo, FileSystem};

#[derive(Clone, Debug)]
enum Node {
    Dir,
    File(Vec<u8>),
    Unreadable(u64),
}

/// A file system that lists entries in the order they were added.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory {
    nodes: Vec<(PathBuf, Node)>,
}

impl Memory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.nodes.push((path.into(), Node::Dir));
        self
    }

    pub(crate) fn file<P: Into<PathBuf>>(mut self, path: P, contents: &[u8]) -> Self {
        self.nodes.push((path.into(), Node::File(contents.to_vec())));
        self
    }

    /// A regular file of `len` bytes whose contents cannot be read.
    pub(crate) fn unreadable<P: Into<PathBuf>>(mut self, path: P, len: u64) -> Self {
        self.nodes.push((path.into(), Node::Unreadable(len)));
        self
    }

    fn node(&self, path: &Path) -> io::Result<&Node> {
        self.nodes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, node)| node)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

impl FileSystem for Memory {
    fn list_dir(&self, dir: &Path) -> io::Result<Option<Vec<PathBuf>>> {
        if !matches!(self.node(dir), Ok(Node::Dir)) {
            return Ok(None);
        }
        Ok(Some(
            self.nodes
                .iter()
                .filter(|(p, _)| p.parent() == Some(dir))
                .map(|(p, _)| p.clone())
                .collect(),
        ))
    }

    fn info(&self, path: &Path) -> io::Result<FileInfo> {
        Ok(match self.node(path)? {
            Node::Dir => FileInfo {
                regular: false,
                len: 0,
            },
            Node::File(contents) => FileInfo {
                regular: true,
                len: contents.len() as u64,
            },
            Node::Unreadable(len) => FileInfo {
                regular: true,
                len: *len,
            },
        })
    }

    fn tail(&self, path: &Path, lines: usize) -> io::Result<Vec<u8>> {
        match self.node(path)? {
            Node::File(contents) => {
                let start = tail_offset(contents, lines).unwrap_or(0);
                Ok(contents[start..].to_vec())
            }
            Node::Unreadable(_) => Err(io::ErrorKind::PermissionDenied.into()),
            Node::Dir => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is a directory", path.display()),
            )),
        }
    }
}
