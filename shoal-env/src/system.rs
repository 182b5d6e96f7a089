// This file is part of shoal, a POSIX-compatible command-line shell.
// Copyright (C) 2025 the shoal authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! OS access used by the expansion
//!
//! The expansion core never calls into the operating system directly.
//! Everything it needs - home-directory lookup for tilde expansion,
//! directory listing for pathname expansion, file reads for `$(<file)`,
//! file-descriptor offsets for `$(n<#)`, and terminal line input for `$<`
//! - goes through the [`System`] trait. [`VirtualSystem`] is the in-memory
//! implementation the tests run against; a real-system binding lives with
//! the surrounding shell.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::rc::Rc;

/// Result type for system calls
///
/// Errors are represented by [`ErrorKind`] so they stay comparable and
/// cloneable across the expansion's error types.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Interface to the operating system
pub trait System: std::fmt::Debug {
    /// Returns the home directory of the given user.
    fn home_dir(&self, user: &str) -> Option<String>;

    /// Returns the names of the entries of the given directory.
    ///
    /// An empty path means the current working directory. The result does
    /// not include `.` or `..`.
    fn dir_entries(&self, path: &str) -> Result<Vec<String>>;

    /// Whether a file (of any type) exists at the given path.
    ///
    /// A path with a trailing slash only exists if it is a directory.
    fn file_exists(&self, path: &str) -> bool;

    /// Whether the given path is a directory.
    fn is_directory(&self, path: &str) -> bool;

    /// Returns the whole content of the given file.
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;

    /// Returns the current byte offset of the given file descriptor.
    fn fd_offset(&self, fd: i32) -> Result<u64>;

    /// Reads one line from standard input if it is a terminal.
    ///
    /// Returns `None` when standard input is not a terminal or is at end
    /// of file.
    fn read_stdin_line(&mut self) -> Option<String>;
}

/// State of a [`VirtualSystem`]
#[derive(Clone, Debug, Default)]
pub struct SystemState {
    /// Regular files, keyed by path
    ///
    /// Directories are implied by the paths of the files they contain.
    pub files: BTreeMap<String, Vec<u8>>,
    /// Home directories, keyed by user name
    pub home_dirs: HashMap<String, String>,
    /// Current byte offsets of open file descriptors
    pub fd_offsets: HashMap<i32, u64>,
    /// Lines a terminal would deliver on standard input
    pub stdin_lines: VecDeque<String>,
}

impl SystemState {
    /// Creates a regular file with the given content.
    pub fn save_file<P: Into<String>, C: Into<Vec<u8>>>(&mut self, path: P, content: C) {
        self.files.insert(path.into(), content.into());
    }
}

/// In-memory implementation of [`System`]
///
/// The state is behind an `Rc<RefCell<_>>` so tests can keep a handle and
/// inspect or mutate it while the environment owns the system.
#[derive(Clone, Debug, Default)]
pub struct VirtualSystem {
    pub state: Rc<RefCell<SystemState>>,
}

impl VirtualSystem {
    /// Creates a virtual system with empty state.
    #[must_use]
    pub fn new() -> VirtualSystem {
        Default::default()
    }
}

/// Trims redundant trailing slashes, keeping a root `/` intact.
fn normalize_dir(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Returns the remainder of `key` under the directory `dir`, if any.
///
/// An empty `dir` stands for the current working directory, which holds
/// the relative keys.
fn child_of<'a>(key: &'a str, dir: &str) -> Option<&'a str> {
    if dir.is_empty() {
        if key.starts_with('/') { None } else { Some(key) }
    } else if let Some(rest) = key.strip_prefix(dir) {
        if dir.ends_with('/') {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    } else {
        None
    }
}

impl System for VirtualSystem {
    fn home_dir(&self, user: &str) -> Option<String> {
        self.state.borrow().home_dirs.get(user).cloned()
    }

    fn dir_entries(&self, path: &str) -> Result<Vec<String>> {
        let dir = normalize_dir(path);
        let state = self.state.borrow();
        let mut entries: Vec<String> = Vec::new();
        for key in state.files.keys() {
            let Some(rest) = child_of(key, dir) else {
                continue;
            };
            let name = match rest.find('/') {
                Some(i) => &rest[..i],
                None => rest,
            };
            if name.is_empty() {
                continue;
            }
            if entries.iter().all(|e| e != name) {
                entries.push(name.to_string());
            }
        }
        drop(state);
        if entries.is_empty() && !dir.is_empty() && !self.is_directory(dir) {
            return Err(ErrorKind::NotFound);
        }
        Ok(entries)
    }

    fn file_exists(&self, path: &str) -> bool {
        if path.ends_with('/') {
            return self.is_directory(path);
        }
        let state = self.state.borrow();
        if state.files.contains_key(path) {
            return true;
        }
        drop(state);
        self.is_directory(path)
    }

    fn is_directory(&self, path: &str) -> bool {
        let dir = normalize_dir(path);
        if dir.is_empty() || dir == "/" {
            return true;
        }
        let state = self.state.borrow();
        state
            .files
            .keys()
            .any(|key| child_of(key, dir).is_some_and(|rest| !rest.is_empty()))
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.state
            .borrow()
            .files
            .get(path)
            .cloned()
            .ok_or(ErrorKind::NotFound)
    }

    fn fd_offset(&self, fd: i32) -> Result<u64> {
        self.state
            .borrow()
            .fd_offsets
            .get(&fd)
            .copied()
            .ok_or(ErrorKind::InvalidInput)
    }

    fn read_stdin_line(&mut self) -> Option<String> {
        self.state.borrow_mut().stdin_lines.pop_front()
    }
}
