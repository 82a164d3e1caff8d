//! In-memory file table.
//!
//! A flat, bounded namespace of named byte buffers with read/write
//! permission flags. Nothing persists; this exists so processes in the
//! simulation have something to create, fill, and delete.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use bitflags::bitflags;
use hashbrown::HashMap;

use crate::error::{KernelError, KernelResult};

bitflags! {
    /// File permission flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FilePerms: u8 {
        /// Contents may be read.
        const READ = 1 << 0;
        /// Contents may be written.
        const WRITE = 1 << 1;
    }
}

/// A file: permissions plus contents.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// Permission flags.
    pub perms: FilePerms,
    /// File contents.
    pub data: Vec<u8>,
}

/// Name and size of a file, as reported by [`FileSystem::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: usize,
}

/// Bounded in-memory file table.
pub struct FileSystem {
    files: HashMap<String, FileNode>,
    capacity: usize,
}

impl FileSystem {
    /// Create an empty file table with the given capacity.
    pub fn new(capacity: usize) -> Self {
        FileSystem {
            files: HashMap::new(),
            capacity,
        }
    }

    /// Create an empty file.
    ///
    /// Fails with [`KernelError::AlreadyExists`] for a duplicate name
    /// and [`KernelError::TableFull`] at capacity.
    pub fn create(&mut self, name: &str, perms: FilePerms) -> KernelResult<()> {
        if self.files.contains_key(name) {
            return Err(KernelError::AlreadyExists);
        }
        if self.files.len() >= self.capacity {
            return Err(KernelError::TableFull);
        }
        self.files.insert(
            name.to_string(),
            FileNode {
                perms,
                data: Vec::new(),
            },
        );
        Ok(())
    }

    /// Delete a file.
    pub fn delete(&mut self, name: &str) -> KernelResult<()> {
        self.files
            .remove(name)
            .map(|_| ())
            .ok_or(KernelError::NotFound)
    }

    /// Replace a file's contents.
    ///
    /// Fails with [`KernelError::PermissionDenied`] unless the file is
    /// writable.
    pub fn write(&mut self, name: &str, data: &[u8]) -> KernelResult<()> {
        let node = self.files.get_mut(name).ok_or(KernelError::NotFound)?;
        if !node.perms.contains(FilePerms::WRITE) {
            return Err(KernelError::PermissionDenied);
        }
        node.data.clear();
        node.data.extend_from_slice(data);
        Ok(())
    }

    /// Read a file's contents.
    ///
    /// Fails with [`KernelError::PermissionDenied`] unless the file is
    /// readable.
    pub fn read(&self, name: &str) -> KernelResult<&[u8]> {
        let node = self.files.get(name).ok_or(KernelError::NotFound)?;
        if !node.perms.contains(FilePerms::READ) {
            return Err(KernelError::PermissionDenied);
        }
        Ok(&node.data)
    }

    /// Name-sorted listing of `(name, size)`.
    ///
    /// The map has no stable iteration order; sorting keeps listings
    /// deterministic.
    pub fn list(&self) -> Vec<FileEntry> {
        let mut entries: Vec<FileEntry> = self
            .files
            .iter()
            .map(|(name, node)| FileEntry {
                name: name.clone(),
                size: node.data.len(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_write_read_roundtrip() {
        let mut fs = FileSystem::new(4);
        fs.create("README.txt", FilePerms::READ | FilePerms::WRITE)
            .unwrap();
        fs.write("README.txt", b"Welcome!").unwrap();
        assert_eq!(fs.read("README.txt").unwrap(), b"Welcome!");
    }

    #[test]
    fn duplicate_and_capacity_errors() {
        let mut fs = FileSystem::new(2);
        fs.create("a", FilePerms::READ).unwrap();
        assert_eq!(
            fs.create("a", FilePerms::READ),
            Err(KernelError::AlreadyExists)
        );
        fs.create("b", FilePerms::READ).unwrap();
        assert_eq!(fs.create("c", FilePerms::READ), Err(KernelError::TableFull));
    }

    #[test]
    fn permissions_are_enforced() {
        let mut fs = FileSystem::new(4);
        fs.create("ro", FilePerms::READ).unwrap();
        fs.create("wo", FilePerms::WRITE).unwrap();

        assert_eq!(fs.write("ro", b"x"), Err(KernelError::PermissionDenied));
        assert_eq!(fs.read("wo"), Err(KernelError::PermissionDenied));
        fs.write("wo", b"x").unwrap();
    }

    #[test]
    fn list_is_name_sorted() {
        let mut fs = FileSystem::new(4);
        fs.create("config.sys", FilePerms::READ | FilePerms::WRITE)
            .unwrap();
        fs.create("boot.log", FilePerms::READ | FilePerms::WRITE)
            .unwrap();
        fs.write("boot.log", b"ok").unwrap();

        let listing = fs.list();
        assert_eq!(listing[0].name, "boot.log");
        assert_eq!(listing[0].size, 2);
        assert_eq!(listing[1].name, "config.sys");
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut fs = FileSystem::new(4);
        assert_eq!(fs.delete("ghost"), Err(KernelError::NotFound));
        fs.create("real", FilePerms::READ).unwrap();
        fs.delete("real").unwrap();
        assert!(fs.is_empty());
    }
}
