// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a generic binary file reader/writer for raw asset data.

use bytemuck::Zeroable;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::Path;

pub use std::io::SeekFrom;

/// An error from a [`BinaryFile`] operation.
#[derive(Debug)]
pub enum FileError {
    /// The operation requires an open file.
    NotOpen,
    /// The underlying filesystem operation failed.
    Io(std::io::Error),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotOpen => {
                write!(f, "File is not open.")
            }
            FileError::Io(e) => {
                write!(f, "File operation failed: {e}")
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::NotOpen => None,
            FileError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for FileError {
    fn from(e: std::io::Error) -> Self {
        FileError::Io(e)
    }
}

/// A file handle for reading and writing plain-old-data values as raw bytes.
///
/// Values are written exactly as they are laid out in memory, so anything
/// that implements [`bytemuck::Pod`] round-trips. The file layout is the
/// caller's contract; this type adds no framing or metadata.
#[derive(Debug, Default)]
pub struct BinaryFile {
    file: Option<File>,
}

impl BinaryFile {
    /// Creates a handle with no file open.
    pub fn new() -> Self {
        Self { file: None }
    }

    /// Opens `path` for reading and writing.
    ///
    /// With `create` set, the file is created if missing and truncated if it
    /// exists. A file already open on this handle is closed first.
    pub fn open(&mut self, path: impl AsRef<Path>, create: bool) -> Result<(), FileError> {
        let mut options = OpenOptions::new();
        options.read(true).write(true);
        if create {
            options.create(true).truncate(true);
        }
        self.file = Some(options.open(path)?);
        Ok(())
    }

    /// Returns whether a file is currently open.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Writes one value at the current position.
    pub fn write<T: bytemuck::Pod>(&mut self, value: &T) -> Result<(), FileError> {
        let file = self.file_mut()?;
        file.write_all(bytemuck::bytes_of(value))?;
        Ok(())
    }

    /// Writes a slice of values at the current position, back to back.
    pub fn write_slice<T: bytemuck::Pod>(&mut self, values: &[T]) -> Result<(), FileError> {
        let file = self.file_mut()?;
        file.write_all(bytemuck::cast_slice(values))?;
        Ok(())
    }

    /// Reads one value from the current position.
    pub fn read<T: bytemuck::Pod>(&mut self) -> Result<T, FileError> {
        let file = self.file_mut()?;
        let mut value = T::zeroed();
        file.read_exact(bytemuck::bytes_of_mut(&mut value))?;
        Ok(value)
    }

    /// Reads `count` values from the current position.
    pub fn read_vec<T: bytemuck::Pod>(&mut self, count: usize) -> Result<Vec<T>, FileError> {
        let file = self.file_mut()?;
        let mut values = vec![T::zeroed(); count];
        file.read_exact(bytemuck::cast_slice_mut(&mut values))?;
        Ok(values)
    }

    /// Moves the read/write position and returns the new offset from the
    /// start of the file.
    pub fn seek(&mut self, position: SeekFrom) -> Result<u64, FileError> {
        let file = self.file_mut()?;
        Ok(file.seek(position)?)
    }

    /// Closes the file. Safe to call with no file open.
    pub fn close(&mut self) {
        self.file = None;
    }

    fn file_mut(&mut self) -> Result<&mut File, FileError> {
        self.file.as_mut().ok_or(FileError::NotOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    #[repr(C)]
    struct Record {
        id: u32,
        weight: f32,
    }

    #[test]
    fn operations_require_an_open_file() {
        let mut file = BinaryFile::new();
        assert!(!file.is_open());
        assert!(matches!(file.write(&7u32), Err(FileError::NotOpen)));
        assert!(matches!(file.read::<u32>(), Err(FileError::NotOpen)));
        assert!(matches!(
            file.seek(SeekFrom::Start(0)),
            Err(FileError::NotOpen)
        ));
    }

    #[test]
    fn write_then_read_round_trips_a_struct() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("record.bin");

        let mut file = BinaryFile::new();
        file.open(&path, true).expect("open for create");
        assert!(file.is_open());

        let record = Record { id: 42, weight: 2.5 };
        file.write(&record).expect("write record");
        file.seek(SeekFrom::Start(0)).expect("rewind");
        let read_back: Record = file.read().expect("read record");
        assert_eq!(read_back, record);
    }

    #[test]
    fn slices_round_trip_back_to_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("values.bin");

        let mut file = BinaryFile::new();
        file.open(&path, true).expect("open for create");

        let values: Vec<u32> = vec![1, 2, 3, 4];
        file.write_slice(&values).expect("write slice");
        file.seek(SeekFrom::Start(0)).expect("rewind");
        let read_back: Vec<u32> = file.read_vec(4).expect("read vec");
        assert_eq!(read_back, values);
    }

    #[test]
    fn seek_addresses_individual_values() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("seek.bin");

        let mut file = BinaryFile::new();
        file.open(&path, true).expect("open for create");
        file.write_slice(&[10u32, 20, 30, 40]).expect("write");

        let offset = file
            .seek(SeekFrom::Start(std::mem::size_of::<u32>() as u64))
            .expect("seek");
        assert_eq!(offset, 4);
        assert_eq!(file.read::<u32>().expect("read"), 20);

        file.seek(SeekFrom::End(-4)).expect("seek from end");
        assert_eq!(file.read::<u32>().expect("read"), 40);
    }

    #[test]
    fn reopen_without_create_preserves_contents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("keep.bin");

        let mut file = BinaryFile::new();
        file.open(&path, true).expect("open for create");
        file.write(&0xABBAu32).expect("write");
        file.close();
        assert!(!file.is_open());

        file.open(&path, false).expect("open existing");
        assert_eq!(file.read::<u32>().expect("read"), 0xABBA);
    }

    #[test]
    fn opening_a_missing_file_without_create_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.bin");

        let mut file = BinaryFile::new();
        let result = file.open(&path, false);
        assert!(matches!(result, Err(FileError::Io(_))));
        assert!(!file.is_open());
    }

    #[test]
    fn file_error_display_strings() {
        assert_eq!(FileError::NotOpen.to_string(), "File is not open.");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = FileError::from(io);
        assert!(error.to_string().starts_with("File operation failed:"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
