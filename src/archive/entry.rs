//! Archive entries

use crate::{explode, DecodeStats, ExtractError, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::time::SystemTime;

/// One file stored in an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File name
    pub name: String,
    /// Name of the directory record the file belongs to
    pub directory: String,
    /// Absolute offset of the compressed data
    pub offset: u64,
    /// Length of the compressed data
    pub compressed_size: u64,
    /// Recorded decompressed length
    pub uncompressed_size: u64,
    /// DOS date of last modification
    pub dos_date: u16,
    /// DOS time of last modification
    pub dos_time: u16,
    /// DOS file attributes
    pub attributes: u32,
    /// Volume number
    pub volume: u8,
    /// File index
    pub index: u16,
}

impl Entry {
    /// Modification time as recorded, without time zone
    pub fn modified(&self) -> Option<NaiveDateTime> {
        dos_datetime(self.dos_date, self.dos_time)
    }

    /// Modification time, interpreting the DOS timestamp as local time
    pub fn modified_system_time(&self) -> Option<SystemTime> {
        let naive = self.modified()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(SystemTime::from)
    }

    /// Path to extract this entry to, relative to the output directory
    ///
    /// With `full_paths`, the directory record's components are kept. Names
    /// that could escape the output directory are refused.
    pub fn relative_path(&self, full_paths: bool) -> Result<PathBuf> {
        let name = self.name.as_str();
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0'])
        {
            return Err(ExtractError::UnsafeEntryName(self.name.clone()));
        }

        let mut path = PathBuf::new();
        if full_paths {
            for component in self.directory.split(['\\', '/']) {
                match component {
                    "" | "." => continue,
                    ".." => return Err(ExtractError::UnsafeEntryName(self.directory.clone())),
                    c if c.contains(':') => {
                        return Err(ExtractError::UnsafeEntryName(self.directory.clone()))
                    }
                    c => path.push(c),
                }
            }
        }
        path.push(name);
        Ok(path)
    }

    /// Check that this entry's compressed data lies inside the archive
    pub fn check_extent(&self, archive_len: u64) -> Result<()> {
        match self.offset.checked_add(self.compressed_size) {
            Some(end) if end <= archive_len => Ok(()),
            _ => Err(ExtractError::ExtentOutOfBounds {
                name: self.name.clone(),
                offset: self.offset,
                length: self.compressed_size,
                archive_len,
            }),
        }
    }

    /// Decompress this entry from an open archive into `sink`
    ///
    /// The decoder only sees this entry's compressed bytes.
    pub fn extract_from<R: Read + Seek, W: Write>(
        &self,
        archive: &mut R,
        sink: &mut W,
    ) -> Result<DecodeStats> {
        let archive_len = archive.seek(SeekFrom::End(0))?;
        self.check_extent(archive_len)?;
        archive.seek(SeekFrom::Start(self.offset))?;
        let stats = explode(archive.take(self.compressed_size), sink)?;

        if stats.output_bytes != self.uncompressed_size {
            log::warn!(
                "{}: decoded {} bytes, archive records {}",
                self.name,
                stats.output_bytes,
                self.uncompressed_size
            );
        }
        if stats.input_bytes < self.compressed_size {
            log::debug!(
                "{}: {} unused bytes after end of stream",
                self.name,
                self.compressed_size - stats.input_bytes
            );
        }
        Ok(stats)
    }
}

/// Convert a DOS date and time pair
pub fn dos_datetime(date: u16, time: u16) -> Option<NaiveDateTime> {
    let year = 1980 + (date >> 9) as i32;
    let month = ((date >> 5) & 0x0F) as u32;
    let day = (date & 0x1F) as u32;
    let hour = (time >> 11) as u32;
    let minute = ((time >> 5) & 0x3F) as u32;
    let second = ((time & 0x1F) * 2) as u32;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
