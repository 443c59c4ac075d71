//! InstallShield 3 header and table of contents records
//!
//! All fields are little-endian. The header is followed by the compressed
//! file data starting at [`DATA_START`]; the table of contents sits wherever
//! the header points, usually at the end of the archive. It holds all
//! directory records first, then the file records of each directory in turn.
//! Files are stored back to back in table of contents order, so a file's data
//! offset is the sum of the compressed sizes before it.

use super::Entry;
use crate::{ExtractError, Result};
use bytemuck::{Pod, Zeroable};
use std::io::{Read, Seek, SeekFrom};
use std::mem::size_of;

/// Archive signature at offset 0
pub const SIGNATURE: u32 = 0x8C65_5D13;

/// Offset of the first file's compressed data
pub const DATA_START: u64 = 255;

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawHeader {
    signature: u32,
    _reserved0: [u8; 37],
    toc_offset: u32,
    _reserved1: [u8; 4],
    dir_count: u16,
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawDirectory {
    file_count: u16,
    record_size: u16,
    name_len: u16,
}

#[repr(C, packed)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct RawFile {
    volume: u8,
    index: u16,
    uncompressed_size: u32,
    compressed_size: u32,
    _stored_offset: u32,
    dos_date: u16,
    dos_time: u16,
    _reserved: u32,
    record_size: u16,
    attributes: u32,
    name_len: u8,
}

/// Directory record
#[derive(Debug, Clone, PartialEq, Eq)]
struct Directory {
    name: String,
    file_count: u16,
}

/// Read the table of contents of an archive
///
/// Returns the entries in table of contents order together with the total
/// archive length. Entries whose data runs past the end of the archive are
/// still listed; see [`Entry::check_extent`].
pub fn read_toc<R: Read + Seek>(reader: &mut R) -> Result<(Vec<Entry>, u64)> {
    let archive_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let header: RawHeader = read_record(reader, "archive header")?;
    let signature = u32::from_le(header.signature);
    if signature != SIGNATURE {
        return Err(ExtractError::NotAnArchive(signature));
    }

    let toc_offset = u32::from_le(header.toc_offset) as u64;
    let dir_count = u16::from_le(header.dir_count);
    if toc_offset > archive_len {
        return Err(ExtractError::MalformedToc(format!(
            "table of contents offset {toc_offset} past end of archive ({archive_len} bytes)"
        )));
    }
    reader.seek(SeekFrom::Start(toc_offset))?;

    let mut dirs = Vec::with_capacity(dir_count as usize);
    for _ in 0..dir_count {
        dirs.push(read_directory(reader)?);
    }

    let mut entries = Vec::new();
    let mut data_offset = DATA_START;
    for dir in &dirs {
        for _ in 0..dir.file_count {
            let entry = read_file(reader, &dir.name, data_offset)?;
            // Listed anyway; extraction refuses it
            if let Err(e) = entry.check_extent(archive_len) {
                log::warn!("{}", e);
            }
            data_offset = entry.offset + entry.compressed_size;
            entries.push(entry);
        }
    }

    log::debug!(
        "Read table of contents: {} directories, {} files",
        dirs.len(),
        entries.len()
    );
    Ok((entries, archive_len))
}

fn read_directory<R: Read + Seek>(reader: &mut R) -> Result<Directory> {
    let raw: RawDirectory = read_record(reader, "directory record")?;
    let record_size = u16::from_le(raw.record_size) as usize;
    let name_len = u16::from_le(raw.name_len) as usize;

    let name = read_name(reader, name_len, "directory name")?;
    skip_padding(reader, record_size, size_of::<RawDirectory>() + name_len, "directory")?;

    Ok(Directory {
        name,
        file_count: u16::from_le(raw.file_count),
    })
}

fn read_file<R: Read + Seek>(reader: &mut R, directory: &str, offset: u64) -> Result<Entry> {
    let raw: RawFile = read_record(reader, "file record")?;
    let record_size = u16::from_le(raw.record_size) as usize;
    let name_len = raw.name_len as usize;

    let name = read_name(reader, name_len, "file name")?;
    skip_padding(reader, record_size, size_of::<RawFile>() + name_len, "file")?;

    Ok(Entry {
        name,
        directory: directory.to_string(),
        offset,
        compressed_size: u32::from_le(raw.compressed_size) as u64,
        uncompressed_size: u32::from_le(raw.uncompressed_size) as u64,
        dos_date: u16::from_le(raw.dos_date),
        dos_time: u16::from_le(raw.dos_time),
        attributes: u32::from_le(raw.attributes),
        volume: raw.volume,
        index: u16::from_le(raw.index),
    })
}

fn read_record<T: Pod, R: Read>(reader: &mut R, what: &str) -> Result<T> {
    let mut record = T::zeroed();
    reader
        .read_exact(bytemuck::bytes_of_mut(&mut record))
        .map_err(|e| truncated(e, what))?;
    Ok(record)
}

fn read_name<R: Read>(reader: &mut R, len: usize, what: &str) -> Result<String> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(|e| truncated(e, what))?;
    Ok(String::from_utf8_lossy(&buf)
        .trim_end_matches('\0')
        .to_string())
}

fn skip_padding<R: Seek>(reader: &mut R, record_size: usize, used: usize, what: &str) -> Result<()> {
    let padding = record_size.checked_sub(used).ok_or_else(|| {
        ExtractError::MalformedToc(format!(
            "{what} record size {record_size} smaller than its contents ({used} bytes)"
        ))
    })?;
    reader.seek(SeekFrom::Current(padding as i64))?;
    Ok(())
}

fn truncated(e: std::io::Error, what: &str) -> ExtractError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ExtractError::MalformedToc(format!("truncated {what}"))
    } else {
        ExtractError::Io(e)
    }
}
