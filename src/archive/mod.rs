//! InstallShield 3 archives
//!
//! An archive is a fixed header, the compressed files stored back to back,
//! and a table of contents listing directories and files. Each file is an
//! independent PKWare DCL stream, so every extraction runs its own decoder
//! session over a reader bounded to that file's compressed bytes.

mod entry;
mod toc;

pub use entry::{dos_datetime, Entry};
pub use toc::{read_toc, DATA_START, SIGNATURE};

use crate::{DecodeStats, ExtractError, Result};
use std::fs::{self, File, OpenOptions};
use std::collections::HashSet;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for writing extracted files
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Recreate the directory records as subdirectories
    pub full_paths: bool,
    /// Replace existing files
    pub overwrite: bool,
    /// Apply the recorded modification time
    pub preserve_times: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            full_paths: false,
            overwrite: false,
            preserve_times: true,
        }
    }
}

impl ExtractOptions {
    /// Set whether directory records become subdirectories
    pub fn with_full_paths(mut self, full_paths: bool) -> Self {
        self.full_paths = full_paths;
        self
    }

    /// Set whether existing files are replaced
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set whether modification times are applied
    pub fn with_preserve_times(mut self, preserve_times: bool) -> Self {
        self.preserve_times = preserve_times;
        self
    }
}

/// Outcome of extracting several entries
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Paths written successfully
    pub extracted: Vec<PathBuf>,
    /// Entries that failed, with the reason
    pub failed: Vec<(String, ExtractError)>,
}

impl ExtractReport {
    /// True if no entry failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Record the outcome of one entry
    pub fn record(&mut self, name: &str, result: Result<PathBuf>) {
        match result {
            Ok(path) => self.extracted.push(path),
            Err(e) => {
                log::warn!("Failed to extract {}: {}", name, e);
                self.failed.push((name.to_string(), e));
            }
        }
    }
}

/// An opened InstallShield 3 archive
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
    archive_len: u64,
    entries: Vec<Entry>,
}

impl Archive {
    /// Open an archive and read its table of contents
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path)?;
        let (entries, archive_len) = read_toc(&mut file)?;
        log::debug!("Opened {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            archive_len,
            entries,
        })
    }

    /// Path the archive was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total archive size in bytes
    pub fn archive_len(&self) -> u64 {
        self.archive_len
    }

    /// Entries in table of contents order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the archive holds no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given name
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries whose output path repeats that of an earlier entry
    ///
    /// Without `full_paths` this happens whenever two directories hold files
    /// of the same name.
    pub fn duplicate_paths(&self, full_paths: bool) -> Vec<&Entry> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| match entry.relative_path(full_paths) {
                Ok(path) => !seen.insert(path),
                Err(_) => false,
            })
            .collect()
    }

    /// Log a warning for every entry that would land on an earlier one
    pub(crate) fn warn_duplicates(&self, options: &ExtractOptions) {
        for entry in self.duplicate_paths(options.full_paths) {
            if options.overwrite {
                log::warn!(
                    "{} in {:?} replaces an earlier entry of the same name; use full paths to keep both",
                    entry.name,
                    entry.directory
                );
            } else {
                log::warn!(
                    "{} in {:?} has the same name as an earlier entry and will be skipped; use full paths to keep both",
                    entry.name,
                    entry.directory
                );
            }
        }
    }

    /// Decompress an entry into any sink
    pub fn extract_to<W: Write>(&self, entry: &Entry, sink: &mut W) -> Result<DecodeStats> {
        let mut file = File::open(&self.path)?;
        entry.extract_from(&mut file, sink)
    }

    /// Extract the entry called `name` into `dir`
    pub fn extract_file<P: AsRef<Path>>(
        &self,
        name: &str,
        dir: P,
        options: &ExtractOptions,
    ) -> Result<PathBuf> {
        let entry = self
            .find(name)
            .ok_or_else(|| ExtractError::EntryNotFound(name.to_string()))?;
        self.extract_entry(entry, dir, options)
    }

    /// Extract one entry into `dir`, returning the written path
    ///
    /// A partially written file is removed if decoding fails.
    pub fn extract_entry<P: AsRef<Path>>(
        &self,
        entry: &Entry,
        dir: P,
        options: &ExtractOptions,
    ) -> Result<PathBuf> {
        entry.check_extent(self.archive_len)?;
        let out_path = dir.as_ref().join(entry.relative_path(options.full_paths)?);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut open = OpenOptions::new();
        open.write(true);
        if options.overwrite {
            open.create(true).truncate(true);
        } else {
            open.create_new(true);
        }
        let file = match open.open(&out_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ExtractError::OutputExists(out_path));
            }
            Err(e) => return Err(e.into()),
        };
        let mut writer = BufWriter::new(file);

        let file = match self
            .extract_to(entry, &mut writer)
            .and_then(|_| writer.into_inner().map_err(|e| ExtractError::Output(e.into_error())))
        {
            Ok(file) => file,
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&out_path) {
                    log::warn!("Could not remove {}: {}", out_path.display(), remove_err);
                }
                return Err(e);
            }
        };

        if options.preserve_times {
            if let Some(time) = entry.modified_system_time() {
                file.set_modified(time)?;
            }
        }

        log::debug!("Extracted {} -> {}", entry.name, out_path.display());
        Ok(out_path)
    }

    /// Extract every entry into `dir`
    ///
    /// Entries are independent: a failed entry is recorded in the report and
    /// the remaining entries are still extracted.
    pub fn extract_all<P: AsRef<Path>>(
        &self,
        dir: P,
        options: &ExtractOptions,
    ) -> Result<ExtractReport> {
        self.extract_with(dir, options, |_| {})
    }

    /// Like [`Archive::extract_all`], calling `progress` after each entry
    pub fn extract_with<P: AsRef<Path>, F: FnMut(&Entry)>(
        &self,
        dir: P,
        options: &ExtractOptions,
        mut progress: F,
    ) -> Result<ExtractReport> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.warn_duplicates(options);

        let mut report = ExtractReport::default();
        for entry in &self.entries {
            report.record(&entry.name, self.extract_entry(entry, dir, options));
            progress(entry);
        }
        Ok(report)
    }
}
