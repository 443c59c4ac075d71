//! Async batch extraction module
//!
//! This module extracts the entries of an archive concurrently. Every entry
//! runs in its own blocking task with its own file handle and decoder
//! session; only the fixed decode tables are shared.

#[cfg(feature = "async")]
/// Concurrent entry extraction with a configurable concurrency limit
pub mod extractor {
    use crate::{Archive, ExtractError, ExtractOptions, ExtractReport, Result};
    use futures::stream::{self, StreamExt};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Concurrent archive extractor
    #[derive(Debug, Clone)]
    pub struct AsyncBatchExtractor {
        concurrency_limit: usize,
    }

    impl AsyncBatchExtractor {
        /// Create a new extractor using one task per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Current concurrency limit
        pub fn concurrency(&self) -> usize {
            self.concurrency_limit
        }

        /// Extract every entry of `archive` into `dir`
        ///
        /// Failed entries are collected in the report; they do not stop the
        /// remaining extractions.
        pub async fn extract_all<P: AsRef<Path>>(
            &self,
            archive: Arc<Archive>,
            dir: P,
            options: ExtractOptions,
        ) -> Result<ExtractReport> {
            let dir = dir.as_ref().to_path_buf();
            tokio::fs::create_dir_all(&dir).await?;
            archive.warn_duplicates(&options);

            let results: Vec<(String, Result<PathBuf>)> =
                stream::iter(0..archive.len())
                    .map(|index| {
                        let archive = Arc::clone(&archive);
                        let dir = dir.clone();
                        let options = options.clone();
                        async move { Self::extract_one(archive, index, dir, options).await }
                    })
                    .buffer_unordered(self.concurrency_limit)
                    .collect()
                    .await;

            let mut report = ExtractReport::default();
            for (name, result) in results {
                report.record(&name, result);
            }
            Ok(report)
        }

        async fn extract_one(
            archive: Arc<Archive>,
            index: usize,
            dir: PathBuf,
            options: ExtractOptions,
        ) -> (String, Result<PathBuf>) {
            let name = archive.entries()[index].name.clone();
            let task = tokio::task::spawn_blocking(move || {
                let entry = &archive.entries()[index];
                archive.extract_entry(entry, &dir, &options)
            });

            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(ExtractError::Io(std::io::Error::other(e))),
            };
            (name, result)
        }
    }

    impl Default for AsyncBatchExtractor {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(feature = "async")]
pub use extractor::AsyncBatchExtractor;
