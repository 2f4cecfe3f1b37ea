// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//
use std::fs::File;
use std::fs::{self};
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use std::path::PathBuf;
use std::thread;

use async_trait::async_trait;
use chrono::Local;
use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::sync::oneshot;

use crate::domain::config::PriorityHints;
use crate::domain::models::ArchiveError;
use crate::domain::models::ArchiveOutcome;
use crate::domain::models::ArchiveSummary;
use crate::domain::paths::archive_file_name;
use crate::domain::paths::entry_name;
use crate::domain::paths::partial_path;
use crate::domain::traits::Archiver;
use crate::domain::traits::PriorityControl;

/// Writes `.tar.gz` archives on a dedicated worker thread running at lowered priority.
#[derive(Clone)]
pub struct TarGzArchiver<P> {
    priority: P,
}

impl<P> TarGzArchiver<P> {
    pub fn new(priority: P) -> Self {
        TarGzArchiver { priority }
    }
}

#[async_trait]
impl<P> Archiver for TarGzArchiver<P>
where
    P: PriorityControl + Clone + Send + Sync + 'static,
{
    async fn archive(
        &self,
        files: Vec<PathBuf>,
        destination_dir: &Path,
        dry_run: bool,
        hints: PriorityHints,
    ) -> ArchiveOutcome {
        if files.is_empty() {
            return ArchiveOutcome::Empty;
        }

        let archive_path = destination_dir.join(archive_file_name(&Local::now()));
        if dry_run {
            return ArchiveOutcome::DryRun { archive_path, file_count: files.len() };
        }

        if let Err(source) = fs::create_dir_all(destination_dir) {
            return ArchiveOutcome::Failed {
                archive_path,
                before_bytes: 0,
                error: ArchiveError::CreateDir { path: destination_dir.to_path_buf(), source },
            };
        }

        let (files, before_bytes) = measure_inputs(files);
        if files.is_empty() {
            return ArchiveOutcome::Empty;
        }

        let (tx, rx) = oneshot::channel();
        let priority = self.priority.clone();
        let job_files = files.clone();
        let job_path = archive_path.clone();
        let spawned = thread::Builder::new().name("log-archiver".to_string()).spawn(move || {
            if let Err(err) = priority.apply_low_priority(&hints) {
                tracing::warn!(error = %err, "Could not lower archiver priority, compressing anyway");
            }
            let written = write_archive(&job_files, &job_path)
                .map(|after_bytes| (after_bytes, remove_sources(&job_files)));
            let _ = tx.send(written);
        });
        if let Err(err) = spawned {
            return ArchiveOutcome::Failed {
                archive_path,
                before_bytes,
                error: ArchiveError::Worker(err.to_string()),
            };
        }

        match rx.await {
            Ok(Ok((after_bytes, not_removed))) => {
                tracing::debug!(
                    archive = %archive_path.display(),
                    files = files.len(),
                    before_bytes,
                    after_bytes,
                    "Archive finalized"
                );
                ArchiveOutcome::Created(ArchiveSummary {
                    archive_path,
                    files,
                    before_bytes,
                    after_bytes,
                    not_removed,
                })
            }
            Ok(Err(source)) => ArchiveOutcome::Failed {
                error: ArchiveError::Compress { path: archive_path.clone(), source },
                archive_path,
                before_bytes,
            },
            Err(_) => ArchiveOutcome::Failed {
                archive_path,
                before_bytes,
                error: ArchiveError::Worker("archiver thread exited without a result".to_string()),
            },
        }
    }
}

// Sums input sizes, dropping files that disappeared since selection.
fn measure_inputs(files: Vec<PathBuf>) -> (Vec<PathBuf>, u64) {
    let mut present = Vec::with_capacity(files.len());
    let mut total = 0;
    for path in files {
        match fs::metadata(&path) {
            Ok(meta) => {
                total += meta.len();
                present.push(path);
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "Skipping file that is gone");
            }
        }
    }
    (present, total)
}

// Writes the archive next to its final place and renames it in.
// Returns the size of the finalized archive.
fn write_archive(files: &[PathBuf], archive_path: &Path) -> io::Result<u64> {
    let tmp_path = partial_path(archive_path);

    // force clean up any leftover temp file
    let _ = fs::remove_file(&tmp_path);

    let result = write_tar_gz(files, &tmp_path).and_then(|()| {
        if archive_path.exists() {
            fs::remove_file(archive_path)?;
        }
        fs::rename(&tmp_path, archive_path)?;
        Ok(fs::metadata(archive_path)?.len())
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_tar_gz(files: &[PathBuf], tmp_path: &Path) -> io::Result<()> {
    let tmp_file = File::create(tmp_path)?;
    let encoder = GzEncoder::new(tmp_file, Compression::default());

    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    for path in files {
        append_file(&mut builder, path)?;
    }

    let out_file = builder.into_inner()?.finish()?;
    out_file.sync_all()
}

// The header size comes from the opened handle, and the body must match it
// exactly. A file that changed size in between fails the whole archive.
fn append_file<W: Write>(builder: &mut tar::Builder<W>, path: &Path) -> io::Result<()> {
    let file = File::open(path)?;
    let meta = file.metadata()?;
    if !meta.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }
    let mut header = tar::Header::new_gnu();
    header.set_metadata(&meta);
    builder.append_data(&mut header, entry_name(path), ExactReader::new(file, meta.len()))
}

/// Yields exactly `len` bytes of `inner`, failing if it ends early or has more.
struct ExactReader<R> {
    inner: R,
    remaining: u64,
}

impl<R> ExactReader<R> {
    fn new(inner: R, len: u64) -> Self {
        ExactReader { inner, remaining: len }
    }
}

impl<R: Read> Read for ExactReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            let mut extra = [0u8; 1];
            return match self.inner.read(&mut extra)? {
                0 => Ok(0),
                _ => Err(io::Error::new(io::ErrorKind::InvalidData, "file grew while archiving")),
            };
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.inner.read(&mut buf[..max])?;
        if n == 0 && max > 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while archiving, {} bytes missing", self.remaining),
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}

// Returns sources that could not be removed.
fn remove_sources(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut not_removed = Vec::new();
    for path in files {
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!(file = %path.display(), error = %err, "Archived file was not removed");
            not_removed.push(path.clone());
        }
    }
    not_removed
}
