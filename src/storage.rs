use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codec::{self, CodecError};
use crate::models::Task;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Saved file has {lines} lines, cannot rewrite line {}", index + 1)]
    MissingLine { index: usize, lines: usize },
}

/// A persisted line that could not be decoded during startup replay
#[derive(Debug)]
pub struct RejectedLine {
    /// 1-based line number in the backing file
    pub line_number: usize,
    pub text: String,
    pub error: CodecError,
}

#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: Vec<Task>,
    pub rejected: Vec<RejectedLine>,
}

/// Keeps a backing text file line-for-line in step with the task list
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage for `file_name` inside `data_dir`
    pub fn in_dir(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(data_dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Create the data directory and an empty file if either is missing
    fn ensure_file(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_error(parent))?;
            }
        }
        if !self.path.exists() {
            File::create(&self.path).map_err(io_error(&self.path))?;
        }
        Ok(())
    }

    /// Where undecodable lines are moved when the file is compacted
    pub fn rejected_path(&self) -> PathBuf {
        self.sibling(".rejected")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Read every persisted task in file order.
    ///
    /// Lines that fail to decode are skipped and returned in `rejected`. They
    /// are appended to [`Storage::rejected_path`] and the file is rewritten
    /// without them, so line `i` keeps matching task `i`.
    pub fn load_all(&self) -> Result<Loaded, StorageError> {
        self.ensure_file()?;
        let file = File::open(&self.path).map_err(io_error(&self.path))?;

        let mut loaded = Loaded::default();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(io_error(&self.path))?;
            match codec::decode(&line) {
                Ok(task) => loaded.tasks.push(task),
                Err(error) => {
                    warn!(line = i + 1, %error, "skipping unreadable saved task");
                    loaded.rejected.push(RejectedLine {
                        line_number: i + 1,
                        text: line,
                        error,
                    });
                }
            }
        }

        if !loaded.rejected.is_empty() {
            self.set_aside(&loaded.rejected)?;
            self.write_all(&loaded.tasks)?;
        }

        info!(
            path = %self.path.display(),
            tasks = loaded.tasks.len(),
            skipped = loaded.rejected.len(),
            "loaded saved tasks"
        );
        Ok(loaded)
    }

    fn set_aside(&self, rejected: &[RejectedLine]) -> Result<(), StorageError> {
        let path = self.rejected_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_error(&path))?;
        for line in rejected {
            writeln!(file, "{}", line.text).map_err(io_error(&path))?;
        }
        warn!(path = %path.display(), count = rejected.len(), "moved unreadable saved tasks");
        Ok(())
    }

    /// Replace the whole file with one line per task
    pub fn write_all(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.swap_in(|writer, temp_path| {
            for task in tasks {
                writeln!(writer, "{}", codec::encode(task)).map_err(io_error(temp_path))?;
            }
            Ok(())
        })
    }

    /// Write one new line at the end of the file
    pub fn append(&self, task: &Task) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error(&self.path))?;
        writeln!(file, "{}", codec::encode(task)).map_err(io_error(&self.path))?;
        Ok(())
    }

    /// Rewrite the file with line `index` replaced by the encoding of `task`
    pub fn replace_line(&self, index: usize, task: &Task) -> Result<(), StorageError> {
        let encoded = codec::encode(task);
        self.rewrite(index, Some(&encoded))
    }

    /// Rewrite the file without line `index`
    pub fn delete_line(&self, index: usize) -> Result<(), StorageError> {
        self.rewrite(index, None)
    }

    /// Copy every line, substituting or dropping line `index`
    fn rewrite(&self, index: usize, replacement: Option<&str>) -> Result<(), StorageError> {
        debug!(path = %self.path.display(), index, "rewriting saved tasks");
        let input = File::open(&self.path).map_err(io_error(&self.path))?;

        self.swap_in(|writer, temp_path| {
            let mut lines = 0;
            for line in BufReader::new(input).lines() {
                let line = line.map_err(io_error(&self.path))?;
                if lines == index {
                    if let Some(new_line) = replacement {
                        writeln!(writer, "{new_line}").map_err(io_error(temp_path))?;
                    }
                } else {
                    writeln!(writer, "{line}").map_err(io_error(temp_path))?;
                }
                lines += 1;
            }
            if index >= lines {
                return Err(StorageError::MissingLine { index, lines });
            }
            Ok(())
        })
    }

    /// Fill a temp file with `fill`, then rename it over the original.
    /// The temp file is removed on any failure.
    fn swap_in<F>(&self, fill: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BufWriter<File>, &Path) -> Result<(), StorageError>,
    {
        let temp_path = self.temp_path();
        let result = File::create(&temp_path)
            .map_err(io_error(&temp_path))
            .and_then(|output| {
                let mut writer = BufWriter::new(output);
                fill(&mut writer, temp_path.as_path())?;
                writer.flush().map_err(io_error(&temp_path))
            })
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(io_error(&self.path)));

        if result.is_err() && temp_path.exists() {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %e, "could not remove temp file");
            }
        }
        result
    }
}
