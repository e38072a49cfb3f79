//! Append-only match log file.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use arena_core::{LogRecord, MatchLog};

use super::{FRAME_HEADER_LEN, MatchSink, Result, SinkError, encode_frame};

const WRITE_BUFFER: usize = 8 * 1024 * 1024;

/// File-backed match log.
///
/// Records are stored back to back as:
/// ```text
/// [u32 LE length][bincode LogRecord]
/// [u32 LE length][bincode LogRecord]
/// ...
/// ```
pub struct FileMatchLog {
    path: PathBuf,
    writer: BufWriter<File>,
    current_offset: u64,
}

impl FileMatchLog {
    /// Creates a new log file.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::LogAlreadyExists`] if the file is already there.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(SinkError::LogAlreadyExists(path.display().to_string()));
        }

        let file = OpenOptions::new().create_new(true).write(true).open(path)?;

        tracing::debug!("Created match log: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(WRITE_BUFFER, file),
            current_offset: 0,
        })
    }

    /// Opens an existing log for appending.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().append(true).open(path)?;
        let current_offset = file.metadata()?.len();

        tracing::debug!(
            "Opened match log: {} at offset {}",
            path.display(),
            current_offset
        );

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(WRITE_BUFFER, file),
            current_offset,
        })
    }

    /// Appends a record and returns the byte offset it was written at.
    pub fn append(&mut self, record: &LogRecord) -> Result<u64> {
        let offset = self.current_offset;
        let frame = encode_frame(record)?;
        self.writer.write_all(&frame)?;
        self.current_offset += frame.len() as u64;
        Ok(offset)
    }

    /// Reads the record at `byte_offset`.
    ///
    /// Returns `None` past the end of the file, otherwise the record and the
    /// offset of the next one. Unflushed writes are not visible.
    pub fn read_at_offset(&self, byte_offset: u64) -> Result<Option<(LogRecord, u64)>> {
        read_frame(&self.path, byte_offset)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Bytes written so far, including buffered ones.
    pub fn size(&self) -> u64 {
        self.current_offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchSink for FileMatchLog {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.append(record).map(|_| ())
    }

    fn flush(&mut self) -> Result<()> {
        FileMatchLog::flush(self)
    }
}

impl Drop for FileMatchLog {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!(
                "Failed to flush match log {} on drop: {}",
                self.path.display(),
                e
            );
        }
    }
}

fn read_frame(path: &Path, byte_offset: u64) -> Result<Option<(LogRecord, u64)>> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    if byte_offset >= file_size {
        return Ok(None);
    }

    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::Start(byte_offset))?;

    let available = file_size - byte_offset;
    if available < FRAME_HEADER_LEN {
        return Err(SinkError::TruncatedFrame {
            offset: byte_offset,
            expected: FRAME_HEADER_LEN as usize,
            actual: available as usize,
        });
    }

    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let body = available - FRAME_HEADER_LEN;
    if body < len as u64 {
        return Err(SinkError::TruncatedFrame {
            offset: byte_offset,
            expected: len,
            actual: body as usize,
        });
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;
    let record =
        bincode::deserialize(&data).map_err(|e| SinkError::Serialization(e.to_string()))?;

    Ok(Some((record, byte_offset + FRAME_HEADER_LEN + len as u64)))
}

/// Reads a whole match log from disk.
///
/// A log without a footer is returned as-is; the match simply had not
/// finished when the file was last flushed.
pub fn read_log(path: impl AsRef<Path>) -> Result<MatchLog> {
    let path = path.as_ref();
    let mut records = Vec::new();
    let mut offset = 0;
    while let Some((record, next)) = read_frame(path, offset)? {
        records.push(record);
        offset = next;
    }
    MatchLog::from_records(records).ok_or(SinkError::MissingHeader)
}
