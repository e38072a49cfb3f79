//! Persistence and transport for match logs.
//!
//! Every sink receives the same [`LogRecord`](arena_core::LogRecord) stream:
//! - [`FileMatchLog`] appends length-prefixed bincode frames to a file
//! - [`StreamSink`] writes frames or JSON lines to any caller-supplied writer
//! - [`MemorySink`] keeps records in memory for tests and embedding
mod error;
mod file;
mod memory;
mod stream;
mod traits;

pub use error::{Result, SinkError};
pub use file::{FileMatchLog, read_log};
pub use memory::MemorySink;
pub use stream::{StreamFormat, StreamSink};
pub use traits::MatchSink;

/// Size of the length prefix in front of every bincode frame.
pub(crate) const FRAME_HEADER_LEN: u64 = 4;

pub(crate) fn encode_frame(record: &arena_core::LogRecord) -> Result<Vec<u8>> {
    let bytes = bincode::serialize(record).map_err(|e| SinkError::Serialization(e.to_string()))?;
    let len = u32::try_from(bytes.len())
        .map_err(|_| SinkError::Serialization(format!("frame of {} bytes", bytes.len())))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN as usize + bytes.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&bytes);
    Ok(frame)
}
