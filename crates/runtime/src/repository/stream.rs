//! Framed record stream over any writer.

use std::io::Write;

use arena_core::LogRecord;

use super::{MatchSink, Result, SinkError, encode_frame};

/// Wire encoding used by [`StreamSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamFormat {
    /// `[u32 LE length][bincode]` frames, identical to the file log.
    #[default]
    Bincode,
    /// One JSON object per line.
    JsonLines,
}

/// Sink over a caller-supplied writer: a pipe, a socket, stdout.
pub struct StreamSink<W: Write> {
    writer: W,
    format: StreamFormat,
    records: u64,
}

impl<W: Write> StreamSink<W> {
    pub fn new(writer: W, format: StreamFormat) -> Self {
        Self {
            writer,
            format,
            records: 0,
        }
    }

    pub fn bincode(writer: W) -> Self {
        Self::new(writer, StreamFormat::Bincode)
    }

    pub fn json_lines(writer: W) -> Self {
        Self::new(writer, StreamFormat::JsonLines)
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> MatchSink for StreamSink<W> {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        match self.format {
            StreamFormat::Bincode => {
                let frame = encode_frame(record)?;
                self.writer.write_all(&frame)?;
            }
            StreamFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, record)
                    .map_err(|e| SinkError::Json(e.to_string()))?;
                self.writer.write_all(b"\n")?;
            }
        }
        self.records += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{GridMap, MatchHeader, MatchSetup, RoundRecord};

    use super::*;

    fn records() -> Vec<LogRecord> {
        vec![
            LogRecord::Header(MatchHeader::from_setup(&MatchSetup::new(
                GridMap::open("tiny", 4, 4),
                3,
            ))),
            LogRecord::Round(RoundRecord {
                round: 1,
                signals: Vec::new(),
            }),
        ]
    }

    #[test]
    fn bincode_frames_are_length_prefixed() {
        let mut sink = StreamSink::bincode(Vec::new());
        for record in records() {
            sink.write(&record).unwrap();
        }
        assert_eq!(sink.records_written(), 2);

        let bytes = sink.into_inner();
        let len = u32::from_le_bytes(bytes[..4].try_into().unwrap()) as usize;
        let first: LogRecord = bincode::deserialize(&bytes[4..4 + len]).unwrap();
        assert_eq!(first, records()[0]);
    }

    #[test]
    fn json_lines_emit_one_object_per_record() {
        let mut sink = StreamSink::json_lines(Vec::new());
        for record in records() {
            sink.write(&record).unwrap();
        }
        sink.flush().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["Round"]["round"], 1);
    }
}
