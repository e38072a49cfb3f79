use arena_core::LogRecord;

use super::Result;

/// Destination for the records of one match.
///
/// The runner writes the header first, one record per sealed round, and the
/// footer last. `flush` is called at every round boundary.
pub trait MatchSink: Send {
    fn write(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

impl<S: MatchSink + ?Sized> MatchSink for Box<S> {
    fn write(&mut self, record: &LogRecord) -> Result<()> {
        (**self).write(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
