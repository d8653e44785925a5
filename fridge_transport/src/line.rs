//! Line-oriented bus adapters: one `<topic> <payload>` message per line.
//!
//! This is the shape a broker bridge (e.g. `mosquitto_sub -v`) produces, so
//! the analyzer can sit at the end of a shell pipe.

use std::io::{BufRead, Write};

use fridge_traits::{EventSink, EventSource, InboundEvent, OutboundEvent};

use crate::codec::{Message, TopicCodec, split_line};
use crate::error::TransportError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Reads bus lines and decodes them. Malformed lines are logged and skipped.
pub struct LineSource<R> {
    reader: R,
    codec: TopicCodec,
    buf: Vec<u8>,
    line_no: u64,
    skipped: u64,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, codec: TopicCodec) -> Self {
        Self {
            reader,
            codec,
            buf: Vec::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    /// Lines dropped so far (bad encoding, bad framing, bad payload).
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: BufRead> EventSource for LineSource<R> {
    fn next_event(&mut self) -> Result<Option<InboundEvent>, BoxError> {
        loop {
            self.buf.clear();
            let n = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .map_err(TransportError::Io)?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let Ok(line) = std::str::from_utf8(&self.buf) else {
                self.skipped += 1;
                tracing::warn!(line = self.line_no, "dropping line that is not valid UTF-8");
                continue;
            };
            let decoded = match split_line(line) {
                None => continue,
                Some(Ok((topic, payload))) => self.codec.decode(topic, payload),
                Some(Err(e)) => Err(e),
            };
            match decoded {
                Ok(Some(ev)) => return Ok(Some(ev)),
                Ok(None) => {
                    tracing::trace!(line = self.line_no, "topic not consumed");
                }
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!(line = self.line_no, error = %e, "dropping malformed message");
                }
            }
        }
    }
}

/// Output framing for [`LineSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// `<topic> <payload>`
    #[default]
    Plain,
    /// `{"topic":"…","payload":"…"}`
    Json,
}

/// Writes outbound messages, one per line, flushing after each.
pub struct LineSink<W> {
    writer: W,
    codec: TopicCodec,
    format: LineFormat,
    written: u64,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W, codec: TopicCodec, format: LineFormat) -> Self {
        Self {
            writer,
            codec,
            format,
            written: 0,
        }
    }

    /// Messages written so far, presence included.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_message(&mut self, msg: &Message) -> Result<(), TransportError> {
        match self.format {
            LineFormat::Plain => writeln!(self.writer, "{} {}", msg.topic, msg.payload)?,
            LineFormat::Json => {
                let line = serde_json::to_string(msg)
                    .map_err(|e| TransportError::Encode(e.to_string()))?;
                writeln!(self.writer, "{line}")?;
            }
        }
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> EventSink for LineSink<W> {
    fn emit(&mut self, event: &OutboundEvent) -> Result<(), BoxError> {
        let msg = self.codec.encode(event);
        self.write_message(&msg)?;
        Ok(())
    }

    fn presence(&mut self, online: bool) -> Result<(), BoxError> {
        let msg = self.codec.presence(online);
        self.write_message(&msg)?;
        Ok(())
    }
}
