//! Replay of recorded bus sessions from CSV.
//!
//! Expected headers:
//! topic,payload
//!
//! Example:
//! topic,payload
//! devlol/h19/fridge/door,CLOSE
//! devlol/h19/fridge/rawsamples,10.012
use std::io::Read;
use std::path::Path;

use fridge_traits::{EventSource, InboundEvent};
use serde::Deserialize;

use crate::codec::TopicCodec;
use crate::error::TransportError;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayRow {
    pub topic: String,
    pub payload: String,
}

pub struct CsvReplaySource<R: Read> {
    rows: csv::DeserializeRecordsIntoIter<R, ReplayRow>,
    codec: TopicCodec,
    row_no: u64,
    skipped: u64,
}

impl CsvReplaySource<std::fs::File> {
    pub fn from_path(path: &Path, codec: TopicCodec) -> Result<Self, TransportError> {
        let file = std::fs::File::open(path)
            .map_err(|e| TransportError::Csv(format!("open replay CSV {path:?}: {e}")))?;
        Self::from_reader(file, codec)
    }
}

impl<R: Read> CsvReplaySource<R> {
    pub fn from_reader(reader: R, codec: TopicCodec) -> Result<Self, TransportError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        // Enforce exact headers
        let headers = rdr
            .headers()
            .map_err(|e| TransportError::Csv(format!("read CSV headers: {e}")))?
            .clone();
        let expected = ["topic", "payload"];
        let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        if actual != expected {
            return Err(TransportError::Csv(format!(
                "replay CSV must have headers 'topic,payload', got: {}",
                actual.join(",")
            )));
        }

        Ok(Self {
            rows: rdr.into_deserialize(),
            codec,
            row_no: 1,
            skipped: 0,
        })
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl<R: Read> EventSource for CsvReplaySource<R> {
    fn next_event(
        &mut self,
    ) -> Result<Option<InboundEvent>, Box<dyn std::error::Error + Send + Sync>> {
        for rec in self.rows.by_ref() {
            self.row_no += 1;
            let row = rec.map_err(|e| {
                TransportError::Csv(format!("invalid CSV row {}: {}", self.row_no, e))
            })?;
            match self.codec.decode(&row.topic, &row.payload) {
                Ok(Some(ev)) => return Ok(Some(ev)),
                Ok(None) => {}
                Err(e) => {
                    self.skipped += 1;
                    tracing::warn!(row = self.row_no, error = %e, "dropping malformed row");
                }
            }
        }
        Ok(None)
    }
}
