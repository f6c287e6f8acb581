//! JSON-lines change stream reader.
//!
//! One change per line:
//!
//! ```json
//! {"action": "modify", "entity": {"entity_type": "point", "entity_id": 7, "version": 3, "changeset_id": 500, "timestamp": "2024-03-01T12:00:00Z", "tags": {"name": "A"}, "geometry": {"type": "Point", "coordinates": {"lon": 1.0, "lat": 2.5}}}}
//! ```
//!
//! Blank lines are skipped. Errors carry the 1-based line number.

#![allow(clippy::result_large_err)]

use geodiff_core::errors::{ExError, ExErrorKind, Result};
use geodiff_core::{ChangeAction, EntitySnapshot};
use geodiff_store::errors::io_error;
use serde::Deserialize;
use std::io::BufRead;

#[derive(Debug, Deserialize)]
struct ChangeLine {
    action: String,
    entity: EntitySnapshot,
}

/// Iterator over `(action, snapshot)` pairs of a JSON-lines stream
pub struct ChangeReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ChangeReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn parse(&self, text: &str) -> Result<(ChangeAction, EntitySnapshot)> {
        let line: ChangeLine = serde_json::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("read_changes")
                .with_message(format!("line {}: {}", self.line_no, e))
        })?;

        let action = line.action.parse::<ChangeAction>().map_err(|e| {
            ExError::from(e)
                .with_op("read_changes")
                .with_entity(line.entity.entity_type, line.entity.entity_id)
        })?;
        Ok((action, line.entity))
    }
}

impl<R: BufRead> Iterator for ChangeReader<R> {
    type Item = Result<(ChangeAction, EntitySnapshot)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(io_error("read_changes", e))),
            };
            self.line_no += 1;

            if text.trim().is_empty() {
                continue;
            }
            return Some(self.parse(&text));
        }
    }
}
