//! Merge per-chunk completions into one table

use crate::parser::parse_rows;
use crate::types::ChunkFailure;
use std::fmt::Display;
use threatlens_domain::{Reconciliation, Record, Table};
use tracing::{debug, warn};

/// Header handling state
///
/// Only the first successful, non-empty response is expected to start with
/// a header line. Once that line has been consumed every later line is data,
/// even when a later response repeats the header; such a line ends up in the
/// table as a regular record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    /// No successful response with content has been seen yet
    AwaitingHeader,
    /// The header has been consumed; all lines are data
    Accumulating,
}

/// Outcome of ingesting one chunk's response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkRows {
    /// Records appended to the table
    pub records: usize,
    /// Whether this response's first line was taken as the header
    pub consumed_header: bool,
    /// Rows padded with empty fields
    pub padded: usize,
    /// Rows that lost trailing fields
    pub truncated: usize,
}

/// Accumulates records across chunk responses
#[derive(Debug, Clone)]
pub struct TableAssembler {
    state: HeaderState,
    header: Option<Vec<String>>,
    table: Table,
    failures: Vec<ChunkFailure>,
}

impl TableAssembler {
    /// Create an assembler waiting for its header
    pub fn new() -> Self {
        Self {
            state: HeaderState::AwaitingHeader,
            header: None,
            table: Table::new(),
            failures: Vec::new(),
        }
    }

    /// Current header state
    pub fn state(&self) -> HeaderState {
        self.state
    }

    /// The header line taken from the first response, if any
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Records collected so far
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Failures recorded so far
    pub fn failures(&self) -> &[ChunkFailure] {
        &self.failures
    }

    /// Ingest a successful response
    pub fn ingest(&mut self, response: &str) -> ChunkRows {
        let mut rows = parse_rows(response).into_iter();
        let mut outcome = ChunkRows::default();

        if self.state == HeaderState::AwaitingHeader {
            match rows.next() {
                Some(header) => {
                    debug!("Using header: {:?}", header);
                    self.header = Some(header);
                    self.state = HeaderState::Accumulating;
                    outcome.consumed_header = true;
                }
                None => return outcome,
            }
        }

        for fields in rows {
            let (record, reconciliation) = Record::from_fields(fields);
            match reconciliation {
                Reconciliation::Reconciled => {}
                Reconciliation::PaddedWithPlaceholders { added } => {
                    debug!("Row short by {} fields, padded with empty values", added);
                    outcome.padded += 1;
                }
                Reconciliation::Truncated { dropped } => {
                    debug!("Row has {} extra fields, dropped", dropped);
                    outcome.truncated += 1;
                }
            }
            self.table.push(record);
            outcome.records += 1;
        }

        if outcome.padded + outcome.truncated > 0 {
            warn!(
                "Malformed rows: {} padded, {} truncated to {} fields",
                outcome.padded,
                outcome.truncated,
                threatlens_domain::FIELD_COUNT
            );
        }
        outcome
    }

    /// Record a chunk whose completion call failed; the table is untouched
    pub fn skip(&mut self, index: usize, error: impl Display) {
        warn!("Error processing chunk {}: {}", index + 1, error);
        self.failures.push(ChunkFailure {
            index,
            reason: error.to_string(),
        });
    }

    /// Feed one chunk result, successful or not
    pub fn push_result<E: Display>(&mut self, index: usize, result: Result<String, E>) -> Option<ChunkRows> {
        match result {
            Ok(response) => Some(self.ingest(&response)),
            Err(e) => {
                self.skip(index, e);
                None
            }
        }
    }

    /// Finish assembling
    pub fn finish(self) -> (Table, Vec<ChunkFailure>) {
        (self.table, self.failures)
    }
}

impl Default for TableAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble one table from ordered chunk results
///
/// Failed chunks contribute nothing and are returned as failures; records
/// from the other chunks keep their chunk order.
pub fn assemble<I, E>(results: I) -> (Table, Vec<ChunkFailure>)
where
    I: IntoIterator<Item = Result<String, E>>,
    E: Display,
{
    let mut assembler = TableAssembler::new();
    for (index, result) in results.into_iter().enumerate() {
        assembler.push_result(index, result);
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Threat Type\tSeverity Level\tAffected Systems\tTimestamp\tDescription\tSuggested Mitigation Steps";

    fn ok(s: &str) -> Result<String, String> {
        Ok(s.to_string())
    }

    #[test]
    fn test_header_dropped_from_first_chunk_only() {
        let first = format!("{}\nPhishing\tHigh\tMail\t2024-01-01\td\tm", HEADER);
        let second = format!("{}\nMalware\tLow\tDB\t2024-01-02\td\tm", HEADER);

        let (table, failures) = assemble(vec![ok(&first), ok(&second)]);
        assert!(failures.is_empty());

        // The repeated header in the second chunk is ingested as data
        let threats: Vec<_> = table.iter().map(|r| r.threat_type.as_str()).collect();
        assert_eq!(threats, vec!["Phishing", "Threat Type", "Malware"]);
    }

    #[test]
    fn test_failed_chunk_is_skipped() {
        let results = vec![
            ok(&format!("{}\nA\t1\ts\tt\td\tm", HEADER)),
            Err("timeout".to_string()),
            ok("C\t3\ts\tt\td\tm"),
        ];
        let (table, failures) = assemble(results);

        let threats: Vec<_> = table.iter().map(|r| r.threat_type.as_str()).collect();
        assert_eq!(threats, vec!["A", "C"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].reason, "timeout");
    }

    #[test]
    fn test_header_comes_from_first_successful_chunk() {
        let results = vec![
            Err("boom".to_string()),
            ok(&format!("{}\nA\t1\ts\tt\td\tm", HEADER)),
        ];
        let (table, _) = assemble(results);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].threat_type, "A");
    }

    #[test]
    fn test_empty_response_keeps_awaiting_header() {
        let mut assembler = TableAssembler::new();
        let outcome = assembler.ingest("\n  \n");
        assert!(!outcome.consumed_header);
        assert_eq!(assembler.state(), HeaderState::AwaitingHeader);

        assembler.ingest(&format!("{}\nA\t1\ts\tt\td\tm", HEADER));
        assert_eq!(assembler.state(), HeaderState::Accumulating);
        assert_eq!(assembler.header().map(|h| h.len()), Some(6));
        assert_eq!(assembler.table().len(), 1);
    }

    #[test]
    fn test_short_row_padded_with_empty_strings() {
        let mut assembler = TableAssembler::new();
        let outcome = assembler.ingest(&format!("{}\nWorm\tMedium\tLaptop\t2024-03-03", HEADER));

        assert_eq!(outcome.padded, 1);
        let record = &assembler.table().records()[0];
        assert_eq!(record.timestamp, "2024-03-03");
        assert_eq!(record.description, "");
        assert_eq!(record.mitigation_steps, "");
    }

    #[test]
    fn test_long_row_truncated() {
        let mut assembler = TableAssembler::new();
        let outcome = assembler.ingest(&format!("{}\na\tb\tc\td\te\tf\tg", HEADER));
        assert_eq!(outcome.truncated, 1);
        assert_eq!(assembler.table().records()[0].mitigation_steps, "f");
    }

    #[test]
    fn test_fenced_response_header_state() {
        let mut assembler = TableAssembler::new();
        let outcome = assembler.ingest("```\n```");
        assert!(!outcome.consumed_header);
        assert_eq!(assembler.state(), HeaderState::AwaitingHeader);

        let fenced = format!("```tsv\n{}\nA\t1\ts\tt\td\tm\n```", HEADER);
        let outcome = assembler.ingest(&fenced);
        assert!(outcome.consumed_header);
        assert_eq!(assembler.header().map(|h| h[0].as_str()), Some("Threat Type"));
        assert_eq!(assembler.table().records()[0].threat_type, "A");
    }

    #[test]
    fn test_header_only_response() {
        let mut assembler = TableAssembler::new();
        let outcome = assembler.ingest(HEADER);
        assert!(outcome.consumed_header);
        assert_eq!(outcome.records, 0);
        assert!(assembler.table().is_empty());
    }
}
