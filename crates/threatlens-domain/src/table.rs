//! Table module - the ordered collection of extracted records

use crate::record::Record;

/// Ordered records accumulated across chunks
///
/// The table only grows: records are appended in chunk order and never
/// removed, so a failed chunk leaves everything extracted so far intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were extracted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Consume the table
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl Extend<Record> for Table {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    fn record(threat: &str) -> Record {
        Record::builder().field(Field::ThreatType, threat).build()
    }

    #[test]
    fn test_table_preserves_order() {
        let mut table = Table::new();
        table.push(record("Phishing"));
        table.extend(vec![record("Malware"), record("DDoS")]);

        let threats: Vec<_> = table.iter().map(|r| r.threat_type.as_str()).collect();
        assert_eq!(threats, vec!["Phishing", "Malware", "DDoS"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_empty_table() {
        let table: Table = Vec::new().into_iter().collect();
        assert!(table.is_empty());
    }
}
