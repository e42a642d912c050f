//! Record module - the fixed six-field incident schema

use std::fmt;

/// Number of fields in the incident schema
pub const FIELD_COUNT: usize = 6;

/// A field of the incident schema
///
/// The order of the variants is the column order used everywhere:
/// in completion responses, in the persisted CSV and in the normalized frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Category of the threat (e.g. "Phishing", "Malware")
    ThreatType,

    /// Severity as reported by the analyst model
    SeverityLevel,

    /// Hosts, services or assets involved
    AffectedSystems,

    /// When the incident happened, free-form text
    Timestamp,

    /// Short description of the incident
    Description,

    /// Recommended remediation
    MitigationSteps,
}

impl Field {
    /// All fields in schema order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::ThreatType,
        Field::SeverityLevel,
        Field::AffectedSystems,
        Field::Timestamp,
        Field::Description,
        Field::MitigationSteps,
    ];

    /// Column name as it appears in headers
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ThreatType => "Threat Type",
            Field::SeverityLevel => "Severity Level",
            Field::AffectedSystems => "Affected Systems",
            Field::Timestamp => "Timestamp",
            Field::Description => "Description",
            Field::MitigationSteps => "Suggested Mitigation Steps",
        }
    }

    /// Position of the field in schema order
    pub fn index(&self) -> usize {
        match self {
            Field::ThreatType => 0,
            Field::SeverityLevel => 1,
            Field::AffectedSystems => 2,
            Field::Timestamp => 3,
            Field::Description => 4,
            Field::MitigationSteps => 5,
        }
    }

    /// Parse a field from its column name (surrounding whitespace ignored)
    pub fn parse(s: &str) -> Option<Self> {
        let name = s.trim();
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Header row in schema order
    pub fn header() -> [&'static str; FIELD_COUNT] {
        Self::ALL.map(|f| f.as_str())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Which branch of shape reconciliation a row went through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The row already had the expected width
    Reconciled,

    /// The row was short; `added` placeholder values were appended
    PaddedWithPlaceholders {
        /// Number of placeholders appended
        added: usize,
    },

    /// The row was long; `dropped` trailing values were discarded
    Truncated {
        /// Number of values discarded
        dropped: usize,
    },
}

impl Reconciliation {
    /// True when the row was changed to fit the schema
    pub fn is_modified(&self) -> bool {
        !matches!(self, Reconciliation::Reconciled)
    }
}

/// Force `values` to exactly `width` entries.
///
/// Short rows are padded with `placeholder(i)` where `i` counts the
/// placeholders added so far; long rows lose their trailing values.
///
/// # Examples
///
/// ```
/// use threatlens_domain::{reconcile, Reconciliation};
///
/// let mut row = vec!["a", "b"];
/// let outcome = reconcile(&mut row, 4, |_| "");
/// assert_eq!(row, vec!["a", "b", "", ""]);
/// assert_eq!(outcome, Reconciliation::PaddedWithPlaceholders { added: 2 });
/// ```
pub fn reconcile<T>(
    values: &mut Vec<T>,
    width: usize,
    mut placeholder: impl FnMut(usize) -> T,
) -> Reconciliation {
    let len = values.len();
    if len > width {
        values.truncate(width);
        Reconciliation::Truncated { dropped: len - width }
    } else if len < width {
        let added = width - len;
        values.extend((0..added).map(&mut placeholder));
        Reconciliation::PaddedWithPlaceholders { added }
    } else {
        Reconciliation::Reconciled
    }
}

/// One extracted security incident
///
/// Every record carries all six schema fields; a field the model did not
/// provide is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Category of the threat
    pub threat_type: String,

    /// Severity level
    pub severity_level: String,

    /// Affected systems
    pub affected_systems: String,

    /// Timestamp text
    pub timestamp: String,

    /// Description of the incident
    pub description: String,

    /// Suggested mitigation steps
    pub mitigation_steps: String,
}

impl Record {
    /// Start building a record
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Build a record from positional fields in schema order.
    ///
    /// Missing trailing fields become empty strings and extra fields are
    /// dropped; the returned [`Reconciliation`] says which happened.
    pub fn from_fields<I, S>(fields: I) -> (Self, Reconciliation)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = fields.into_iter().map(Into::into).collect();
        let outcome = reconcile(&mut values, FIELD_COUNT, |_| String::new());

        let mut builder = RecordBuilder::default();
        for (field, value) in Field::ALL.into_iter().zip(values) {
            builder = builder.field(field, value);
        }
        (builder.build(), outcome)
    }

    /// Value of a field
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ThreatType => &self.threat_type,
            Field::SeverityLevel => &self.severity_level,
            Field::AffectedSystems => &self.affected_systems,
            Field::Timestamp => &self.timestamp,
            Field::Description => &self.description,
            Field::MitigationSteps => &self.mitigation_steps,
        }
    }

    /// All values in schema order
    pub fn values(&self) -> [&str; FIELD_COUNT] {
        Field::ALL.map(|f| self.get(f))
    }
}

/// Builder for [`Record`]
///
/// Fields are addressed by [`Field`], so a record can never gain an unknown
/// key. Name-based input goes through [`RecordBuilder::named`], which rejects
/// names outside the schema.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    values: [Option<String>; FIELD_COUNT],
}

impl RecordBuilder {
    /// Set a field value
    pub fn field(mut self, field: Field, value: impl Into<String>) -> Self {
        self.values[field.index()] = Some(value.into());
        self
    }

    /// Set a field by its column name
    pub fn named(self, name: &str, value: impl Into<String>) -> Result<Self, String> {
        let field = Field::parse(name)
            .ok_or_else(|| format!("'{}' is not a field of the incident schema", name))?;
        Ok(self.field(field, value))
    }

    /// Fields that were never set
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.values[f.index()].is_none())
            .collect()
    }

    /// Finish the record; unset fields become empty strings
    pub fn build(self) -> Record {
        let [threat_type, severity_level, affected_systems, timestamp, description, mitigation_steps] =
            self.values.map(Option::unwrap_or_default);

        Record {
            threat_type,
            severity_level,
            affected_systems,
            timestamp,
            description,
            mitigation_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
        assert_eq!(Field::parse("  Timestamp "), Some(Field::Timestamp));
        assert!(Field::parse("Extra_Column_0").is_none());
    }

    #[test]
    fn test_header_order() {
        assert_eq!(
            Field::header(),
            [
                "Threat Type",
                "Severity Level",
                "Affected Systems",
                "Timestamp",
                "Description",
                "Suggested Mitigation Steps",
            ]
        );
    }

    #[test]
    fn test_from_fields_exact() {
        let (record, outcome) = Record::from_fields([
            "Phishing",
            "High",
            "Mail Server",
            "2024-01-01",
            "Suspicious email",
            "Block sender",
        ]);
        assert_eq!(outcome, Reconciliation::Reconciled);
        assert_eq!(record.threat_type, "Phishing");
        assert_eq!(record.mitigation_steps, "Block sender");
    }

    #[test]
    fn test_from_fields_short_row_pads_empty() {
        let (record, outcome) = Record::from_fields(["Malware", "Low", "DB", "2024-02-02"]);
        assert_eq!(outcome, Reconciliation::PaddedWithPlaceholders { added: 2 });
        assert_eq!(record.timestamp, "2024-02-02");
        assert_eq!(record.description, "");
        assert_eq!(record.mitigation_steps, "");
    }

    #[test]
    fn test_from_fields_long_row_truncates() {
        let (record, outcome) =
            Record::from_fields(["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(outcome, Reconciliation::Truncated { dropped: 2 });
        assert_eq!(record.values(), ["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_builder_named_rejects_unknown() {
        let result = Record::builder().named("Attacker", "x");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_tracks_missing() {
        let builder = Record::builder()
            .field(Field::ThreatType, "DDoS")
            .named("Severity Level", "Critical")
            .unwrap();
        assert_eq!(builder.missing().len(), 4);

        let record = builder.build();
        assert_eq!(record.get(Field::SeverityLevel), "Critical");
        assert_eq!(record.get(Field::Description), "");
    }
}
