//! Pure aggregations behind the charts

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Occurrences of one distinct value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCount {
    /// The value
    pub value: String,
    /// How often it occurs
    pub count: usize,
}

/// One slice of a proportion chart
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    /// The value
    pub value: String,
    /// How often it occurs
    pub count: usize,
    /// Share of the total, 0-100
    pub percent: f64,
}

impl Share {
    /// Percentage label with one decimal, e.g. `66.7%`
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Count distinct values
///
/// Sorted by descending count; ties keep the order of first appearance.
///
/// # Examples
///
/// ```
/// use threatlens_report::value_counts;
///
/// let counts = value_counts(["Phishing", "Malware", "Phishing"]);
/// assert_eq!(counts[0].value, "Phishing");
/// assert_eq!(counts[0].count, 2);
/// ```
pub fn value_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for value in values {
        match slots.get(value).copied() {
            Some(slot) => counts[slot].count += 1,
            None => {
                slots.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Turn counts into percentage shares of their total
pub fn proportions(counts: &[ValueCount]) -> Vec<Share> {
    let total: usize = counts.iter().map(|c| c.count).sum();
    counts
        .iter()
        .map(|c| Share {
            value: c.value.clone(),
            count: c.count,
            percent: if total == 0 {
                0.0
            } else {
                c.count as f64 * 100.0 / total as f64
            },
        })
        .collect()
}

/// Records per calendar date, oldest first
pub fn counts_per_date<I>(dates: I) -> Vec<(NaiveDate, usize)>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in dates {
        *per_day.entry(date).or_insert(0) += 1;
    }
    per_day.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(["Phishing", "Phishing", "Malware"]);
        assert_eq!(
            counts,
            vec![
                ValueCount { value: "Phishing".into(), count: 2 },
                ValueCount { value: "Malware".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_value_counts_ties_keep_first_appearance() {
        let counts = value_counts(["Worm", "DDoS", "Malware", "DDoS", "Worm"]);
        let order: Vec<_> = counts.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(order, vec!["Worm", "DDoS", "Malware"]);
    }

    #[test]
    fn test_value_counts_empty() {
        assert!(value_counts(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_proportions() {
        let shares = proportions(&value_counts(["High", "High", "Low"]));
        assert_eq!(shares[0].percent_label(), "66.7%");
        assert_eq!(shares[1].percent_label(), "33.3%");
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_per_date_ascending() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let counts = counts_per_date([d(3), d(1), d(3), d(2)]);
        assert_eq!(counts, vec![(d(1), 1), (d(2), 1), (d(3), 2)]);
    }
}
