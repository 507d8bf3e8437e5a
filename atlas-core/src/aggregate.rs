//! Per-category row counts.

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Record, COARSE_LABEL, FINE_LABEL};

/// Which label column to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelColumn {
    Coarse,
    Fine,
}

impl LabelColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            LabelColumn::Coarse => COARSE_LABEL,
            LabelColumn::Fine => FINE_LABEL,
        }
    }

    fn value<'a>(self, dataset: &Dataset, record: &'a Record) -> &'a str {
        match self {
            LabelColumn::Coarse => dataset.coarse_of(record),
            LabelColumn::Fine => dataset.fine_of(record),
        }
    }
}

/// A category and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Group `rows` by `key` and count, most frequent first.
///
/// Ties keep the order in which each category was first encountered.
pub fn count_by_category<'a, I>(dataset: &Dataset, rows: I, key: LabelColumn) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: std::collections::HashMap<&'a str, usize> = std::collections::HashMap::new();

    for record in rows {
        let category = key.value(dataset, record);
        match index.get(category) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(category, counts.len());
                counts.push(CategoryCount {
                    category: category.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort: equal counts stay in first-encounter order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Counts per coarse category over the whole dataset.
pub fn coarse_counts(dataset: &Dataset) -> Vec<CategoryCount> {
    count_by_category(dataset, dataset.records(), LabelColumn::Coarse)
}

/// Counts per fine category among rows whose coarse label equals `coarse`.
pub fn fine_counts(dataset: &Dataset, coarse: &str) -> Vec<CategoryCount> {
    let restricted = dataset
        .records()
        .iter()
        .filter(|r| dataset.coarse_of(r) == coarse);
    count_by_category(dataset, restricted, LabelColumn::Fine)
}

/// Number of rows whose coarse label equals `coarse`.
pub fn rows_in_coarse(dataset: &Dataset, coarse: &str) -> usize {
    dataset
        .records()
        .iter()
        .filter(|r| dataset.coarse_of(r) == coarse)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        Dataset::new(
            vec!["coarse_label".into(), "fine_label".into()],
            rows.iter()
                .map(|(c, f)| Record::from_iter([*c, *f]))
                .collect(),
        )
        .unwrap()
    }

    fn pairs(counts: &[CategoryCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.category.as_str(), c.count)).collect()
    }

    #[test]
    fn test_coarse_counts_sorted_descending() {
        let ds = dataset(&[
            ("Health", "General"),
            ("Tech", "AI"),
            ("Tech", "AI"),
            ("Tech", "Cloud"),
        ]);
        assert_eq!(pairs(&coarse_counts(&ds)), [("Tech", 3), ("Health", 1)]);
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let ds = dataset(&[("B", "x"), ("A", "x"), ("C", "x"), ("A", "y"), ("B", "y")]);
        assert_eq!(pairs(&coarse_counts(&ds)), [("B", 2), ("A", 2), ("C", 1)]);
    }

    #[test]
    fn test_fine_counts_restricted_to_coarse() {
        let ds = dataset(&[
            ("Tech", "AI"),
            ("Tech", "AI"),
            ("Tech", "Cloud"),
            ("Health", "AI"),
        ]);
        assert_eq!(pairs(&fine_counts(&ds, "Tech")), [("AI", 2), ("Cloud", 1)]);
        assert_eq!(pairs(&fine_counts(&ds, "Health")), [("AI", 1)]);
        assert!(fine_counts(&ds, "Retail").is_empty());
    }

    #[test]
    fn test_raw_labels_are_counted_separately() {
        let ds = dataset(&[("Unclustered", "x"), ("General", "y")]);
        let counts = coarse_counts(&ds);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_rows_in_coarse() {
        let ds = dataset(&[("Tech", "AI"), ("Tech", "Cloud"), ("Health", "AI")]);
        assert_eq!(rows_in_coarse(&ds, "Tech"), 2);
        assert_eq!(rows_in_coarse(&ds, "Retail"), 0);
    }

    #[test]
    fn test_empty_dataset_has_no_counts() {
        let ds = dataset(&[]);
        assert!(coarse_counts(&ds).is_empty());
    }
}
