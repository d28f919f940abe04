use std::collections::HashMap;
use std::slice;

use crate::csv_reader::Record;

const COLUMNS: &'static [&'static str] = &[
    "age",
    "workclass",
    "fnlwgt",
    "education",
    "education-num",
    "marital-status",
    "occupation",
    "relationship",
    "race",
    "sex",
    "hours-per-week",
    "native-country",
    "salary",
];

/// The cleaned census rows, in file order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn columns(&self) -> Vec<&'static str> {
        Vec::from(COLUMNS)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Record) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).count()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Count each distinct value, most frequent first.
///
/// Values with equal counts keep the order in which they were first seen.
pub fn value_counts<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut position = HashMap::<&'a str, usize>::new();
    let mut counts = Vec::<(&'a str, usize)>::new();
    for value in values {
        match position.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }
    // stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_orders_by_count() {
        let counts = value_counts(vec!["b", "a", "a", "c", "a", "c"]);
        assert_eq!(counts, vec![("a", 3), ("c", 2), ("b", 1)]);
    }

    #[test]
    fn test_value_counts_ties_keep_first_seen_order() {
        let counts = value_counts(vec!["x", "y", "z", "y", "x", "z"]);
        assert_eq!(counts, vec![("x", 2), ("y", 2), ("z", 2)]);
    }

    #[test]
    fn test_value_counts_empty() {
        let counts = value_counts(Vec::<&str>::new());
        assert!(counts.is_empty());
    }

    #[test]
    fn test_columns_match_schema() {
        let dataset = Dataset::default();
        let columns = dataset.columns();
        assert_eq!(columns.len(), 13);
        assert_eq!(columns[0], "age");
        assert_eq!(columns[12], "salary");
    }
}
