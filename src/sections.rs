use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TableError;

/// On-disk shape of `acts.json`. Lengths stay signed here so that a bad
/// value is reported by name instead of as a serde type error.
#[derive(Debug, Deserialize)]
struct SectionFile {
    acts: Vec<ActEntry>,
    #[serde(default)]
    length: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ActEntry {
    name: String,
    length: i64,
    #[serde(default)]
    sub: Option<Vec<SubActEntry>>,
}

#[derive(Debug, Deserialize)]
struct SubActEntry {
    name: String,
    length: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SubAct {
    pub(crate) name: String,
    pub(crate) length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Act {
    pub(crate) name: String,
    pub(crate) length: u64,
    pub(crate) sub: Vec<SubAct>,
}

/// Validated, immutable section table. Every length is positive and the
/// total fits an `i64` page counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SectionTable {
    acts: Vec<Act>,
    total_length: u64,
}

impl SectionTable {
    pub(crate) fn from_file(path: &Path) -> Result<Self, TableError> {
        let data = std::fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub(crate) fn from_json(data: &str) -> Result<Self, TableError> {
        let file: SectionFile = serde_json::from_str(data)?;
        Self::from_section_file(file)
    }

    /// Builds a table from acts already in memory, with the total derived
    /// from the act lengths.
    pub(crate) fn new(acts: Vec<Act>) -> Result<Self, TableError> {
        if acts.is_empty() {
            return Err(TableError::Empty);
        }
        for (index, act) in acts.iter().enumerate() {
            if act.length == 0 {
                return Err(TableError::ActLength {
                    index,
                    name: act.name.clone(),
                    length: 0,
                });
            }
            for (sub_index, sub) in act.sub.iter().enumerate() {
                if sub.length == 0 {
                    return Err(TableError::SubActLength {
                        act: act.name.clone(),
                        index: sub_index,
                        name: sub.name.clone(),
                        length: 0,
                    });
                }
            }
        }
        let total_length = summed_length(&acts)?;
        Ok(Self { acts, total_length })
    }

    fn from_section_file(file: SectionFile) -> Result<Self, TableError> {
        let mut acts = Vec::with_capacity(file.acts.len());
        for (index, entry) in file.acts.into_iter().enumerate() {
            let length = positive(entry.length).ok_or_else(|| TableError::ActLength {
                index,
                name: entry.name.clone(),
                length: entry.length,
            })?;
            let mut sub = Vec::new();
            for (sub_index, sub_entry) in entry.sub.unwrap_or_default().into_iter().enumerate() {
                let sub_length =
                    positive(sub_entry.length).ok_or_else(|| TableError::SubActLength {
                        act: entry.name.clone(),
                        index: sub_index,
                        name: sub_entry.name.clone(),
                        length: sub_entry.length,
                    })?;
                sub.push(SubAct {
                    name: sub_entry.name,
                    length: sub_length,
                });
            }
            acts.push(Act {
                name: entry.name,
                length,
                sub,
            });
        }

        let mut table = Self::new(acts)?;
        if let Some(declared) = file.length {
            table.total_length = positive(declared).ok_or(TableError::TotalLength(declared))?;
        }
        Ok(table)
    }

    pub(crate) fn acts(&self) -> &[Act] {
        &self.acts
    }

    /// Length used for overall progress: the declared `length` when the
    /// file carries one, otherwise the sum of act lengths.
    pub(crate) fn total_length(&self) -> u64 {
        self.total_length
    }

    pub(crate) fn sub_act_count(&self) -> usize {
        self.acts.iter().map(|act| act.sub.len()).sum()
    }
}

fn positive(length: i64) -> Option<u64> {
    u64::try_from(length).ok().filter(|&length| length > 0)
}

fn summed_length(acts: &[Act]) -> Result<u64, TableError> {
    let mut total: i64 = 0;
    for act in acts {
        let length = i64::try_from(act.length).map_err(|_| TableError::Overflow)?;
        total = total.checked_add(length).ok_or(TableError::Overflow)?;
        if act.sub.iter().any(|sub| i64::try_from(sub.length).is_err()) {
            return Err(TableError::Overflow);
        }
    }
    // non-zero since every act length is
    Ok(total as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "acts": [
            { "name": "Act 1", "length": 100, "sub": [
                { "name": "A", "length": 50 },
                { "name": "B", "length": 50 }
            ] },
            { "name": "Act 2", "length": 200 }
        ]
    }"#;

    #[test]
    fn loads_acts_in_order() {
        let table = SectionTable::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = table.acts().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Act 1", "Act 2"]);
        assert_eq!(table.acts()[0].sub.len(), 2);
        assert!(table.acts()[1].sub.is_empty());
        assert_eq!(table.sub_act_count(), 2);
    }

    #[test]
    fn total_is_sum_of_act_lengths() {
        let table = SectionTable::from_json(SAMPLE).unwrap();
        assert_eq!(table.total_length(), 300);
    }

    #[test]
    fn declared_length_overrides_total() {
        let table = SectionTable::from_json(
            r#"{ "acts": [ { "name": "Act 1", "length": 100 } ], "length": 120 }"#,
        )
        .unwrap();
        assert_eq!(table.total_length(), 120);
    }

    #[test]
    fn null_sub_is_empty() {
        let table = SectionTable::from_json(
            r#"{ "acts": [ { "name": "Act 1", "length": 10, "sub": null } ] }"#,
        )
        .unwrap();
        assert!(table.acts()[0].sub.is_empty());
    }

    #[test]
    fn rejects_zero_act_length() {
        let err = SectionTable::from_json(r#"{ "acts": [ { "name": "Act 1", "length": 0 } ] }"#)
            .unwrap_err();
        assert!(matches!(err, TableError::ActLength { index: 0, length: 0, .. }));
    }

    #[test]
    fn rejects_negative_sub_act_length() {
        let err = SectionTable::from_json(
            r#"{ "acts": [ { "name": "Act 1", "length": 10, "sub": [ { "name": "A", "length": -3 } ] } ] }"#,
        )
        .unwrap_err();
        match err {
            TableError::SubActLength { act, name, length, .. } => {
                assert_eq!(act, "Act 1");
                assert_eq!(name, "A");
                assert_eq!(length, -3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_positive_declared_length() {
        let err = SectionTable::from_json(
            r#"{ "acts": [ { "name": "Act 1", "length": 10 } ], "length": 0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, TableError::TotalLength(0)));
    }

    #[test]
    fn rejects_empty_table() {
        let err = SectionTable::from_json(r#"{ "acts": [] }"#).unwrap_err();
        assert!(matches!(err, TableError::Empty));
    }

    #[test]
    fn rejects_overflowing_total() {
        let acts = vec![
            Act { name: "a".into(), length: i64::MAX as u64, sub: Vec::new() },
            Act { name: "b".into(), length: 1, sub: Vec::new() },
        ];
        assert!(matches!(SectionTable::new(acts), Err(TableError::Overflow)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SectionTable::from_json("{ \"acts\": [ { \"name\": 1 } ] }"),
            Err(TableError::Json(_))
        ));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acts.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let table = SectionTable::from_file(&path).unwrap();
        assert_eq!(table.acts().len(), 2);
    }

    #[test]
    fn shipped_table_is_valid() {
        let table = SectionTable::from_json(include_str!("../data/acts.json")).unwrap();
        assert_eq!(table.total_length(), 8130);
        for act in table.acts().iter().filter(|act| !act.sub.is_empty()) {
            let sub_total: u64 = act.sub.iter().map(|sub| sub.length).sum();
            assert_eq!(sub_total, act.length, "{}", act.name);
        }
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SectionTable::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TableError::Read { .. }));
    }
}
