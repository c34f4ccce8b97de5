use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of an index combination table: a paired i5/i7 barcode and where
/// each barcode sits on its index plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCombo {
    #[serde(rename = "index combo")]
    pub index_combo: u32,
    #[serde(rename = "i5 name")]
    pub i5_name: String,
    #[serde(rename = "i5 sequence")]
    pub i5_sequence: String,
    #[serde(rename = "i5 well")]
    pub i5_well: String,
    #[serde(rename = "i5 plate")]
    pub i5_plate: String,
    #[serde(rename = "i7 name")]
    pub i7_name: String,
    #[serde(rename = "i7 sequence")]
    pub i7_sequence: String,
    #[serde(rename = "i7 well")]
    pub i7_well: String,
    #[serde(rename = "i7 plate")]
    pub i7_plate: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "Not enough index combinations: {requested} requested from position {start}, but the table has {available}"
)]
pub struct IndexExhausted {
    pub requested: usize,
    pub start: usize,
    pub available: usize,
}

/// Takes `samples` consecutive combinations starting at `start`.
pub fn assign_index(
    samples: usize,
    combos: &[IndexCombo],
    start: usize,
) -> Result<&[IndexCombo], IndexExhausted> {
    start
        .checked_add(samples)
        .and_then(|end| combos.get(start..end))
        .ok_or(IndexExhausted {
            requested: samples,
            start,
            available: combos.len(),
        })
}

#[cfg(test)]
pub(crate) fn sample_combos(n: u32) -> Vec<IndexCombo> {
    (0..n)
        .map(|i| IndexCombo {
            index_combo: i,
            i5_name: format!("iTru5_{i:02}"),
            i5_sequence: "ACGTACGT".to_string(),
            i5_well: format!("A{}", i + 1),
            i5_plate: "iTru5_plate".to_string(),
            i7_name: format!("iTru7_{i:02}"),
            i7_sequence: "TTGGCCAA".to_string(),
            i7_well: format!("B{}", i + 1),
            i7_plate: "iTru7_plate".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_index_returns_consecutive_combos() {
        let combos = sample_combos(10);
        let picked = assign_index(3, &combos, 4).unwrap();
        let ids: Vec<u32> = picked.iter().map(|c| c.index_combo).collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }

    #[test]
    fn assign_index_can_take_the_whole_table() {
        let combos = sample_combos(4);
        assert_eq!(assign_index(4, &combos, 0).unwrap().len(), 4);
        assert!(assign_index(0, &combos, 4).unwrap().is_empty());
    }

    #[test]
    fn assign_index_fails_when_the_table_runs_out() {
        let combos = sample_combos(4);
        let err = assign_index(3, &combos, 2).unwrap_err();
        assert_eq!(
            err,
            IndexExhausted {
                requested: 3,
                start: 2,
                available: 4
            }
        );
    }
}
