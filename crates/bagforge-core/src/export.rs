use crate::error::{BagForgeError, BfResult};
use crate::partition::Partition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final bag membership: bag id → ascending, duplicate-free node list.
///
/// Serializes as a JSON object keyed by the bag id as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Communities(pub BTreeMap<usize, Vec<usize>>);

impl Communities {
    pub fn num_bags(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Vec<usize>)> {
        self.0.iter()
    }

    /// Back to a `Partition`, bags ordered by id. Ids must be `0..K`.
    pub fn to_partition(&self) -> BfResult<Partition> {
        for (expected, &id) in self.0.keys().enumerate() {
            if id != expected {
                return Err(BagForgeError::Validation(format!(
                    "Bag ids must be contiguous from 0; found {} where {} was expected",
                    id, expected
                )));
            }
        }
        Ok(Partition::from_bags(self.0.values().cloned().collect()))
    }
}

/// Validates `partition` over `n` nodes and emits sorted bag membership.
pub fn export(partition: &Partition, n: usize) -> BfResult<Communities> {
    partition.check(n)?;

    let bags = partition
        .bags()
        .iter()
        .enumerate()
        .map(|(id, bag)| {
            let mut nodes = bag.clone();
            nodes.sort_unstable();
            nodes.dedup();
            (id, nodes)
        })
        .collect();
    Ok(Communities(bags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_sorts_each_bag() {
        let p = Partition::from_bags(vec![vec![3, 0], vec![2, 1], vec![]]);
        let c = export(&p, 4).unwrap();
        assert_eq!(c.0[&0], vec![0, 3]);
        assert_eq!(c.0[&1], vec![1, 2]);
        assert!(c.0[&2].is_empty());
    }

    #[test]
    fn test_export_rejects_missing_node() {
        let p = Partition::from_bags(vec![vec![0], vec![2]]);
        assert!(matches!(export(&p, 3), Err(BagForgeError::Validation(_))));
    }

    #[test]
    fn test_json_uses_string_keys() {
        let p = Partition::from_bags(vec![vec![1, 0], vec![2]]);
        let json = serde_json::to_string(&export(&p, 3).unwrap()).unwrap();
        assert_eq!(json, r#"{"0":[0,1],"1":[2]}"#);

        let back: Communities = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_partition().unwrap().bags(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_to_partition_rejects_gaps_in_ids() {
        let c: Communities = serde_json::from_str(r#"{"0":[0],"2":[1]}"#).unwrap();
        assert!(c.to_partition().is_err());
    }
}
