use crate::error::{BagForgeError, BfResult};

/// Assignment of node indices to `K` bags.
///
/// Bag order inside a bag is the order moves left it in: relocated nodes are
/// appended to the target bag, and an exchange appends each node to the
/// other bag after removing it from its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    bags: Vec<Vec<usize>>,
}

impl Partition {
    pub fn from_bags(bags: Vec<Vec<usize>>) -> Self {
        Self { bags }
    }

    /// Splits `order` into `k` contiguous groups of `order.len() / k` nodes,
    /// the last group taking the remainder.
    pub fn split_contiguous(order: &[usize], k: usize) -> Self {
        let n = order.len();
        let interval = if k == 0 { 0 } else { n / k };
        let bags = (0..k)
            .map(|b| {
                let start = interval * b;
                let end = if b + 1 == k { n } else { interval * (b + 1) };
                order[start..end].to_vec()
            })
            .collect();
        Self { bags }
    }

    #[inline]
    pub fn bag(&self, b: usize) -> &[usize] {
        &self.bags[b]
    }

    pub fn bags(&self) -> &[Vec<usize>] {
        &self.bags
    }

    #[inline]
    pub fn num_bags(&self) -> usize {
        self.bags.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.bags.iter().map(Vec::len).sum()
    }

    pub fn into_bags(self) -> Vec<Vec<usize>> {
        self.bags
    }

    /// Moves the node at position `pos` of bag `from` to the end of bag `to`.
    pub fn relocate(&mut self, from: usize, to: usize, pos: usize) -> usize {
        let node = self.bags[from].remove(pos);
        self.bags[to].push(node);
        node
    }

    /// Swaps the node at `pos_i` of bag `i` with the node at `pos_j` of bag `j`.
    pub fn exchange(&mut self, i: usize, j: usize, pos_i: usize, pos_j: usize) -> (usize, usize) {
        let a = self.bags[i].remove(pos_i);
        let b = self.bags[j].remove(pos_j);
        self.bags[j].push(a);
        self.bags[i].push(b);
        (a, b)
    }

    /// Checks that every node in `0..n` appears exactly once.
    pub fn check(&self, n: usize) -> BfResult<()> {
        let mut seen = vec![None; n];
        for (b, bag) in self.bags.iter().enumerate() {
            for &node in bag {
                if node >= n {
                    return Err(BagForgeError::Validation(format!(
                        "Node {} in bag {} is out of range for {} nodes",
                        node, b, n
                    )));
                }
                if let Some(first) = seen[node] {
                    return Err(BagForgeError::Validation(format!(
                        "Node {} appears in bag {} and again in bag {}",
                        node, first, b
                    )));
                }
                seen[node] = Some(b);
            }
        }

        let missing: Vec<usize> = seen
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect();
        if !missing.is_empty() {
            return Err(BagForgeError::Validation(format!(
                "Nodes missing from every bag: {:?}",
                missing
            )));
        }
        Ok(())
    }
}
