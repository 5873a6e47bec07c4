use crate::error::{BagForgeError, BfResult};
use tracing::{debug, warn};

/// Dense symmetric N×N similarity matrix, stored row-major.
///
/// Read-only once built; restarts share it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

/// Number of entries in the condensed upper triangle of an `n`×`n` matrix.
#[inline]
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

impl SimilarityMatrix {
    /// Expands a condensed pairwise vector (upper triangle, row-major,
    /// diagonal excluded) into a full symmetric matrix with a zero diagonal.
    ///
    /// Surplus values past `n·(n-1)/2` are ignored.
    pub fn from_condensed(values: &[f64], n: usize) -> BfResult<Self> {
        let needed = condensed_len(n);
        if values.len() < needed {
            return Err(BagForgeError::LengthMismatch {
                needed,
                got: values.len(),
                nodes: n,
            });
        }
        if let Some(c) = values[..needed].iter().position(|v| !v.is_finite()) {
            return Err(BagForgeError::Config(format!(
                "Condensed value {} is not finite: {}",
                c, values[c]
            )));
        }
        if values.len() > needed {
            warn!(
                "Condensed vector has {} values but {} nodes only need {}; ignoring the surplus",
                values.len(),
                n,
                needed
            );
        }

        let mut data = vec![0.0; n * n];
        let mut c = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                data[i * n + j] = values[c];
                data[j * n + i] = values[c];
                c += 1;
            }
        }

        debug!("Built {}x{} similarity matrix from {} pair scores", n, n, c);
        Ok(Self { n, data })
    }

    /// Builds a matrix from explicit rows. Rows must form a square, finite,
    /// exactly symmetric table.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> BfResult<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(BagForgeError::Config(format!(
                    "Similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            data.extend(row);
        }

        let m = Self { n, data };
        m.check_entries()?;
        Ok(m)
    }

    fn check_entries(&self) -> BfResult<()> {
        let n = self.n;
        let mut nonzero_diagonal = 0;

        for i in 0..n {
            for j in 0..n {
                let v = self.get(i, j);
                if !v.is_finite() {
                    return Err(BagForgeError::Config(format!(
                        "Similarity matrix entry ({}, {}) is not finite: {}",
                        i, j, v
                    )));
                }
                if j > i && v != self.get(j, i) {
                    return Err(BagForgeError::Config(format!(
                        "Similarity matrix is not symmetric: M[{i}][{j}] = {} but M[{j}][{i}] = {}",
                        v,
                        self.get(j, i)
                    )));
                }
            }
            if self.get(i, i) != 0.0 {
                nonzero_diagonal += 1;
            }
        }

        if nonzero_diagonal > 0 {
            warn!(
                "{} diagonal entries are non-zero; relocation benefits include them",
                nonzero_diagonal
            );
        }
        Ok(())
    }

    /// Extracts the upper triangle in the order `from_condensed` consumes it.
    pub fn condensed(&self) -> Vec<f64> {
        let n = self.n;
        let mut out = Vec::with_capacity(condensed_len(n));
        for i in 0..n {
            out.extend_from_slice(&self.data[i * n + i + 1..(i + 1) * n]);
        }
        out
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.n.max(1)).take(self.n)
    }
}
