//! Complete block design for one organism.
//!
//! Rows are blocks (unit, probe), columns are treatments (model source
//! labels), both in sorted order. Every cell must hold exactly one
//! observation.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::DMatrix;

use crate::domain::{BlockKey, GrowthRecord};
use crate::error::GrowthError;

/// Balanced (blocks x treatments) response matrix.
#[derive(Debug, Clone)]
pub struct BlockDesign {
    pub blocks: Vec<BlockKey>,
    pub treatments: Vec<String>,
    /// `n x k` cumulative growth values.
    pub values: DMatrix<f64>,
}

impl BlockDesign {
    /// Build the design from records of a single organism.
    pub fn from_records(records: &[GrowthRecord]) -> Result<Self, GrowthError> {
        let treatments: Vec<String> = records
            .iter()
            .map(|r| r.source_label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let blocks: Vec<BlockKey> = records
            .iter()
            .map(GrowthRecord::block)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let n = blocks.len();
        let k = treatments.len();
        if n < 2 || k < 2 {
            return Err(GrowthError::InsufficientData(format!(
                "need at least 2 blocks and 2 treatments, got n={n}, k={k}"
            )));
        }

        let block_idx: BTreeMap<BlockKey, usize> = blocks.iter().enumerate().map(|(i, &b)| (b, i)).collect();
        let treat_idx: BTreeMap<&str, usize> =
            treatments.iter().enumerate().map(|(j, t)| (t.as_str(), j)).collect();

        let mut cells: Vec<Option<f64>> = vec![None; n * k];
        for r in records {
            let i = block_idx[&r.block()];
            let j = treat_idx[r.source_label.as_str()];
            let cell = &mut cells[i * k + j];
            if cell.is_some() {
                return Err(GrowthError::IncompleteDesign(format!(
                    "block unit={} probe={} has more than one observation for '{}'",
                    r.unit_id, r.probe_id, r.source_label
                )));
            }
            *cell = Some(r.cumulative_growth);
        }

        let mut values = DMatrix::zeros(n, k);
        for i in 0..n {
            for j in 0..k {
                values[(i, j)] = cells[i * k + j].ok_or_else(|| {
                    GrowthError::IncompleteDesign(format!(
                        "block unit={} probe={} has no observation for '{}'",
                        blocks[i].unit_id, blocks[i].probe_id, treatments[j]
                    ))
                })?;
            }
        }

        Ok(Self {
            blocks,
            treatments,
            values,
        })
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn n_treatments(&self) -> usize {
        self.treatments.len()
    }

    /// Observations of treatment `j`, in block order.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.column(j).iter().copied().collect()
    }
}
