//! Typed epoch records and the sorted record table.

use crate::metrics::Metric;
use serde::Deserialize;

/// One training/evaluation snapshot decoded from a log line.
///
/// `epoch` is required; every metric field is optional because real logs
/// carry different subsets per run (train-only epochs, eval-only epochs).
/// Keys the charts never use are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpochRecord {
    pub epoch: i64,
    pub train_loss: Option<f64>,
    pub train_class_error: Option<f64>,
    pub test_class_error: Option<f64>,
    pub train_loss_ce: Option<f64>,
    pub train_loss_bbox: Option<f64>,
    pub train_loss_giou: Option<f64>,
    pub test_loss_ce: Option<f64>,
    pub test_loss_bbox: Option<f64>,
    pub test_loss_giou: Option<f64>,
}

/// Records ordered by `epoch` ascending.
///
/// Construction sorts once; ties keep their scan order (stable sort).
/// An empty table is valid and every accessor degrades to "nothing".
#[derive(Debug, Default)]
pub struct RecordTable {
    rows: Vec<EpochRecord>,
}

impl RecordTable {
    /// Build a table from scanned records, sorting by epoch ascending.
    pub fn from_records(mut rows: Vec<EpochRecord>) -> Self {
        rows.sort_by_key(|r| r.epoch);
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> &[EpochRecord] {
        &self.rows
    }

    /// Whether at least one record carries a value for `metric`.
    pub fn has_column(&self, metric: Metric) -> bool {
        self.rows.iter().any(|r| metric.value(r).is_some())
    }

    /// The `(epoch, value)` pairs for `metric`, in table order.
    ///
    /// Rows without a value for the metric are left out, so a sparse
    /// column yields a shorter series rather than gaps.
    pub fn series(&self, metric: Metric) -> Vec<(i64, f64)> {
        self.rows
            .iter()
            .filter_map(|r| metric.value(r).map(|v| (r.epoch, v)))
            .collect()
    }
}
