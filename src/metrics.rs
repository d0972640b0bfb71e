//! Metric schema: the known chartable metrics and their fixed groupings.

use crate::record::{EpochRecord, RecordTable};

/// A chartable metric column.
///
/// The set is closed: these are the only keys the charts ever read, so
/// "is this column present" is a question over this enum rather than a
/// scan of arbitrary JSON keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TrainLoss,
    TrainClassError,
    TestClassError,
    TrainLossCe,
    TrainLossBbox,
    TrainLossGiou,
    TestLossCe,
    TestLossBbox,
    TestLossGiou,
}

impl Metric {
    /// The key name as it appears in the log records (and in legends).
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::TrainLoss => "train_loss",
            Metric::TrainClassError => "train_class_error",
            Metric::TestClassError => "test_class_error",
            Metric::TrainLossCe => "train_loss_ce",
            Metric::TrainLossBbox => "train_loss_bbox",
            Metric::TrainLossGiou => "train_loss_giou",
            Metric::TestLossCe => "test_loss_ce",
            Metric::TestLossBbox => "test_loss_bbox",
            Metric::TestLossGiou => "test_loss_giou",
        }
    }

    /// This metric's value in a record, if the record carries it.
    pub fn value(self, record: &EpochRecord) -> Option<f64> {
        match self {
            Metric::TrainLoss => record.train_loss,
            Metric::TrainClassError => record.train_class_error,
            Metric::TestClassError => record.test_class_error,
            Metric::TrainLossCe => record.train_loss_ce,
            Metric::TrainLossBbox => record.train_loss_bbox,
            Metric::TrainLossGiou => record.train_loss_giou,
            Metric::TestLossCe => record.test_loss_ce,
            Metric::TestLossBbox => record.test_loss_bbox,
            Metric::TestLossGiou => record.test_loss_giou,
        }
    }
}

/// One chart's worth of candidate metrics plus its labeling.
#[derive(Debug, Clone, Copy)]
pub struct MetricGroup {
    /// Stage label; the chart title is `"<stage> Metrics"`.
    pub stage: &'static str,
    /// Appended to the input file name to form the output file name.
    pub suffix: &'static str,
    pub candidates: &'static [Metric],
}

/// The four charts a run can produce, in render order.
pub const GROUPS: [MetricGroup; 4] = [
    MetricGroup {
        stage: "Train",
        suffix: "_train_metrics.png",
        candidates: &[Metric::TrainLoss, Metric::TrainClassError],
    },
    MetricGroup {
        stage: "Test",
        suffix: "_test_metrics.png",
        candidates: &[Metric::TestClassError],
    },
    MetricGroup {
        stage: "Train (ce/bbox/giou)",
        suffix: "_train_ce_bbox_giou.png",
        candidates: &[Metric::TrainLossCe, Metric::TrainLossBbox, Metric::TrainLossGiou],
    },
    MetricGroup {
        stage: "Test (ce/bbox/giou)",
        suffix: "_test_ce_bbox_giou.png",
        candidates: &[Metric::TestLossCe, Metric::TestLossBbox, Metric::TestLossGiou],
    },
];

/// Filter `candidates` down to the metrics present in the table,
/// preserving candidate order.
pub fn present_columns(table: &RecordTable, candidates: &[Metric]) -> Vec<Metric> {
    candidates
        .iter()
        .copied()
        .filter(|m| table.has_column(*m))
        .collect()
}
