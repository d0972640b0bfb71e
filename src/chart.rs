//! Chart rendering: one PNG line chart per metric group.

use crate::metrics::Metric;
use crate::record::RecordTable;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Pixel size of every chart: a 10in x 6in figure rasterized at 300 DPI.
const CHART_SIZE: (u32, u32) = (3000, 1800);

/// Render one line per metric (x = epoch, y = value) into a PNG at `path`
/// and print a confirmation naming the saved file.
///
/// The drawing surface is finalized and dropped before returning, so
/// consecutive calls never share rendering state. Callers are expected to
/// skip groups with no present columns; passing an empty `metrics` slice
/// is an error rather than an empty chart.
pub fn render_chart(
    table: &RecordTable,
    metrics: &[Metric],
    stage: &str,
    path: &Path,
) -> Result<(), ChartError> {
    if metrics.is_empty() {
        return Err(ChartError::NoColumns);
    }

    draw(table, metrics, stage, path).map_err(|source| ChartError::Render {
        path: path.to_path_buf(),
        source,
    })?;

    println!("Saved: {}", path.display());
    Ok(())
}

fn draw(
    table: &RecordTable,
    metrics: &[Metric],
    stage: &str,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let series: Vec<(Metric, Vec<(i64, f64)>)> =
        metrics.iter().map(|m| (*m, table.series(*m))).collect();
    let (x_range, y_range) = axis_ranges(&series);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{stage} Metrics"), ("sans-serif", 64))
        .margin(40)
        .x_label_area_size(110)
        .y_label_area_size(140)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Value")
        .axis_desc_style(("sans-serif", 44))
        .label_style(("sans-serif", 36))
        .bold_line_style(&BLACK.mix(0.2))
        .light_line_style(&BLACK.mix(0.1))
        .draw()?;

    for (idx, (metric, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(3),
            ))?
            .label(metric.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 40, y)], color.stroke_width(3))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 40))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Axis ranges covering every point of every series, padded so lines do
/// not sit on the plot border. Degenerate spans (a single epoch, a flat
/// series) are widened to keep the coordinate build valid.
fn axis_ranges(series: &[(Metric, Vec<(i64, f64)>)]) -> (Range<i64>, Range<f64>) {
    let mut x_min = i64::MAX;
    let mut x_max = i64::MIN;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for (_, points) in series {
        for &(epoch, value) in points {
            x_min = x_min.min(epoch);
            x_max = x_max.max(epoch);
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }

    if x_min > x_max {
        (x_min, x_max) = (0, 1);
    } else if x_min == x_max {
        x_max += 1;
    }

    let y_range = if !y_min.is_finite() || !y_max.is_finite() {
        0.0..1.0
    } else if y_min == y_max {
        (y_min - 0.5)..(y_max + 0.5)
    } else {
        let pad = (y_max - y_min) * 0.05;
        (y_min - pad)..(y_max + pad)
    };

    (x_min..x_max, y_range)
}

#[derive(Debug)]
pub enum ChartError {
    /// The caller asked for a chart with no columns to plot.
    NoColumns,
    Render {
        path: PathBuf,
        source: Box<dyn std::error::Error + 'static>,
    },
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::NoColumns => write!(f, "no columns to plot"),
            ChartError::Render { path, source } => {
                write!(f, "failed to render {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::NoColumns => None,
            ChartError::Render { source, .. } => Some(source.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(lines: &[&str]) -> RecordTable {
        let records = lines
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        RecordTable::from_records(records)
    }

    fn assert_is_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.len() > 8);
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn render_writes_png_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("train.log_train_metrics.png");
        let table = table(&[
            r#"{"epoch": 0, "train_loss": 2.5, "train_class_error": 10.0}"#,
            r#"{"epoch": 1, "train_loss": 1.8, "train_class_error": 7.5}"#,
            r#"{"epoch": 2, "train_loss": 1.2, "train_class_error": 5.0}"#,
        ]);
        render_chart(
            &table,
            &[Metric::TrainLoss, Metric::TrainClassError],
            "Train",
            &out,
        )
        .unwrap();
        assert_is_png(&out);
    }

    #[test]
    fn render_single_point_series() {
        // One eval record only: degenerate x and y spans must still render.
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("single.png");
        let table = table(&[r#"{"epoch": 2, "test_class_error": 6.0}"#]);
        render_chart(&table, &[Metric::TestClassError], "Test", &out).unwrap();
        assert_is_png(&out);
    }

    #[test]
    fn render_sparse_column_plots_existing_points() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("sparse.png");
        let table = table(&[
            r#"{"epoch": 0, "train_loss": 2.5}"#,
            r#"{"epoch": 1, "train_loss": 1.8}"#,
            r#"{"epoch": 2, "train_loss": 1.2, "test_class_error": 6.0}"#,
        ]);
        render_chart(
            &table,
            &[Metric::TrainLoss, Metric::TestClassError],
            "Train",
            &out,
        )
        .unwrap();
        assert_is_png(&out);
    }

    #[test]
    fn render_refuses_empty_columns() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("never.png");
        let table = table(&[r#"{"epoch": 0, "train_loss": 2.5}"#]);
        let err = render_chart(&table, &[], "Train", &out).unwrap_err();
        assert!(matches!(err, ChartError::NoColumns));
        assert!(!out.exists());
    }

    #[test]
    fn axis_ranges_cover_all_series() {
        let series = vec![
            (Metric::TrainLoss, vec![(0, 2.5), (5, 1.0)]),
            (Metric::TrainClassError, vec![(1, 10.0), (3, 4.0)]),
        ];
        let (x, y) = axis_ranges(&series);
        assert_eq!(x, 0..5);
        assert!(y.start < 1.0 && y.end > 10.0);
    }

    #[test]
    fn axis_ranges_widen_degenerate_spans() {
        let series = vec![(Metric::TestClassError, vec![(2, 6.0)])];
        let (x, y) = axis_ranges(&series);
        assert_eq!(x, 2..3);
        assert!(y.start < 6.0 && y.end > 6.0);
    }

    #[test]
    fn axis_ranges_flat_series_padded() {
        let series = vec![(Metric::TrainLoss, vec![(0, 1.0), (1, 1.0), (2, 1.0)])];
        let (_, y) = axis_ranges(&series);
        assert!(y.start < 1.0 && y.end > 1.0);
    }
}
