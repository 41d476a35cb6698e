//! Reference populations and the compound-vs-modeling-set comparison.
//!
//! The training and validation tables are CSV files carrying one row per
//! compound with its logD and CrippenMR. They are read once at startup; a
//! comparison places a scored compound within each population and yields a
//! serializable scatter payload for an external renderer.

use std::fs::File;
use std::path::Path;

use ::csv::ReaderBuilder;
use micella_core::{MicellaError, Result, Summarizable};
use serde::Serialize;
use tracing::debug;

use crate::config::ReferenceSection;
use crate::scoring::DescriptorPair;

pub const PLOT_TITLE: &str = "Compound vs. modeling set";
pub const X_AXIS: &str = "logD";
pub const Y_AXIS: &str = "CrippenMR";
pub const TRAINING_SERIES: &str = "Training set";
pub const VALIDATION_SERIES: &str = "Validation set";
pub const COMPOUND_SERIES: &str = "Compound";

/// A named set of reference descriptor points.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub name: String,
    pub points: Vec<DescriptorPair>,
}

impl Population {
    /// Build a population from points, rejecting an empty set.
    pub fn new(name: impl Into<String>, points: Vec<DescriptorPair>) -> Result<Self> {
        let name = name.into();
        if points.is_empty() {
            return Err(MicellaError::Configuration(format!("{name} has no rows")));
        }
        Ok(Population { name, points })
    }

    /// Read a population from a CSV table with a header row.
    pub fn from_csv(
        path: impl AsRef<Path>,
        name: &str,
        logd_column: &str,
        mr_column: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |msg: String| MicellaError::Configuration(format!("{}: {msg}", path.display()));

        let file = File::open(path).map_err(|e| config_err(e.to_string()))?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader.headers().map_err(|e| config_err(e.to_string()))?.clone();
        let column = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim() == wanted)
                .ok_or_else(|| config_err(format!("missing column '{wanted}'")))
        };
        let logd_idx = column(logd_column)?;
        let mr_idx = column(mr_column)?;

        let mut points = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| config_err(e.to_string()))?;
            let value = |idx: usize, col: &str| -> Result<f64> {
                let field = record.get(idx).unwrap_or("").trim();
                field
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| config_err(format!("row {}: '{field}' in {col} is not a number", row + 1)))
            };
            points.push(DescriptorPair {
                logd: value(logd_idx, logd_column)?,
                mr: value(mr_idx, mr_column)?,
            });
        }
        debug!(population = name, rows = points.len(), path = %path.display(), "reference table read");
        Population::new(name, points).map_err(|_| config_err("table has no rows".into()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Place `compound` within this population.
    pub fn summarize(&self, compound: &DescriptorPair) -> PopulationSummary {
        let logd: Vec<f64> = self.points.iter().map(|p| p.logd).collect();
        let mr: Vec<f64> = self.points.iter().map(|p| p.mr).collect();
        let logd = AxisSummary::new(&logd, compound.logd);
        let mr = AxisSummary::new(&mr, compound.mr);

        let (sd_logd, sd_mr) = (logd.unit(), mr.unit());
        let nearest = self
            .points
            .iter()
            .enumerate()
            .map(|(row, p)| {
                let dx = (p.logd - compound.logd) / sd_logd;
                let dy = (p.mr - compound.mr) / sd_mr;
                NearestPoint { row, logd: p.logd, mr: p.mr, distance: dx.hypot(dy) }
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        PopulationSummary {
            name: self.name.clone(),
            count: self.points.len(),
            logd,
            mr,
            nearest,
        }
    }
}

/// Distribution of one descriptor and where the compound falls in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    /// Mid-rank percentile of the compound value, 0 to 100.
    pub percentile: f64,
}

impl AxisSummary {
    fn new(values: &[f64], compound: f64) -> Self {
        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let std_dev = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        let below = values.iter().filter(|&&v| v < compound).count() as f64;
        let equal = values.iter().filter(|&&v| v == compound).count() as f64;
        AxisSummary {
            min,
            max,
            mean,
            std_dev,
            percentile: 100.0 * (below + 0.5 * equal) / n,
        }
    }

    /// Standardization unit; degenerate axes fall back to raw units.
    fn unit(&self) -> f64 {
        if self.std_dev > 0.0 {
            self.std_dev
        } else {
            1.0
        }
    }
}

/// Closest reference compound in standardized descriptor space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestPoint {
    /// Zero-based data row in the source table.
    pub row: usize,
    pub logd: f64,
    pub mr: f64,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub name: String,
    pub count: usize,
    pub logd: AxisSummary,
    pub mr: AxisSummary,
    pub nearest: Option<NearestPoint>,
}

impl Summarizable for PopulationSummary {
    fn summary(&self) -> String {
        let mut line = format!(
            "{}: {} compounds, logD {:.2}..{:.2} (compound at {:.0}th percentile), \
             CrippenMR {:.2}..{:.2} (compound at {:.0}th percentile)",
            self.name,
            self.count,
            self.logd.min,
            self.logd.max,
            self.logd.percentile,
            self.mr.min,
            self.mr.max,
            self.mr.percentile,
        );
        if let Some(n) = &self.nearest {
            line.push_str(&format!(", nearest row {} at {:.2} SD", n.row, n.distance));
        }
        line
    }
}

/// One scatter series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// `[logD, CrippenMR]` pairs.
    pub points: Vec<[f64; 2]>,
}

/// Serializable scatter comparison of a compound against the reference populations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPlot {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub series: Vec<Series>,
    pub populations: Vec<PopulationSummary>,
}

/// The populations configured for comparison, loaded once.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSet {
    populations: Vec<Population>,
}

impl ReferenceSet {
    pub fn new(populations: Vec<Population>) -> Self {
        ReferenceSet { populations }
    }

    /// Load the tables named in `section`; `None` when none are configured.
    pub fn load(section: &ReferenceSection) -> Result<Option<Self>> {
        let mut populations = Vec::new();
        for (name, path) in [
            (TRAINING_SERIES, &section.training),
            (VALIDATION_SERIES, &section.validation),
        ] {
            if let Some(path) = path {
                populations.push(Population::from_csv(
                    path,
                    name,
                    &section.logd_column,
                    &section.mr_column,
                )?);
            }
        }
        if populations.is_empty() {
            return Ok(None);
        }
        Ok(Some(ReferenceSet::new(populations)))
    }

    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    /// Compare one compound against every population.
    pub fn compare(&self, compound: &DescriptorPair) -> ComparisonPlot {
        let mut series: Vec<Series> = self
            .populations
            .iter()
            .map(|pop| Series {
                name: pop.name.clone(),
                points: pop.points.iter().map(|p| [p.logd, p.mr]).collect(),
            })
            .collect();
        series.push(Series {
            name: COMPOUND_SERIES.into(),
            points: vec![[compound.logd, compound.mr]],
        });

        ComparisonPlot {
            title: PLOT_TITLE.into(),
            x_axis: X_AXIS.into(),
            y_axis: Y_AXIS.into(),
            series,
            populations: self.populations.iter().map(|p| p.summarize(compound)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pair(logd: f64, mr: f64) -> DescriptorPair {
        DescriptorPair { logd, mr }
    }

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_named_columns() {
        let file = write_csv(&["name,rd_MR,extra,rd_logD", "a,50.0,x,1.5", "b, 80.25 ,y,-0.5"]);
        let pop = Population::from_csv(file.path(), "Training set", "rd_logD", "rd_MR").unwrap();
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.points[0], pair(1.5, 50.0));
        assert_eq!(pop.points[1], pair(-0.5, 80.25));
    }

    #[test]
    fn missing_column_is_configuration_error() {
        let file = write_csv(&["rd_logD,other", "1.0,2.0"]);
        let err = Population::from_csv(file.path(), "t", "rd_logD", "rd_MR").unwrap_err();
        assert!(matches!(err, MicellaError::Configuration(ref m) if m.contains("rd_MR")));
    }

    #[test]
    fn non_numeric_value_is_configuration_error() {
        let file = write_csv(&["rd_logD,rd_MR", "1.0,2.0", "abc,3.0"]);
        let err = Population::from_csv(file.path(), "t", "rd_logD", "rd_MR").unwrap_err();
        assert!(matches!(err, MicellaError::Configuration(ref m) if m.contains("row 2")));
    }

    #[test]
    fn empty_or_missing_table_rejected() {
        let file = write_csv(&["rd_logD,rd_MR"]);
        assert!(Population::from_csv(file.path(), "t", "rd_logD", "rd_MR").is_err());
        assert!(Population::from_csv("/nonexistent.csv", "t", "rd_logD", "rd_MR").is_err());
    }

    #[test]
    fn axis_statistics() {
        let pop = Population::new("p", vec![pair(0.0, 10.0), pair(2.0, 20.0), pair(4.0, 30.0)]).unwrap();
        let s = pop.summarize(&pair(2.0, 35.0));
        assert_eq!(s.count, 3);
        assert_eq!((s.logd.min, s.logd.max, s.logd.mean), (0.0, 4.0, 2.0));
        assert!((s.logd.percentile - 50.0).abs() < 1e-12);
        assert!((s.mr.percentile - 100.0).abs() < 1e-12);
        let nearest = s.nearest.unwrap();
        assert_eq!(nearest.row, 2);
    }

    #[test]
    fn nearest_uses_standardized_units() {
        // MR spread is much wider, so a large raw MR gap counts for less
        let pop = Population::new(
            "p",
            vec![pair(0.0, 0.0), pair(1.0, 100.0), pair(0.0, 200.0), pair(1.0, 300.0)],
        )
        .unwrap();
        let s = pop.summarize(&pair(1.0, 40.0));
        assert_eq!(s.nearest.unwrap().row, 1);
    }

    #[test]
    fn degenerate_axis_falls_back_to_raw_units() {
        let pop = Population::new("p", vec![pair(1.0, 50.0)]).unwrap();
        let s = pop.summarize(&pair(1.0, 53.0));
        assert_eq!(s.logd.std_dev, 0.0);
        assert!((s.nearest.unwrap().distance - 3.0).abs() < 1e-12);
    }

    #[test]
    fn comparison_payload_layout() {
        let set = ReferenceSet::new(vec![
            Population::new(TRAINING_SERIES, vec![pair(1.0, 80.0), pair(3.0, 120.0)]).unwrap(),
            Population::new(VALIDATION_SERIES, vec![pair(2.0, 95.0)]).unwrap(),
        ]);
        let plot = set.compare(&pair(2.5, 100.0));
        assert_eq!(plot.title, "Compound vs. modeling set");
        assert_eq!((plot.x_axis.as_str(), plot.y_axis.as_str()), ("logD", "CrippenMR"));
        let names: Vec<&str> = plot.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Training set", "Validation set", "Compound"]);
        assert_eq!(plot.series[2].points, vec![[2.5, 100.0]]);
        assert_eq!(plot.populations.len(), 2);

        let json = serde_json::to_value(&plot).unwrap();
        assert_eq!(json["series"][0]["points"][1][1], 120.0);
        assert!(plot.populations[0].summary().starts_with("Training set: 2 compounds"));
    }

    #[test]
    fn load_from_section() {
        let train = write_csv(&["rd_logD,rd_MR", "1.0,80.0"]);
        let section = ReferenceSection {
            training: Some(train.path().to_path_buf()),
            ..ReferenceSection::default()
        };
        let set = ReferenceSet::load(&section).unwrap().unwrap();
        assert_eq!(set.populations().len(), 1);
        assert_eq!(set.populations()[0].name, TRAINING_SERIES);
        assert!(ReferenceSet::load(&ReferenceSection::default()).unwrap().is_none());
    }
}
