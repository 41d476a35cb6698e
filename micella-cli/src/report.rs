//! Text and JSON rendering of a prediction.

use std::fmt::Display;

use micella_core::Summarizable;
use micella_model::{ComparisonPlot, ModelVariant, Prediction};
use serde::Serialize;

/// Everything printed for one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: String,
    pub structure: String,
    pub variant: ModelVariant,
    pub logd: f64,
    pub crippen_mr: f64,
    pub probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonPlot>,
}

impl Report {
    pub fn new(prediction: Prediction, comparison: Option<ComparisonPlot>) -> Self {
        Report {
            input: prediction.input,
            structure: prediction.structure,
            variant: prediction.variant,
            logd: prediction.descriptors.logd,
            crippen_mr: prediction.descriptors.mr,
            probability: prediction.score.probability,
            comparison,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "Structure: {}\nlogD: {}\nCrippenMR: {}\nTC/L interaction probability: {}\n",
            self.structure,
            two_dp(self.logd),
            two_dp(self.crippen_mr),
            two_dp(self.probability),
        );
        if let Some(plot) = &self.comparison {
            out.push('\n');
            out.push_str(&plot.title);
            out.push('\n');
            for population in &plot.populations {
                out.push_str("  ");
                out.push_str(&population.summary());
                out.push('\n');
            }
        }
        out
    }
}

/// Round to two decimals without printing `-0.00`.
fn two_dp(x: f64) -> String {
    let rounded = (x * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}")
}

/// Serialize a success value as `{"ok": val}`.
pub fn json_ok<T: Serialize>(val: &T) -> String {
    #[derive(Serialize)]
    struct Ok<'a, T: Serialize> {
        ok: &'a T,
    }
    serde_json::to_string(&Ok { ok: val }).unwrap_or_else(|e| json_err("other", e))
}

/// Serialize a failure as `{"error": {"kind": .., "message": ..}}`.
pub fn json_err(kind: &str, message: impl Display) -> String {
    #[derive(Serialize)]
    struct Detail<'a> {
        kind: &'a str,
        message: String,
    }
    #[derive(Serialize)]
    struct Err<'a> {
        error: Detail<'a>,
    }
    serde_json::to_string(&Err {
        error: Detail { kind, message: message.to_string() },
    })
    .unwrap_or_else(|_| r#"{"error":{"kind":"other","message":"serialization failed"}}"#.into())
}
