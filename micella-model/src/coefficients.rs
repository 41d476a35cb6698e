//! Fitted coefficient sets of the logistic TC/L interaction model.

use std::fmt;
use std::str::FromStr;

use micella_core::{MicellaError, Result};
use serde::{Deserialize, Serialize};

/// Constants of one fitted logistic model.
///
/// Each descriptor is standardized with `(x - mean) / scale`, weighted, and the
/// weighted terms are added to `intercept` before the sigmoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoefficientSet {
    pub mean_logd: f64,
    pub scale_logd: f64,
    pub w_logd: f64,
    pub mean_mr: f64,
    pub scale_mr: f64,
    pub w_mr: f64,
    pub intercept: f64,
}

/// First training run.
pub const V1: CoefficientSet = CoefficientSet {
    mean_logd: 2.009365,
    scale_logd: 1.878026,
    w_logd: 1.1626256,
    mean_mr: 90.80861,
    scale_mr: 35.30108,
    w_mr: 1.9764294,
    intercept: 0.7999132,
};

/// Second training run.
pub const V2: CoefficientSet = CoefficientSet {
    mean_logd: 1.510648,
    scale_logd: 1.708574,
    w_logd: 1.706694,
    mean_mr: 90.62889,
    scale_mr: 35.36033,
    w_mr: 2.4925333,
    intercept: 0.9872289,
};

impl CoefficientSet {
    /// Reject sets that would make the standardization undefined.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("mean_logd", self.mean_logd),
            ("scale_logd", self.scale_logd),
            ("w_logd", self.w_logd),
            ("mean_mr", self.mean_mr),
            ("scale_mr", self.scale_mr),
            ("w_mr", self.w_mr),
            ("intercept", self.intercept),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MicellaError::Configuration(format!(
                "coefficient {name} is not finite ({value})"
            )));
        }
        for (name, scale) in [("scale_logd", self.scale_logd), ("scale_mr", self.scale_mr)] {
            if scale == 0.0 {
                return Err(MicellaError::Configuration(format!("coefficient {name} is zero")));
            }
        }
        Ok(())
    }
}

/// Which coefficient set to score with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    #[default]
    V1,
    V2,
}

impl ModelVariant {
    pub fn coefficients(self) -> &'static CoefficientSet {
        match self {
            ModelVariant::V1 => &V1,
            ModelVariant::V2 => &V2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::V1 => "v1",
            ModelVariant::V2 => "v2",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = MicellaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ModelVariant::V1),
            "v2" | "2" => Ok(ModelVariant::V2),
            other => Err(MicellaError::Configuration(format!(
                "unknown model variant '{other}' (expected v1 or v2)"
            ))),
        }
    }
}
