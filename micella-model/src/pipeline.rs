//! End-to-end prediction: structure in, interaction probability out.

use micella_core::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::backend::{ChemistryBackend, CrippenBackend};
use crate::coefficients::{CoefficientSet, ModelVariant};
use crate::config::MicellaConfig;
use crate::scoring::{score, DescriptorPair, Score};

/// Outcome of one successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// The SMILES string that was scored.
    pub input: String,
    /// Normalized structure as SMILES.
    pub structure: String,
    pub variant: ModelVariant,
    pub descriptors: DescriptorPair,
    pub score: Score,
}

impl Prediction {
    pub fn probability(&self) -> f64 {
        self.score.probability
    }
}

/// Scores single structures with one coefficient set.
///
/// Holds no per-call state, so one predictor serves any number of calls.
#[derive(Debug, Clone)]
pub struct Predictor<B = CrippenBackend> {
    backend: B,
    variant: ModelVariant,
    coefficients: CoefficientSet,
}

impl Predictor<CrippenBackend> {
    /// Predictor for the built-in backend configured from `config`.
    pub fn from_config(config: &MicellaConfig) -> Result<Self> {
        let backend = CrippenBackend::new(config.protonation.to_protonation_config())?;
        Predictor::new(backend, config.model.variant)
    }
}

impl<B: ChemistryBackend> Predictor<B> {
    pub fn new(backend: B, variant: ModelVariant) -> Result<Self> {
        Predictor::with_coefficients(backend, variant, *variant.coefficients())
    }

    /// Predictor with an explicit coefficient set, labelled as `variant`.
    pub fn with_coefficients(
        backend: B,
        variant: ModelVariant,
        coefficients: CoefficientSet,
    ) -> Result<Self> {
        coefficients.validate()?;
        Ok(Predictor { backend, variant, coefficients })
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Parse, normalize, standardize, describe and score one SMILES string.
    pub fn predict(&self, smiles: &str) -> Result<Prediction> {
        let structure = self.backend.prepare(smiles)?;
        let descriptors = self.backend.descriptors(&structure)?;
        debug!(logd = descriptors.logd, mr = descriptors.mr, "descriptors");

        let score = score(&descriptors, &self.coefficients)?;
        let rendered = self.backend.to_smiles(&structure)?;
        info!(
            variant = %self.variant,
            structure = %rendered,
            probability = score.probability,
            "prediction"
        );
        Ok(Prediction {
            input: smiles.to_string(),
            structure: rendered,
            variant: self.variant,
            descriptors,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::V1;
    use micella_core::MicellaError;

    /// Backend that echoes fixed descriptors, for exercising the scoring side alone.
    struct Fixed(DescriptorPair);

    impl ChemistryBackend for Fixed {
        type Structure = String;

        fn prepare(&self, smiles: &str) -> Result<String> {
            if smiles.is_empty() {
                return Err(MicellaError::InvalidStructure("empty".into()));
            }
            Ok(smiles.to_string())
        }

        fn descriptors(&self, _: &String) -> Result<DescriptorPair> {
            Ok(self.0)
        }

        fn to_smiles(&self, structure: &String) -> Result<String> {
            Ok(structure.clone())
        }
    }

    #[test]
    fn substitute_backend_scores_with_same_model() {
        let pair = DescriptorPair::new(V1.mean_logd, V1.mean_mr).unwrap();
        let p = Predictor::new(Fixed(pair), ModelVariant::V1).unwrap();
        let pred = p.predict("anything").unwrap();
        assert_eq!(pred.structure, "anything");
        assert_eq!(pred.score.linear, V1.intercept);
        assert!(p.predict("").is_err());
    }

    #[test]
    fn invalid_coefficients_rejected_up_front() {
        let pair = DescriptorPair::new(0.0, 0.0).unwrap();
        let bad = CoefficientSet { scale_logd: 0.0, ..V1 };
        assert!(matches!(
            Predictor::with_coefficients(Fixed(pair), ModelVariant::V1, bad),
            Err(MicellaError::Configuration(_))
        ));
    }

    #[test]
    fn default_config_predictor() {
        let p = Predictor::from_config(&MicellaConfig::default()).unwrap();
        assert_eq!(p.variant(), ModelVariant::V1);
        let pred = p.predict("CCO").unwrap();
        assert!(pred.probability() > 0.0 && pred.probability() < 1.0);
        assert_eq!(pred.structure, "CCO");
    }
}
