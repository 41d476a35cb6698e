//! TC/L bile-salt micelle interaction model.
//!
//! A structure is prepared by a [`ChemistryBackend`] (parse, protonation at
//! pH 6.4–6.6, metal disconnection), reduced to a logD/CrippenMR
//! [`DescriptorPair`] and scored by a logistic model with one of two fitted
//! [`CoefficientSet`]s.
//!
//! # Example
//!
//! ```
//! use micella_model::{MicellaConfig, Predictor};
//!
//! let predictor = Predictor::from_config(&MicellaConfig::default()).unwrap();
//! let prediction = predictor.predict("CC(C)NCC(COC1=CC=C(C=C1)CCOC)O").unwrap();
//! assert!(prediction.probability() > 0.0 && prediction.probability() < 1.0);
//! ```

pub mod backend;
pub mod coefficients;
pub mod config;
pub mod pipeline;
pub mod reference;
pub mod scoring;

pub use backend::{ChemistryBackend, CrippenBackend};
pub use coefficients::{CoefficientSet, ModelVariant, V1, V2};
pub use config::{MicellaConfig, ModelSection, ProtonationSection, ReferenceSection, CONFIG_ENV};
pub use pipeline::{Prediction, Predictor};
pub use reference::{ComparisonPlot, Population, PopulationSummary, ReferenceSet, Series};
pub use scoring::{score, sigmoid, DescriptorPair, Score};
