//! End-to-end checks from SMILES text to probability and comparison payload.

use std::fs;

use micella_core::{ErrorKind, MicellaError};
use micella_model::{MicellaConfig, ModelVariant, Predictor, ReferenceSet};
use tempfile::TempDir;

const METOPROLOL: &str = "CC(C)NCC(COC1=CC=C(C=C1)CCOC)O";

fn predictor(variant: ModelVariant) -> Predictor {
    let mut config = MicellaConfig::default();
    config.model.variant = variant;
    Predictor::from_config(&config).unwrap()
}

#[test]
fn default_compound_scores_with_both_variants() {
    let v1 = predictor(ModelVariant::V1).predict(METOPROLOL).unwrap();
    let v2 = predictor(ModelVariant::V2).predict(METOPROLOL).unwrap();

    assert!(v1.structure.contains("[NH2+]"), "{}", v1.structure);
    assert_eq!(v1.structure, v2.structure);
    assert_eq!(v1.descriptors, v2.descriptors);
    assert!(v1.descriptors.mr > 60.0 && v1.descriptors.mr < 90.0);
    assert_ne!(v1.probability(), v2.probability());
    for p in [v1.probability(), v2.probability()] {
        assert!(p > 0.0 && p < 1.0);
    }
}

#[test]
fn predictions_are_deterministic() {
    let p = predictor(ModelVariant::V2);
    let a = p.predict(METOPROLOL).unwrap();
    let b = p.predict(METOPROLOL).unwrap();
    assert_eq!(a.probability().to_bits(), b.probability().to_bits());
    assert_eq!(a, b);
}

#[test]
fn charged_and_neutral_input_converge() {
    let p = predictor(ModelVariant::V1);
    let neutral = p.predict("CCCCC(=O)O").unwrap();
    let charged = p.predict("CCCCC(=O)[O-]").unwrap();
    assert_eq!(neutral.structure, charged.structure);
    assert_eq!(neutral.probability(), charged.probability());
}

#[test]
fn salts_are_scored_after_disconnection() {
    let p = predictor(ModelVariant::V1);
    let salt = p.predict("CC(=O)O[Na]").unwrap();
    assert!(salt.structure.contains('.'));
    assert!(salt.probability() > 0.0 && salt.probability() < 1.0);
}

#[test]
fn malformed_input_never_scores() {
    let p = predictor(ModelVariant::V1);
    for bad in ["", "   ", "C1CC", "C(C", "CC)", "X", "C==C", "[C", "C(C)(C)(C)(C)C"] {
        let err = p.predict(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStructure, "{bad:?}: {err}");
    }
}

#[test]
fn untyped_atoms_are_reported_distinctly() {
    let err = predictor(ModelVariant::V1).predict("[Xe]").unwrap_err();
    assert!(matches!(err, MicellaError::DescriptorUnavailable(_)));
    assert!(err.is_per_request());
}

#[test]
fn config_file_drives_variant_and_references() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("train.csv"), "id,rd_logD,rd_MR\n1,0.5,60.0\n2,2.5,95.0\n3,4.0,140.0\n").unwrap();
    fs::write(dir.path().join("valid.csv"), "id,rd_logD,rd_MR\n1,1.0,70.0\n2,3.0,110.0\n").unwrap();
    let config_path = dir.path().join("micella.toml");
    fs::write(
        &config_path,
        "[model]\nvariant = \"v2\"\n\n[reference]\ntraining = \"train.csv\"\nvalidation = \"valid.csv\"\n",
    )
    .unwrap();

    let config = MicellaConfig::resolve(Some(&config_path)).unwrap();
    let predictor = Predictor::from_config(&config).unwrap();
    assert_eq!(predictor.variant(), ModelVariant::V2);

    let references = ReferenceSet::load(&config.reference).unwrap().unwrap();
    let prediction = predictor.predict(METOPROLOL).unwrap();
    let plot = references.compare(&prediction.descriptors);

    assert_eq!(plot.series.len(), 3);
    assert_eq!(plot.series[0].points.len(), 3);
    assert_eq!(plot.series[1].points.len(), 2);
    assert_eq!(plot.series[2].points, vec![[prediction.descriptors.logd, prediction.descriptors.mr]]);
    assert_eq!(plot.populations[0].count, 3);
    assert!(plot.populations.iter().all(|p| p.nearest.is_some()));
}

#[test]
fn broken_reference_table_fails_at_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("train.csv"), "rd_logD,rd_MR\n1.0,not-a-number\n").unwrap();
    let config_path = dir.path().join("micella.toml");
    fs::write(&config_path, "[reference]\ntraining = \"train.csv\"\n").unwrap();

    let config = MicellaConfig::from_file(&config_path).unwrap();
    let err = ReferenceSet::load(&config.reference).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
