//! Chemistry capability used by the prediction pipeline.
//!
//! The scoring side only needs a prepared structure, its two descriptors and a
//! display string, so any toolkit able to provide those can stand in for the
//! built-in Crippen backend.

use micella_chem::{
    crippen_descriptors, disconnect_metals, normalize_protonation, parse_smiles, write_smiles,
    Molecule, ProtonationConfig,
};
use micella_core::Result;
use tracing::debug;

use crate::scoring::DescriptorPair;

/// Structure preparation and descriptor calculation.
pub trait ChemistryBackend {
    /// The backend's structure representation.
    type Structure;

    /// Parse, normalize protonation and standardize a SMILES string.
    fn prepare(&self, smiles: &str) -> Result<Self::Structure>;

    /// logD and CrippenMR of a prepared structure.
    fn descriptors(&self, structure: &Self::Structure) -> Result<DescriptorPair>;

    /// Display form of a prepared structure.
    fn to_smiles(&self, structure: &Self::Structure) -> Result<String>;
}

/// Built-in backend: protonation site table plus Wildman–Crippen typing.
///
/// logD is the Crippen logP sum over the ionized variant, so pH enters only
/// through the protonation step.
#[derive(Debug, Clone, Default)]
pub struct CrippenBackend {
    protonation: ProtonationConfig,
}

impl CrippenBackend {
    pub fn new(protonation: ProtonationConfig) -> Result<Self> {
        protonation.validate()?;
        Ok(CrippenBackend { protonation })
    }

    pub fn protonation(&self) -> &ProtonationConfig {
        &self.protonation
    }
}

impl ChemistryBackend for CrippenBackend {
    type Structure = Molecule;

    fn prepare(&self, smiles: &str) -> Result<Molecule> {
        let parsed = parse_smiles(smiles)?;
        let ionized = normalize_protonation(&parsed, &self.protonation)?;
        let standardized = disconnect_metals(&ionized);
        debug!(
            atoms = standardized.atom_count(),
            charge = standardized.net_charge(),
            "structure prepared"
        );
        Ok(standardized)
    }

    fn descriptors(&self, structure: &Molecule) -> Result<DescriptorPair> {
        let crippen = crippen_descriptors(structure)?;
        DescriptorPair::new(crippen.logp, crippen.mr)
    }

    fn to_smiles(&self, structure: &Molecule) -> Result<String> {
        write_smiles(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micella_core::MicellaError;

    #[test]
    fn prepares_ionized_structure() {
        let backend = CrippenBackend::default();
        let mol = backend.prepare("CC(=O)O").unwrap();
        assert_eq!(mol.net_charge(), -1);
        assert_eq!(backend.to_smiles(&mol).unwrap(), "CC(=O)[O-]");
    }

    #[test]
    fn ionization_lowers_logd() {
        let backend = CrippenBackend::default();
        let neutral = crippen_descriptors(&parse_smiles("CCCCC(=O)O").unwrap()).unwrap();
        let ionized = backend.descriptors(&backend.prepare("CCCCC(=O)O").unwrap()).unwrap();
        assert!(ionized.logd < neutral.logp);
    }

    #[test]
    fn metals_disconnected_before_descriptors() {
        let backend = CrippenBackend::default();
        let mol = backend.prepare("CC(=O)O[Na]").unwrap();
        assert_eq!(mol.fragments().len(), 2);
        assert!(backend.descriptors(&mol).is_ok());
    }

    #[test]
    fn errors_keep_their_kind() {
        let backend = CrippenBackend::default();
        assert!(matches!(backend.prepare("C1CC"), Err(MicellaError::InvalidStructure(_))));
        let xe = backend.prepare("[Xe]").unwrap();
        assert!(matches!(
            backend.descriptors(&xe),
            Err(MicellaError::DescriptorUnavailable(_))
        ));
    }

    #[test]
    fn invalid_protonation_config_rejected() {
        let config = ProtonationConfig { ph_min: 7.0, ph_max: 6.0, ..Default::default() };
        assert!(matches!(CrippenBackend::new(config), Err(MicellaError::Configuration(_))));
    }
}
