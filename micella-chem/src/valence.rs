//! Valence model: implicit hydrogens, explicit-hydrogen folding, valence checks.

use micella_core::{MicellaError, Result};

use crate::element::{neutral_valences, permitted_valences};
use crate::molecule::Molecule;

/// Implicit hydrogen count an organic-subset atom receives from its bonds.
///
/// Non-aromatic atoms are filled up to the lowest permitted valence that is at
/// least `sigma`. Aromatic atoms give one electron to the ring first. Returns
/// `None` when no permitted valence can hold the bonds.
pub fn default_hydrogens(atomic_number: u8, is_aromatic: bool, sigma: u8) -> Option<u8> {
    let valences = neutral_valences(atomic_number)?;
    if is_aromatic {
        let lowest = *valences.first()?;
        return Some(lowest.saturating_sub(1).saturating_sub(sigma));
    }
    valences.iter().find(|&&v| v >= sigma).map(|&v| v - sigma)
}

/// Fill implicit hydrogens on atoms written without brackets.
pub(crate) fn assign_implicit_hydrogens(mol: &mut Molecule, bracketed: &[bool]) -> Result<()> {
    for i in 0..mol.atom_count() {
        if bracketed[i] {
            continue;
        }
        let atom = &mol.atoms[i];
        let sigma = mol.sigma_valence(i);
        let h = default_hydrogens(atom.atomic_number, atom.is_aromatic, sigma).ok_or_else(|| {
            MicellaError::InvalidStructure(format!(
                "atom {} ({}) has {} bonds, more than any permitted valence",
                i,
                atom.symbol(),
                sigma
            ))
        })?;
        mol.atoms[i].implicit_hydrogens = h;
    }
    Ok(())
}

/// Remove plain `[H]` atoms hanging off a heavy atom, adding them to its implicit count.
///
/// Isotopic, charged or bridging hydrogens and H2 stay explicit.
pub(crate) fn fold_explicit_hydrogens(mol: &Molecule) -> Result<Molecule> {
    let mut remove = vec![false; mol.atom_count()];
    let mut atoms = mol.atoms.clone();
    for (i, atom) in mol.atoms.iter().enumerate() {
        if atom.atomic_number != 1 || atom.formal_charge != 0 || atom.isotope.is_some() {
            continue;
        }
        if let [(parent, _)] = mol.adjacency[i].as_slice() {
            if mol.atoms[*parent].atomic_number != 1 {
                remove[i] = true;
                let count = atoms[*parent].implicit_hydrogens.checked_add(1).ok_or_else(|| {
                    MicellaError::InvalidStructure(format!(
                        "atom {} ({}) carries too many hydrogens",
                        parent,
                        mol.atoms[*parent].symbol()
                    ))
                })?;
                atoms[*parent].implicit_hydrogens = count;
            }
        }
    }
    if !remove.contains(&true) {
        return Ok(mol.clone());
    }
    let folded = Molecule::new(mol.name.clone(), atoms, mol.bonds.clone());
    Ok(folded.without_atoms(&remove))
}

/// Reject atoms whose bond orders plus hydrogens exceed every permitted valence.
///
/// Atoms without a valence model (metals, noble gases, unusual charges) are accepted.
pub fn check_valences(mol: &Molecule) -> Result<()> {
    for (i, atom) in mol.atoms.iter().enumerate() {
        let Some(permitted) = permitted_valences(atom.atomic_number, atom.formal_charge) else {
            continue;
        };
        let Some(&max) = permitted.last() else {
            continue;
        };
        // Explicit H neighbours are already part of the bond sum
        let total = mol.sigma_valence(i) as u16 + atom.implicit_hydrogens as u16;
        if total > max as u16 {
            return Err(MicellaError::InvalidStructure(format!(
                "atom {} ({}{}) has valence {}, permitted {:?}",
                i,
                atom.symbol(),
                charge_label(atom.formal_charge),
                total,
                permitted
            )));
        }
    }
    Ok(())
}

fn charge_label(charge: i8) -> String {
    match charge {
        0 => String::new(),
        c if c > 0 => format!("{c:+}"),
        c => format!("{c}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    #[test]
    fn lowest_fitting_valence() {
        assert_eq!(default_hydrogens(6, false, 1), Some(3));
        assert_eq!(default_hydrogens(16, false, 3), Some(1));
        assert_eq!(default_hydrogens(16, false, 4), Some(0));
        assert_eq!(default_hydrogens(7, false, 4), None);
        assert_eq!(default_hydrogens(11, false, 0), None);
    }

    #[test]
    fn aromatic_atoms_reserve_one_electron() {
        assert_eq!(default_hydrogens(6, true, 2), Some(1));
        assert_eq!(default_hydrogens(7, true, 2), Some(0));
        assert_eq!(default_hydrogens(6, true, 3), Some(0));
    }

    #[test]
    fn explicit_hydrogens_are_folded() {
        let mol = parse_smiles("[H]OC([H])([H])[H]").unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 1);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 3);
    }

    #[test]
    fn hydrogen_molecule_stays_explicit() {
        let mol = parse_smiles("[H][H]").unwrap();
        assert_eq!(mol.atom_count(), 2);
    }

    #[test]
    fn hydrogen_count_overflow_rejected() {
        let smiles = format!("[Na]{}", "([H])".repeat(256));
        let err = parse_smiles(&smiles).unwrap_err();
        assert!(matches!(err, MicellaError::InvalidStructure(_)));

        let mol = parse_smiles(&format!("[Na]{}", "([H])".repeat(255))).unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 255);
    }

    #[test]
    fn over_valent_atoms_rejected() {
        assert!(parse_smiles("C(C)(C)(C)(C)C").is_err());
        assert!(parse_smiles("[CH5]").is_err());
        assert!(parse_smiles("O=O=O").is_err());
        assert!(parse_smiles("F=C").is_err());
    }

    #[test]
    fn charged_atoms_use_shifted_valence() {
        assert!(parse_smiles("C[N+](C)(C)C").is_ok());
        assert!(parse_smiles("C[N+](=O)[O-]").is_ok());
        assert!(parse_smiles("C[N+](C)(C)(C)C").is_err());
        assert!(parse_smiles("[Na+].[Cl-]").is_ok());
    }
}
