//! Aromaticity perception for Kekulé input.
//!
//! A ring is aromatic when every member can join a conjugated system and the
//! pi electron count satisfies Hückel's 4n+2 rule. Rings are evaluated against
//! the Kekulé bond orders, repeatedly, so fused systems whose exocyclic double
//! bonds point into an already aromatic ring are picked up on a later pass.

use micella_core::{MicellaError, Result};

use crate::element::permitted_valences;
use crate::molecule::{BondOrder, Molecule};
use crate::ring::{ring_contains_edge, RingInfo};

/// Search steps allowed when matching double bonds onto lowercase atoms.
const KEKULE_STEP_LIMIT: u32 = 100_000;

/// Mark aromatic rings in place and check lowercase atoms sit on a ring.
pub fn perceive_aromaticity(mol: &mut Molecule, rings: &RingInfo) -> Result<()> {
    for (i, atom) in mol.atoms.iter().enumerate() {
        if atom.is_aromatic && !rings.is_ring_atom(i) {
            return Err(MicellaError::InvalidStructure(format!(
                "atom {} ({}) is marked aromatic but is not in a ring",
                i,
                atom.symbol()
            )));
        }
    }

    check_kekulizable(mol)?;

    let kekule: Vec<BondOrder> = mol.bonds.iter().map(|b| b.order).collect();
    let mut aromatic: Vec<bool> = mol.atoms.iter().map(|a| a.is_aromatic).collect();
    let mut done = vec![false; rings.rings.len()];

    loop {
        let mut changed = false;
        for (ri, ring) in rings.rings.iter().enumerate() {
            if done[ri] {
                continue;
            }
            if ring.iter().all(|&a| aromatic[a]) {
                done[ri] = true;
                continue;
            }
            let Some(electrons) = pi_electrons(mol, &kekule, &aromatic, ring) else {
                continue;
            };
            if electrons >= 2 && (electrons - 2) % 4 == 0 {
                for &a in ring {
                    aromatic[a] = true;
                }
                done[ri] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    for (i, flag) in aromatic.iter().enumerate() {
        mol.atoms[i].is_aromatic = *flag;
    }
    let aromatic_rings: Vec<&Vec<usize>> = rings
        .rings
        .iter()
        .zip(&done)
        .filter_map(|(ring, &d)| d.then_some(ring))
        .collect();
    for bond in mol.bonds.iter_mut() {
        let in_aromatic_ring = aromatic_rings
            .iter()
            .any(|r| ring_contains_edge(r, bond.atom1, bond.atom2));
        if in_aromatic_ring {
            bond.order = BondOrder::Aromatic;
        } else if bond.order == BondOrder::Aromatic {
            // e.g. the unwritten bond joining two rings in biphenyl
            bond.order = BondOrder::Single;
        }
    }
    Ok(())
}

/// Lowercase atoms must admit a Kekulé structure: every one still short of its
/// valence takes exactly one double bond from its aromatic bonds.
fn check_kekulizable(mol: &Molecule) -> Result<()> {
    let needs: Vec<bool> = (0..mol.atom_count()).map(|i| needs_double(mol, i)).collect();
    let mut matched = vec![false; mol.atom_count()];
    let mut steps = KEKULE_STEP_LIMIT;
    if assign_doubles(mol, &needs, &mut matched, &mut steps) {
        return Ok(());
    }
    let stranded: Vec<usize> = (0..mol.atom_count()).filter(|&i| needs[i]).collect();
    Err(MicellaError::InvalidStructure(format!(
        "cannot kekulize aromatic atoms {stranded:?}"
    )))
}

fn needs_double(mol: &Molecule, idx: usize) -> bool {
    let atom = &mol.atoms[idx];
    if !atom.is_aromatic || !mol.bonds_of(idx).any(|(_, b)| b.order == BondOrder::Aromatic) {
        return false;
    }
    let Some(valences) = permitted_valences(atom.atomic_number, atom.formal_charge) else {
        return false;
    };
    let used: u32 = mol
        .bonds_of(idx)
        .map(|(_, b)| match b.order {
            BondOrder::Aromatic => 1,
            order => order.as_f64() as u32,
        })
        .sum::<u32>()
        + atom.implicit_hydrogens as u32;
    valences
        .iter()
        .map(|&v| v as u32)
        .find(|&v| v >= used)
        .is_some_and(|v| v > used)
}

/// Pair up atoms needing a double bond along aromatic bonds, most constrained first.
fn assign_doubles(mol: &Molecule, needs: &[bool], matched: &mut [bool], steps: &mut u32) -> bool {
    let mut best: Option<(usize, Vec<usize>)> = None;
    for i in (0..mol.atom_count()).filter(|&i| needs[i] && !matched[i]) {
        let partners: Vec<usize> = mol
            .bonds_of(i)
            .filter(|(n, b)| b.order == BondOrder::Aromatic && needs[*n] && !matched[*n])
            .map(|(n, _)| n)
            .collect();
        if partners.is_empty() {
            return false;
        }
        if best.as_ref().map_or(true, |(_, p)| partners.len() < p.len()) {
            best = Some((i, partners));
        }
    }
    let Some((atom, partners)) = best else {
        return true;
    };
    for partner in partners {
        if *steps == 0 {
            return false;
        }
        *steps -= 1;
        matched[atom] = true;
        matched[partner] = true;
        if assign_doubles(mol, needs, matched, steps) {
            return true;
        }
        matched[atom] = false;
        matched[partner] = false;
    }
    false
}

fn pi_electrons(mol: &Molecule, kekule: &[BondOrder], aromatic: &[bool], ring: &[usize]) -> Option<u32> {
    ring.iter()
        .map(|&a| atom_pi_electrons(mol, kekule, aromatic, ring, a))
        .sum()
}

fn atom_pi_electrons(
    mol: &Molecule,
    kekule: &[BondOrder],
    aromatic: &[bool],
    ring: &[usize],
    idx: usize,
) -> Option<u32> {
    let atom = &mol.atoms[idx];
    // A lowercase atom inside a partly Kekulé ring is not something we can count.
    if atom.is_aromatic {
        return None;
    }

    let mut ring_double = false;
    let mut exo_double: Option<usize> = None;
    for &(n, bi) in &mol.adjacency[idx] {
        match kekule[bi] {
            BondOrder::Triple => return None,
            BondOrder::Double if ring_contains_edge(ring, idx, n) => ring_double = true,
            BondOrder::Double => exo_double = Some(n),
            BondOrder::Aromatic => return None,
            BondOrder::Single => {}
        }
    }

    if ring_double {
        return Some(1);
    }
    if let Some(partner) = exo_double {
        if aromatic[partner] {
            return Some(1);
        }
        let hetero = matches!(mol.atoms[partner].atomic_number, 7 | 8 | 16);
        return (atom.atomic_number == 6 && hetero).then_some(0);
    }

    let connections = mol.degree(idx) + atom.implicit_hydrogens as usize;
    match (atom.atomic_number, atom.formal_charge) {
        (6, -1) => Some(2),
        (6, 1) => Some(0),
        (7, 0) | (15, 0) if connections <= 3 => Some(2),
        (7, -1) => Some(2),
        (8, 0) | (16, 0) | (34, 0) | (52, 0) if connections == 2 => Some(2),
        (5, 0) if connections == 3 => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::molecule::BondOrder;
    use crate::smiles::parse_smiles;
    use micella_core::ErrorKind;

    fn aromatic_count(smiles: &str) -> usize {
        parse_smiles(smiles).unwrap().atoms.iter().filter(|a| a.is_aromatic).count()
    }

    #[test]
    fn kekule_benzene_is_aromatic() {
        let mol = parse_smiles("C1=CC=CC=C1").unwrap();
        assert!(mol.atoms.iter().all(|a| a.is_aromatic && a.implicit_hydrogens == 1));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
    }

    #[test]
    fn heteroaromatics() {
        assert_eq!(aromatic_count("C1=CC=NC=C1"), 6);
        assert_eq!(aromatic_count("C1=CNC=C1"), 5);
        assert_eq!(aromatic_count("C1=COC=C1"), 5);
        assert_eq!(aromatic_count("C1=CSC=C1"), 5);
        assert_eq!(aromatic_count("C1=CN=CN1"), 5);
        assert_eq!(aromatic_count("O=C1C=CC=CN1"), 6);
    }

    #[test]
    fn non_aromatic_rings() {
        assert_eq!(aromatic_count("C1CCCCC1"), 0);
        assert_eq!(aromatic_count("C1=CCC=C1"), 0);
        assert_eq!(aromatic_count("O=C1C=CC(=O)C=C1"), 0);
        assert_eq!(aromatic_count("C1=CC=CC=CC=C1"), 0);
    }

    #[test]
    fn fused_kekule_systems() {
        assert_eq!(aromatic_count("C1=CC=C2C=CC=CC2=C1"), 10);
        assert_eq!(aromatic_count("C1=CC=C2C(=C1)C=CN2"), 9);
    }

    #[test]
    fn bond_between_rings_is_single() {
        let mol = parse_smiles("c1ccc(cc1)c1ccccc1").unwrap();
        let link = mol.get_bond(3, 6).unwrap();
        assert_eq!(link.order, BondOrder::Single);
        assert_eq!(mol.bonds.iter().filter(|b| b.is_aromatic()).count(), 12);
    }

    #[test]
    fn lowercase_outside_ring_rejected() {
        assert!(parse_smiles("cc").is_err());
    }

    #[test]
    fn lowercase_rings_must_kekulize() {
        for bad in ["c1cccc1", "n1cccc1", "c1ccccc1c", "c1cccccc1", "c1ccc2cccc2c1"] {
            let err = parse_smiles(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidStructure, "{bad}");
        }
        for good in [
            "c1ccccc1",
            "c1cc[nH]c1",
            "Cn1cccc1",
            "c1ccoc1",
            "c1ccsc1",
            "c1nn[nH]n1",
            "c1c[nH+]c[nH]1",
            "O=c1cccc[nH]1",
            "c1ccc2ccccc2c1",
            "c1ccc2[nH]ccc2c1",
            "C[n+]1ccccc1",
            "[cH-]1cccc1",
        ] {
            assert!(parse_smiles(good).is_ok(), "{good}");
        }
    }

    #[test]
    fn substituent_stays_aliphatic() {
        let mol = parse_smiles("CC1=CC=CC=C1").unwrap();
        assert!(!mol.atoms[0].is_aromatic);
        assert_eq!(mol.bonds[0].order, BondOrder::Single);
    }
}
