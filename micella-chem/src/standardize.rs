//! Structure standardization: metal disconnection.
//!
//! Covalent bonds between metals and electronegative or soft donor atoms are
//! broken and the bond order is moved into formal charges, so descriptor
//! typing sees ionic fragments instead of organometallic bonds.

use tracing::debug;

use crate::molecule::Molecule;

// ---------------------------------------------------------------------------
// Metal classes
// ---------------------------------------------------------------------------

/// Metals whose bonds to N, O or F are treated as ionic.
pub fn is_nof_bonding_metal(z: u8) -> bool {
    matches!(z, 3 | 4 | 11 | 12 | 13 | 19..=31 | 37..=50 | 55 | 56 | 72..=83)
}

/// Transition metals (and Al) whose bonds to softer non-metals are broken too.
pub fn is_soft_bonding_metal(z: u8) -> bool {
    matches!(z, 13 | 21..=30 | 39..=48 | 72..=79)
}

fn is_hard_donor(z: u8) -> bool {
    matches!(z, 7 | 8 | 9)
}

fn is_soft_donor(z: u8) -> bool {
    matches!(z, 5 | 6 | 14 | 15 | 16 | 17 | 33 | 34 | 35 | 51 | 52 | 53 | 85)
}

/// Whether a bond between `metal` and `ligand` (atomic numbers) gets broken.
pub fn is_disconnectable(metal: u8, ligand: u8) -> bool {
    (is_nof_bonding_metal(metal) && is_hard_donor(ligand))
        || (is_soft_bonding_metal(metal) && is_soft_donor(ligand))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Break metal–ligand bonds, moving each bond order into formal charges.
///
/// The metal gains `+order`, the ligand `-order`. Applying the function to
/// its own output changes nothing.
pub fn disconnect_metals(mol: &Molecule) -> Molecule {
    let mut broken = Vec::new();
    let mut atoms = mol.atoms.clone();

    for (bi, bond) in mol.bonds.iter().enumerate() {
        let (z1, z2) = (mol.atoms[bond.atom1].atomic_number, mol.atoms[bond.atom2].atomic_number);
        let (metal, ligand) = if is_disconnectable(z1, z2) {
            (bond.atom1, bond.atom2)
        } else if is_disconnectable(z2, z1) {
            (bond.atom2, bond.atom1)
        } else {
            continue;
        };
        let order = bond.order.sigma_order() as i8;
        atoms[metal].formal_charge = atoms[metal].formal_charge.saturating_add(order);
        atoms[ligand].formal_charge = atoms[ligand].formal_charge.saturating_sub(order);
        broken.push(bi);
    }

    if broken.is_empty() {
        return mol.clone();
    }

    debug!(bonds = broken.len(), "disconnected metal bonds");
    let charged = Molecule::new(mol.name.clone(), atoms, mol.bonds.clone());
    charged.without_bonds(&broken)
}
