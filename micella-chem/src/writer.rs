//! SMILES output.
//!
//! Atoms are written in depth-first order starting from the lowest index of
//! each fragment, so the text follows the input layout closely. Ring-closure
//! digits are reused once closed; a structure that needs more than 99 ring
//! bonds open at the same point cannot be written.

use std::collections::BTreeSet;

use micella_core::{MicellaError, Result};

use crate::molecule::{BondOrder, Molecule};
use crate::valence::default_hydrogens;

/// Write a molecule as SMILES.
pub fn write_smiles(mol: &Molecule) -> Result<String> {
    let n = mol.atom_count();
    let mut ring_bonds = Vec::new();
    let mut visited = vec![false; n];
    let mut roots = Vec::new();

    for start in 0..n {
        if !visited[start] {
            roots.push(start);
            plan(mol, start, None, &mut visited, &mut ring_bonds);
        }
    }

    // Ring bonds touching each atom, in the order they were discovered.
    let mut closures: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &bi in &ring_bonds {
        closures[mol.bonds[bi].atom1].push(bi);
        closures[mol.bonds[bi].atom2].push(bi);
    }

    let mut writer = Writer {
        mol,
        closures,
        is_ring_bond: {
            let mut flags = vec![false; mol.bond_count()];
            for &bi in &ring_bonds {
                flags[bi] = true;
            }
            flags
        },
        open: Vec::new(),
        free: (1..=99).collect(),
        visited: vec![false; n],
        out: String::new(),
    };
    for (k, &root) in roots.iter().enumerate() {
        if k > 0 {
            writer.out.push('.');
        }
        writer.walk(root, None)?;
    }
    Ok(writer.out)
}

/// First pass: find the ring-closing bonds of the depth-first walk.
fn plan(
    mol: &Molecule,
    atom: usize,
    from_bond: Option<usize>,
    visited: &mut [bool],
    ring_bonds: &mut Vec<usize>,
) {
    visited[atom] = true;
    for &(n, bi) in &mol.adjacency[atom] {
        if Some(bi) == from_bond {
            continue;
        }
        if visited[n] {
            if !ring_bonds.contains(&bi) {
                ring_bonds.push(bi);
            }
        } else {
            plan(mol, n, Some(bi), visited, ring_bonds);
        }
    }
}

struct Writer<'a> {
    mol: &'a Molecule,
    closures: Vec<Vec<usize>>,
    is_ring_bond: Vec<bool>,
    /// (bond index, digit) for ring bonds opened but not yet closed
    open: Vec<(usize, u8)>,
    free: BTreeSet<u8>,
    visited: Vec<bool>,
    out: String,
}

impl Writer<'_> {
    fn walk(&mut self, atom: usize, from_bond: Option<usize>) -> Result<()> {
        self.visited[atom] = true;
        self.write_atom(atom);

        for bi in self.closures[atom].clone() {
            if let Some(pos) = self.open.iter().position(|&(b, _)| b == bi) {
                let (_, digit) = self.open.remove(pos);
                self.write_ring_digit(digit);
                self.free.insert(digit);
            } else {
                let digit = self.free.pop_first().ok_or_else(|| {
                    MicellaError::InvalidStructure(format!(
                        "more than 99 ring bonds open at atom {atom}"
                    ))
                })?;
                self.write_bond(bi);
                self.write_ring_digit(digit);
                self.open.push((bi, digit));
            }
        }

        let children: Vec<(usize, usize)> = self.mol.adjacency[atom]
            .iter()
            .copied()
            .filter(|&(_, bi)| Some(bi) != from_bond && !self.is_ring_bond[bi])
            .collect();
        for (k, &(n, bi)) in children.iter().enumerate() {
            if self.visited[n] {
                continue;
            }
            let last = children[k + 1..].iter().all(|&(m, _)| self.visited[m]);
            if !last {
                self.out.push('(');
            }
            self.write_bond(bi);
            self.walk(n, Some(bi))?;
            if !last {
                self.out.push(')');
            }
        }
        Ok(())
    }

    fn write_ring_digit(&mut self, digit: u8) {
        if digit < 10 {
            self.out.push((b'0' + digit) as char);
        } else {
            self.out.push('%');
            self.out.push_str(&digit.to_string());
        }
    }

    fn write_bond(&mut self, bi: usize) {
        let bond = &self.mol.bonds[bi];
        let both_aromatic = self.mol.atoms[bond.atom1].is_aromatic && self.mol.atoms[bond.atom2].is_aromatic;
        match bond.order {
            BondOrder::Single if both_aromatic => self.out.push('-'),
            BondOrder::Single => {}
            BondOrder::Double => self.out.push('='),
            BondOrder::Triple => self.out.push('#'),
            BondOrder::Aromatic if both_aromatic => {}
            BondOrder::Aromatic => self.out.push(':'),
        }
    }

    fn write_atom(&mut self, idx: usize) {
        let atom = &self.mol.atoms[idx];
        let symbol = if atom.is_aromatic {
            atom.symbol().to_ascii_lowercase()
        } else {
            atom.symbol().to_string()
        };

        let organic = if atom.is_aromatic {
            matches!(atom.atomic_number, 5 | 6 | 7 | 8 | 15 | 16)
        } else {
            matches!(atom.atomic_number, 5 | 6 | 7 | 8 | 15 | 16 | 9 | 17 | 35 | 53)
        };
        let implied_h = default_hydrogens(atom.atomic_number, atom.is_aromatic, self.mol.sigma_valence(idx));
        let bare = organic
            && atom.formal_charge == 0
            && atom.isotope.is_none()
            && implied_h == Some(atom.implicit_hydrogens);

        if bare {
            self.out.push_str(&symbol);
            return;
        }

        self.out.push('[');
        if let Some(iso) = atom.isotope {
            self.out.push_str(&iso.to_string());
        }
        self.out.push_str(&symbol);
        match atom.implicit_hydrogens {
            0 => {}
            1 => self.out.push('H'),
            h => {
                self.out.push('H');
                self.out.push_str(&h.to_string());
            }
        }
        match atom.formal_charge {
            0 => {}
            1 => self.out.push('+'),
            -1 => self.out.push('-'),
            c => self.out.push_str(&format!("{c:+}")),
        }
        self.out.push(']');
    }
}
