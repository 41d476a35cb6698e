//! Molecular graph representation.

use micella_core::{Annotated, ContentAddressable, Summarizable};
use sha2::{Digest, Sha256};

use crate::element::element_by_number;

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    /// Integer order used by charge rebalancing and valence sums.
    ///
    /// Aromatic bonds count as one sigma bond here.
    pub fn sigma_order(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MolAtom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    pub implicit_hydrogens: u8,
}

impl MolAtom {
    /// A neutral, non-aromatic atom with no hydrogens assigned yet.
    pub fn new(atomic_number: u8) -> Self {
        MolAtom {
            atomic_number,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            implicit_hydrogens: 0,
        }
    }

    /// Element symbol, or `"*"` for an out-of-table atomic number.
    pub fn symbol(&self) -> &'static str {
        element_by_number(self.atomic_number).map_or("*", |e| e.symbol)
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Bond { atom1, atom2, order }
    }

    pub fn is_aromatic(&self) -> bool {
        self.order == BondOrder::Aromatic
    }

    /// The atom at the other end of this bond.
    pub fn other(&self, atom_idx: usize) -> usize {
        if self.atom1 == atom_idx {
            self.atom2
        } else {
            self.atom1
        }
    }
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<MolAtom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Create a new molecule, building the adjacency list from atoms and bonds.
    pub fn new(name: String, atoms: Vec<MolAtom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        Molecule { name, atoms, bonds, adjacency }
    }

    /// Number of graph nodes. Implicit hydrogens are not counted.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Number of non-hydrogen atoms.
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| a.atomic_number != 1).count()
    }

    /// Neighbor atom indices for a given atom.
    pub fn neighbors(&self, atom_idx: usize) -> Vec<usize> {
        self.adjacency[atom_idx].iter().map(|&(n, _)| n).collect()
    }

    /// Graph degree of an atom (number of explicit bonds).
    pub fn degree(&self, atom_idx: usize) -> usize {
        self.adjacency[atom_idx].len()
    }

    /// Find the bond between two atoms, if any.
    pub fn get_bond(&self, a1: usize, a2: usize) -> Option<&Bond> {
        self.adjacency[a1]
            .iter()
            .find(|&&(n, _)| n == a2)
            .map(|&(_, bi)| &self.bonds[bi])
    }

    /// Bonds incident to an atom, paired with the neighbor index.
    pub fn bonds_of(&self, atom_idx: usize) -> impl Iterator<Item = (usize, &Bond)> + '_ {
        self.adjacency[atom_idx]
            .iter()
            .map(move |&(n, bi)| (n, &self.bonds[bi]))
    }

    /// Sum of bond orders at an atom, aromatic bonds counted as one.
    pub fn sigma_valence(&self, atom_idx: usize) -> u8 {
        self.bonds_of(atom_idx)
            .map(|(_, b)| b.order.sigma_order())
            .fold(0u8, u8::saturating_add)
    }

    /// Total hydrogens attached to an atom: implicit plus explicit H neighbours.
    pub fn hydrogen_count(&self, atom_idx: usize) -> u8 {
        let explicit = self
            .neighbors(atom_idx)
            .into_iter()
            .filter(|&n| self.atoms[n].atomic_number == 1)
            .count() as u8;
        self.atoms[atom_idx].implicit_hydrogens.saturating_add(explicit)
    }

    /// Total hydrogen count (implicit + explicit H atoms).
    pub fn total_hydrogen_count(&self) -> usize {
        let explicit: usize = self.atoms.iter().filter(|a| a.atomic_number == 1).count();
        let implicit: usize = self.atoms.iter().map(|a| a.implicit_hydrogens as usize).sum();
        explicit + implicit
    }

    /// Net formal charge.
    pub fn net_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    /// Connected components as lists of atom indices, in order of their lowest atom.
    pub fn fragments(&self) -> Vec<Vec<usize>> {
        let n = self.atom_count();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            visited[start] = true;
            while let Some(curr) = stack.pop() {
                component.push(curr);
                for &(neighbor, _) in &self.adjacency[curr] {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        stack.push(neighbor);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// Copy of this molecule without the flagged atoms and their bonds.
    pub fn without_atoms(&self, remove: &[bool]) -> Molecule {
        let mut index_map = vec![usize::MAX; self.atom_count()];
        let mut atoms = Vec::with_capacity(self.atom_count());
        for (i, atom) in self.atoms.iter().enumerate() {
            if !remove[i] {
                index_map[i] = atoms.len();
                atoms.push(atom.clone());
            }
        }
        let bonds = self
            .bonds
            .iter()
            .filter(|b| !remove[b.atom1] && !remove[b.atom2])
            .map(|b| Bond::new(index_map[b.atom1], index_map[b.atom2], b.order))
            .collect();
        Molecule::new(self.name.clone(), atoms, bonds)
    }

    /// Copy of this molecule without the given bonds.
    pub fn without_bonds(&self, remove: &[usize]) -> Molecule {
        let bonds = self
            .bonds
            .iter()
            .enumerate()
            .filter(|(bi, _)| !remove.contains(bi))
            .map(|(_, b)| b.clone())
            .collect();
        Molecule::new(self.name.clone(), self.atoms.clone(), bonds)
    }
}

impl Annotated for Molecule {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Summarizable for Molecule {
    fn summary(&self) -> String {
        format!(
            "{}: {} atoms, {} bonds, charge {:+}",
            if self.name.is_empty() { "Molecule" } else { &self.name },
            self.atom_count(),
            self.bond_count(),
            self.net_charge()
        )
    }
}

impl ContentAddressable for Molecule {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for atom in &self.atoms {
            hasher.update([atom.atomic_number]);
            hasher.update(atom.formal_charge.to_le_bytes());
            hasher.update(atom.implicit_hydrogens.to_le_bytes());
            hasher.update(atom.isotope.unwrap_or(0).to_le_bytes());
            hasher.update([atom.is_aromatic as u8]);
        }
        // Bonds sorted by (min_atom, max_atom, order) so input order does not matter
        let mut sorted_bonds: Vec<_> = self
            .bonds
            .iter()
            .map(|b| {
                let (a, c) = if b.atom1 <= b.atom2 { (b.atom1, b.atom2) } else { (b.atom2, b.atom1) };
                (a, c, b.order as u8)
            })
            .collect();
        sorted_bonds.sort_unstable();
        for (a, c, order) in sorted_bonds {
            hasher.update((a as u64).to_le_bytes());
            hasher.update((c as u64).to_le_bytes());
            hasher.update([order]);
        }
        hex::encode(hasher.finalize())
    }
}
