//! Ring perception: ring membership and the smallest set of smallest rings.

use std::collections::VecDeque;

use crate::molecule::Molecule;

/// Ring membership of a molecule, computed once and queried by later stages.
#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    /// SSSR rings as atom index cycles, smallest first.
    pub rings: Vec<Vec<usize>>,
    in_ring: Vec<bool>,
}

impl RingInfo {
    pub fn new(mol: &Molecule) -> Self {
        let in_ring = ring_atoms(mol);
        let rings = sssr(mol, &in_ring);
        RingInfo { rings, in_ring }
    }

    /// Whether the atom lies on any cycle.
    pub fn is_ring_atom(&self, atom_idx: usize) -> bool {
        self.in_ring.get(atom_idx).copied().unwrap_or(false)
    }

    /// Whether the bond between `a` and `b` closes or lies on an SSSR ring.
    pub fn is_ring_bond(&self, a: usize, b: usize) -> bool {
        self.rings.iter().any(|r| ring_contains_edge(r, a, b))
    }

    /// Size of the smallest ring containing the atom, if any.
    pub fn smallest_ring_size(&self, atom_idx: usize) -> Option<usize> {
        self.rings
            .iter()
            .filter(|r| r.contains(&atom_idx))
            .map(Vec::len)
            .min()
    }
}

/// Whether consecutive ring members `a`, `b` are adjacent in the cycle.
pub fn ring_contains_edge(ring: &[usize], a: usize, b: usize) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let (x, y) = (ring[i], ring[(i + 1) % n]);
        (x == a && y == b) || (x == b && y == a)
    })
}

/// Find the smallest set of smallest rings (SSSR) in a molecule.
pub fn find_sssr(mol: &Molecule) -> Vec<Vec<usize>> {
    sssr(mol, &ring_atoms(mol))
}

fn sssr(mol: &Molecule, in_ring: &[bool]) -> Vec<Vec<usize>> {
    // Cyclomatic number: bonds - atoms + components
    let expected = mol.bond_count() as isize - mol.atom_count() as isize
        + mol.fragments().len() as isize;
    if expected <= 0 {
        return Vec::new();
    }

    let mut rings: Vec<Vec<usize>> = Vec::new();
    for (bond_idx, bond) in mol.bonds.iter().enumerate() {
        if !in_ring[bond.atom1] || !in_ring[bond.atom2] {
            continue;
        }
        if let Some(mut ring) = shortest_cycle_through(mol, bond.atom1, bond.atom2, bond_idx, in_ring) {
            normalize_ring(&mut ring);
            if !rings.contains(&ring) {
                rings.push(ring);
            }
        }
    }

    rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    rings.truncate(expected as usize);
    rings
}

/// Ring atoms are what survives repeatedly pruning atoms of degree <= 1.
fn ring_atoms(mol: &Molecule) -> Vec<bool> {
    let n = mol.atom_count();
    let mut degree: Vec<usize> = (0..n).map(|i| mol.degree(i)).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| degree[i] <= 1).collect();
    let mut removed = vec![false; n];

    while let Some(atom) = queue.pop_front() {
        if removed[atom] {
            continue;
        }
        removed[atom] = true;
        for &(neighbor, _) in &mol.adjacency[atom] {
            if !removed[neighbor] {
                degree[neighbor] -= 1;
                if degree[neighbor] <= 1 {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    removed.into_iter().map(|r| !r).collect()
}

/// BFS path from `start` to `end` that avoids `excluded_bond` and stays on ring atoms.
fn shortest_cycle_through(
    mol: &Molecule,
    start: usize,
    end: usize,
    excluded_bond: usize,
    in_ring: &[bool],
) -> Option<Vec<usize>> {
    let mut parent = vec![usize::MAX; mol.atom_count()];
    let mut visited = vec![false; mol.atom_count()];
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(curr) = queue.pop_front() {
        if curr == end {
            let mut path = vec![end];
            let mut node = end;
            while node != start {
                node = parent[node];
                path.push(node);
            }
            path.reverse();
            return Some(path);
        }
        for &(neighbor, bond_idx) in &mol.adjacency[curr] {
            if bond_idx != excluded_bond && !visited[neighbor] && in_ring[neighbor] {
                visited[neighbor] = true;
                parent[neighbor] = curr;
                queue.push_back(neighbor);
            }
        }
    }

    None
}

/// Rotate the cycle to start at its smallest index, walking toward the smaller neighbour.
fn normalize_ring(ring: &mut [usize]) {
    let Some(min_pos) = ring.iter().enumerate().min_by_key(|&(_, &v)| v).map(|(i, _)| i) else {
        return;
    };
    ring.rotate_left(min_pos);
    let n = ring.len();
    if n > 2 && ring[n - 1] < ring[1] {
        ring[1..].reverse();
    }
}
