//! Wildman–Crippen atom typing with logP and molar refractivity contributions.
//!
//! Every atom, and every implicit hydrogen through its parent atom, is
//! assigned exactly one type; the first matching rule wins, in the order of
//! the published table. Types without a published MR term contribute zero
//! to MR. An atom that matches no rule makes the descriptors unavailable.

use micella_core::{MicellaError, Result};
use tracing::debug;

use crate::molecule::{BondOrder, Molecule};

// ---------------------------------------------------------------------------
// Atom types
// ---------------------------------------------------------------------------

/// Wildman–Crippen atom type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrippenType {
    C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15, C16, C17, C18,
    C19, C20, C21, C22, C23, C24, C25, C26, C27, CS,
    H1, H2, H3, H4, HS,
    N1, N2, N3, N4, N5, N6, N7, N8, N9, N10, N11, N12, N13, NS,
    O1, O2, O3, O4, O5, O6, O7, O8, O9, O10, O11, O12, OS,
    F, Cl, Br, I, Hal, P, S1, S2, S3, Me1, Me2,
}

impl CrippenType {
    /// (logP contribution, MR contribution).
    pub fn contribution(self) -> (f64, f64) {
        use CrippenType::*;
        match self {
            C1 => (0.1441, 2.503),
            C2 => (0.0, 2.433),
            C3 => (-0.2035, 2.753),
            C4 => (-0.2051, 2.731),
            C5 => (-0.2783, 5.007),
            C6 => (0.1551, 3.513),
            C7 => (0.0017, 3.888),
            C8 => (0.08452, 2.464),
            C9 => (-0.1444, 2.412),
            C10 => (-0.0516, 2.488),
            C11 => (0.1193, 2.582),
            C12 => (-0.0967, 2.576),
            C13 => (-0.5443, 4.041),
            C14 => (0.0, 3.257),
            C15 => (0.245, 3.564),
            C16 => (0.198, 3.18),
            C17 => (0.0, 3.104),
            C18 => (0.1581, 3.35),
            C19 => (0.2955, 4.346),
            C20 => (0.2713, 3.904),
            C21 => (0.136, 3.509),
            C22 => (0.4619, 3.067),
            C23 => (0.5437, 3.853),
            C24 => (0.1893, 2.673),
            C25 => (-0.8186, 3.135),
            C26 => (0.264, 4.305),
            C27 => (0.2148, 2.693),
            CS => (0.08129, 3.243),
            H1 => (0.123, 1.057),
            H2 => (-0.2677, 1.395),
            H3 => (0.2142, 0.9627),
            H4 => (0.298, 1.805),
            HS => (0.1125, 1.112),
            N1 => (-1.019, 2.262),
            N2 => (-0.7096, 2.173),
            N3 => (-1.027, 2.827),
            N4 => (-0.5188, 3.0),
            N5 => (0.08387, 1.757),
            N6 => (0.1836, 2.428),
            N7 => (-0.3187, 1.839),
            N8 => (-0.4458, 2.819),
            N9 => (0.01508, 1.725),
            N10 => (-1.95, 0.0),
            N11 => (-0.3239, 2.202),
            N12 => (-1.119, 0.0),
            N13 => (-0.3396, 0.2604),
            NS => (-0.4806, 2.134),
            O1 => (0.1552, 1.08),
            O2 => (-0.2893, 0.8238),
            O3 => (-0.0684, 1.085),
            O4 => (-0.4195, 1.182),
            O5 => (0.0335, 3.367),
            O6 => (-0.3339, 0.7774),
            O7 => (-1.189, 0.0),
            O8 => (0.1788, 3.135),
            O9 => (-0.1526, 0.0),
            O10 => (0.1129, 0.2215),
            O11 => (0.4833, 0.389),
            O12 => (-1.326, 0.0),
            OS => (-0.1188, 0.6865),
            F => (0.4202, 1.108),
            Cl => (0.6895, 5.853),
            Br => (0.8456, 8.927),
            I => (0.8857, 14.02),
            Hal => (-2.996, 0.0),
            P => (0.8612, 6.92),
            S1 => (0.6482, 7.591),
            S2 => (-0.0024, 7.365),
            S3 => (0.6237, 6.691),
            Me1 => (-0.3808, 5.754),
            Me2 => (-0.0025, 0.0),
        }
    }
}

/// Summed Crippen contributions of a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrippenDescriptors {
    pub logp: f64,
    pub mr: f64,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Crippen type of every atom, followed by the types of its implicit hydrogens.
///
/// The outer vector is indexed by atom; the inner one lists the heavy atom's own
/// type first and then one entry per implicit hydrogen.
pub fn crippen_types(mol: &Molecule) -> Result<Vec<Vec<CrippenType>>> {
    let typer = Typer { mol };
    (0..mol.atom_count())
        .map(|i| {
            let own = typer.atom_type(i).ok_or_else(|| {
                MicellaError::DescriptorUnavailable(format!(
                    "no Crippen atom type for atom {} ({}{})",
                    i,
                    mol.atoms[i].symbol(),
                    charge_suffix(mol.atoms[i].formal_charge)
                ))
            })?;
            let mut types = vec![own];
            if mol.atoms[i].implicit_hydrogens > 0 {
                let h = typer.hydrogen_type(Some(i));
                types.extend(std::iter::repeat(h).take(mol.atoms[i].implicit_hydrogens as usize));
            }
            Ok(types)
        })
        .collect()
}

/// Wildman–Crippen logP and molar refractivity.
pub fn crippen_descriptors(mol: &Molecule) -> Result<CrippenDescriptors> {
    let mut logp = 0.0;
    let mut mr = 0.0;
    for atom_types in crippen_types(mol)? {
        for t in atom_types {
            let (lp, m) = t.contribution();
            logp += lp;
            mr += m;
        }
    }
    debug!(logp, mr, atoms = mol.atom_count(), "crippen contributions");
    Ok(CrippenDescriptors { logp, mr })
}

fn charge_suffix(charge: i8) -> String {
    match charge {
        0 => String::new(),
        c => format!("{c:+}"),
    }
}

// ---------------------------------------------------------------------------
// Typing rules
// ---------------------------------------------------------------------------

const HALOGENS: [u8; 4] = [9, 17, 35, 53];

struct Typer<'a> {
    mol: &'a Molecule,
}

/// Neighbour summary for the SMARTS-like rules below.
struct Neighborhood {
    /// Heavy neighbours joined by a single or aromatic bond.
    single: Vec<usize>,
    /// Heavy neighbours joined by a single bond only.
    strict_single: Vec<usize>,
    double: Vec<usize>,
    triple: Vec<usize>,
    /// Heavy neighbours joined by an aromatic bond.
    aromatic_bond: Vec<usize>,
}

impl Typer<'_> {
    fn z(&self, i: usize) -> u8 {
        self.mol.atoms[i].atomic_number
    }

    fn arom(&self, i: usize) -> bool {
        self.mol.atoms[i].is_aromatic
    }

    fn charge(&self, i: usize) -> i8 {
        self.mol.atoms[i].formal_charge
    }

    /// Total attached hydrogens.
    fn h(&self, i: usize) -> u8 {
        self.mol.hydrogen_count(i)
    }

    /// Total connections, hydrogens included.
    fn x(&self, i: usize) -> usize {
        self.mol.degree(i) + self.mol.atoms[i].implicit_hydrogens as usize
    }

    fn aliphatic(&self, i: usize, z: u8) -> bool {
        self.z(i) == z && !self.arom(i)
    }

    fn neighborhood(&self, i: usize) -> Neighborhood {
        let mut n = Neighborhood {
            single: Vec::new(),
            strict_single: Vec::new(),
            double: Vec::new(),
            triple: Vec::new(),
            aromatic_bond: Vec::new(),
        };
        for (j, bond) in self.mol.bonds_of(i) {
            if self.z(j) == 1 {
                continue;
            }
            match bond.order {
                BondOrder::Single => {
                    n.single.push(j);
                    n.strict_single.push(j);
                }
                BondOrder::Aromatic => {
                    n.single.push(j);
                    n.aromatic_bond.push(j);
                }
                BondOrder::Double => n.double.push(j),
                BondOrder::Triple => n.triple.push(j),
            }
        }
        n
    }

    fn atom_type(&self, i: usize) -> Option<CrippenType> {
        let z = self.z(i);
        match z {
            1 => Some(self.hydrogen_type(self.mol.neighbors(i).first().copied())),
            6 if self.arom(i) => Some(self.aromatic_carbon(i)),
            6 => Some(self.aliphatic_carbon(i)),
            7 => Some(self.nitrogen(i)),
            8 => Some(self.oxygen(i)),
            9 | 17 | 35 | 53 => Some(self.halogen(i)),
            15 => Some(CrippenType::P),
            16 if self.arom(i) => Some(CrippenType::S3),
            16 if self.charge(i) == 0 => Some(CrippenType::S1),
            16 => Some(CrippenType::S2),
            3 | 11 | 19 | 37 | 55 if self.charge(i) > 0 => Some(CrippenType::Hal),
            3 | 11 | 19 | 37 | 55 => Some(CrippenType::Me1),
            4 | 12 | 20 | 38 | 56 => Some(CrippenType::Me1),
            5 | 13 | 31 | 49 | 81 => Some(CrippenType::Me1),
            14 | 32 | 50 | 82 => Some(CrippenType::Me1),
            33 | 51 | 83 => Some(CrippenType::Me1),
            34 | 52 | 84 => Some(CrippenType::Me1),
            21..=30 | 39..=48 | 72..=80 => Some(CrippenType::Me2),
            _ => None,
        }
    }

    fn halogen(&self, i: usize) -> CrippenType {
        if self.charge(i) != 0 {
            return CrippenType::Hal;
        }
        match self.z(i) {
            9 => CrippenType::F,
            17 => CrippenType::Cl,
            35 => CrippenType::Br,
            _ => CrippenType::I,
        }
    }

    fn aliphatic_carbon(&self, i: usize) -> CrippenType {
        use CrippenType::*;
        let nb = self.neighborhood(i);
        let h = self.h(i);
        let x = self.x(i);
        let count = |list: &[usize], pred: &dyn Fn(usize) -> bool| list.iter().filter(|&&j| pred(j)).count();

        let alc = count(&nb.single, &|j| self.aliphatic(j, 6));
        let ali = count(&nb.single, &|j| !self.arom(j));
        let het = count(&nb.single, &|j| {
            !self.arom(j) && matches!(self.z(j), 7 | 8 | 15 | 16 | 9 | 17 | 35 | 53)
        });
        let arom_nb = count(&nb.single, &|j| self.arom(j));
        let arom_c = count(&nb.single, &|j| self.arom(j) && self.z(j) == 6);
        let dbl_c = count(&nb.double, &|j| self.aliphatic(j, 6));
        let dbl_arom_c = count(&nb.double, &|j| self.arom(j) && self.z(j) == 6);
        let dbl_het = count(&nb.double, &|j| !self.arom(j) && self.z(j) != 6);

        if h == 4 || (h == 3 && alc >= 1) || (h == 2 && alc >= 2) {
            return C1;
        }
        if (h == 1 && alc >= 3) || alc >= 4 {
            return C2;
        }
        if (h == 3 && het >= 1) || (h == 2 && x == 4 && het >= 1 && ali >= 2) {
            return C3;
        }
        if x == 4 && het >= 1 && ((h == 1 && ali >= 3) || (h == 0 && ali >= 4)) {
            return C4;
        }
        if dbl_het >= 1 {
            return C5;
        }
        if dbl_c >= 1 && ((h == 2) || (h == 1 && ali >= 1) || (h == 0 && ali >= 2) || dbl_c >= 2) {
            return C6;
        }
        if x == 2 && nb.triple.iter().any(|&j| !self.arom(j)) {
            return C7;
        }
        if h == 3 && arom_c >= 1 {
            return C8;
        }
        if h == 3 && arom_nb >= 1 {
            return C9;
        }
        if x == 4 && arom_nb >= 1 {
            match h {
                2 => return C10,
                1 => return C11,
                0 => return C12,
                _ => {}
            }
        }
        if dbl_c >= 1
            && ((arom_nb >= 1 && ali >= 1) || (arom_c >= 1 && arom_nb >= 2) || (h == 1 && arom_nb >= 1))
        {
            return C26;
        }
        if dbl_arom_c >= 1 {
            return C26;
        }
        if x == 4
            && nb.single.iter().any(|&j| {
                !self.arom(j) && !matches!(self.z(j), 6 | 7 | 8 | 15 | 16 | 9 | 17 | 35 | 53)
            })
        {
            return C27;
        }
        CS
    }

    fn aromatic_carbon(&self, i: usize) -> CrippenType {
        use CrippenType::*;
        let nb = self.neighborhood(i);
        let h = self.h(i);

        if h == 0
            && nb.strict_single.iter().any(|&j| {
                !self.arom(j) && !matches!(self.z(j), 6 | 7 | 8 | 16 | 9 | 17 | 35 | 53)
            })
        {
            return C13;
        }
        for (halogen, t) in HALOGENS.iter().zip([C14, C15, C16, C17]) {
            if nb.single.iter().any(|&j| self.z(j) == *halogen) {
                return t;
            }
        }
        if h == 1 {
            return C18;
        }
        let ring = nb.aromatic_bond.iter().filter(|&&j| self.arom(j)).count();
        if ring >= 3 {
            return C19;
        }
        if ring >= 2 {
            let exo = |pred: &dyn Fn(usize) -> bool| nb.strict_single.iter().any(|&j| pred(j));
            if exo(&|j| self.arom(j)) {
                return C20;
            }
            if exo(&|j| self.aliphatic(j, 6)) {
                return C21;
            }
            if exo(&|j| self.aliphatic(j, 7)) {
                return C22;
            }
            if exo(&|j| self.aliphatic(j, 8)) {
                return C23;
            }
            if exo(&|j| self.aliphatic(j, 16)) {
                return C24;
            }
            if nb.double.iter().any(|&j| !self.arom(j) && matches!(self.z(j), 6 | 7 | 8)) {
                return C25;
            }
        }
        CS
    }

    fn nitrogen(&self, i: usize) -> CrippenType {
        use CrippenType::*;
        let charge = self.charge(i);
        if self.arom(i) {
            return match charge {
                0 => N11,
                c if c > 0 => N12,
                _ => NS,
            };
        }

        let nb = self.neighborhood(i);
        let h = self.h(i);
        let ali = nb.single.iter().filter(|&&j| !self.arom(j)).count();
        let arom_nb = nb.single.len() - ali;
        let heavy = nb.single.len();

        if charge == 0 {
            if h == 2 && ali >= 1 {
                return N1;
            }
            if h == 1 && ali >= 2 {
                return N2;
            }
            if h == 2 && arom_nb >= 1 {
                return N3;
            }
            if h == 1 && arom_nb >= 1 && heavy >= 2 {
                return N4;
            }
            if h == 1 && !nb.double.is_empty() {
                return N5;
            }
            if !nb.double.is_empty() && heavy >= 1 {
                return N6;
            }
            if ali >= 3 {
                return N7;
            }
            if (arom_nb >= 1 && ali >= 1 && heavy >= 3) || arom_nb >= 3 {
                return N8;
            }
            if nb.triple.iter().any(|&j| !self.arom(j)) {
                return N9;
            }
            return NS;
        }

        if charge > 0 && (1..=3).contains(&h) {
            return N10;
        }
        if charge < 0 {
            return N13;
        }
        if h == 0 {
            let dbl_ali = nb.double.iter().filter(|&&j| !self.arom(j)).count();
            let dbl_c = nb.double.iter().filter(|&&j| self.z(j) == 6).count();
            let dbl_n = nb.double.iter().filter(|&&j| self.z(j) == 7).count();
            let quaternary = ali >= 4;
            let iminium = dbl_ali >= 1 && ali >= 1 && heavy >= 2;
            let cumulated = (dbl_c >= 1 && dbl_n >= 1) || dbl_n >= 2;
            let triple = nb.triple.iter().any(|&j| !self.arom(j));
            if quaternary || iminium || cumulated || triple {
                return N13;
            }
        }
        NS
    }

    fn oxygen(&self, i: usize) -> CrippenType {
        use CrippenType::*;
        if self.arom(i) {
            return O1;
        }
        let h = self.h(i);
        if h == 1 || h == 2 {
            return O2;
        }

        let nb = self.neighborhood(i);
        let ali = nb.single.iter().filter(|&&j| !self.arom(j)).count();
        let arom_nb = nb.single.len() - ali;
        if ali >= 2 {
            return O3;
        }
        if (arom_nb >= 1 && ali >= 1) || arom_nb >= 2 {
            return O4;
        }
        if nb.double.iter().any(|&j| matches!(self.z(j), 7 | 8)) {
            return O5;
        }
        if self.charge(i) == -1 && self.x(i) == 1 {
            if let Some(&j) = nb.single.first() {
                match self.z(j) {
                    7 => return O5,
                    16 => return O6,
                    6 | 8 => {}
                    _ => return O7,
                }
            }
        }
        if nb.double.iter().any(|&j| self.arom(j) && self.z(j) == 6) {
            return O8;
        }
        if let Some(&c) = nb.double.iter().find(|&&j| self.aliphatic(j, 6)) {
            if let Some(t) = self.carbonyl_oxygen(i, c) {
                return t;
            }
        }
        if self.charge(i) == -1
            && nb.single.iter().any(|&c| {
                self.aliphatic(c, 6)
                    && self.mol.bonds_of(c).any(|(o, b)| o != i && b.order == BondOrder::Double && self.z(o) == 8)
            })
        {
            return O12;
        }
        OS
    }

    /// O9–O11 for the oxygen `o` double-bonded to aliphatic carbon `c`.
    fn carbonyl_oxygen(&self, o: usize, c: usize) -> Option<CrippenType> {
        use CrippenType::*;
        let nb = self.neighborhood(c);
        let h = self.h(c);
        let others: Vec<usize> = nb.single.iter().copied().filter(|&j| j != o).collect();
        let any = |pred: &dyn Fn(usize) -> bool| others.iter().any(|&j| pred(j));
        let count = |pred: &dyn Fn(usize) -> bool| others.iter().filter(|&&j| pred(j)).count();

        let alc = count(&|j| self.aliphatic(j, 6));
        let ali = count(&|j| !self.arom(j));
        let o9 = (h == 1 && alc >= 1)
            || alc >= 2
            || (alc >= 1 && ali >= 2)
            || (h == 1 && any(&|j| self.aliphatic(j, 7) || self.aliphatic(j, 8)))
            || h == 2
            || (self.x(c) == 2 && nb.double.iter().any(|&j| j != o && self.z(j) == 8));
        if o9 {
            return Some(O9);
        }

        let aromatic: Vec<usize> = others.iter().copied().filter(|&j| self.arom(j)).collect();
        let aryl_c = aromatic.iter().any(|&j| self.z(j) == 6);
        let carbon_besides = |a: usize| others.iter().any(|&j| j != a && self.z(j) == 6);
        let aliphatic_besides = |a: usize| others.iter().any(|&j| j != a && !self.arom(j));
        let o10 = (h == 1 && aryl_c)
            || aromatic.iter().any(|&a| carbon_besides(a))
            || aromatic.iter().any(|&a| self.z(a) == 6 && aliphatic_besides(a));
        if o10 {
            return Some(O10);
        }

        if count(&|j| self.z(j) != 6) >= 2 {
            return Some(O11);
        }
        None
    }

    /// Type of a hydrogen attached to `parent` (or free, when `None`).
    fn hydrogen_type(&self, parent: Option<usize>) -> CrippenType {
        use CrippenType::*;
        let Some(p) = parent else {
            return HS;
        };
        let zp = self.z(p);
        if zp == 6 || zp == 1 {
            return H1;
        }

        if zp == 8 {
            let nb = self.neighborhood(p);
            let heavy: Vec<usize> = nb.single.iter().chain(&nb.double).copied().collect();
            let has_other_h = self.h(p) >= 2;
            let h2 = heavy.iter().any(|&j| {
                (self.aliphatic(j, 6) && self.x(j) == 4)
                    || (self.arom(j) && self.z(j) == 6)
                    || !matches!(self.z(j), 6 | 7 | 8 | 16)
            }) || has_other_h;
            if h2 {
                return H2;
            }
            if heavy.iter().any(|&j| self.z(j) == 7) {
                return H3;
            }
            let h4 = heavy.iter().any(|&j| {
                (self.aliphatic(j, 6)
                    && self
                        .mol
                        .bonds_of(j)
                        .any(|(k, b)| b.order == BondOrder::Double && matches!(self.z(k), 6 | 7 | 8 | 16)))
                    || self.aliphatic(j, 8)
                    || self.aliphatic(j, 16)
            });
            return if h4 { H4 } else { HS };
        }

        if zp != 7 {
            return H2;
        }
        H3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;
    use micella_core::ErrorKind;
    use CrippenType::*;

    fn descriptors(smiles: &str) -> CrippenDescriptors {
        crippen_descriptors(&parse_smiles(smiles).unwrap()).unwrap()
    }

    fn heavy_types(smiles: &str) -> Vec<CrippenType> {
        crippen_types(&parse_smiles(smiles).unwrap())
            .unwrap()
            .into_iter()
            .map(|t| t[0])
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn ethanol() {
        let d = descriptors("CCO");
        assert!(approx(d.logp, -0.0014), "{}", d.logp);
        assert!(approx(d.mr, 12.7598), "{}", d.mr);
    }

    #[test]
    fn benzene_kekule_and_aromatic_agree() {
        let a = descriptors("c1ccccc1");
        let k = descriptors("C1=CC=CC=C1");
        assert!(approx(a.logp, 1.6866), "{}", a.logp);
        assert!(approx(a.mr, 26.442), "{}", a.mr);
        assert_eq!(a, k);
    }

    #[test]
    fn acetic_acid_and_phenol() {
        assert!(approx(descriptors("CC(=O)O").logp, 0.0909));
        assert!(approx(descriptors("Oc1ccccc1").logp, 1.3922));
    }

    #[test]
    fn carbon_types() {
        assert_eq!(heavy_types("CC(C)(C)C"), vec![C1, C2, C1, C1, C1]);
        assert_eq!(heavy_types("CN"), vec![C3, N1]);
        assert_eq!(heavy_types("C=O"), vec![C5, O9]);
        assert_eq!(heavy_types("C=CC"), vec![C6, C6, C1]);
        assert_eq!(heavy_types("CC#N"), vec![C1, C7, N9]);
        assert_eq!(heavy_types("Cc1ccccc1")[..2], [C8, C21]);
        assert_eq!(heavy_types("Clc1ccccc1")[..2], [Cl, C15]);
        assert_eq!(heavy_types("c1ccc2ccccc2c1")[3], C19);
        assert_eq!(heavy_types("C=Cc1ccccc1")[1], C26);
    }

    #[test]
    fn heteroatom_types() {
        assert_eq!(heavy_types("COC"), vec![C3, O3, C3]);
        assert_eq!(heavy_types("c1ccncc1")[3], N11);
        assert_eq!(heavy_types("c1ccoc1")[3], O1);
        assert_eq!(heavy_types("c1ccsc1")[3], S3);
        assert_eq!(heavy_types("CSC")[1], S1);
        assert_eq!(heavy_types("C[NH3+]")[1], N10);
        assert_eq!(heavy_types("CC(=O)[O-]")[2..], [O9, O12]);
        assert_eq!(heavy_types("C[N+](=O)[O-]")[1..], [N13, O5, O5]);
        assert_eq!(heavy_types("CS(=O)(=O)[O-]")[4], O6);
        assert_eq!(heavy_types("NC(N)=O")[3], O11);
        assert_eq!(heavy_types("O=Cc1ccccc1")[0], O10);
        assert_eq!(heavy_types("[Na+]"), vec![Hal]);
        assert_eq!(heavy_types("[Cl-]"), vec![Hal]);
        assert_eq!(heavy_types("[Fe+2]"), vec![Me2]);
    }

    #[test]
    fn hydrogen_types() {
        let types = crippen_types(&parse_smiles("CC(=O)O").unwrap()).unwrap();
        assert_eq!(types[0][1..], [H1, H1, H1]);
        assert_eq!(types[3][1..], [H4]);
        let types = crippen_types(&parse_smiles("O").unwrap()).unwrap();
        assert_eq!(types[0], vec![O2, H2, H2]);
        let types = crippen_types(&parse_smiles("CN").unwrap()).unwrap();
        assert_eq!(types[1][1..], [H3, H3]);
    }

    #[test]
    fn untyped_atoms_make_descriptors_unavailable() {
        for smiles in ["[Xe]", "[Ar]", "C[Gd]", "[Eu+3]"] {
            let err = crippen_descriptors(&parse_smiles(smiles).unwrap()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DescriptorUnavailable, "{smiles}");
        }
    }
}
