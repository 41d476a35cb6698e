//! Protonation-state normalization in a pH window.
//!
//! Ionizable sites are recognised by local topology and carry a pKa estimate
//! (mean and spread). A site whose pKa interval lies entirely above the
//! window stays protonated, one entirely below is deprotonated, and one that
//! overlaps the window yields both forms, deprotonated first. Forms are
//! enumerated site by site and the list is capped after every site, so with a
//! cap of one the result is a single deterministic variant.

use micella_core::{MicellaError, Result};
use tracing::{debug, warn};

use crate::molecule::{BondOrder, Molecule};
use crate::ring::RingInfo;
use crate::valence::check_valences;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// pH window and enumeration limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtonationConfig {
    pub ph_min: f64,
    pub ph_max: f64,
    /// Upper bound on variants kept after each site.
    pub max_variants: usize,
    /// Multiplier on each site's pKa spread.
    pub pka_precision: f64,
}

impl Default for ProtonationConfig {
    fn default() -> Self {
        ProtonationConfig {
            ph_min: 6.4,
            ph_max: 6.6,
            max_variants: 1,
            pka_precision: 0.1,
        }
    }
}

impl ProtonationConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.ph_min.is_finite() || !self.ph_max.is_finite() {
            return Err(MicellaError::Configuration("pH bounds must be finite".into()));
        }
        if self.ph_min > self.ph_max {
            return Err(MicellaError::Configuration(format!(
                "ph_min ({}) is greater than ph_max ({})",
                self.ph_min, self.ph_max
            )));
        }
        if self.max_variants == 0 {
            return Err(MicellaError::Configuration("max_variants must be at least 1".into()));
        }
        if !self.pka_precision.is_finite() || self.pka_precision < 0.0 {
            return Err(MicellaError::Configuration(format!(
                "pka_precision must be a non-negative number, got {}",
                self.pka_precision
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Site classes
// ---------------------------------------------------------------------------

/// Ionizable group classes, in the order sites are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SiteKind {
    CarboxylicAcid,
    SulfonicAcid,
    PhosphateFirst,
    PhosphateSecond,
    ThioicAcid,
    AromaticThiol,
    Thiol,
    Phenol,
    Tetrazole,
    RingImide,
    OpenImide,
    Sulfonamide,
    AliphaticAmine,
    Amidine,
    Aniline,
    PyridineNitrogen,
    Imidazole,
}

impl SiteKind {
    pub const ALL: [SiteKind; 17] = [
        SiteKind::CarboxylicAcid,
        SiteKind::SulfonicAcid,
        SiteKind::PhosphateFirst,
        SiteKind::PhosphateSecond,
        SiteKind::ThioicAcid,
        SiteKind::AromaticThiol,
        SiteKind::Thiol,
        SiteKind::Phenol,
        SiteKind::Tetrazole,
        SiteKind::RingImide,
        SiteKind::OpenImide,
        SiteKind::Sulfonamide,
        SiteKind::AliphaticAmine,
        SiteKind::Amidine,
        SiteKind::Aniline,
        SiteKind::PyridineNitrogen,
        SiteKind::Imidazole,
    ];

    /// (pKa mean, pKa spread).
    pub fn pka(self) -> (f64, f64) {
        match self {
            SiteKind::CarboxylicAcid => (3.46, 1.25),
            SiteKind::SulfonicAcid => (-1.82, 1.4),
            SiteKind::PhosphateFirst => (2.4, 1.1),
            SiteKind::PhosphateSecond => (7.2, 0.5),
            SiteKind::ThioicAcid => (0.68, 1.06),
            SiteKind::AromaticThiol => (4.98, 2.6),
            SiteKind::Thiol => (9.12, 1.33),
            SiteKind::Phenol => (7.07, 1.4),
            SiteKind::Tetrazole => (4.89, 0.8),
            SiteKind::RingImide => (6.45, 0.95),
            SiteKind::OpenImide => (9.6, 1.0),
            SiteKind::Sulfonamide => (7.92, 1.4),
            SiteKind::AliphaticAmine => (8.16, 2.16),
            SiteKind::Amidine => (12.0, 1.5),
            SiteKind::Aniline => (4.0, 1.0),
            SiteKind::PyridineNitrogen => (4.35, 2.0),
            SiteKind::Imidazole => (6.95, 0.5),
        }
    }

    /// Acids lose a proton when ionized; bases gain one.
    pub fn is_acid(self) -> bool {
        !matches!(
            self,
            SiteKind::AliphaticAmine
                | SiteKind::Amidine
                | SiteKind::Aniline
                | SiteKind::PyridineNitrogen
                | SiteKind::Imidazole
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            SiteKind::CarboxylicAcid => "carboxylic acid",
            SiteKind::SulfonicAcid => "sulfonic acid",
            SiteKind::PhosphateFirst => "phosphate (first OH)",
            SiteKind::PhosphateSecond => "phosphate (second OH)",
            SiteKind::ThioicAcid => "thioic acid",
            SiteKind::AromaticThiol => "aromatic thiol",
            SiteKind::Thiol => "thiol",
            SiteKind::Phenol => "phenol",
            SiteKind::Tetrazole => "tetrazole",
            SiteKind::RingImide => "ring imide",
            SiteKind::OpenImide => "open-chain imide",
            SiteKind::Sulfonamide => "sulfonamide",
            SiteKind::AliphaticAmine => "aliphatic amine",
            SiteKind::Amidine => "amidine/guanidine",
            SiteKind::Aniline => "aniline",
            SiteKind::PyridineNitrogen => "pyridine nitrogen",
            SiteKind::Imidazole => "imidazole",
        }
    }
}

/// Dominant form(s) of a site within the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteState {
    Protonated,
    Deprotonated,
    Both,
}

impl SiteState {
    /// Forms to enumerate, deprotonated first. `true` means protonated.
    fn forms(self) -> &'static [bool] {
        match self {
            SiteState::Protonated => &[true],
            SiteState::Deprotonated => &[false],
            SiteState::Both => &[false, true],
        }
    }
}

/// An ionizable site: the atom whose hydrogen count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub kind: SiteKind,
    pub atom: usize,
}

impl Site {
    pub fn state(&self, config: &ProtonationConfig) -> SiteState {
        let (mean, spread) = self.kind.pka();
        let half = config.pka_precision * spread;
        if mean - half > config.ph_max {
            SiteState::Protonated
        } else if mean + half < config.ph_min {
            SiteState::Deprotonated
        } else {
            SiteState::Both
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Normalize a structure to its first protonation variant in the window.
pub fn normalize_protonation(mol: &Molecule, config: &ProtonationConfig) -> Result<Molecule> {
    enumerate_variants(mol, config)?
        .into_iter()
        .next()
        .ok_or_else(|| MicellaError::InvalidStructure("protonation produced no variants".into()))
}

/// Enumerate protonation variants, at most `config.max_variants` of them.
pub fn enumerate_variants(mol: &Molecule, config: &ProtonationConfig) -> Result<Vec<Molecule>> {
    config.validate()?;
    let reference = neutralize(mol);
    let rings = RingInfo::new(&reference);
    let sites = find_sites(&reference, &rings);

    let mut variants = vec![reference];
    let mut dropped = 0usize;
    for site in &sites {
        let state = site.state(config);
        debug!(site = site.kind.name(), atom = site.atom, ?state, "ionizable site");
        let mut next = Vec::with_capacity(variants.len() * 2);
        for variant in &variants {
            for &protonated in state.forms() {
                next.push(apply_form(variant, site, protonated));
            }
        }
        if next.len() > config.max_variants {
            dropped += next.len() - config.max_variants;
            next.truncate(config.max_variants);
        }
        variants = next;
    }
    if dropped > 0 {
        warn!(dropped, kept = variants.len(), "protonation variants truncated to the configured cap");
    }

    for variant in &variants {
        check_valences(variant)?;
    }
    debug!(sites = sites.len(), variants = variants.len(), "protonation enumerated");
    Ok(variants)
}

/// Reduce charged acid/base groups to their neutral reference form.
///
/// Negative N/O/S gain a proton and protonated nitrogens lose one, unless the
/// charge is balanced by a directly bonded counter-charge (nitro, N-oxide).
pub fn neutralize(mol: &Molecule) -> Molecule {
    let mut out = mol.clone();
    for (i, atom) in mol.atoms.iter().enumerate() {
        let bonded_counter_charge = mol
            .neighbors(i)
            .into_iter()
            .any(|n| mol.atoms[n].formal_charge.signum() == -atom.formal_charge.signum());
        if bonded_counter_charge {
            continue;
        }
        match (atom.atomic_number, atom.formal_charge) {
            (7 | 8 | 16, -1) => {
                out.atoms[i].formal_charge = 0;
                out.atoms[i].implicit_hydrogens += 1;
            }
            (7, 1) if atom.implicit_hydrogens > 0 => {
                out.atoms[i].formal_charge = 0;
                out.atoms[i].implicit_hydrogens -= 1;
            }
            _ => {}
        }
    }
    out
}

/// Ionizable sites in enumeration order: by class, then by atom index.
pub fn find_sites(mol: &Molecule, rings: &RingInfo) -> Vec<Site> {
    let env = Env { mol, rings };
    let mut claimed = vec![false; mol.atom_count()];
    let mut sites = Vec::new();
    for kind in SiteKind::ALL {
        for atom in 0..mol.atom_count() {
            if !claimed[atom] && env.matches(kind, atom) {
                claimed[atom] = true;
                sites.push(Site { kind, atom });
            }
        }
    }
    sites
}

fn apply_form(mol: &Molecule, site: &Site, protonated: bool) -> Molecule {
    let mut out = mol.clone();
    let atom = &mut out.atoms[site.atom];
    match (site.kind.is_acid(), protonated) {
        (true, false) => {
            atom.implicit_hydrogens -= 1;
            atom.formal_charge -= 1;
        }
        (false, true) => {
            atom.implicit_hydrogens += 1;
            atom.formal_charge += 1;
        }
        _ => {}
    }
    out
}

// ---------------------------------------------------------------------------
// Topology predicates
// ---------------------------------------------------------------------------

struct Env<'a> {
    mol: &'a Molecule,
    rings: &'a RingInfo,
}

impl Env<'_> {
    fn z(&self, i: usize) -> u8 {
        self.mol.atoms[i].atomic_number
    }

    fn h(&self, i: usize) -> u8 {
        self.mol.atoms[i].implicit_hydrogens
    }

    fn neutral(&self, i: usize) -> bool {
        self.mol.atoms[i].formal_charge == 0
    }

    fn aromatic(&self, i: usize) -> bool {
        self.mol.atoms[i].is_aromatic
    }

    fn heavy_neighbors(&self, i: usize) -> Vec<usize> {
        self.mol
            .neighbors(i)
            .into_iter()
            .filter(|&n| self.z(n) != 1)
            .collect()
    }

    /// Neighbours joined by a double bond with the given element.
    fn double_partners(&self, i: usize, element: u8) -> usize {
        self.mol
            .bonds_of(i)
            .filter(|(n, b)| b.order == BondOrder::Double && self.z(*n) == element)
            .count()
    }

    fn only_single_bonds(&self, i: usize) -> bool {
        self.mol.bonds_of(i).all(|(_, b)| b.order == BondOrder::Single)
    }

    /// Neutral heteroatom carrying a hydrogen, bonded to one heavy atom.
    fn terminal_xh(&self, i: usize, element: u8) -> Option<usize> {
        if self.z(i) != element || !self.neutral(i) || self.h(i) == 0 || self.aromatic(i) {
            return None;
        }
        match self.heavy_neighbors(i).as_slice() {
            [parent] if self.mol.get_bond(i, *parent).is_some_and(|b| b.order == BondOrder::Single) => Some(*parent),
            _ => None,
        }
    }

    fn is_carbonyl_carbon(&self, c: usize) -> bool {
        self.z(c) == 6 && self.double_partners(c, 8) > 0
    }

    fn is_sulfonyl(&self, s: usize) -> bool {
        self.z(s) == 16 && self.double_partners(s, 8) >= 2
    }

    /// sp3 carbon: neutral, non-aromatic, single bonds only.
    fn is_sp3_carbon(&self, c: usize) -> bool {
        self.z(c) == 6 && !self.aromatic(c) && self.neutral(c) && self.only_single_bonds(c)
    }

    fn matches(&self, kind: SiteKind, i: usize) -> bool {
        match kind {
            SiteKind::CarboxylicAcid => self
                .terminal_xh(i, 8)
                .is_some_and(|c| !self.aromatic(c) && self.is_carbonyl_carbon(c)),
            SiteKind::SulfonicAcid => self.terminal_xh(i, 8).is_some_and(|s| self.is_sulfonyl(s)),
            SiteKind::PhosphateFirst => self.phosphate_oh_rank(i) == Some(0),
            SiteKind::PhosphateSecond => self.phosphate_oh_rank(i) == Some(1),
            SiteKind::ThioicAcid => {
                let sh = self
                    .terminal_xh(i, 16)
                    .is_some_and(|c| self.z(c) == 6 && self.double_partners(c, 8) + self.double_partners(c, 16) > 0);
                let oh = self
                    .terminal_xh(i, 8)
                    .is_some_and(|c| self.z(c) == 6 && self.double_partners(c, 16) > 0);
                sh || oh
            }
            SiteKind::AromaticThiol => self
                .terminal_xh(i, 16)
                .is_some_and(|c| self.z(c) == 6 && self.aromatic(c)),
            SiteKind::Thiol => self.terminal_xh(i, 16).is_some_and(|c| self.is_sp3_carbon(c)),
            SiteKind::Phenol => self
                .terminal_xh(i, 8)
                .is_some_and(|c| self.z(c) == 6 && self.aromatic(c)),
            SiteKind::Tetrazole => self.is_tetrazole_nh(i),
            SiteKind::RingImide => self.is_imide_nh(i) && self.rings.is_ring_atom(i),
            SiteKind::OpenImide => self.is_imide_nh(i) && !self.rings.is_ring_atom(i),
            SiteKind::Sulfonamide => {
                self.z(i) == 7
                    && self.neutral(i)
                    && self.h(i) > 0
                    && !self.aromatic(i)
                    && self.heavy_neighbors(i).into_iter().any(|s| self.is_sulfonyl(s))
            }
            SiteKind::AliphaticAmine => self.is_amine(i, false),
            SiteKind::Amidine => self.is_amidine_imine(i),
            SiteKind::Aniline => self.is_amine(i, true),
            SiteKind::PyridineNitrogen => {
                self.is_pyridine_like(i) && self.rings.smallest_ring_size(i) == Some(6)
            }
            SiteKind::Imidazole => self.is_pyridine_like(i) && self.is_imidazole_n(i),
        }
    }

    /// Rank of an acidic OH among the OH groups of a P(=O) centre.
    fn phosphate_oh_rank(&self, i: usize) -> Option<usize> {
        let p = self.terminal_xh(i, 8)?;
        if self.z(p) != 15 || self.double_partners(p, 8) == 0 {
            return None;
        }
        self.mol
            .neighbors(p)
            .into_iter()
            .filter(|&o| self.terminal_xh(o, 8) == Some(p))
            .position(|o| o == i)
    }

    fn is_imide_nh(&self, i: usize) -> bool {
        if self.z(i) != 7 || !self.neutral(i) || self.h(i) == 0 {
            return false;
        }
        self.heavy_neighbors(i)
            .into_iter()
            .filter(|&c| self.is_carbonyl_carbon(c))
            .count()
            >= 2
    }

    fn is_tetrazole_nh(&self, i: usize) -> bool {
        if self.z(i) != 7 || !self.aromatic(i) || !self.neutral(i) || self.h(i) == 0 {
            return false;
        }
        self.rings.rings.iter().any(|r| {
            r.len() == 5 && r.contains(&i) && r.iter().filter(|&&a| self.z(a) == 7).count() == 4
        })
    }

    /// Neutral trivalent nitrogen with single bonds to sp3 carbons, and for
    /// anilines exactly one aromatic carbon.
    fn is_amine(&self, i: usize, aniline: bool) -> bool {
        if self.z(i) != 7 || !self.neutral(i) || self.aromatic(i) || !self.only_single_bonds(i) {
            return false;
        }
        let heavy = self.heavy_neighbors(i);
        if heavy.is_empty() || heavy.len() + self.h(i) as usize != 3 {
            return false;
        }
        let aryl = heavy
            .iter()
            .filter(|&&c| self.z(c) == 6 && self.aromatic(c))
            .count();
        let alkyl = heavy.iter().filter(|&&c| self.is_sp3_carbon(c)).count();
        if aniline {
            aryl == 1 && alkyl + 1 == heavy.len()
        } else {
            aryl == 0 && alkyl == heavy.len()
        }
    }

    /// Imine nitrogen of an amidine or guanidine, not acylated or oxidised.
    fn is_amidine_imine(&self, i: usize) -> bool {
        if self.z(i) != 7 || !self.neutral(i) || self.aromatic(i) {
            return false;
        }
        let Some(c) = self
            .mol
            .bonds_of(i)
            .find(|(n, b)| b.order == BondOrder::Double && self.z(*n) == 6)
            .map(|(n, _)| n)
        else {
            return false;
        };
        if self.aromatic(c) {
            return false;
        }
        let deactivated = |n: usize| self.z(n) != 6 || self.is_carbonyl_carbon(n);
        if self.heavy_neighbors(i).into_iter().filter(|&n| n != c).any(deactivated) {
            return false;
        }
        self.mol.bonds_of(c).any(|(n, b)| {
            n != i
                && b.order == BondOrder::Single
                && self.z(n) == 7
                && self.neutral(n)
                && !self.aromatic(n)
                && self
                    .heavy_neighbors(n)
                    .into_iter()
                    .all(|m| m == c || !(self.is_carbonyl_carbon(m) || self.is_sulfonyl(m)))
        })
    }

    fn is_pyridine_like(&self, i: usize) -> bool {
        self.z(i) == 7 && self.aromatic(i) && self.neutral(i) && self.h(i) == 0 && self.mol.degree(i) == 2
    }

    /// Five-membered ring with a second, pyrrole-type nitrogen two bonds away.
    fn is_imidazole_n(&self, i: usize) -> bool {
        self.rings.rings.iter().any(|r| {
            if r.len() != 5 || !r.contains(&i) {
                return false;
            }
            let nitrogens: Vec<usize> = r.iter().copied().filter(|&a| self.z(a) == 7).collect();
            if nitrogens.len() != 2 {
                return false;
            }
            nitrogens.into_iter().filter(|&a| a != i).any(|other| {
                let pyrrole_type = self.h(other) > 0 || self.mol.degree(other) == 3;
                pyrrole_type && self.mol.get_bond(i, other).is_none()
            })
        })
    }
}
