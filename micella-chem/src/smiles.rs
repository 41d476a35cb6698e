//! SMILES string parser.
//!
//! Produces a validated molecular graph: implicit hydrogens assigned, plain
//! `[H]` atoms folded into their parents, valences checked and Kekulé rings
//! perceived as aromatic.

use std::collections::BTreeMap;

use micella_core::{MicellaError, Result};
use tracing::debug;

use crate::aromaticity::perceive_aromaticity;
use crate::element::element_by_symbol;
use crate::molecule::{Bond, BondOrder, MolAtom, Molecule};
use crate::ring::RingInfo;
use crate::valence::{assign_implicit_hydrogens, check_valences, fold_explicit_hydrogens};

/// Parse a SMILES string into a `Molecule`.
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    parse_smiles_named(smiles, "")
}

/// Parse a SMILES string into a `Molecule` with a given name.
pub fn parse_smiles_named(smiles: &str, name: &str) -> Result<Molecule> {
    let smiles = smiles.trim();
    if smiles.is_empty() {
        return Err(invalid("empty SMILES"));
    }

    let mut parser = SmilesParser::new(smiles);
    parser.parse()?;
    parser.finish()?;

    let mut mol = Molecule::new(name.to_string(), parser.atoms, parser.bonds);
    assign_implicit_hydrogens(&mut mol, &parser.bracketed)?;
    let mut mol = fold_explicit_hydrogens(&mol)?;
    check_valences(&mol)?;
    let rings = RingInfo::new(&mol);
    perceive_aromaticity(&mut mol, &rings)?;

    debug!(
        smiles,
        atoms = mol.atom_count(),
        bonds = mol.bond_count(),
        rings = rings.rings.len(),
        "parsed structure"
    );
    Ok(mol)
}

fn invalid(msg: impl Into<String>) -> MicellaError {
    MicellaError::InvalidStructure(msg.into())
}

struct SmilesParser<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<MolAtom>,
    bonds: Vec<Bond>,
    /// bracketed[atom_idx] is true when the hydrogen count was written explicitly
    bracketed: Vec<bool>,
    /// Open ring closures: digit -> (atom_idx, bond symbol at the opening)
    ring_closures: BTreeMap<u16, (usize, Option<BondOrder>)>,
    /// Atom indices saved at each open '('
    stack: Vec<usize>,
    prev_atom: Option<usize>,
    pending_bond: Option<BondOrder>,
}

impl<'a> SmilesParser<'a> {
    fn new(input: &'a str) -> Self {
        SmilesParser {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            bracketed: Vec::new(),
            ring_closures: BTreeMap::new(),
            stack: Vec::new(),
            prev_atom: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn set_bond(&mut self, order: BondOrder) -> Result<()> {
        if self.pending_bond.is_some() {
            return Err(invalid(format!("two bond symbols in a row at position {}", self.pos)));
        }
        if self.prev_atom.is_none() {
            return Err(invalid(format!("bond symbol without a preceding atom at position {}", self.pos)));
        }
        self.pending_bond = Some(order);
        Ok(())
    }

    fn parse(&mut self) -> Result<()> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    if self.pos > 0 && self.input[self.pos - 1] == b'(' {
                        return Err(invalid(format!("empty branch at position {}", self.pos)));
                    }
                    let prev = self
                        .prev_atom
                        .ok_or_else(|| invalid(format!("branch without a preceding atom at position {}", self.pos)))?;
                    self.advance();
                    self.stack.push(prev);
                }
                b')' => {
                    if self.pending_bond.is_some() {
                        return Err(invalid(format!("dangling bond before ')' at position {}", self.pos)));
                    }
                    if self.pos > 0 && self.input[self.pos - 1] == b'(' {
                        return Err(invalid(format!("empty branch at position {}", self.pos)));
                    }
                    self.advance();
                    let top = self
                        .stack
                        .pop()
                        .ok_or_else(|| invalid(format!("unmatched ')' at position {}", self.pos - 1)))?;
                    self.prev_atom = Some(top);
                }
                b'-' => {
                    self.set_bond(BondOrder::Single)?;
                    self.advance();
                }
                b'=' => {
                    self.set_bond(BondOrder::Double)?;
                    self.advance();
                }
                b'#' => {
                    self.set_bond(BondOrder::Triple)?;
                    self.advance();
                }
                b':' => {
                    self.set_bond(BondOrder::Aromatic)?;
                    self.advance();
                }
                b'/' | b'\\' => {
                    // Directional single bonds: geometry is not kept
                    self.set_bond(BondOrder::Single)?;
                    self.advance();
                }
                b'%' => {
                    self.advance();
                    let ring_num = self.parse_two_digit_ring()?;
                    self.handle_ring_closure(ring_num)?;
                }
                b'[' => self.parse_bracket_atom()?,
                b'0'..=b'9' => {
                    self.advance();
                    self.handle_ring_closure((ch - b'0') as u16)?;
                }
                b'.' => {
                    if self.pending_bond.is_some() {
                        return Err(invalid(format!("dangling bond before '.' at position {}", self.pos)));
                    }
                    if !self.stack.is_empty() {
                        return Err(invalid(format!("'.' inside a branch at position {}", self.pos)));
                    }
                    self.advance();
                    self.prev_atom = None;
                }
                ch if is_organic_atom_start(ch) => self.parse_organic_atom()?,
                ch => {
                    return Err(invalid(format!(
                        "unexpected character '{}' at position {}",
                        ch as char, self.pos
                    )));
                }
            }
        }
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        if self.pending_bond.is_some() {
            return Err(invalid("SMILES ends with a bond symbol"));
        }
        if !self.ring_closures.is_empty() {
            let open: Vec<_> = self.ring_closures.keys().collect();
            return Err(invalid(format!("unclosed ring bond(s): {open:?}")));
        }
        if !self.stack.is_empty() {
            return Err(invalid(format!("{} unclosed '(' in SMILES", self.stack.len())));
        }
        Ok(())
    }

    fn parse_organic_atom(&mut self) -> Result<()> {
        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Err(invalid("unexpected end of SMILES"));
        };
        let is_aromatic = ch.is_ascii_lowercase();

        let symbol = match ch {
            b'B' if self.peek() == Some(b'r') => {
                self.advance();
                "Br"
            }
            b'C' if self.peek() == Some(b'l') => {
                self.advance();
                "Cl"
            }
            b'B' | b'b' => "B",
            b'C' | b'c' => "C",
            b'N' | b'n' => "N",
            b'O' | b'o' => "O",
            b'P' | b'p' => "P",
            b'S' | b's' => "S",
            b'F' => "F",
            b'I' => "I",
            _ => {
                return Err(invalid(format!(
                    "unknown organic-subset atom '{}' at position {start}",
                    ch as char
                )));
            }
        };

        let elem = element_by_symbol(symbol).ok_or_else(|| invalid(format!("unknown element '{symbol}'")))?;
        let mut atom = MolAtom::new(elem.atomic_number);
        atom.is_aromatic = is_aromatic;
        self.push_atom(atom, false)
    }

    fn parse_bracket_atom(&mut self) -> Result<()> {
        let open = self.pos;
        self.advance(); // '['

        let isotope = self.parse_optional_number();

        let ch = self
            .advance()
            .ok_or_else(|| invalid("unexpected end of SMILES in bracket atom"))?;
        if !ch.is_ascii_alphabetic() {
            return Err(invalid(format!("expected element symbol in bracket atom at position {open}")));
        }
        let is_aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase() as char;

        // Two-letter symbols take precedence when they name a real element
        let mut symbol = String::from(upper);
        if let Some(next) = self.peek().filter(u8::is_ascii_lowercase) {
            let two_letter = format!("{upper}{}", next as char);
            if element_by_symbol(&two_letter).is_some() {
                self.advance();
                symbol = two_letter;
            }
        }

        let elem = element_by_symbol(&symbol)
            .ok_or_else(|| invalid(format!("unknown element '{symbol}' at position {open}")))?;
        if is_aromatic && !matches!(elem.atomic_number, 5 | 6 | 7 | 8 | 15 | 16 | 33 | 34 | 52) {
            return Err(invalid(format!("element '{symbol}' cannot be aromatic")));
        }

        // Chirality: @, @@, @TH1, @OH12 ... carries no information we keep
        while self.peek() == Some(b'@') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_uppercase() && c != b'H') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.advance();
            hydrogens = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.advance();
                    d - b'0'
                }
                _ => 1,
            };
        }

        let charge = self.parse_charge()?;

        // Atom class ":n"
        if self.peek() == Some(b':') {
            self.advance();
            if self.parse_optional_number().is_none() {
                return Err(invalid(format!("expected atom class number in bracket atom at position {open}")));
            }
        }

        if self.advance() != Some(b']') {
            return Err(invalid(format!("expected ']' to close bracket atom opened at position {open}")));
        }

        let mut atom = MolAtom::new(elem.atomic_number);
        atom.formal_charge = charge;
        atom.isotope = isotope.map(|n| n.min(u16::MAX as u32) as u16);
        atom.is_aromatic = is_aromatic;
        atom.implicit_hydrogens = hydrogens;
        self.push_atom(atom, true)
    }

    fn parse_charge(&mut self) -> Result<i8> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.advance();
        if let Some(d) = self.peek().filter(u8::is_ascii_digit) {
            self.advance();
            let magnitude = (d - b'0') as i8;
            if magnitude > 7 {
                return Err(invalid(format!("charge magnitude {magnitude} out of range")));
            }
            return Ok(sign * magnitude);
        }
        let mut magnitude = 1i8;
        while self.peek() == symbol {
            self.advance();
            magnitude += 1;
            if magnitude > 7 {
                return Err(invalid("charge out of range"));
            }
        }
        Ok(sign * magnitude)
    }

    fn parse_optional_number(&mut self) -> Option<u32> {
        let mut n: u32 = 0;
        let mut found = false;
        while let Some(ch) = self.peek().filter(u8::is_ascii_digit) {
            self.advance();
            n = n.saturating_mul(10).saturating_add((ch - b'0') as u32);
            found = true;
        }
        found.then_some(n)
    }

    fn parse_two_digit_ring(&mut self) -> Result<u16> {
        let d1 = self.advance().filter(u8::is_ascii_digit);
        let d2 = self.advance().filter(u8::is_ascii_digit);
        match (d1, d2) {
            (Some(a), Some(b)) => Ok((a - b'0') as u16 * 10 + (b - b'0') as u16),
            _ => Err(invalid("expected two digits after '%'")),
        }
    }

    fn push_atom(&mut self, atom: MolAtom, bracketed: bool) -> Result<()> {
        let atom_idx = self.atoms.len();
        self.atoms.push(atom);
        self.bracketed.push(bracketed);
        if let Some(prev) = self.prev_atom {
            let order = self.resolve_order(prev, atom_idx, self.pending_bond);
            self.bonds.push(Bond::new(prev, atom_idx, order));
        }
        self.pending_bond = None;
        self.prev_atom = Some(atom_idx);
        Ok(())
    }

    /// Unwritten bonds between two aromatic atoms are aromatic, otherwise single.
    fn resolve_order(&self, a: usize, b: usize, written: Option<BondOrder>) -> BondOrder {
        written.unwrap_or(if self.atoms[a].is_aromatic && self.atoms[b].is_aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        })
    }

    fn handle_ring_closure(&mut self, ring_num: u16) -> Result<()> {
        let current = self
            .prev_atom
            .ok_or_else(|| invalid(format!("ring bond {ring_num} without a preceding atom")))?;

        let Some((open_atom, open_bond)) = self.ring_closures.remove(&ring_num) else {
            self.ring_closures.insert(ring_num, (current, self.pending_bond.take()));
            return Ok(());
        };

        let written = match (open_bond, self.pending_bond.take()) {
            (Some(a), Some(b)) if a != b => {
                return Err(invalid(format!("ring bond {ring_num} has conflicting bond symbols")));
            }
            (a, b) => a.or(b),
        };
        if open_atom == current {
            return Err(invalid(format!("ring bond {ring_num} closes on its own atom")));
        }
        if self
            .bonds
            .iter()
            .any(|b| (b.atom1 == open_atom && b.atom2 == current) || (b.atom1 == current && b.atom2 == open_atom))
        {
            return Err(invalid(format!("ring bond {ring_num} duplicates an existing bond")));
        }
        let order = self.resolve_order(open_atom, current, written);
        self.bonds.push(Bond::new(open_atom, current, order));
        Ok(())
    }
}

fn is_organic_atom_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I' | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use micella_core::ContentAddressable;
    use proptest::prelude::*;

    /// Chains of aliphatic organic-subset atoms, always valid.
    fn simple_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![Just("C"), Just("N"), Just("O"), Just("S"), Just("Cl"), Just("C(C)")];
        proptest::collection::vec(atoms, 1..=20).prop_map(|parts| parts.join(""))
    }

    proptest! {
        #[test]
        fn parse_smiles_does_not_panic(s in "\\PC{0,100}") {
            let _ = parse_smiles(&s);
        }

        #[test]
        fn parse_smiles_does_not_panic_on_smiles_alphabet(s in "[CNOSPcnos0-9()=#\\[\\]+\\-@H%.]{0,40}") {
            let _ = parse_smiles(&s);
        }

        #[test]
        fn parsing_is_deterministic(smi in simple_smiles()) {
            if let Ok(mol) = parse_smiles(&smi) {
                prop_assert!(mol.atom_count() > 0);
                prop_assert_eq!(mol.content_hash(), parse_smiles(&smi).unwrap().content_hash());
            }
        }
    }
}
