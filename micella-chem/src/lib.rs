//! Structure handling for the micella workspace.
//!
//! Parses SMILES into a molecular graph, perceives aromaticity, normalizes
//! protonation to a target pH window, disconnects metals and computes Crippen
//! logP/MR contributions.
//!
//! # Example
//!
//! ```
//! use micella_chem::{crippen_descriptors, normalize_protonation, parse_smiles, ProtonationConfig};
//!
//! let acid = parse_smiles("CC(=O)O").unwrap();
//! let ionized = normalize_protonation(&acid, &ProtonationConfig::default()).unwrap();
//! assert_eq!(ionized.net_charge(), -1);
//!
//! let desc = crippen_descriptors(&ionized).unwrap();
//! assert!(desc.mr > 0.0);
//! ```

pub mod aromaticity;
pub mod crippen;
pub mod element;
pub mod molecule;
pub mod protonate;
pub mod smiles;
pub mod standardize;
pub mod valence;
pub mod writer;

mod ring;

pub use crippen::{crippen_descriptors, crippen_types, CrippenDescriptors, CrippenType};
pub use element::{element_by_number, element_by_symbol, Element};
pub use molecule::{Bond, BondOrder, MolAtom, Molecule};
pub use protonate::{enumerate_variants, normalize_protonation, ProtonationConfig, SiteKind};
pub use ring::RingInfo;
pub use smiles::{parse_smiles, parse_smiles_named};
pub use standardize::disconnect_metals;
pub use writer::write_smiles;
