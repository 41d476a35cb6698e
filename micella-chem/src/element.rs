//! Periodic table data and element lookup.

/// A chemical element from the periodic table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub atomic_weight: f64,
}

/// Highest atomic number in the table (radon).
pub const MAX_ATOMIC_NUMBER: u8 = 86;

/// Elements 1–86 (H through Rn).
static ELEMENTS: [Element; 86] = [
    Element { atomic_number: 1, symbol: "H", name: "Hydrogen", atomic_weight: 1.008 },
    Element { atomic_number: 2, symbol: "He", name: "Helium", atomic_weight: 4.003 },
    Element { atomic_number: 3, symbol: "Li", name: "Lithium", atomic_weight: 6.941 },
    Element { atomic_number: 4, symbol: "Be", name: "Beryllium", atomic_weight: 9.012 },
    Element { atomic_number: 5, symbol: "B", name: "Boron", atomic_weight: 10.81 },
    Element { atomic_number: 6, symbol: "C", name: "Carbon", atomic_weight: 12.011 },
    Element { atomic_number: 7, symbol: "N", name: "Nitrogen", atomic_weight: 14.007 },
    Element { atomic_number: 8, symbol: "O", name: "Oxygen", atomic_weight: 15.999 },
    Element { atomic_number: 9, symbol: "F", name: "Fluorine", atomic_weight: 18.998 },
    Element { atomic_number: 10, symbol: "Ne", name: "Neon", atomic_weight: 20.180 },
    Element { atomic_number: 11, symbol: "Na", name: "Sodium", atomic_weight: 22.990 },
    Element { atomic_number: 12, symbol: "Mg", name: "Magnesium", atomic_weight: 24.305 },
    Element { atomic_number: 13, symbol: "Al", name: "Aluminum", atomic_weight: 26.982 },
    Element { atomic_number: 14, symbol: "Si", name: "Silicon", atomic_weight: 28.086 },
    Element { atomic_number: 15, symbol: "P", name: "Phosphorus", atomic_weight: 30.974 },
    Element { atomic_number: 16, symbol: "S", name: "Sulfur", atomic_weight: 32.06 },
    Element { atomic_number: 17, symbol: "Cl", name: "Chlorine", atomic_weight: 35.45 },
    Element { atomic_number: 18, symbol: "Ar", name: "Argon", atomic_weight: 39.948 },
    Element { atomic_number: 19, symbol: "K", name: "Potassium", atomic_weight: 39.098 },
    Element { atomic_number: 20, symbol: "Ca", name: "Calcium", atomic_weight: 40.078 },
    Element { atomic_number: 21, symbol: "Sc", name: "Scandium", atomic_weight: 44.956 },
    Element { atomic_number: 22, symbol: "Ti", name: "Titanium", atomic_weight: 47.867 },
    Element { atomic_number: 23, symbol: "V", name: "Vanadium", atomic_weight: 50.942 },
    Element { atomic_number: 24, symbol: "Cr", name: "Chromium", atomic_weight: 51.996 },
    Element { atomic_number: 25, symbol: "Mn", name: "Manganese", atomic_weight: 54.938 },
    Element { atomic_number: 26, symbol: "Fe", name: "Iron", atomic_weight: 55.845 },
    Element { atomic_number: 27, symbol: "Co", name: "Cobalt", atomic_weight: 58.933 },
    Element { atomic_number: 28, symbol: "Ni", name: "Nickel", atomic_weight: 58.693 },
    Element { atomic_number: 29, symbol: "Cu", name: "Copper", atomic_weight: 63.546 },
    Element { atomic_number: 30, symbol: "Zn", name: "Zinc", atomic_weight: 65.38 },
    Element { atomic_number: 31, symbol: "Ga", name: "Gallium", atomic_weight: 69.723 },
    Element { atomic_number: 32, symbol: "Ge", name: "Germanium", atomic_weight: 72.63 },
    Element { atomic_number: 33, symbol: "As", name: "Arsenic", atomic_weight: 74.922 },
    Element { atomic_number: 34, symbol: "Se", name: "Selenium", atomic_weight: 78.96 },
    Element { atomic_number: 35, symbol: "Br", name: "Bromine", atomic_weight: 79.904 },
    Element { atomic_number: 36, symbol: "Kr", name: "Krypton", atomic_weight: 83.798 },
    Element { atomic_number: 37, symbol: "Rb", name: "Rubidium", atomic_weight: 85.468 },
    Element { atomic_number: 38, symbol: "Sr", name: "Strontium", atomic_weight: 87.62 },
    Element { atomic_number: 39, symbol: "Y", name: "Yttrium", atomic_weight: 88.906 },
    Element { atomic_number: 40, symbol: "Zr", name: "Zirconium", atomic_weight: 91.224 },
    Element { atomic_number: 41, symbol: "Nb", name: "Niobium", atomic_weight: 92.906 },
    Element { atomic_number: 42, symbol: "Mo", name: "Molybdenum", atomic_weight: 95.95 },
    Element { atomic_number: 43, symbol: "Tc", name: "Technetium", atomic_weight: 98.0 },
    Element { atomic_number: 44, symbol: "Ru", name: "Ruthenium", atomic_weight: 101.07 },
    Element { atomic_number: 45, symbol: "Rh", name: "Rhodium", atomic_weight: 102.906 },
    Element { atomic_number: 46, symbol: "Pd", name: "Palladium", atomic_weight: 106.42 },
    Element { atomic_number: 47, symbol: "Ag", name: "Silver", atomic_weight: 107.868 },
    Element { atomic_number: 48, symbol: "Cd", name: "Cadmium", atomic_weight: 112.414 },
    Element { atomic_number: 49, symbol: "In", name: "Indium", atomic_weight: 114.818 },
    Element { atomic_number: 50, symbol: "Sn", name: "Tin", atomic_weight: 118.710 },
    Element { atomic_number: 51, symbol: "Sb", name: "Antimony", atomic_weight: 121.760 },
    Element { atomic_number: 52, symbol: "Te", name: "Tellurium", atomic_weight: 127.60 },
    Element { atomic_number: 53, symbol: "I", name: "Iodine", atomic_weight: 126.904 },
    Element { atomic_number: 54, symbol: "Xe", name: "Xenon", atomic_weight: 131.293 },
    Element { atomic_number: 55, symbol: "Cs", name: "Cesium", atomic_weight: 132.905 },
    Element { atomic_number: 56, symbol: "Ba", name: "Barium", atomic_weight: 137.327 },
    Element { atomic_number: 57, symbol: "La", name: "Lanthanum", atomic_weight: 138.905 },
    Element { atomic_number: 58, symbol: "Ce", name: "Cerium", atomic_weight: 140.116 },
    Element { atomic_number: 59, symbol: "Pr", name: "Praseodymium", atomic_weight: 140.908 },
    Element { atomic_number: 60, symbol: "Nd", name: "Neodymium", atomic_weight: 144.242 },
    Element { atomic_number: 61, symbol: "Pm", name: "Promethium", atomic_weight: 145.0 },
    Element { atomic_number: 62, symbol: "Sm", name: "Samarium", atomic_weight: 150.36 },
    Element { atomic_number: 63, symbol: "Eu", name: "Europium", atomic_weight: 151.964 },
    Element { atomic_number: 64, symbol: "Gd", name: "Gadolinium", atomic_weight: 157.25 },
    Element { atomic_number: 65, symbol: "Tb", name: "Terbium", atomic_weight: 158.925 },
    Element { atomic_number: 66, symbol: "Dy", name: "Dysprosium", atomic_weight: 162.500 },
    Element { atomic_number: 67, symbol: "Ho", name: "Holmium", atomic_weight: 164.930 },
    Element { atomic_number: 68, symbol: "Er", name: "Erbium", atomic_weight: 167.259 },
    Element { atomic_number: 69, symbol: "Tm", name: "Thulium", atomic_weight: 168.934 },
    Element { atomic_number: 70, symbol: "Yb", name: "Ytterbium", atomic_weight: 173.045 },
    Element { atomic_number: 71, symbol: "Lu", name: "Lutetium", atomic_weight: 174.967 },
    Element { atomic_number: 72, symbol: "Hf", name: "Hafnium", atomic_weight: 178.49 },
    Element { atomic_number: 73, symbol: "Ta", name: "Tantalum", atomic_weight: 180.948 },
    Element { atomic_number: 74, symbol: "W", name: "Tungsten", atomic_weight: 183.84 },
    Element { atomic_number: 75, symbol: "Re", name: "Rhenium", atomic_weight: 186.207 },
    Element { atomic_number: 76, symbol: "Os", name: "Osmium", atomic_weight: 190.23 },
    Element { atomic_number: 77, symbol: "Ir", name: "Iridium", atomic_weight: 192.217 },
    Element { atomic_number: 78, symbol: "Pt", name: "Platinum", atomic_weight: 195.084 },
    Element { atomic_number: 79, symbol: "Au", name: "Gold", atomic_weight: 196.967 },
    Element { atomic_number: 80, symbol: "Hg", name: "Mercury", atomic_weight: 200.592 },
    Element { atomic_number: 81, symbol: "Tl", name: "Thallium", atomic_weight: 204.38 },
    Element { atomic_number: 82, symbol: "Pb", name: "Lead", atomic_weight: 207.2 },
    Element { atomic_number: 83, symbol: "Bi", name: "Bismuth", atomic_weight: 208.980 },
    Element { atomic_number: 84, symbol: "Po", name: "Polonium", atomic_weight: 209.0 },
    Element { atomic_number: 85, symbol: "At", name: "Astatine", atomic_weight: 210.0 },
    Element { atomic_number: 86, symbol: "Rn", name: "Radon", atomic_weight: 222.0 },
];

/// Look up an element by its symbol (e.g. "C", "Fe").
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by its atomic number (1-based).
pub fn element_by_number(n: u8) -> Option<&'static Element> {
    if (1..=MAX_ATOMIC_NUMBER).contains(&n) {
        Some(&ELEMENTS[(n - 1) as usize])
    } else {
        None
    }
}

/// Permitted valences for neutral atoms of the common organic elements.
///
/// Elements not listed (metals, noble gases) are not valence-checked.
pub fn neutral_valences(atomic_number: u8) -> Option<&'static [u8]> {
    let v: &'static [u8] = match atomic_number {
        1 => &[1],
        5 => &[3],
        6 => &[4],
        7 => &[3],
        8 => &[2],
        9 => &[1],
        14 => &[4],
        15 => &[3, 5],
        16 => &[2, 4, 6],
        17 => &[1],
        33 => &[3, 5],
        34 => &[2, 4, 6],
        35 => &[1],
        52 => &[2, 4, 6],
        53 => &[1, 3, 5],
        _ => return None,
    };
    Some(v)
}

/// Permitted valences for an atom with the given formal charge.
///
/// A charged p-block atom takes the valences of its isoelectronic neighbour
/// (N+ behaves like C, O- like F, C- like N).
pub fn permitted_valences(atomic_number: u8, formal_charge: i8) -> Option<&'static [u8]> {
    if formal_charge == 0 {
        return neutral_valences(atomic_number);
    }
    let shifted = atomic_number as i16 - formal_charge as i16;
    if shifted < 1 || shifted > MAX_ATOMIC_NUMBER as i16 {
        return None;
    }
    // Only shift within the same period, otherwise the analogy breaks down.
    if period(atomic_number) != period(shifted as u8) {
        return None;
    }
    neutral_valences(atomic_number).and(neutral_valences(shifted as u8))
}

fn period(atomic_number: u8) -> u8 {
    match atomic_number {
        1..=2 => 1,
        3..=10 => 2,
        11..=18 => 3,
        19..=36 => 4,
        37..=54 => 5,
        _ => 6,
    }
}
