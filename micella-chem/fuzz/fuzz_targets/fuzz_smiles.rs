#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(mol) = micella_chem::parse_smiles(data) {
        let config = micella_chem::ProtonationConfig::default();
        if let Ok(ionized) = micella_chem::normalize_protonation(&mol, &config) {
            let standardized = micella_chem::disconnect_metals(&ionized);
            let _ = micella_chem::crippen_descriptors(&standardized);
        }
        if let Ok(written) = micella_chem::write_smiles(&mol) {
            let _ = micella_chem::parse_smiles(&written);
        }
    }
});
