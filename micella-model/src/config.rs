//! Runtime configuration, read from TOML.
//!
//! ```toml
//! [model]
//! variant = "v2"
//!
//! [protonation]
//! ph_min = 6.4
//! ph_max = 6.6
//! max_variants = 1
//! pka_precision = 0.1
//!
//! [reference]
//! training = "training.csv"
//! validation = "validation.csv"
//! ```
//!
//! Relative reference paths are resolved against the directory of the config file.

use std::path::{Path, PathBuf};

use micella_chem::ProtonationConfig;
use micella_core::{MicellaError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coefficients::ModelVariant;

/// Environment variable naming a config file when none is given explicitly.
pub const CONFIG_ENV: &str = "MICELLA_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MicellaConfig {
    pub model: ModelSection,
    pub protonation: ProtonationSection,
    pub reference: ReferenceSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    pub variant: ModelVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtonationSection {
    pub ph_min: f64,
    pub ph_max: f64,
    pub max_variants: usize,
    pub pka_precision: f64,
}

impl Default for ProtonationSection {
    fn default() -> Self {
        let defaults = ProtonationConfig::default();
        ProtonationSection {
            ph_min: defaults.ph_min,
            ph_max: defaults.ph_max,
            max_variants: defaults.max_variants,
            pka_precision: defaults.pka_precision,
        }
    }
}

impl ProtonationSection {
    pub fn to_protonation_config(&self) -> ProtonationConfig {
        ProtonationConfig {
            ph_min: self.ph_min,
            ph_max: self.ph_max,
            max_variants: self.max_variants,
            pka_precision: self.pka_precision,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceSection {
    pub training: Option<PathBuf>,
    pub validation: Option<PathBuf>,
    pub logd_column: String,
    pub mr_column: String,
}

impl Default for ReferenceSection {
    fn default() -> Self {
        ReferenceSection {
            training: None,
            validation: None,
            logd_column: "rd_logD".into(),
            mr_column: "rd_MR".into(),
        }
    }
}

impl ReferenceSection {
    pub fn is_configured(&self) -> bool {
        self.training.is_some() || self.validation.is_some()
    }
}

impl MicellaConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, "config")
    }

    /// Load a config file.
    ///
    /// A missing file is a configuration error; any other read failure is
    /// reported as I/O.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                MicellaError::Configuration(format!("config {} not found", path.display()))
            }
            kind => MicellaError::Io(std::io::Error::new(
                kind,
                format!("{}: {e}", path.display()),
            )),
        })?;
        let mut config = Self::parse(&text, &format!("config {}", path.display()))?;
        if let Some(dir) = path.parent() {
            config.reference.training = config.reference.training.map(|p| dir.join(p));
            config.reference.validation = config.reference.validation.map(|p| dir.join(p));
        }
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        let config: MicellaConfig = toml::from_str(text)
            .map_err(|e| MicellaError::Configuration(format!("invalid {origin}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Explicit path first, then [`CONFIG_ENV`], then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::resolve_with(explicit, from_env.as_deref())
    }

    fn resolve_with(explicit: Option<&Path>, from_env: Option<&Path>) -> Result<Self> {
        match explicit.or(from_env) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.protonation.to_protonation_config().validate()?;
        self.model.variant.coefficients().validate()?;
        if self.reference.logd_column.is_empty() || self.reference.mr_column.is_empty() {
            return Err(MicellaError::Configuration(
                "reference column names must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let c = MicellaConfig::default();
        assert_eq!(c.model.variant, ModelVariant::V1);
        assert_eq!(c.protonation.to_protonation_config(), ProtonationConfig::default());
        assert_eq!(c.reference.logd_column, "rd_logD");
        assert_eq!(c.reference.mr_column, "rd_MR");
        assert!(!c.reference.is_configured());
        c.validate().unwrap();
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let c = MicellaConfig::from_toml_str("[model]\nvariant = \"v2\"\n").unwrap();
        assert_eq!(c.model.variant, ModelVariant::V2);
        assert_eq!(c.protonation.ph_min, 6.4);
        assert_eq!(c.protonation.max_variants, 1);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(MicellaConfig::from_toml_str("").unwrap(), MicellaConfig::default());
    }

    #[test]
    fn invalid_values_rejected() {
        for doc in [
            "[protonation]\nph_min = 7.0\nph_max = 6.0\n",
            "[protonation]\nmax_variants = 0\n",
            "[protonation]\npka_precision = -1.0\n",
            "[model]\nvariant = \"v3\"\n",
            "[reference]\nlogd_column = \"\"\n",
            "[unknown]\nkey = 1\n",
            "not toml at all [",
        ] {
            assert!(
                matches!(MicellaConfig::from_toml_str(doc), Err(MicellaError::Configuration(_))),
                "{doc}"
            );
        }
    }

    #[test]
    fn file_paths_resolve_relative_to_config() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[reference]").unwrap();
        writeln!(file, "training = \"train.csv\"").unwrap();
        file.flush().unwrap();

        let c = MicellaConfig::from_file(file.path()).unwrap();
        let dir = file.path().parent().unwrap();
        assert_eq!(c.reference.training, Some(dir.join("train.csv")));
        assert_eq!(c.reference.validation, None);
        assert!(c.reference.is_configured());
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let err = MicellaConfig::from_file("/nonexistent/micella.toml").unwrap_err();
        assert!(matches!(err, MicellaError::Configuration(_)));
    }

    #[test]
    fn unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MicellaConfig::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, MicellaError::Io(_)), "{err}");
        assert!(err.to_string().contains(&dir.path().display().to_string()));
    }

    #[test]
    fn file_errors_name_the_file_once() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[protonation]\nmax_variants = \"one\"").unwrap();
        file.flush().unwrap();

        let err = MicellaConfig::from_file(file.path()).unwrap_err();
        let message = err.to_string();
        let shown = file.path().display().to_string();
        assert!(matches!(err, MicellaError::Configuration(_)));
        assert_eq!(message.matches(&shown).count(), 1, "{message}");
        assert!(message.starts_with("configuration error: invalid config "), "{message}");

        let file_bad = NamedTempFile::with_suffix(".toml").unwrap();
        std::fs::write(file_bad.path(), "[protonation]\nmax_variants = 0\n").unwrap();
        assert!(matches!(
            MicellaConfig::from_file(file_bad.path()),
            Err(MicellaError::Configuration(_))
        ));
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let mut explicit = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(explicit, "[model]\nvariant = \"v2\"").unwrap();
        explicit.flush().unwrap();

        let c = MicellaConfig::resolve_with(
            Some(explicit.path()),
            Some(Path::new("/nonexistent/env.toml")),
        )
        .unwrap();
        assert_eq!(c.model.variant, ModelVariant::V2);

        assert!(MicellaConfig::resolve_with(None, Some(Path::new("/nonexistent/env.toml"))).is_err());
        assert_eq!(MicellaConfig::resolve_with(None, None).unwrap(), MicellaConfig::default());
    }
}
