//! Generation toggles, loadable from the `[generate]` table of a TOML file.

use crate::CodegenError;
use serde::Deserialize;
use std::path::Path;

/// Toggles shared by all back ends. Every toggle defaults to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Wrap optional fields in the target's nullable wrapper (`Option<T>`).
    pub use_nullable_wrapper_for_optional: bool,
    /// Map the IDL `byte` type to a signed 8-bit integer.
    pub treat_byte_type_as_signed: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    generate: GenerateConfig,
}

impl GenerateConfig {
    /// Parse the `[generate]` table of a config file. A file without the
    /// table yields the defaults.
    pub fn from_toml_str(src: &str, path: &Path) -> Result<Self, CodegenError> {
        let file: ConfigFile = toml::from_str(src).map_err(|e| CodegenError::Config {
            path: path.to_owned(),
            message: e.message().to_owned(),
        })?;
        Ok(file.generate)
    }

    pub fn load(path: &Path) -> Result<Self, CodegenError> {
        let src = std::fs::read_to_string(path).map_err(|source| CodegenError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&src, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<GenerateConfig, CodegenError> {
        GenerateConfig::from_toml_str(src, Path::new("idlc.toml"))
    }

    #[test]
    fn missing_table_is_default() {
        assert_eq!(parse("").unwrap(), GenerateConfig::default());
        assert_eq!(parse("[other]\nx = 1\n").unwrap(), GenerateConfig::default());
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let cfg = parse("[generate]\ntreat_byte_type_as_signed = true\n").unwrap();
        assert!(cfg.treat_byte_type_as_signed);
        assert!(!cfg.use_nullable_wrapper_for_optional);
    }

    #[test]
    fn wrong_type_is_config_error() {
        let err = parse("[generate]\nuse_nullable_wrapper_for_optional = \"yes\"\n").unwrap_err();
        assert!(matches!(err, CodegenError::Config { .. }));
        assert!(err.to_string().starts_with("invalid config idlc.toml:"));
    }

    #[test]
    fn unknown_toggle_is_rejected() {
        assert!(parse("[generate]\npointers = true\n").is_err());
    }
}
