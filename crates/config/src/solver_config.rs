// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::env;
use std::fs;
use std::num::ParseIntError;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use evencycle_algebra::{
    default_modulus, irreducible::validate_modulus, Galois, GaloisOptions, Multiplier,
};
use evencycle_matrix::Elimination;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::load_config::{find_in_parent, resolve_config_path};

pub const DEFAULT_CONFIG_NAME: &str = "evencycle.config.yaml";
pub const ENV_PREFIX: &str = "EVENCYCLE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct SolverConfig {
    /// Extension degree of GF(2^n) and GR(4^n).
    field_degree: u32,
    /// Explicit modulus; the canonical one for the degree otherwise.
    #[serde(deserialize_with = "deserialize_modulus")]
    modulus: Option<u64>,
    multiplier: Multiplier,
    elimination: Elimination,
    /// Size of the global worker pool.
    threads: Option<usize>,
    seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            field_degree: 16,
            modulus: None,
            multiplier: Multiplier::default(),
            elimination: Elimination::default(),
            threads: None,
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn field_degree(&self) -> u32 {
        self.field_degree
    }

    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    pub fn elimination(&self) -> Elimination {
        self.elimination
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The configured modulus, or the canonical one for the degree.
    pub fn modulus(&self) -> Result<u64> {
        match self.modulus {
            Some(modulus) => Ok(modulus),
            None => default_modulus(self.field_degree)
                .with_context(|| format!("No modulus available for degree {}", self.field_degree)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let modulus = self.modulus()?;
        validate_modulus(self.field_degree, modulus).context("Invalid field configuration")?;
        if self.threads == Some(0) {
            bail!("threads must be at least 1");
        }
        Ok(())
    }

    /// Builds the field and ring contexts described by this configuration.
    pub fn galois(&self) -> Result<Galois> {
        let options = GaloisOptions {
            backend: None,
            multiplier: self.multiplier,
        };
        Galois::with_options(self.field_degree, self.modulus()?, options)
            .context("Could not build the Galois context")
    }
}

/// Values set on the command line. Unset fields leave lower layers alone.
#[derive(Default, Serialize, Deserialize, Clone, Debug)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_degree: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulus: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<Multiplier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elimination: Option<Elimination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Layers defaults, the configuration file, `EVENCYCLE_*` variables and
/// `overrides`, later layers winning.
///
/// The file is `config_file` when given, else the nearest
/// `evencycle.config.yaml` above the working directory, if any.
pub fn load_config(config_file: Option<PathBuf>, overrides: CliOverrides) -> Result<SolverConfig> {
    let resolved = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        DEFAULT_CONFIG_NAME,
        config_file,
    );

    let mut figment = Figment::from(Serialized::defaults(SolverConfig::default()));
    if let Some(path) = &resolved {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Configuration file {} not found", path.display()))?;
        figment = figment.merge(Yaml::string(&yaml));
    }

    let config: SolverConfig = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
        .extract()
        .context("Could not parse configuration")?;
    config.validate()?;
    debug!(file = ?resolved, ?config, "loaded configuration");
    Ok(config)
}

/// Decimal, or hexadecimal with a `0x` prefix.
pub fn parse_modulus(text: &str) -> Result<u64, ParseIntError> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawModulus {
    Number(u64),
    Text(String),
}

fn deserialize_modulus<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    match Option::<RawModulus>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawModulus::Number(value)) => Ok(Some(value)),
        Some(RawModulus::Text(text)) => parse_modulus(&text).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evencycle_algebra::{AlgebraError, GF16_MODULUS, GF32_MODULUS};
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = load_config(None, CliOverrides::default()).map_err(|e| e.to_string())?;
            assert_eq!(config, SolverConfig::default());
            assert_eq!(config.field_degree(), 16);
            assert_eq!(config.modulus().map_err(|e| e.to_string())?, GF16_MODULUS);
            assert_eq!(config.multiplier(), Multiplier::Kronecker);
            assert_eq!(config.elimination(), Elimination::Scalar);
            Ok(())
        });
    }

    #[test]
    fn test_file_not_found() -> Result<()> {
        let missing = Some(PathBuf::from("/nope/evencycle.yaml"));
        let Err(err) = load_config(missing, CliOverrides::default()) else {
            bail!("error expected");
        };
        let Some(e) = err.downcast_ref::<std::io::Error>() else {
            bail!("io error expected");
        };
        assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_NAME,
                r#"
field_degree: 32
multiplier: carryless
elimination: packed
seed: 7
"#,
            )?;
            let config = load_config(None, CliOverrides::default()).map_err(|e| e.to_string())?;
            assert_eq!(config.field_degree(), 32);
            assert_eq!(config.modulus().map_err(|e| e.to_string())?, GF32_MODULUS);
            assert_eq!(config.multiplier(), Multiplier::Carryless);
            assert_eq!(config.elimination(), Elimination::Packed);
            assert_eq!(config.seed(), Some(7));

            jail.set_env("EVENCYCLE_SEED", "11");
            jail.set_env("EVENCYCLE_THREADS", "3");
            jail.set_env("EVENCYCLE_MULTIPLIER", "reference");
            let config = load_config(None, CliOverrides::default()).map_err(|e| e.to_string())?;
            assert_eq!(config.seed(), Some(11));
            assert_eq!(config.threads(), Some(3));
            assert_eq!(config.multiplier(), Multiplier::Reference);
            assert_eq!(config.field_degree(), 32);

            let overrides = CliOverrides {
                seed: Some(13),
                elimination: Some(Elimination::Scalar),
                ..CliOverrides::default()
            };
            let config = load_config(None, overrides).map_err(|e| e.to_string())?;
            assert_eq!(config.seed(), Some(13));
            assert_eq!(config.elimination(), Elimination::Scalar);
            assert_eq!(config.threads(), Some(3));
            Ok(())
        });
    }

    #[test]
    fn test_hex_modulus() {
        Jail::expect_with(|jail| {
            jail.create_file("solver.yaml", "field_degree: 16\nmodulus: \"0x1002D\"\n")?;
            let config = load_config(Some(PathBuf::from("solver.yaml")), CliOverrides::default())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.modulus().map_err(|e| e.to_string())?, GF16_MODULUS);

            jail.set_env("EVENCYCLE_FIELD_DEGREE", "8");
            jail.set_env("EVENCYCLE_MODULUS", "0x11B");
            let config = load_config(Some(PathBuf::from("solver.yaml")), CliOverrides::default())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.field_degree(), 8);
            assert_eq!(config.modulus().map_err(|e| e.to_string())?, 0x11B);
            Ok(())
        });
        assert_eq!(parse_modulus("0x1002d"), Ok(GF16_MODULUS));
        assert_eq!(parse_modulus("65581"), Ok(GF16_MODULUS));
        assert!(parse_modulus("0xzz").is_err());
    }

    #[test]
    fn test_rejects_invalid_settings() {
        Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_CONFIG_NAME, "field_degree: 40\n")?;
            let err = load_config(None, CliOverrides::default()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<AlgebraError>(),
                Some(AlgebraError::InvalidDegree { degree: 40, .. })
            ));

            jail.create_file(DEFAULT_CONFIG_NAME, "field_degree: 8\nmodulus: 0x1002D\n")?;
            assert!(load_config(None, CliOverrides::default()).is_err());

            jail.create_file(DEFAULT_CONFIG_NAME, "field_degree: 8\ncolour: blue\n")?;
            assert!(load_config(None, CliOverrides::default()).is_err());

            jail.create_file(DEFAULT_CONFIG_NAME, "threads: 0\n")?;
            assert!(load_config(None, CliOverrides::default()).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_galois_from_config() -> Result<()> {
        let config = SolverConfig {
            field_degree: 13,
            multiplier: Multiplier::Reference,
            ..SolverConfig::default()
        };
        config.validate()?;
        let galois = config.galois()?;
        assert_eq!(galois.degree(), 13);
        assert_eq!(galois.ring().multiplier(), Multiplier::Reference);
        Ok(())
    }
}
