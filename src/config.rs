use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{AssemblyAlias, AssemblyId};
use crate::error::KiraError;
use crate::normalize::{ChromosomeSet, DEFAULT_CHROM_PREFIX};
use crate::ucsc::DEFAULT_BASE_URL;

pub const DEFAULT_CONFIG_FILE: &str = "kira-gm.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub aliases: Option<Vec<AliasEntry>>,
    #[serde(default)]
    pub chromosomes: Option<Vec<String>>,
    #[serde(default)]
    pub chrom_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AliasEntry {
    Shorthand(String),
    Detailed(AliasEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AliasEntryObject {
    pub alias: String,
    pub assembly: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasMapping {
    pub alias: AssemblyAlias,
    pub assembly: AssemblyId,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub base_url: String,
    pub aliases: Vec<AliasMapping>,
    pub chromosomes: ChromosomeSet,
}

impl ResolvedConfig {
    /// Distinct assemblies in first-reference order.
    pub fn assemblies(&self) -> Vec<&AssemblyId> {
        let mut seen = HashSet::new();
        self.aliases
            .iter()
            .map(|mapping| &mapping.assembly)
            .filter(|assembly| seen.insert(*assembly))
            .collect()
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: 1,
            base_url: DEFAULT_BASE_URL.to_string(),
            aliases: default_aliases(),
            chromosomes: ChromosomeSet::human(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `kira-gm.json` from the working directory when it
    /// exists, or falls back to the built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, KiraError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(ResolvedConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| KiraError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| KiraError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, KiraError> {
        let schema_version = config.schema_version.unwrap_or(1);
        let base_url = config
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let aliases = match config.aliases {
            Some(entries) => entries
                .into_iter()
                .map(|entry| match entry {
                    AliasEntry::Shorthand(value) => Ok(AliasMapping {
                        alias: value.parse()?,
                        assembly: value.parse()?,
                    }),
                    AliasEntry::Detailed(obj) => Ok(AliasMapping {
                        alias: obj.alias.parse()?,
                        assembly: obj.assembly.parse()?,
                    }),
                })
                .collect::<Result<Vec<_>, KiraError>>()?,
            None => default_aliases(),
        };
        if aliases.is_empty() {
            return Err(KiraError::EmptyAliasList);
        }
        let mut seen = HashSet::new();
        for mapping in &aliases {
            if !seen.insert(mapping.alias.as_str()) {
                return Err(KiraError::DuplicateAlias(mapping.alias.to_string()));
            }
        }

        let prefix = config
            .chrom_prefix
            .unwrap_or_else(|| DEFAULT_CHROM_PREFIX.to_string());
        let chromosomes = match config.chromosomes {
            Some(labels) => ChromosomeSet::new(labels, prefix),
            None => ChromosomeSet::human_with_prefix(prefix),
        };

        Ok(ResolvedConfig {
            schema_version,
            base_url,
            aliases,
            chromosomes,
        })
    }
}

/// `hg38`, `grch38` → hg38; `hg19`, `grch37` → hg19.
pub fn default_aliases() -> Vec<AliasMapping> {
    [
        ("hg38", "hg38"),
        ("grch38", "hg38"),
        ("hg19", "hg19"),
        ("grch37", "hg19"),
    ]
    .into_iter()
    .filter_map(|(alias, assembly)| {
        Some(AliasMapping {
            alias: alias.parse().ok()?,
            assembly: assembly.parse().ok()?,
        })
    })
    .collect()
}
