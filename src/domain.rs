use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::KiraError;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("identifier pattern compiles")
});

fn is_valid_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value) && !value.contains("..")
}

/// User-facing genome name, e.g. `grch38`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyAlias(String);

impl AssemblyAlias {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssemblyAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssemblyAlias {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if !is_valid_identifier(normalized) {
            return Err(KiraError::InvalidAlias(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// UCSC assembly name as it appears in goldenPath URLs, e.g. `hg38`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyId(String);

impl AssemblyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssemblyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssemblyId {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if !is_valid_identifier(normalized) {
            return Err(KiraError::InvalidAssembly(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChromosomeRecord {
    pub chromosome: String,
    pub length: u64,
}

/// One row of a UCSC `cytoBand` table. `chrom` keeps its source prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CytobandRecord {
    pub chrom: String,
    #[serde(rename = "chromStart")]
    pub chrom_start: u64,
    #[serde(rename = "chromEnd")]
    pub chrom_end: u64,
    pub name: String,
    pub stain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyMetadata {
    pub chromosomes: Vec<ChromosomeRecord>,
    pub cytobands: Vec<CytobandRecord>,
}

/// Alias-keyed metadata, kept in declaration order.
///
/// Every entry owns its vectors, so editing one alias never shows through
/// another alias of the same assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenomeCatalog {
    entries: Vec<(AssemblyAlias, AssemblyMetadata)>,
}

impl GenomeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the metadata for `alias`. A replaced alias keeps
    /// its original position.
    pub fn insert(&mut self, alias: AssemblyAlias, metadata: AssemblyMetadata) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == alias) {
            Some((_, slot)) => *slot = metadata,
            None => self.entries.push((alias, metadata)),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&AssemblyMetadata> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == alias)
            .map(|(_, metadata)| metadata)
    }

    pub fn get_mut(&mut self, alias: &str) -> Option<&mut AssemblyMetadata> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing.as_str() == alias)
            .map(|(_, metadata)| metadata)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &AssemblyAlias> {
        self.entries.iter().map(|(alias, _)| alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssemblyAlias, &AssemblyMetadata)> {
        self.entries.iter().map(|(alias, metadata)| (alias, metadata))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for GenomeCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (alias, metadata) in &self.entries {
            map.serialize_entry(alias.as_str(), metadata)?;
        }
        map.end()
    }
}
