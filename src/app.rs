use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ResolvedConfig;
use crate::domain::{AssemblyId, AssemblyMetadata, GenomeCatalog};
use crate::error::KiraError;
use crate::normalize::{parse_chrom_sizes, parse_cytobands};
use crate::ucsc::{UcscClient, chrom_sizes_url, cytoband_url};

#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub assemblies: Vec<String>,
    pub aliases: Vec<AliasSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AliasSummary {
    pub alias: String,
    pub assembly: String,
    pub chromosomes: usize,
    pub cytobands: usize,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

#[derive(Clone)]
pub struct App<C: UcscClient> {
    client: C,
}

impl<C: UcscClient> App<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Builds the alias catalog. Each distinct assembly is fetched once per
    /// call; any failure aborts the whole build.
    pub fn build(
        &self,
        config: &ResolvedConfig,
        sink: &dyn ProgressSink,
    ) -> Result<GenomeCatalog, KiraError> {
        let mut cache: HashMap<AssemblyId, AssemblyMetadata> = HashMap::new();
        let mut catalog = GenomeCatalog::new();

        for mapping in &config.aliases {
            let metadata = match cache.entry(mapping.assembly.clone()) {
                Entry::Occupied(entry) => {
                    debug!(
                        alias = mapping.alias.as_str(),
                        assembly = mapping.assembly.as_str(),
                        "reusing fetched assembly"
                    );
                    entry.into_mut()
                }
                Entry::Vacant(entry) => {
                    entry.insert(self.load_assembly(&mapping.assembly, config, sink)?)
                }
            };
            sink.event(ProgressEvent {
                message: format!("phase=Resolve; {} -> {}", mapping.alias, mapping.assembly),
                elapsed: None,
            });
            catalog.insert(mapping.alias.clone(), metadata.clone());
        }

        Ok(catalog)
    }

    fn load_assembly(
        &self,
        assembly: &AssemblyId,
        config: &ResolvedConfig,
        sink: &dyn ProgressSink,
    ) -> Result<AssemblyMetadata, KiraError> {
        info!(assembly = assembly.as_str(), "fetching UCSC assembly metadata");

        let url = chrom_sizes_url(&config.base_url, assembly);
        debug!(url = url.as_str(), "fetching chrom.sizes");
        let started = Instant::now();
        let text = self.client.fetch_text(&url)?;
        sink.event(ProgressEvent {
            message: format!("phase=Fetch; {assembly} chrom.sizes"),
            elapsed: Some(started.elapsed()),
        });
        let chromosomes = parse_chrom_sizes(&text, &config.chromosomes)?;

        let url = cytoband_url(&config.base_url, assembly);
        debug!(url = url.as_str(), "fetching cytoBand");
        let started = Instant::now();
        let text = self.client.fetch_gzip_text(&url)?;
        sink.event(ProgressEvent {
            message: format!("phase=Fetch; {assembly} cytoBand"),
            elapsed: Some(started.elapsed()),
        });
        let cytobands = parse_cytobands(&text)?;

        debug!(
            assembly = assembly.as_str(),
            chromosomes = chromosomes.len(),
            cytobands = cytobands.len(),
            "parsed assembly metadata"
        );
        sink.event(ProgressEvent {
            message: format!(
                "phase=Parse; {assembly}: {} chromosomes, {} cytobands",
                chromosomes.len(),
                cytobands.len()
            ),
            elapsed: None,
        });

        Ok(AssemblyMetadata {
            chromosomes,
            cytobands,
        })
    }
}

pub fn summarize(config: &ResolvedConfig, catalog: &GenomeCatalog) -> BuildSummary {
    let assemblies = config
        .assemblies()
        .into_iter()
        .map(|assembly| assembly.to_string())
        .collect();
    let aliases = config
        .aliases
        .iter()
        .filter_map(|mapping| {
            let metadata = catalog.get(mapping.alias.as_str())?;
            Some(AliasSummary {
                alias: mapping.alias.to_string(),
                assembly: mapping.assembly.to_string(),
                chromosomes: metadata.chromosomes.len(),
                cytobands: metadata.cytobands.len(),
            })
        })
        .collect();
    BuildSummary {
        assemblies,
        aliases,
    }
}
