use std::collections::HashMap;
use std::sync::Mutex;

use assert_matches::assert_matches;

use kira_genome_map::app::{App, ProgressEvent, ProgressSink, summarize};
use kira_genome_map::config::{AliasEntry, AliasEntryObject, Config, ConfigLoader, ResolvedConfig};
use kira_genome_map::domain::ChromosomeRecord;
use kira_genome_map::error::{ErrorKind, KiraError};
use kira_genome_map::output::render_catalog;
use kira_genome_map::ucsc::UcscClient;

const BASE: &str = "https://ucsc.test/goldenPath";

struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

#[derive(Default)]
struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.messages.lock().unwrap().push(event.message);
    }
}

#[derive(Default)]
struct FakeUcsc {
    bodies: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeUcsc {
    fn with_assembly(mut self, assembly: &str, sizes: &str, bands: &str) -> Self {
        self.bodies.insert(
            format!("{BASE}/{assembly}/bigZips/{assembly}.chrom.sizes"),
            sizes.to_string(),
        );
        self.bodies.insert(
            format!("{BASE}/{assembly}/database/cytoBand.txt.gz"),
            bands.to_string(),
        );
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn lookup(&self, url: &str) -> Result<String, KiraError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| KiraError::UcscStatus {
                status: 404,
                message: format!("not found: {url}"),
            })
    }
}

impl UcscClient for FakeUcsc {
    fn fetch_text(&self, url: &str) -> Result<String, KiraError> {
        self.lookup(url)
    }

    fn fetch_gzip_text(&self, url: &str) -> Result<String, KiraError> {
        self.lookup(url)
    }
}

fn fake_ucsc() -> FakeUcsc {
    FakeUcsc::default()
        .with_assembly(
            "hg38",
            "chr1\t248956422\nchrX\t156040895\nchrM\t16569\nchrUn_KI270302v1\t2274\n",
            "chr1\t0\t2300000\tp36.33\tgneg\nchr1\t2300000\t5300000\tp36.32\tgpos25\n",
        )
        .with_assembly(
            "hg19",
            "chr1\t249250621\nchrM\t16571\n",
            "chr1\t0\t2300000\tp36.33\tgneg\n",
        )
}

fn default_config() -> ResolvedConfig {
    let config = Config {
        base_url: Some(format!("{BASE}/")),
        ..Config::default()
    };
    ConfigLoader::resolve_config(config).unwrap()
}

#[test]
fn builds_every_alias_in_declared_order() {
    let app = App::new(fake_ucsc());
    let catalog = app.build(&default_config(), &NoopSink).unwrap();

    let aliases: Vec<_> = catalog.aliases().map(|a| a.as_str()).collect();
    assert_eq!(aliases, vec!["hg38", "grch38", "hg19", "grch37"]);

    let hg38 = catalog.get("hg38").unwrap();
    assert_eq!(
        hg38.chromosomes,
        vec![
            ChromosomeRecord {
                chromosome: "1".to_string(),
                length: 248956422
            },
            ChromosomeRecord {
                chromosome: "X".to_string(),
                length: 156040895
            },
            ChromosomeRecord {
                chromosome: "M".to_string(),
                length: 16569
            },
        ]
    );
    assert_eq!(hg38.cytobands.len(), 2);
    assert_eq!(catalog.get("grch37").unwrap().chromosomes[0].length, 249250621);
}

#[test]
fn fetches_each_assembly_once() {
    let client = fake_ucsc();
    let app = App::new(client);
    let sink = RecordingSink::default();
    app.build(&default_config(), &sink).unwrap();

    let messages = sink.messages.lock().unwrap();
    let fetches = messages
        .iter()
        .filter(|m| m.starts_with("phase=Fetch"))
        .count();
    assert_eq!(fetches, 4);
    let resolves = messages
        .iter()
        .filter(|m| m.starts_with("phase=Resolve"))
        .count();
    assert_eq!(resolves, 4);
}

#[test]
fn fetch_order_is_sizes_then_bands_per_assembly() {
    let client = fake_ucsc();
    let config = default_config();
    let app = App::new(&client);
    app.build(&config, &NoopSink).unwrap();

    assert_eq!(
        client.calls(),
        vec![
            format!("{BASE}/hg38/bigZips/hg38.chrom.sizes"),
            format!("{BASE}/hg38/database/cytoBand.txt.gz"),
            format!("{BASE}/hg19/bigZips/hg19.chrom.sizes"),
            format!("{BASE}/hg19/database/cytoBand.txt.gz"),
        ]
    );
}

#[test]
fn aliases_of_one_assembly_are_equal_but_independent() {
    let app = App::new(fake_ucsc());
    let mut catalog = app.build(&default_config(), &NoopSink).unwrap();
    assert_eq!(catalog.get("hg38"), catalog.get("grch38"));

    let grch38 = catalog.get_mut("grch38").unwrap();
    grch38.chromosomes.clear();
    grch38.cytobands.pop();

    let hg38 = catalog.get("hg38").unwrap();
    assert_eq!(hg38.chromosomes.len(), 3);
    assert_eq!(hg38.cytobands.len(), 2);
}

#[test]
fn rebuilding_is_byte_identical() {
    let config = default_config();
    let first = render_catalog(&App::new(fake_ucsc()).build(&config, &NoopSink).unwrap()).unwrap();
    let second = render_catalog(&App::new(fake_ucsc()).build(&config, &NoopSink).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_chrom_sizes_aborts_build() {
    let client = fake_ucsc().with_assembly("hg19", "chr1\t1000\textra\n", "");
    let app = App::new(client);
    let err = app.build(&default_config(), &NoopSink).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn missing_resource_aborts_build() {
    let client = FakeUcsc::default().with_assembly("hg38", "chr1\t10\n", "");
    let config = ConfigLoader::resolve_config(Config {
        base_url: Some(BASE.to_string()),
        aliases: Some(vec![
            AliasEntry::Shorthand("hg38".to_string()),
            AliasEntry::Detailed(AliasEntryObject {
                alias: "mouse".to_string(),
                assembly: "mm39".to_string(),
            }),
        ]),
        ..Config::default()
    })
    .unwrap();
    let app = App::new(&client);
    let err = app.build(&config, &NoopSink).unwrap_err();
    assert_matches!(err, KiraError::UcscStatus { status: 404, .. });
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(client.calls().len(), 3);
}

#[test]
fn summary_reports_counts_per_alias() {
    let config = default_config();
    let catalog = App::new(fake_ucsc()).build(&config, &NoopSink).unwrap();
    let summary = summarize(&config, &catalog);
    assert_eq!(summary.assemblies, vec!["hg38", "hg19"]);
    assert_eq!(summary.aliases.len(), 4);
    assert_eq!(summary.aliases[1].alias, "grch38");
    assert_eq!(summary.aliases[1].assembly, "hg38");
    assert_eq!(summary.aliases[1].chromosomes, 3);
    assert_eq!(summary.aliases[3].cytobands, 1);
}
