use std::collections::{HashMap, HashSet};

use crate::domain::{ChromosomeRecord, CytobandRecord};
use crate::error::KiraError;

pub const DEFAULT_CHROM_PREFIX: &str = "chr";

const CHROM_SIZES: &str = "chrom.sizes";
const CYTOBAND: &str = "cytoBand";

/// Allow-list of raw (prefixed) chromosome names kept from `chrom.sizes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeSet {
    labels: HashSet<String>,
    prefix: String,
}

impl ChromosomeSet {
    pub fn new<I, S>(labels: I, prefix: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            prefix: prefix.into(),
        }
    }

    /// `chr1`..`chr22`, `chrX`, `chrY`, `chrM`.
    pub fn human() -> Self {
        Self::human_with_prefix(DEFAULT_CHROM_PREFIX)
    }

    /// Human autosomes plus X, Y and M under a caller-chosen naming prefix.
    pub fn human_with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let labels = (1..=22)
            .map(|i| i.to_string())
            .chain(["X", "Y", "M"].map(String::from))
            .map(|label| format!("{prefix}{label}"))
            .collect::<Vec<_>>();
        Self::new(labels, prefix)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.labels.contains(raw)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn display_label<'a>(&self, raw: &'a str) -> &'a str {
        if self.prefix.is_empty() {
            return raw;
        }
        raw.strip_prefix(self.prefix.as_str()).unwrap_or(raw)
    }
}

impl Default for ChromosomeSet {
    fn default() -> Self {
        Self::human()
    }
}

/// Sort key over display labels: numbers first by value, then X, Y, M/MT,
/// then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChromKey {
    Numeric(u64),
    Ranked(u8),
    Unranked,
}

pub fn natural_chrom_key(label: &str) -> ChromKey {
    if !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()) {
        return ChromKey::Numeric(label.parse().unwrap_or(u64::MAX));
    }
    match label {
        "X" => ChromKey::Ranked(23),
        "Y" => ChromKey::Ranked(24),
        "M" | "MT" => ChromKey::Ranked(25),
        _ => ChromKey::Unranked,
    }
}

/// Parses UCSC `<assembly>.chrom.sizes` text into canonical chromosome
/// records ordered by [`natural_chrom_key`].
///
/// Lines outside `canonical` are skipped before their size is parsed. A
/// repeated label keeps its first position and its last length.
pub fn parse_chrom_sizes(
    text: &str,
    canonical: &ChromosomeSet,
) -> Result<Vec<ChromosomeRecord>, KiraError> {
    let mut records: Vec<ChromosomeRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        let [raw, size] = fields.as_slice() else {
            return Err(field_count_error(CHROM_SIZES, line_no, 2, fields.len()));
        };
        if !canonical.contains(raw) {
            continue;
        }
        let length = parse_integer(CHROM_SIZES, line_no, "size", size)?;
        let chromosome = canonical.display_label(raw).to_string();

        match positions.get(&chromosome) {
            Some(&position) => records[position].length = length,
            None => {
                positions.insert(chromosome.clone(), records.len());
                records.push(ChromosomeRecord { chromosome, length });
            }
        }
    }

    records.sort_by_key(|record| natural_chrom_key(&record.chromosome));
    Ok(records)
}

/// Parses UCSC `cytoBand.txt` text. Records come back in file order with no
/// filtering, so bands on unplaced contigs are kept.
pub fn parse_cytobands(text: &str) -> Result<Vec<CytobandRecord>, KiraError> {
    let mut bands = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        let [chrom, start, end, name, stain] = fields.as_slice() else {
            return Err(field_count_error(CYTOBAND, line_no, 5, fields.len()));
        };
        let chrom_start = parse_integer(CYTOBAND, line_no, "chromStart", start)?;
        let chrom_end = parse_integer(CYTOBAND, line_no, "chromEnd", end)?;
        if chrom_end <= chrom_start {
            return Err(KiraError::MalformedLine {
                input: CYTOBAND,
                line: line_no,
                message: format!("chromEnd {chrom_end} is not after chromStart {chrom_start}"),
            });
        }

        bands.push(CytobandRecord {
            chrom: chrom.to_string(),
            chrom_start,
            chrom_end,
            name: name.to_string(),
            stain: stain.to_string(),
        });
    }

    Ok(bands)
}

fn field_count_error(input: &'static str, line: usize, expected: usize, found: usize) -> KiraError {
    KiraError::MalformedLine {
        input,
        line,
        message: format!("expected {expected} tab-separated fields, found {found}"),
    }
}

fn parse_integer(
    input: &'static str,
    line: usize,
    field: &str,
    value: &str,
) -> Result<u64, KiraError> {
    value
        .trim()
        .parse()
        .map_err(|_| KiraError::MalformedLine {
            input,
            line,
            message: format!("{field} is not a non-negative integer: {value:?}"),
        })
}
