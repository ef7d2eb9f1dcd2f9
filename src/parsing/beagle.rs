
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::parsing::fields::split_fields;

/// Anything shorter than this cannot hold the header block plus a single marker row
pub const MIN_BEAGLE_LINES: usize = 6;
/// Row holding the sample identifiers
pub const SAMPLE_HEADER_LINE: usize = 1;
/// First row that may contain marker data; everything before it is header/metadata
pub const FIRST_MARKER_LINE: usize = 5;
/// First column tag of a marker row
pub const MARKER_TAG: &str = "M";
/// Tag, marker id, and at least one allele
const MIN_MARKER_FIELDS: usize = 3;

/// A BEAGLE marker row split into its identifier and the flattened allele columns
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerRow<'a> {
    /// Marker identifier from the second column
    marker_id: &'a str,
    /// Alleles for every sample, two consecutive entries per sample
    alleles: Vec<&'a str>
}

impl<'a> MarkerRow<'a> {
    /// Parses a marker row. Returns None for anything that is not a marker row,
    /// i.e. fewer than 3 fields or a first field other than "M".
    /// # Arguments
    /// * `line` - the raw BEAGLE row
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut fields = split_fields(line);
        if fields.len() < MIN_MARKER_FIELDS || fields[0] != MARKER_TAG {
            return None;
        }
        let alleles = fields.split_off(2);
        Some(Self {
            marker_id: fields[1],
            alleles
        })
    }

    // getters
    pub fn marker_id(&self) -> &'a str {
        self.marker_id
    }

    pub fn alleles(&self) -> &[&'a str] {
        &self.alleles
    }
}

/// Loads a full BEAGLE file into memory as lines.
/// # Arguments
/// * `filename` - path to the BEAGLE v3.1 file
/// # Errors
/// * if the file cannot be opened or read, including invalid UTF-8
pub fn read_beagle_lines(filename: &Path) -> anyhow::Result<Vec<String>> {
    let file = File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    let lines = BufReader::new(file).lines()
        .collect::<std::io::Result<Vec<String>>>()
        .with_context(|| format!("Error while reading {filename:?}:"))?;
    Ok(lines)
}
