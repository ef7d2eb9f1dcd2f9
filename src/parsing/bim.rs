
use anyhow::Context;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::data_types::marker::{MarkerIndex, MarkerRecord};
use crate::diagnostics::{ConversionWarning, DiagnosticSink};
use crate::parsing::fields::{require_fields, MalformedRecord};

/// Number of leading .bim columns we need: chrom, id, cM, position, allele 1, allele 2
pub const BIM_FIELDS: usize = 6;

/// Parses a single .bim row into a marker record.
/// The genetic distance column is discarded and any columns past the sixth are ignored.
/// # Arguments
/// * `line` - the raw .bim row
/// # Errors
/// * if the row has fewer than 6 whitespace-delimited fields
pub fn parse_bim_line(line: &str) -> Result<MarkerRecord, MalformedRecord> {
    let fields = require_fields(line, BIM_FIELDS)?;
    Ok(MarkerRecord::new(
        fields[1].to_string(),
        fields[0].to_string(),
        fields[3].to_string(),
        fields[4].to_string(),
        fields[5].to_string()
    ))
}

/// Builds the marker index from any line source.
/// Malformed rows are reported to the sink and skipped; duplicate identifiers overwrite earlier rows.
/// # Arguments
/// * `reader` - buffered .bim content
/// * `sink` - receives a warning for every malformed row
/// # Errors
/// * if reading a line fails, including invalid UTF-8
pub fn load_marker_index<R: BufRead>(reader: R, sink: &mut dyn DiagnosticSink) -> std::io::Result<MarkerIndex> {
    let mut index = MarkerIndex::default();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_bim_line(&line) {
            Ok(record) => {
                if let Some(previous) = index.insert(record) {
                    debug!("Marker {} on line #{} replaced an earlier .bim entry", previous.marker_id(), line_index + 1);
                }
            },
            Err(source) => {
                sink.warning(ConversionWarning::MalformedBimLine {
                    line_number: line_index + 1,
                    source
                });
            }
        }
    }
    Ok(index)
}

/// Opens a .bim file and builds the marker index from it
/// # Arguments
/// * `filename` - path to the .bim file
/// * `sink` - receives a warning for every malformed row
/// # Errors
/// * if the file cannot be opened or read
pub fn load_marker_index_file(filename: &Path, sink: &mut dyn DiagnosticSink) -> anyhow::Result<MarkerIndex> {
    let file = File::open(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    let index = load_marker_index(BufReader::new(file), sink)
        .with_context(|| format!("Error while reading {filename:?}:"))?;
    Ok(index)
}
