
use anyhow::Context;
use std::path::Path;

use crate::data_types::summary::ConversionSummary;

/// Will write the summary out to the given file path as a single header + row.
/// The delimiter is "," if the file ends with .csv and a tab otherwise.
/// # Arguments
/// * `summary` - the counters from a finished conversion
/// * `filename` - path to the output .csv/.tsv
/// # Errors
/// * if the file cannot be created or written
pub fn write_summary(summary: &ConversionSummary, filename: &Path) -> anyhow::Result<()> {
    let is_csv: bool = filename.extension().unwrap_or_default() == "csv";
    let delimiter: u8 = if is_csv { b',' } else { b'\t' };
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)
        .with_context(|| format!("Error while creating {filename:?}:"))?;

    csv_writer.serialize(summary)
        .with_context(|| format!("Error while writing summary to {filename:?}:"))?;
    csv_writer.flush()
        .with_context(|| format!("Error while flushing output to {filename:?}:"))?;
    Ok(())
}
