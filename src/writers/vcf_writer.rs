
use std::io::Write;

use crate::data_types::genotype::GenotypeCall;
use crate::data_types::marker::MarkerRecord;
use crate::data_types::sample_manifest::SampleManifest;

/// The only meta-information line we emit
pub const VCF_FILEFORMAT: &str = "##fileformat=VCFv4.2";
/// The fixed columns that precede the sample columns
pub const VCF_FIXED_COLUMNS: [&str; 9] = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT"];

/// Writes a plain-text VCF with a GT-only FORMAT column.
/// Records are written exactly as resolved; no sorting or validation happens here.
pub struct VcfWriter<W: Write> {
    /// Handle on the output
    writer: W,
    /// Number of data rows written so far
    records_written: u64
}

impl<W: Write> VcfWriter<W> {
    /// Wraps an output handle; callers should provide their own buffering
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0
        }
    }

    /// Writes the file format line and the column header with every sample in manifest order
    /// # Arguments
    /// * `samples` - the sample identifiers, in output column order
    pub fn write_header(&mut self, samples: &SampleManifest) -> std::io::Result<()> {
        writeln!(self.writer, "{VCF_FILEFORMAT}")?;
        write!(self.writer, "{}", VCF_FIXED_COLUMNS.join("\t"))?;
        for sample_id in samples.sample_ids() {
            write!(self.writer, "\t{sample_id}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Writes a single data row: marker fields, `.`/`PASS`/`.`/`GT`, then one call per sample
    /// # Arguments
    /// * `marker` - metadata from the .bim file
    /// * `calls` - resolved genotype calls in sample order
    pub fn write_record(&mut self, marker: &MarkerRecord, calls: &[GenotypeCall]) -> std::io::Result<()> {
        write!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t.\tPASS\t.\tGT",
            marker.chromosome(), marker.position(), marker.marker_id(),
            marker.reference_allele(), marker.alternate_allele()
        )?;
        for call in calls.iter() {
            write!(self.writer, "\t{call}")?;
        }
        writeln!(self.writer)?;
        self.records_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }

    /// Flushes and hands back the underlying writer
    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}
