/*!
# Diagnostics
Recoverable problems found while converting are reported through a [`DiagnosticSink`] instead of being printed directly.
The binary uses [`LogSink`], which forwards everything to the `log` facade.
[`RecordingSink`] keeps everything in memory, which is what the tests use.
*/

use log::{info, warn};

use crate::data_types::summary::ConversionSummary;
use crate::parsing::fields::MalformedRecord;

/// Per-record problems that are skipped or patched over; none of these stop a conversion
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum ConversionWarning {
    #[error("Skipping malformed line #{line_number} in .bim file: {source}")]
    MalformedBimLine { line_number: usize, source: MalformedRecord },
    #[error("Marker {marker_id} not found in .bim file, skipping.")]
    MarkerNotFound { marker_id: String },
    #[error("Unexpected alleles ({allele1}, {allele2}) at marker {marker_id}, assigning missing genotype.")]
    UnexpectedAlleles { marker_id: String, allele1: String, allele2: String },
    #[error("Incomplete allele pair ({allele1}) for sample #{sample_index} at marker {marker_id} on line #{line_number}, assigning missing genotype.")]
    IncompleteAllelePair { marker_id: String, line_number: usize, sample_index: usize, allele1: String },
    #[error("Marker {marker_id} has {found} genotype calls but the header has {expected} samples.")]
    SampleCountMismatch { marker_id: String, expected: usize, found: usize }
}

/// Receiver for everything a conversion wants to tell the user
pub trait DiagnosticSink {
    /// Called for every recoverable problem
    fn warning(&mut self, warning: ConversionWarning);

    /// Called once the sample identifiers have been read from the BEAGLE header
    fn samples_extracted(&mut self, _sample_count: usize) {}

    /// Called once all marker rows have been handled
    fn completed(&mut self, _summary: &ConversionSummary) {}
}

/// Forwards diagnostics to the `log` macros
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warning(&mut self, warning: ConversionWarning) {
        warn!("{warning}");
    }

    fn samples_extracted(&mut self, sample_count: usize) {
        info!("Extracted {sample_count} sample IDs.");
    }

    fn completed(&mut self, summary: &ConversionSummary) {
        info!(
            "Conversion complete: {} of {} markers processed, {} markers skipped.",
            summary.processed_markers, summary.total_markers(), summary.skipped_markers
        );
    }
}

/// Keeps every diagnostic in memory
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    warnings: Vec<ConversionWarning>,
    sample_count: Option<usize>,
    summary: Option<ConversionSummary>
}

impl DiagnosticSink for RecordingSink {
    fn warning(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }

    fn samples_extracted(&mut self, sample_count: usize) {
        self.sample_count = Some(sample_count);
    }

    fn completed(&mut self, summary: &ConversionSummary) {
        self.summary = Some(*summary);
    }
}

impl RecordingSink {
    // getters
    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.warnings
    }

    pub fn sample_count(&self) -> Option<usize> {
        self.sample_count
    }

    pub fn summary(&self) -> Option<&ConversionSummary> {
        self.summary.as_ref()
    }
}
