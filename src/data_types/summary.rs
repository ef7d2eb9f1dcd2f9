
use serde::Serialize;

/// Counters for one conversion run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    /// Number of samples in the BEAGLE header
    pub samples: usize,
    /// Markers written to the VCF
    pub processed_markers: u64,
    /// Markers not written; absent from the index, or dropped by strict sample-count mode
    pub skipped_markers: u64,
    /// Rows past the header that were not marker rows
    pub ignored_rows: u64,
    /// Total ./. calls written
    pub missing_calls: u64,
    /// Marker rows whose call count did not match the number of samples
    pub sample_count_mismatches: u64
}

impl ConversionSummary {
    /// Constructor
    pub fn new(samples: usize) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }

    /// Total marker rows seen, written or not
    pub fn total_markers(&self) -> u64 {
        self.processed_markers + self.skipped_markers
    }
}
