
use crate::parsing::fields::split_fields;

/// Index of the first sample label in the BEAGLE header row; the first two columns are row labels
const FIRST_SAMPLE_COLUMN: usize = 2;
/// Each sample spans two allele columns
const COLUMNS_PER_SAMPLE: usize = 2;

/// Ordered sample identifiers from the BEAGLE header row.
/// The order here is the column order of the genotype calls in every VCF row.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SampleManifest {
    sample_ids: Vec<String>
}

impl SampleManifest {
    /// Extracts the sample identifiers from the BEAGLE header row.
    /// Columns 2, 4, 6, ... are taken as labels and the second column of each pair is ignored,
    /// so `I id P1 P1 P2 P2` yields `["P1", "P2"]`.
    /// # Arguments
    /// * `header_line` - the sample header row of a BEAGLE file
    pub fn from_header_line(header_line: &str) -> Self {
        let sample_ids = split_fields(header_line).into_iter()
            .skip(FIRST_SAMPLE_COLUMN)
            .step_by(COLUMNS_PER_SAMPLE)
            .map(|s| s.to_string())
            .collect();
        Self {
            sample_ids
        }
    }

    // getters
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    pub fn len(&self) -> usize {
        self.sample_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_ids.is_empty()
    }
}
