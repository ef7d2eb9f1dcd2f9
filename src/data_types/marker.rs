
use rustc_hash::FxHashMap as HashMap;

use crate::data_types::genotype::Allele;

/// Metadata for a single marker as declared in a PLINK .bim row.
/// Chromosome and position are kept verbatim so the VCF reproduces the source text exactly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarkerRecord {
    /// Marker identifier, typically an rsID
    marker_id: String,
    /// Chromosome label, e.g. "1" or "chr1"; not normalized
    chromosome: String,
    /// Base-pair coordinate as written in the file
    position: String,
    /// REF allele, column 5 of the .bim row
    reference_allele: String,
    /// ALT allele, column 6 of the .bim row
    alternate_allele: String
}

impl MarkerRecord {
    /// Constructor
    pub fn new(marker_id: String, chromosome: String, position: String, reference_allele: String, alternate_allele: String) -> Self {
        Self {
            marker_id, chromosome, position, reference_allele, alternate_allele
        }
    }

    /// Classifies an observed allele against this marker.
    /// REF is checked first, so a marker with identical REF and ALT always reports Reference.
    /// Returns None if the allele matches neither.
    /// # Arguments
    /// * `observed` - the allele string from the BEAGLE row
    pub fn classify_allele(&self, observed: &str) -> Option<Allele> {
        if observed == self.reference_allele {
            Some(Allele::Reference)
        } else if observed == self.alternate_allele {
            Some(Allele::Alternate)
        } else {
            None
        }
    }

    // getters
    pub fn marker_id(&self) -> &str {
        &self.marker_id
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn reference_allele(&self) -> &str {
        &self.reference_allele
    }

    pub fn alternate_allele(&self) -> &str {
        &self.alternate_allele
    }
}

/// Lookup from marker identifier to the marker metadata.
/// Built once from the .bim file and then only read from.
#[derive(Clone, Debug, Default)]
pub struct MarkerIndex {
    /// Core hash lookup
    lookup: HashMap<String, MarkerRecord>,
    /// Number of inserts that replaced an existing identifier
    replaced_entries: usize
}

impl MarkerIndex {
    /// Inserts a record, replacing any previous record with the same identifier.
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, record: MarkerRecord) -> Option<MarkerRecord> {
        let previous = self.lookup.insert(record.marker_id.clone(), record);
        if previous.is_some() {
            self.replaced_entries += 1;
        }
        previous
    }

    /// Returns the record for a marker identifier
    pub fn get(&self, marker_id: &str) -> Option<&MarkerRecord> {
        self.lookup.get(marker_id)
    }

    /// Number of distinct marker identifiers
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Number of times a later .bim row overwrote an earlier one with the same identifier
    pub fn replaced_entries(&self) -> usize {
        self.replaced_entries
    }
}
