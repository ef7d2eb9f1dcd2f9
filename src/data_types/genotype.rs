
/// Identifies which of the two declared marker alleles an observed BEAGLE allele matched
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Allele {
    /// Matches the REF allele (column 5 of the .bim row)
    Reference,
    /// Matches the ALT allele (column 6 of the .bim row)
    Alternate
}

/// The phased genotype calls we can emit for a single (marker, sample) pair.
/// The text form is what lands in the GT column of the VCF.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, strum_macros::Display)]
pub enum GenotypeCall {
    /// 0|0
    #[strum(serialize = "0|0")]
    HomozygousRef,
    /// 1|1
    #[strum(serialize = "1|1")]
    HomozygousAlt,
    /// 0|1, REF was on the first haplotype column
    #[strum(serialize = "0|1")]
    HeterozygousRefAlt,
    /// 1|0, ALT was on the first haplotype column
    #[strum(serialize = "1|0")]
    HeterozygousAltRef,
    /// ./., the alleles could not be reconciled with the marker
    #[strum(serialize = "./.")]
    Missing
}

impl GenotypeCall {
    /// Builds the phased call from two classified alleles, keeping the input column order.
    /// # Arguments
    /// * `first` - allele from the first column of the sample pair
    /// * `second` - allele from the second column of the sample pair
    pub fn from_alleles(first: Allele, second: Allele) -> Self {
        match (first, second) {
            (Allele::Reference, Allele::Reference) => GenotypeCall::HomozygousRef,
            (Allele::Alternate, Allele::Alternate) => GenotypeCall::HomozygousAlt,
            (Allele::Reference, Allele::Alternate) => GenotypeCall::HeterozygousRefAlt,
            (Allele::Alternate, Allele::Reference) => GenotypeCall::HeterozygousAltRef,
        }
    }

    /// Returns true if this is the missing call
    pub fn is_missing(&self) -> bool {
        matches!(self, GenotypeCall::Missing)
    }
}
