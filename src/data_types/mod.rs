
/// Reference/alternate allele classification and the phased genotype alphabet
pub mod genotype;
/// Marker metadata recovered from the .bim file and the lookup built from it
pub mod marker;
/// Ordered sample identifiers taken from the BEAGLE header
pub mod sample_manifest;
/// Counters collected over a single conversion run
pub mod summary;
