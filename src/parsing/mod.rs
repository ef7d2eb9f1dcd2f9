/*!
# Parsing module
Contains the logic for turning the BEAGLE and .bim text inputs into meaningful structs / data.
*/
/// Marker row parsing and loading for BEAGLE v3.1 files
pub mod beagle;
/// Builds the marker index from a PLINK .bim file
pub mod bim;
/// Shared whitespace tokenizer and the malformed record error
pub mod fields;
