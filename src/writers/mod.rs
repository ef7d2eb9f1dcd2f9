/*!
# Writers module
Contains the logic for writing the converted VCF and the optional run summary.
*/
/// Writes the one-row conversion summary file
pub mod summary;
/// Writes the VCF header and the phased genotype rows
pub mod vcf_writer;
