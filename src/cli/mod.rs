/*!
# CLI module
Command line interface functionality that is specific to bgl2vcf.
*/

/// The main CLI module that contains the top-level CLI parser and help text
pub mod core;
/// The conversion settings and their checks
pub mod convert;
