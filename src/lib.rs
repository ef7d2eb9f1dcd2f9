/// Command line interface functionality
pub mod cli;
/// Core logic translating BEAGLE marker rows into VCF rows
pub mod converter;
/// Contains various shared data types
pub mod data_types;
/// Warning types and the sinks that receive them
pub mod diagnostics;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
