/*!
Core logic for translating BEAGLE marker rows into phased VCF rows.
The marker index must be fully loaded before a conversion starts; every marker row does one lookup into it.

# Example
```rust
use bgl2vcf::converter::{ConvertConfig, convert_beagle};
use bgl2vcf::diagnostics::RecordingSink;
use bgl2vcf::parsing::bim::load_marker_index;
use bgl2vcf::writers::vcf_writer::VcfWriter;

let mut sink = RecordingSink::default();
let bim = "1 rs1 0 100 A G\n";
let index = load_marker_index(bim.as_bytes(), &mut sink).unwrap();

let beagle = [
    "P pedigree F1 F1 F2 F2",
    "I id S1 S1 S2 S2",
    "A sex 1 1 2 2",
    "A pheno 0 0 1 1",
    "# comment",
    "M rs1 A G G A",
];
let mut writer = VcfWriter::new(Vec::new());
let summary = convert_beagle(&beagle, &index, ConvertConfig::default(), &mut writer, &mut sink).unwrap();
assert_eq!(summary.processed_markers, 1);

let vcf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
assert!(vcf.ends_with("1\t100\trs1\tA\tG\t.\tPASS\t.\tGT\t0|1\t1|0\n"));
```
*/

use derive_builder::Builder;
use log::trace;
use std::io::Write;

use crate::data_types::genotype::GenotypeCall;
use crate::data_types::marker::{MarkerIndex, MarkerRecord};
use crate::data_types::sample_manifest::SampleManifest;
use crate::data_types::summary::ConversionSummary;
use crate::diagnostics::{ConversionWarning, DiagnosticSink};
use crate::parsing::beagle::{MarkerRow, FIRST_MARKER_LINE, MIN_BEAGLE_LINES, SAMPLE_HEADER_LINE};
use crate::writers::vcf_writer::VcfWriter;

/// Controls optional behavior of a conversion
#[derive(Builder, Clone, Copy, Debug, Default)]
#[builder(default)]
pub struct ConvertConfig {
    /// if true, rows whose call count differs from the sample count are dropped instead of written
    strict_sample_count: bool
}

impl ConvertConfig {
    pub fn strict_sample_count(&self) -> bool {
        self.strict_sample_count
    }
}

/// Problems that stop a conversion
#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    #[error("BEAGLE file seems too short or malformed: found {found} lines, need at least {required}")]
    BeagleTooShort { found: usize, required: usize },
    #[error("error while writing VCF output: {0}")]
    Io(#[from] std::io::Error)
}

impl ConversionError {
    /// Process exit code for this failure; malformed input is a data error, everything else an I/O error
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            ConversionError::BeagleTooShort { .. } => exitcode::DATAERR,
            ConversionError::Io(_) => exitcode::IOERR
        }
    }
}

/// Resolves the flattened allele columns of a marker row into one call per sample.
/// Alleles are consumed two at a time; a trailing lone allele becomes a missing call.
/// # Arguments
/// * `row` - the parsed BEAGLE marker row
/// * `marker` - the matching .bim metadata
/// * `line_number` - 1-based line of the row, only used for diagnostics
/// * `sink` - receives a warning for every call that could not be resolved
pub fn resolve_genotypes(row: &MarkerRow, marker: &MarkerRecord, line_number: usize, sink: &mut dyn DiagnosticSink) -> Vec<GenotypeCall> {
    row.alleles().chunks(2)
        .enumerate()
        .map(|(sample_index, pair)| {
            let allele1 = pair[0];
            let Some(&allele2) = pair.get(1) else {
                sink.warning(ConversionWarning::IncompleteAllelePair {
                    marker_id: row.marker_id().to_string(),
                    line_number,
                    sample_index,
                    allele1: allele1.to_string()
                });
                return GenotypeCall::Missing;
            };

            match (marker.classify_allele(allele1), marker.classify_allele(allele2)) {
                (Some(first), Some(second)) => GenotypeCall::from_alleles(first, second),
                _ => {
                    sink.warning(ConversionWarning::UnexpectedAlleles {
                        marker_id: row.marker_id().to_string(),
                        allele1: allele1.to_string(),
                        allele2: allele2.to_string()
                    });
                    GenotypeCall::Missing
                }
            }
        })
        .collect()
}

/// Converts a full BEAGLE file, already split into lines, into VCF output.
/// Line 1 holds the sample header and marker rows start at line 5; lines that are not marker rows are ignored.
/// Markers missing from the index are skipped with a warning.
/// # Arguments
/// * `lines` - every line of the BEAGLE file, in order
/// * `index` - the fully loaded marker index
/// * `config` - optional conversion behavior
/// * `writer` - receives the VCF header and data rows
/// * `sink` - receives warnings and progress
/// # Errors
/// * if there are fewer than 6 lines, in which case nothing is written
/// * if writing to the output fails
pub fn convert_beagle<S: AsRef<str>, W: Write>(
    lines: &[S], index: &MarkerIndex, config: ConvertConfig,
    writer: &mut VcfWriter<W>, sink: &mut dyn DiagnosticSink
) -> Result<ConversionSummary, ConversionError> {
    if lines.len() < MIN_BEAGLE_LINES {
        return Err(ConversionError::BeagleTooShort {
            found: lines.len(),
            required: MIN_BEAGLE_LINES
        });
    }

    let samples = SampleManifest::from_header_line(lines[SAMPLE_HEADER_LINE].as_ref());
    sink.samples_extracted(samples.len());
    writer.write_header(&samples)?;

    let mut summary = ConversionSummary::new(samples.len());
    for (line_index, line) in lines.iter().enumerate().skip(FIRST_MARKER_LINE) {
        let line_number = line_index + 1;
        let Some(row) = MarkerRow::parse(line.as_ref()) else {
            summary.ignored_rows += 1;
            continue;
        };

        let Some(marker) = index.get(row.marker_id()) else {
            sink.warning(ConversionWarning::MarkerNotFound {
                marker_id: row.marker_id().to_string()
            });
            summary.skipped_markers += 1;
            continue;
        };

        let calls = resolve_genotypes(&row, marker, line_number, sink);
        if calls.len() != samples.len() {
            sink.warning(ConversionWarning::SampleCountMismatch {
                marker_id: row.marker_id().to_string(),
                expected: samples.len(),
                found: calls.len()
            });
            summary.sample_count_mismatches += 1;
            if config.strict_sample_count() {
                summary.skipped_markers += 1;
                continue;
            }
        }

        trace!("Line #{line_number}: {} -> {} calls", row.marker_id(), calls.len());
        writer.write_record(marker, &calls)?;
        summary.missing_calls += calls.iter().filter(|c| c.is_missing()).count() as u64;
        summary.processed_markers += 1;
    }

    writer.flush()?;
    sink.completed(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::parsing::beagle::read_beagle_lines;
    use crate::parsing::bim::{load_marker_index, load_marker_index_file};
    use std::path::PathBuf;

    const HEADER: [&str; 5] = [
        "P pedigree F1 F1 F2 F2 F3 F3",
        "I id P1 P1 P2 P2 P3 P3",
        "A sex 1 1 2 2 1 1",
        "A pheno 0 0 1 1 0 0",
        "C comment line",
    ];

    fn build_index(bim: &str) -> MarkerIndex {
        let mut sink = RecordingSink::default();
        load_marker_index(bim.as_bytes(), &mut sink).unwrap()
    }

    fn beagle_lines(rows: &[&str]) -> Vec<String> {
        HEADER.iter().chain(rows.iter())
            .map(|s| s.to_string())
            .collect()
    }

    /// Runs the conversion and returns the summary, warnings, and the data rows (header stripped)
    fn run(lines: &[String], index: &MarkerIndex, config: ConvertConfig) -> (ConversionSummary, RecordingSink, Vec<String>) {
        let mut sink = RecordingSink::default();
        let mut writer = VcfWriter::new(Vec::new());
        let summary = convert_beagle(lines, index, config, &mut writer, &mut sink).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let data_rows = output.lines()
            .skip(2)
            .map(|s| s.to_string())
            .collect();
        (summary, sink, data_rows)
    }

    fn calls_of(data_row: &str) -> Vec<&str> {
        data_row.split('\t').skip(9).collect()
    }

    fn marker(reference: &str, alternate: &str) -> MarkerRecord {
        MarkerRecord::new("rs1".to_string(), "1".to_string(), "100".to_string(), reference.to_string(), alternate.to_string())
    }

    #[test]
    fn test_resolve_genotypes() {
        let record = marker("A", "G");
        let row = MarkerRow::parse("M rs1 A A G G A G G A").unwrap();
        let mut sink = RecordingSink::default();
        let calls = resolve_genotypes(&row, &record, 6, &mut sink);
        assert_eq!(calls, vec![
            GenotypeCall::HomozygousRef,
            GenotypeCall::HomozygousAlt,
            GenotypeCall::HeterozygousRefAlt,
            GenotypeCall::HeterozygousAltRef
        ]);
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_resolve_unexpected_alleles() {
        let record = marker("A", "T");
        let row = MarkerRow::parse("M rs1 C G A T A N").unwrap();
        let mut sink = RecordingSink::default();
        let calls = resolve_genotypes(&row, &record, 6, &mut sink);
        assert_eq!(calls, vec![GenotypeCall::Missing, GenotypeCall::HeterozygousRefAlt, GenotypeCall::Missing]);
        assert_eq!(sink.warnings(), &[
            ConversionWarning::UnexpectedAlleles { marker_id: "rs1".to_string(), allele1: "C".to_string(), allele2: "G".to_string() },
            ConversionWarning::UnexpectedAlleles { marker_id: "rs1".to_string(), allele1: "A".to_string(), allele2: "N".to_string() },
        ]);
    }

    #[test]
    fn test_resolve_incomplete_pair() {
        let record = marker("A", "G");
        let row = MarkerRow::parse("M rs1 A G G").unwrap();
        let mut sink = RecordingSink::default();
        let calls = resolve_genotypes(&row, &record, 9, &mut sink);
        assert_eq!(calls, vec![GenotypeCall::HeterozygousRefAlt, GenotypeCall::Missing]);
        assert_eq!(sink.warnings(), &[ConversionWarning::IncompleteAllelePair {
            marker_id: "rs1".to_string(), line_number: 9, sample_index: 1, allele1: "G".to_string()
        }]);
    }

    #[test]
    fn test_basic_scenario() {
        let index = build_index("1 rs1 0 100 A G\n");
        let lines = beagle_lines(&["M rs1 A G G G A A"]);
        let (summary, sink, data_rows) = run(&lines, &index, ConvertConfig::default());

        assert_eq!(data_rows, vec!["1\t100\trs1\tA\tG\t.\tPASS\t.\tGT\t0|1\t1|1\t0|0".to_string()]);
        assert_eq!(summary.processed_markers, 1);
        assert_eq!(summary.skipped_markers, 0);
        assert_eq!(summary.samples, 3);
        assert_eq!(sink.sample_count(), Some(3));
        assert_eq!(sink.summary(), Some(&summary));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_header_output() {
        let index = build_index("1 rs1 0 100 A G\n");
        let lines = beagle_lines(&[]);
        // exactly 5 lines is too short, add one non-marker row
        let mut lines = lines;
        lines.push("A other 1 1 1 1 1 1".to_string());

        let mut sink = RecordingSink::default();
        let mut writer = VcfWriter::new(Vec::new());
        let summary = convert_beagle(&lines, &index, ConvertConfig::default(), &mut writer, &mut sink).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(output, "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tP1\tP2\tP3\n");
        assert_eq!(summary.processed_markers, 0);
        assert_eq!(summary.ignored_rows, 1);
    }

    #[test]
    fn test_missing_marker_skipped() {
        let index = build_index("1 rs1 0 100 A G\n1 rs3 0 300 C T\n");
        let lines = beagle_lines(&[
            "M rs1 A A A A A A",
            "M rs2 A A A A A A",
            "M rs3 T C C T C C",
        ]);
        let (summary, sink, data_rows) = run(&lines, &index, ConvertConfig::default());

        assert_eq!(data_rows.len(), 2);
        assert!(data_rows[0].starts_with("1\t100\trs1\t"));
        assert!(data_rows[1].starts_with("1\t300\trs3\t"));
        assert_eq!(calls_of(&data_rows[1]), vec!["1|0", "0|1", "0|0"]);
        assert_eq!(summary.processed_markers, 2);
        assert_eq!(summary.skipped_markers, 1);
        assert_eq!(summary.total_markers(), 3);
        assert_eq!(sink.warnings(), &[ConversionWarning::MarkerNotFound { marker_id: "rs2".to_string() }]);
    }

    #[test]
    fn test_non_marker_rows_ignored() {
        let index = build_index("1 rs1 0 100 A G\n");
        let lines = beagle_lines(&[
            "",
            "M rs1",
            "A pheno2 1 1 1 1 1 1",
            "M rs1 G G G G G G",
        ]);
        let (summary, sink, data_rows) = run(&lines, &index, ConvertConfig::default());

        assert_eq!(data_rows.len(), 1);
        assert_eq!(calls_of(&data_rows[0]), vec!["1|1", "1|1", "1|1"]);
        assert_eq!(summary.ignored_rows, 3);
        assert_eq!(summary.skipped_markers, 0);
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_marker_rows_before_line_five_ignored() {
        let index = build_index("1 rs1 0 100 A G\n");
        let lines: Vec<String> = [
            "P pedigree F1 F1",
            "I id P1 P1",
            "M rs1 A A",
            "M rs1 A A",
            "M rs1 A A",
            "M rs1 G A",
        ].iter().map(|s| s.to_string()).collect();
        let (summary, _sink, data_rows) = run(&lines, &index, ConvertConfig::default());
        assert_eq!(summary.processed_markers, 1);
        assert_eq!(calls_of(&data_rows[0]), vec!["1|0"]);
    }

    #[test]
    fn test_mismatched_alleles_scenario() {
        let index = build_index("2 rs7 0 700 A T\n");
        let lines = beagle_lines(&["M rs7 C G A T T T"]);
        let (summary, sink, data_rows) = run(&lines, &index, ConvertConfig::default());

        assert_eq!(calls_of(&data_rows[0]), vec!["./.", "0|1", "1|1"]);
        assert_eq!(summary.processed_markers, 1);
        assert_eq!(summary.missing_calls, 1);
        assert_eq!(sink.warnings().len(), 1);
        assert!(matches!(sink.warnings()[0], ConversionWarning::UnexpectedAlleles { .. }));
    }

    #[test]
    fn test_too_short() {
        let index = build_index("1 rs1 0 100 A G\n");
        let lines: Vec<String> = HEADER[..4].iter().map(|s| s.to_string()).collect();

        let mut sink = RecordingSink::default();
        let mut writer = VcfWriter::new(Vec::new());
        let result = convert_beagle(&lines, &index, ConvertConfig::default(), &mut writer, &mut sink);
        assert!(matches!(result, Err(ConversionError::BeagleTooShort { found: 4, required: 6 })));

        // nothing was written and no diagnostics were produced
        assert!(writer.into_inner().unwrap().is_empty());
        assert!(sink.summary().is_none());
        assert!(sink.sample_count().is_none());

        // same thing from a file, a marker row inside the first 4 lines does not help
        let lines = read_beagle_lines(&PathBuf::from("test_data/small/too_short.bgl")).unwrap();
        let mut writer = VcfWriter::new(Vec::new());
        let result = convert_beagle(&lines, &index, ConvertConfig::default(), &mut writer, &mut sink);
        let err = result.unwrap_err();
        assert!(matches!(err, ConversionError::BeagleTooShort { found: 4, .. }));
        assert_eq!(err.exit_code(), exitcode::DATAERR);
        assert_eq!(writer.records_written(), 0);
    }

    #[test]
    fn test_write_failure_exit_code() {
        /// Output that rejects every write
        struct BrokenOutput;
        impl Write for BrokenOutput {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let index = build_index("1 rs1 0 100 A G\n");
        let lines = beagle_lines(&["M rs1 A G G G A A"]);
        let mut sink = RecordingSink::default();
        let mut writer = VcfWriter::new(BrokenOutput);
        let err = convert_beagle(&lines, &index, ConvertConfig::default(), &mut writer, &mut sink).unwrap_err();
        assert!(matches!(err, ConversionError::Io(_)));
        assert_eq!(err.exit_code(), exitcode::IOERR);
    }

    #[test]
    fn test_sample_count_mismatch() {
        let index = build_index("1 rs1 0 100 A G\n1 rs2 0 200 C T\n");
        let lines = beagle_lines(&[
            "M rs1 A G G",
            "M rs2 C C T T C C",
        ]);

        // default keeps the row, with the lone allele as missing
        let (summary, sink, data_rows) = run(&lines, &index, ConvertConfig::default());
        assert_eq!(data_rows.len(), 2);
        assert_eq!(calls_of(&data_rows[0]), vec!["0|1", "./."]);
        assert_eq!(summary.sample_count_mismatches, 1);
        assert_eq!(summary.processed_markers, 2);
        assert_eq!(sink.warnings().len(), 2);
        assert!(matches!(sink.warnings()[1], ConversionWarning::SampleCountMismatch { expected: 3, found: 2, .. }));

        // strict mode drops the row and counts it as skipped
        let config = ConvertConfigBuilder::default()
            .strict_sample_count(true)
            .build().unwrap();
        let (summary, _sink, data_rows) = run(&lines, &index, config);
        assert_eq!(data_rows.len(), 1);
        assert!(data_rows[0].starts_with("1\t200\trs2\t"));
        assert_eq!(summary.processed_markers, 1);
        assert_eq!(summary.skipped_markers, 1);
    }

    #[test]
    fn test_duplicate_bim_uses_last() {
        // last-wins on duplicate .bim identifiers is kept as-is; flagged here so a change is deliberate
        let index = build_index("1 rs1 0 100 A G\n5 rs1 0 500 G A\n");
        let lines = beagle_lines(&["M rs1 A G A G A G"]);
        let (_summary, _sink, data_rows) = run(&lines, &index, ConvertConfig::default());
        assert_eq!(data_rows, vec!["5\t500\trs1\tG\tA\t.\tPASS\t.\tGT\t1|0\t1|0\t1|0".to_string()]);
    }

    #[test]
    fn test_idempotent() {
        let index = build_index("1 rs1 0 100 A G\n1 rs2 0 200 C T\n");
        let lines = beagle_lines(&[
            "M rs1 A G G G A A",
            "M rs9 A G G G A A",
            "M rs2 C T X T C C",
        ]);

        let mut outputs = vec![];
        for _ in 0..2 {
            let mut sink = RecordingSink::default();
            let mut writer = VcfWriter::new(Vec::new());
            convert_beagle(&lines, &index, ConvertConfig::default(), &mut writer, &mut sink).unwrap();
            outputs.push(writer.into_inner().unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn test_example_files() {
        let mut sink = RecordingSink::default();
        let index = load_marker_index_file(&PathBuf::from("test_data/small/example.bim"), &mut sink).unwrap();
        let lines = read_beagle_lines(&PathBuf::from("test_data/small/example.bgl")).unwrap();
        let (summary, sink, data_rows) = run(&lines, &index, ConvertConfig::default());

        let expected = std::fs::read_to_string("test_data/small/expected.vcf").unwrap();
        let expected_rows: Vec<String> = expected.lines().skip(2).map(|s| s.to_string()).collect();
        assert_eq!(data_rows, expected_rows);

        assert_eq!(summary.samples, 4);
        assert_eq!(summary.processed_markers, 4);
        assert_eq!(summary.skipped_markers, 1);
        assert_eq!(summary.missing_calls, 1);
        assert_eq!(sink.warnings().len(), 2);

        // every written row carries one call per sample
        for row in data_rows.iter() {
            assert_eq!(calls_of(row).len(), summary.samples);
        }
    }
}
