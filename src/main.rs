
use log::{LevelFilter, error, info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use bgl2vcf::cli::convert::{ConvertSettings, check_convert_settings, save_cli_settings};
use bgl2vcf::cli::core::get_cli;
use bgl2vcf::converter::{ConvertConfigBuilder, convert_beagle};
use bgl2vcf::diagnostics::LogSink;
use bgl2vcf::parsing::beagle::read_beagle_lines;
use bgl2vcf::parsing::bim::load_marker_index_file;
use bgl2vcf::writers::summary::write_summary;
use bgl2vcf::writers::vcf_writer::VcfWriter;

fn run_convert(settings: ConvertSettings) {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let filter_level: LevelFilter = match settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_convert_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // save the CLI options into the debug folder if specified
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("Saving CLI options to {debug_folder:?}...");
        if let Err(e) = save_cli_settings(&settings, debug_folder) {
            error!("Error while saving CLI options: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    let convert_config = match ConvertConfigBuilder::default()
        .strict_sample_count(settings.strict_sample_count)
        .build() {
        Ok(cc) => cc,
        Err(e) => {
            error!("Error while building conversion config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };

    // the index has to be complete before any marker row is looked up
    let mut sink = LogSink;
    info!("Loading markers from {:?}...", settings.bim_filename);
    let marker_index = match load_marker_index_file(&settings.bim_filename, &mut sink) {
        Ok(mi) => mi,
        Err(e) => {
            error!("Error while loading marker index: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    info!("Loaded {} markers.", marker_index.len());
    if marker_index.replaced_entries() > 0 {
        warn!("{} duplicate marker IDs found in .bim file, the last entry was kept for each.", marker_index.replaced_entries());
    }

    info!("Loading BEAGLE file {:?}...", settings.bgl_filename);
    let beagle_lines = match read_beagle_lines(&settings.bgl_filename) {
        Ok(bl) => bl,
        Err(e) => {
            error!("Error while loading BEAGLE file: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    info!("Opening output VCF {:?}...", settings.output_vcf_filename);
    let output_file = match File::create(&settings.output_vcf_filename) {
        Ok(f) => f,
        Err(e) => {
            error!("Error while creating output VCF: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let mut vcf_writer = VcfWriter::new(BufWriter::new(output_file));

    info!("Converting marker rows...");
    let summary = match convert_beagle(&beagle_lines, &marker_index, convert_config, &mut vcf_writer, &mut sink) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while converting: {e}");
            std::process::exit(e.exit_code());
        }
    };
    info!("VCF records written: {}", vcf_writer.records_written());
    if summary.missing_calls > 0 {
        info!("Missing genotype calls written: {}", summary.missing_calls);
    }
    if summary.sample_count_mismatches > 0 {
        warn!("Marker rows with an unexpected number of genotypes: {}", summary.sample_count_mismatches);
    }

    if let Some(summary_fn) = settings.output_summary_filename.as_deref() {
        info!("Saving output summary to {summary_fn:?}...");
        if let Err(e) = write_summary(&summary, summary_fn) {
            error!("Error while saving summary file: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    info!("Conversion completed in {} seconds.", start_time.elapsed().as_secs_f64());
}

fn main() {
    let cli = get_cli();
    run_convert(cli.settings);

    info!("Process finished successfully.");
}
