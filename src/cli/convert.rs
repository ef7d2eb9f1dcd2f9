
use clap::Args;
use log::info;
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::core::{check_required_filename, FULL_VERSION};
use crate::util::json_io::save_json;

/// Name of the settings dump inside the debug folder
pub const CLI_SETTINGS_JSON: &str = "cli_settings.json";

/// All user-facing settings for a conversion
#[derive(Args, Clone, Debug, Default, Serialize)]
pub struct ConvertSettings {
    /// Filled in after parsing so it lands in the saved settings
    #[clap(skip)]
    bgl2vcf_version: String,

    /// Phased BEAGLE v3.1 genotype file
    #[clap(value_name = "BGL")]
    #[clap(help_heading = Some("Input/Output"))]
    pub bgl_filename: PathBuf,

    /// PLINK .bim file providing chromosome, position, and alleles per marker
    #[clap(value_name = "BIM")]
    #[clap(help_heading = Some("Input/Output"))]
    pub bim_filename: PathBuf,

    /// Output VCF file
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_vcf_filename: PathBuf,

    /// Output summary file (CSV/TSV)
    #[clap(long = "output-summary")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_summary_filename: Option<PathBuf>,

    /// Optional output debug folder
    #[clap(long = "output-debug")]
    #[clap(value_name = "DIR")]
    #[clap(help_heading = Some("Input/Output"))]
    pub debug_folder: Option<PathBuf>,

    /// Drops marker rows whose genotype count differs from the number of samples
    #[clap(long = "strict-sample-count")]
    #[clap(help_heading = Some("Conversion parameters"))]
    pub strict_sample_count: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl ConvertSettings {
    pub fn bgl2vcf_version(&self) -> &str {
        &self.bgl2vcf_version
    }
}

pub fn check_convert_settings(mut settings: ConvertSettings) -> anyhow::Result<ConvertSettings> {
    // hard code the version in
    settings.bgl2vcf_version = FULL_VERSION.clone();
    info!("bgl2vcf version: {:?}", &settings.bgl2vcf_version);
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.bgl_filename, "BEAGLE file")?;
    info!("\tBEAGLE: {:?}", &settings.bgl_filename);
    check_required_filename(&settings.bim_filename, "PLINK BIM file")?;
    info!("\tBIM: {:?}", &settings.bim_filename);

    // outputs
    info!("Outputs:");
    info!("\tVCF: {:?}", &settings.output_vcf_filename);
    info!("\tSummary: {:?}", &settings.output_summary_filename);
    if let Some(debug_folder) = settings.debug_folder.as_ref() {
        info!("\tDebug folder: {debug_folder:?}");
    }

    info!("Conversion parameters:");
    info!("\tStrict sample count: {}", if settings.strict_sample_count { "ENABLED" } else { "DISABLED" });

    Ok(settings)
}

/// Creates the debug folder if needed and saves the settings into it as JSON.
/// Returns the path of the saved file.
/// # Arguments
/// * `settings` - the checked settings
/// * `debug_folder` - folder to create and write into
/// # Errors
/// * if the folder cannot be created
/// * if the JSON cannot be written
pub fn save_cli_settings(settings: &ConvertSettings, debug_folder: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(debug_folder)
        .with_context(|| format!("Error while creating debug folder {debug_folder:?}:"))?;
    let cli_json = debug_folder.join(CLI_SETTINGS_JSON);
    save_json(settings, &cli_json)?;
    Ok(cli_json)
}
