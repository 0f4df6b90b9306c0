use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use imgnorm::{NormalizeParams, OutputFormat, normalize_bytes, process_directory_to_path};
use imgnorm::api::normalize_path_to_path;

use super::args::CliArgs;
use super::errors::AppError;

fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "png" => Some(OutputFormat::Png),
        "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
        "tif" | "tiff" => Some(OutputFormat::Tiff),
        _ => None,
    }
}

/// Config file first, then explicit flags, then the output extension for the format.
fn build_params(args: &CliArgs) -> Result<NormalizeParams, AppError> {
    let mut params = match &args.config {
        Some(path) => NormalizeParams::from_json_file(path)?,
        None => NormalizeParams::default(),
    };
    if let Some(strategy) = args.strategy {
        params.strategy = strategy;
    }
    if args.no_clamp {
        params.clamp_to_envelope = false;
    }
    match (args.format, args.output.as_deref().and_then(format_from_extension)) {
        (Some(format), _) => params.format = format,
        (None, Some(format)) if args.config.is_none() => params.format = format,
        _ => {}
    }
    params.validate()?;
    Ok(params)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let params = build_params(&args)?;
    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        if args.data_url {
            return Err(AppError::Conflict {
                first: "--data-url",
                second: "--input-dir",
            }
            .into());
        }
        let input_dir = args.input_dir.ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;
        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        info!("Starting batch normalization from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = process_directory_to_path(&input_dir, &output_dir, &params, args.batch)?;

        info!("Batch processing complete!");
        info!("Processed: {}", report.processed);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;

        if args.data_url {
            let bytes = std::fs::read(&input).map_err(AppError::from)?;
            let normalized = normalize_bytes(&bytes, &params)?;
            println!("{}", normalized.to_data_url());
            return Ok(());
        }

        let output = args.output.ok_or(AppError::MissingArgument {
            arg: "--output".to_string(),
        })?;
        let normalized = normalize_path_to_path(&input, &output, &params)?;
        info!(
            "Successfully normalized: {:?} -> {:?} ({}x{}, tier {:?})",
            input, output, normalized.width, normalized.height, normalized.tier
        );
    }

    Ok(())
}
