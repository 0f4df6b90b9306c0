use clap::Parser;
use std::path::PathBuf;

use imgnorm::{OutputFormat, ResizeStrategy};

#[derive(Parser)]
#[command(name = "imgnorm", version, about = "Normalize images for multimodal chat requests")]
pub struct CliArgs {
    /// Input image (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory containing images (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output filename (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Output format (png, jpeg or tiff); overrides the config file
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Resize strategy (document or direct); overrides the config file
    #[arg(long, value_enum)]
    pub strategy: Option<ResizeStrategy>,

    /// JSON file with normalization parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable fitting the tier-scaled output into the size envelope
    #[arg(long, default_value_t = false)]
    pub no_clamp: bool,

    /// Print a base64 data URL to stdout instead of writing --output
    #[arg(long, default_value_t = false)]
    pub data_url: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: continue processing other files when an image fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,
}
