use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dicom_series_viewer::config::ViewerConfig;
use dicom_series_viewer::surface;
use tracing::error;

/// Browse a folder of DICOM slices as a volume and export windowed slices.
#[derive(Parser, Debug)]
#[command(author, version, about = "DICOM series viewer")]
struct Args {
    /// Folder containing the DICOM series; falls back to $DICOM_VIEWER_FOLDER,
    /// then "dicom"
    folder: Option<PathBuf>,

    /// Export destination for the rendered slice
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ViewerConfig::resolve(args.folder, args.output);
    let surface = surface::probe(Vec::new());

    match surface.run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
