use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use exif_frame::frame::FrameComposer;
use exif_frame::render::{Rasterizer, SoftwareRasterizer};
use exif_frame::{config, exif, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "exif-frame",
    version,
    about = "Render a camera-info footer (model, lens, exposure, date, maker logo) onto a copy of a photo"
)]
struct Cli {
    /// Photo to frame
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Write the framed image into this directory instead of next to the input
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print the extracted EXIF tags and exit
    #[arg(long = "show-tags")]
    show_tags: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Print the framed image as a data URI instead of writing a file
    #[arg(long = "data-uri")]
    data_uri: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(input) = cli.path.as_deref() else {
        anyhow::bail!("No input file specified. Use --help for usage.");
    };
    if !pipeline::is_supported_image(input) {
        anyhow::bail!("Unsupported image format: {}", input.display());
    }

    if cli.show_tags {
        return print_tags(input, cli.json).await;
    }

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.out_dir {
        config.output.dir = Some(dir);
    }

    let rasterizer = SoftwareRasterizer::from_font_path(config.assets.font_path.as_deref())?;
    log::debug!("Using {} rasterizer", rasterizer.name());
    let composer = FrameComposer::new(rasterizer, &config);

    let outcome = pipeline::frame_file(input, &composer).await?;
    let Some(framed) = outcome.framed else {
        anyhow::bail!("Rendering failed for {}", input.display());
    };

    if cli.data_uri {
        println!("{}", framed.to_data_uri());
        return Ok(());
    }

    let output = pipeline::output_path(input, &config.output);
    pipeline::write_output(&output, &framed).await?;

    if cli.json {
        let result = serde_json::json!({
            "path": outcome.path.display().to_string(),
            "output": output.display().to_string(),
            "width": framed.width,
            "height": framed.height,
            "tags": outcome.tags,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        log::info!(
            "Framed {} -> {} ({}x{})",
            input.display(),
            output.display(),
            framed.width,
            framed.height
        );
    }

    Ok(())
}

// ANSI color codes
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Print every recognized tag for a file.
async fn print_tags(path: &Path, json: bool) -> Result<()> {
    let tags = exif::load_tags(path).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    println!();
    println!("  {BOLD}{}{RESET}", path.display());
    println!("  {DIM}{}{RESET}", "─".repeat(72));
    for (name, value) in tags.iter() {
        println!("  {:<22} : {value}", name);
    }
    if tags.is_empty() {
        println!("  {DIM}(no recognized EXIF tags){RESET}");
    }
    println!();

    Ok(())
}
