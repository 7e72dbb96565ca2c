use clap::{Parser, Subcommand};
use coverfit::imaging::{
    self, Alignment, ConvertConfig, HorizontalAlign, OutputFormat, RustBackend, VerticalAlign,
};
use coverfit::{batch, config, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "coverfit")]
#[command(about = "Resize images to exact dimensions by scaling to cover and cropping")]
#[command(long_about = "\
Resize images to exact dimensions by scaling to cover and cropping

The source is scaled uniformly until it covers the whole target, then the
overflow on one axis is cropped according to the alignment:

  source 400x200, target 300x300, align middle/middle

  ┌──────────────────────────────┐
  │        ┌──────────┐          │   drawn at 600x300
  │ cropped│  output  │ cropped  │   offset (-150, 0)
  │        └──────────┘          │
  └──────────────────────────────┘

Aspect ratio is always preserved. There is no letterboxing.

Run 'coverfit gen-config' to generate a documented config.toml for batch runs.")]
#[command(version = version_string())]
struct Cli {
    /// Log debug details (resolved geometry, chosen encoder)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a single image
    Convert(ConvertArgs),
    /// Convert every image in a directory tree
    Batch {
        /// Directory to read images from (searched recursively)
        source_dir: PathBuf,
        /// Directory to write converted images to
        output_dir: PathBuf,
        /// Config file to use instead of SOURCE_DIR/config.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the pixel dimensions of an image
    Identify {
        /// Image to inspect
        file: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Image to read
    source: PathBuf,
    /// Path to write the result to
    output: PathBuf,
    /// Target width in pixels
    #[arg(long)]
    width: u32,
    /// Target height in pixels
    #[arg(long)]
    height: u32,
    /// Which part of the image to keep vertically
    #[arg(long, value_enum)]
    valign: VerticalAlign,
    /// Which part of the image to keep horizontally
    #[arg(long, value_enum)]
    halign: HorizontalAlign,
    /// Output encoding
    #[arg(long, value_enum)]
    format: OutputFormat,
    /// Encoding quality, 0-100 (ignored by lossless formats)
    #[arg(long)]
    quality: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Convert(args) => {
            let alignment = Alignment::new(args.valign, args.halign);
            let convert_config = ConvertConfig::new(
                args.width,
                args.height,
                alignment,
                args.format,
                args.quality,
            )?;
            let report = imaging::convert_file(&args.source, &args.output, &convert_config)?;
            output::print_convert_output(&output::ConvertSummary {
                source: &args.source,
                output: &args.output,
                source_dims: report.source,
                target: convert_config.target,
                alignment,
                rect: report.rect,
                encoding: imaging::EncodingSpec {
                    format: convert_config.format,
                    quality: convert_config.quality,
                },
            });
        }
        Command::Batch {
            source_dir,
            output_dir,
            config: config_path,
        } => {
            let batch_config = match config_path {
                Some(path) => config::load_config_file(&path)?,
                None => config::load_config(&source_dir)?,
            };
            let convert_config = batch_config.convert_config()?;
            init_thread_pool(&batch_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = batch::batch(&source_dir, &output_dir, &convert_config, Some(tx));
            printer.join().map_err(|_| "progress printer thread panicked")?;
            let result = result?;
            output::print_batch_summary(&result);
            if !result.failed.is_empty() {
                let message = format!(
                    "{} of {} images failed",
                    result.failed.len(),
                    result.total()
                );
                return Err(message.into());
            }
        }
        Command::Identify { file } => {
            let dims = imaging::get_dimensions(&RustBackend::new(), &file)?;
            println!("{}", output::format_identify_output(&file, dims));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Route `log` output to stderr, `info` by default or `debug` with `-v`.
///
/// `RUST_LOG` still takes precedence when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
