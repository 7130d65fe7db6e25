use clap::{Parser, Subcommand};
use reframe::config::{self, OutputFormat, ReframeConfig};
use reframe::geometry::{Crop, Dimensions, Fraction};
use reframe::imaging::{RustBackend, load_source};
use reframe::manifest::{self, Manifest};
use reframe::modifier::{ImageFormat, ImageModifier};
use reframe::output;
use reframe::plan::plan;
use reframe::selection::{ImageModificationResolver, Resolution, SourceImage};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "reframe")]
#[command(about = "Pick and normalize image transforms for requested resolutions")]
#[command(long_about = "\
Pick and normalize image transforms for requested resolutions

Editors register a transform (size, crop, flags) for some resolutions of an
image. For any other resolution, reframe picks the registered transform to
reuse, in this order:

  exact        registered for exactly the requested resolution
  same-ratio   registered for the same aspect ratio, closest in size
  adapt        crop extended or shrunk to the requested aspect ratio

and normalizes it against the real size of the source image. With no match,
a fresh transform of the whole image is planned.

Candidates come from a JSON manifest:

  {
    \"source\": { \"id\": 1, \"width\": 4000, \"height\": 3000 },
    \"candidates\": [ { \"modification\": { ... }, \"resolution\": { ... } } ],
    \"requests\": [ { \"id\": 9, \"width\": 800, \"height\": 600 } ]
  }

Run 'reframe gen-config' to generate a documented reframe.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Output format (overrides `output.format` from the config)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Log selector decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where the source image's real dimensions come from.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Read dimensions and format from this image file
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a single transform against a source size
    Normalize {
        /// Requested output size, e.g. 800x600 or 800x0
        size: Dimensions,
        /// Source dimensions, e.g. 1600x1200 (alternative to --image)
        #[arg(long, required_unless_present = "image")]
        original: Option<Dimensions>,
        #[command(flatten)]
        source: SourceArgs,
        /// Crop into the source, e.g. 3200x2400+400+300
        #[arg(long)]
        crop: Option<Crop>,
        /// Allow upscaling beyond the (cropped) source
        #[arg(long)]
        stretch: bool,
        /// Derive the secondary axis from the (cropped) source's aspect ratio
        #[arg(long)]
        keep_aspect: bool,
        /// Output container format (jpg, png, webp, ...)
        #[arg(long)]
        to: Option<ImageFormat>,
    },
    /// Plan one requested resolution against a manifest's candidates
    Resolve {
        /// JSON manifest with source and candidates
        manifest: PathBuf,
        /// Requested resolution, e.g. 800x600
        size: Dimensions,
        /// Id of the requested resolution
        #[arg(long, default_value_t = 0)]
        id: u64,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Plan every request in a manifest, in parallel
    Batch {
        /// JSON manifest with source, candidates and requests
        manifest: PathBuf,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Parse and reduce an aspect ratio, e.g. 1920/1080 or 16%2F9
    Ratio {
        #[arg(allow_hyphen_values = true)]
        value: Fraction,
    },
    /// Print a stock reframe.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let reframe_config = match cli.command {
        Command::GenConfig => ReframeConfig::default(),
        _ => config::load_config(&cli.config)?,
    };
    let format = cli.format.unwrap_or(reframe_config.output.format);
    let resolver = ImageModificationResolver::from_config(&reframe_config.selection);
    tracing::debug!(selectors = ?resolver.selector_names(), "selector chain");

    match cli.command {
        Command::Normalize {
            size,
            original,
            source,
            crop,
            stretch,
            keep_aspect,
            to,
        } => {
            let original = match source.image {
                Some(path) => load_source(&RustBackend::new(), 0, &path)?.dimensions,
                None => original.unwrap_or_default(),
            };
            let mut modifier = ImageModifier::new(size.width, size.height)
                .with_stretch(stretch)
                .with_keep_aspect(keep_aspect)
                .with_output(to);
            if let Some(crop) = crop {
                modifier = modifier.with_crop(crop);
            }
            output::print_modifier(&modifier.normalize(Some(original)), format)?;
        }
        Command::Resolve {
            manifest,
            size,
            id,
            source,
        } => {
            let manifest = manifest::load_manifest(&manifest)?;
            let source = resolve_source(&manifest, source.image.as_deref())?;
            let requested = Resolution::new(id, size.width, size.height);
            let planned = plan(&resolver, &source, &manifest.candidates, &requested);
            output::print_plans(&[planned], format)?;
        }
        Command::Batch { manifest, source } => {
            let manifest = manifest::load_manifest(&manifest)?;
            let source = resolve_source(&manifest, source.image.as_deref())?;
            init_thread_pool(&reframe_config);
            let plans = manifest::plan_all(
                &resolver,
                &source,
                &manifest.candidates,
                &manifest.requests,
            );
            output::print_plans(&plans, format)?;
        }
        Command::Ratio { value } => {
            output::print_fraction(&value, format)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// The manifest's source, or the one identified from `--image`.
///
/// An identified image keeps the manifest's source id so candidates still
/// refer to it.
fn resolve_source(
    manifest: &Manifest,
    image: Option<&Path>,
) -> Result<SourceImage, Box<dyn std::error::Error>> {
    let id = manifest.source.map(|s| s.id).unwrap_or_default();
    let identified = image
        .map(|path| load_source(&RustBackend::new(), id, path))
        .transpose()?;
    Ok(manifest.source_or(identified)?)
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("reframe={level}").into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Size rayon's global pool for `batch` from `processing.max_threads`.
fn init_thread_pool(config: &ReframeConfig) {
    let threads = config::effective_threads(&config.processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
