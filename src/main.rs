use clap::{Parser, Subcommand};
use photostatic::assets::AssetContext;
use photostatic::build_dir::BuildDirectory;
use photostatic::config::{self, BuildConfig};
use photostatic::srcset::DEFAULT_SRCSET_SPEC;
use photostatic::state::BuildState;
use photostatic::transcode::MagickTranscoder;
use photostatic::{driver, output, resources};
use std::path::PathBuf;

/// Shared flags for commands that run the asset pipeline.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Skip srcset re-encoding: one symlinked native-width variant per image
    #[arg(long)]
    fast: bool,

    /// Plan and validate everything without writing files or re-encoding
    #[arg(long)]
    dry_run: bool,

    /// Maximum number of parallel workers (clamped to CPU cores)
    #[arg(long)]
    jobs: Option<usize>,

    /// Keep the existing output directory instead of cleaning it first
    #[arg(long)]
    keep: bool,
}

#[derive(Parser)]
#[command(name = "photostatic")]
#[command(about = "Static photo-gallery asset pipeline")]
#[command(long_about = "\
Static photo-gallery asset pipeline

Builds responsive srcset variants for every source image and records the
resulting variant sets in srcsets.json for page rendering.

Content structure:

  content/
  ├── photostatic.toml             # Build config (optional)
  ├── image/                       # General site images, any nesting
  │   └── banner/hero.jpg          # → /asset/image/banner/hero-<W>w.jpg
  └── photo/                       # Cataloged photos, flat
      └── 20240815-Dusk.jpg        # → /asset/image/photo/20240815dusk-<W>w.jpg
                                   #   plus the original for download

Requires ImageMagick (`magick`) on PATH for re-encoding.

Run 'photostatic gen-config' to print a documented photostatic.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build all image assets and write srcsets.json
    Build(BuildArgs),
    /// Dry-run the pipeline and show the planned variants per image
    Plan,
    /// Print a stock photostatic.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => build(&cli.source, &cli.output, &args)?,
        Command::Plan => {
            let args = BuildArgs {
                fast: false,
                dry_run: true,
                jobs: Some(1),
                keep: true,
            };
            build(&cli.source, &cli.output, &args)?;
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn build(
    source: &PathBuf,
    output: &PathBuf,
    args: &BuildArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BuildConfig::load(source)?;
    if let Some(jobs) = args.jobs {
        config.jobs = Some(jobs);
    }
    let fast = args.fast || config.fast;
    init_thread_pool(&config);

    let general = resources::discover_general_images(source)?;
    let photos = resources::discover_photos(source)?;
    let jobs = driver::collect_jobs(general, photos);
    println!(
        "==> Building assets for {} images → {}{}",
        jobs.len(),
        output.display(),
        if args.dry_run { " (dry run)" } else { "" }
    );

    let build_dir = BuildDirectory::new(output, fast, args.dry_run);
    if !args.keep {
        build_dir.clean()?;
    }

    let state = BuildState::new();
    let transcoder = MagickTranscoder::new();
    let ctx = AssetContext {
        build_dir: &build_dir,
        state: &state,
        transcoder: &transcoder,
        spec_table: DEFAULT_SRCSET_SPEC,
        fast,
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_build_event(&event) {
                println!("{line}");
            }
        }
    });
    let result = driver::build_all_assets(&ctx, &jobs, Some(tx));
    printer.join().expect("printer thread panicked");
    result?;

    let manifest = state.into_manifest();
    if !args.dry_run {
        let manifest_path = build_dir.root().join("srcsets.json");
        std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    }
    println!("==> {}", output::format_build_summary(&manifest));

    Ok(())
}

/// Initialize the rayon thread pool based on build config.
///
/// Caps at the number of available CPU cores — user can constrain down,
/// not up.
fn init_thread_pool(config: &BuildConfig) {
    let threads = config::effective_threads(config);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
