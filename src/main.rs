use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use webp_sizes::config::{self, ProjectLayout};
use webp_sizes::output;
use webp_sizes::process::{self, FailurePolicy};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "webp-sizes")]
#[command(about = "Generate responsive WebP variants of photo-*.jpg sources")]
#[command(long_about = "\
Generate responsive WebP variants of photo-*.jpg sources

Every photo-<name>.jpg in the source directory becomes one lossy WebP per
configured width, named <name>-<width>.webp:

  images/
  ├── Images/                      # Sources (only photo-*.jpg, not recursive)
  │   └── photo-sunset.jpg         # 3000x2000
  ├── optimized/                   # Output, created if missing
  │   ├── photo-sunset-480.webp    # 480x320
  │   ├── photo-sunset-960.webp    # 960x640
  │   └── photo-sunset-1440.webp   # 1440x960
  └── optimized-sources.json       # Settings (optional)

Settings file:

  { \"widths\": [480, 960, 1440], \"quality\": 82 }

Both keys are optional. Sources narrower than a target width are written at
their native size, never upscaled.

Run 'webp-sizes gen-config' to print the default settings file.")]
#[command(version = version_string())]
struct Cli {
    /// Project root; other paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Source directory [default: images/Images]
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory [default: images/optimized]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Settings file [default: images/optimized-sources.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip sources that fail instead of stopping at the first one
    #[arg(long, global = true)]
    keep_going: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Default)]
enum Command {
    /// Generate WebP variants for every source (default)
    #[default]
    Generate,
    /// List sources and the variants that would be written, without writing
    Check,
    /// Print a stock settings file with the default values
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "webp_sizes=info"
    } else {
        "webp_sizes=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

impl Cli {
    fn layout(&self) -> ProjectLayout {
        let mut layout = ProjectLayout::new(&self.root);
        if let Some(source) = &self.source {
            layout.source_dir = layout.resolve(source);
        }
        if let Some(output) = &self.output {
            layout.output_dir = layout.resolve(output);
        }
        if let Some(config) = &self.config {
            layout.config_file = layout.resolve(config);
        }
        layout
    }

    fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let layout = cli.layout();
    let policy = cli.failure_policy();
    let command = cli.command.unwrap_or_default();

    match command {
        Command::Generate => {
            let settings = config::load_config(&layout.config_file)?;
            tracing::info!(
                source = %layout.source_dir.display(),
                output = %layout.output_dir.display(),
                widths = ?settings.widths,
                quality = settings.quality,
                "generating variants"
            );
            let report = process::generate(
                &layout.source_dir,
                &layout.output_dir,
                &settings,
                policy,
                |event| output::print_process_event(event, &layout),
            )?;
            output::print_summary(&report);
            report.ensure_success()?;
        }
        Command::Check => {
            let settings = config::load_config(&layout.config_file)?;
            let plans = process::plan(&layout.source_dir, &layout.output_dir, &settings)?;
            output::print_plan(&plans, &layout);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
        }
    }

    Ok(())
}
