use clap::{Parser, Subcommand};
use photo_page::config::{self, BundleConfig};
use photo_page::output;
use photo_page::process::{self, ProcessError};
use photo_page::scan::DirectorySnapshot;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photo-page")]
#[command(about = "Bundle a directory of photos into an archive and a gallery page")]
#[command(long_about = "\
Bundle a directory of photos into an archive and a gallery page

Each source directory becomes a fresh output directory:

  <output>/<source-name>/
  ├── Photos.zip      # every file, under its original name
  ├── Original/       # byte-identical copies
  ├── Resized/        # JPEG copies within 1280x1280
  └── Default.htm     # gallery page, ordered by capture time

Files named like '20230101-120000 (IMG_5).jpg' are exported as 'IMG_5.JPG'.
A directory is rejected, and nothing is written, if it holds a file that is
not an image, holds no images, or holds two files with the same original
name ignoring case.

Run 'photo-page gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML); stock defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a bundle for each source directory
    Build {
        /// Source directories
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Parent directory for the bundles
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Validate source directories without writing anything
    Check {
        /// Source directories
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { dirs, output } => {
            let config = config::load_config(cli.config.as_deref())?;
            let output = std::path::absolute(&output)?;
            let failed = for_each_dir(&dirs, |source| build_one(source, &output, &config));
            exit_on_failures(dirs.len(), failed);
        }
        Command::Check { dirs } => {
            let failed = for_each_dir(&dirs, check_one);
            exit_on_failures(dirs.len(), failed);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run `f` on each directory in turn; one failure never stops the rest.
///
/// Returns how many directories failed or were rejected.
fn for_each_dir(
    dirs: &[PathBuf],
    mut f: impl FnMut(&Path) -> Result<(), ProcessError>,
) -> usize {
    let mut failed = 0;
    for dir in dirs {
        let source = match resolve_source(dir) {
            Ok(source) => source,
            Err(e) => {
                output::print_directory_header(dir);
                output::print_error(dir, &e);
                failed += 1;
                continue;
            }
        };

        output::print_directory_header(&source);
        match f(&source) {
            Ok(()) => {}
            Err(ProcessError::Rejected(rejection)) => {
                output::print_rejection(&rejection);
                failed += 1;
            }
            Err(e) => {
                output::print_error(&source, &e);
                failed += 1;
            }
        }
    }
    failed
}

/// Absolute path of an existing directory.
fn resolve_source(dir: &Path) -> Result<PathBuf, std::io::Error> {
    let source = std::path::absolute(dir)?;
    if !source.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        ));
    }
    Ok(source)
}

fn build_one(source: &Path, output: &Path, config: &BundleConfig) -> Result<(), ProcessError> {
    let snapshot = DirectorySnapshot::scan(source)?;
    let missing = process::validate(&snapshot)?;
    output::print_missing_capture_time(&missing);

    let output_dir = process::allocate_output_dir(output, source)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = process::build_bundle(&snapshot, &output_dir, config, Some(tx));
    // The sender is dropped with build_bundle, which ends the printer loop
    let _ = printer.join();

    output::print_bundle_report(&result?);
    Ok(())
}

fn check_one(source: &Path) -> Result<(), ProcessError> {
    let snapshot = DirectorySnapshot::scan(source)?;
    let missing = process::validate(&snapshot)?;
    output::print_missing_capture_time(&missing);
    output::print_check_passed(snapshot.entries().len());
    Ok(())
}

fn exit_on_failures(total: usize, failed: usize) {
    if failed > 0 {
        output::print_summary(total, failed);
        std::process::exit(1);
    }
}
