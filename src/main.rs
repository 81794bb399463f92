use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use web_themer::cli::Args;
use web_themer::fetch::{ContentFetcher, LocalFetcher};
use web_themer::scan::scan_page;
use web_themer::theme::{BackgroundImage, Theme};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.engine_config();
    config.validate()?;
    if !(0.0..=1.0).contains(&args.opacity) {
        bail!("invalid --opacity {}: expected a value in [0, 1]", args.opacity);
    }

    let page = LocalFetcher.fetch(&args.source)?;
    let samples = scan_page(&page, args.colors);
    info!(samples = samples.len(), "collected color samples");

    let mut theme = Theme::generate(args.theme_name(), &samples, &config)?;
    if args.extract_background {
        match page.largest_image() {
            Some(image) => {
                theme = theme.with_background_image(BackgroundImage {
                    path: image.location.clone(),
                    opacity: args.opacity,
                });
            }
            None => warn!("--extract-background: page has no images"),
        }
    }

    for warning in &theme.warnings {
        warn!("{warning}");
    }

    let backend = args.format.backend();
    if args.install {
        let path = backend.install(&theme)?;
        eprintln!("Installed {} theme to {}", backend.name(), path.display());
    } else if let Some(path) = &args.output {
        backend.write_to(&theme, path)?;
        eprintln!("Theme written to {}", path.display());
    } else {
        print!("{}", backend.serialize(&theme)?);
    }

    Ok(())
}
