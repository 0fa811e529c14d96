use chrono::Utc;
use clap::{Parser, Subcommand};
use places::attributes::ImageAttributeResolver;
use places::catalog::{self, Unrelated};
use places::config;
use places::imaging::FileProbe;
use places::output;
use places::place::Place;
use places::routes::BuiltInRoutes;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "places")]
#[command(about = "Inspect place records and their resolved attributes")]
#[command(long_about = "\
Inspect place records and their resolved attributes

Each place is a TOML file in the places directory. A config.toml next to
them configures image types and sizes, map defaults, YouTube templates,
date formatting and routes.

Places directory:

  places/
  ├── config.toml                  # Places configuration (optional)
  ├── royal-albert-hall.toml       # One file per place
  └── venues/
      └── wigmore-hall.toml        # Nested directories are fine

Image dimensions are read from files under public_path when the size's
method is portrait, landscape, auto, fit or crop.

Run 'places gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Places directory
    #[arg(long, default_value = "places", global = true)]
    source: PathBuf,

    /// Override public_path from config.toml
    #[arg(long, global = true)]
    public_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List live places
    List {
        /// Include drafts and scheduled places
        #[arg(long)]
        all: bool,
    },
    /// Show every resolved attribute of one place
    Show {
        /// Slug of the place
        slug: String,
    },
    /// Validate config and place files without printing them
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let store = config::load_config(&cli.source)?;
    let places = catalog::load_catalog(&cli.source, store.settings(), Unrelated)?;
    let routes = BuiltInRoutes::from_config(&store);
    let now = Utc::now();

    match cli.command {
        Command::List { all } => {
            let shown: Vec<&Place> = if all {
                places.places().iter().collect()
            } else {
                places.live(now).collect()
            };
            output::print_place_list(&shown, &store, &routes, now);
        }
        Command::Show { slug } => {
            let place = places
                .find_by_slug(&slug)
                .ok_or_else(|| format!("No place with slug {slug:?}"))?;
            let mut resolver = ImageAttributeResolver::new(&store, FileProbe::new());
            if let Some(public_path) = cli.public_path {
                resolver = resolver.with_public_root(public_path);
            }
            output::print_place_detail(place, store.settings(), &resolver, &store, &routes, now);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            println!(
                "{}, {} live, {} image types",
                output::place_count(places.len()),
                places.live(now).count(),
                store.settings().images.len()
            );
            println!("==> Places are valid");
        }
        Command::GenConfig => unreachable!("handled before loading"),
    }

    Ok(())
}
