use clap::{Parser, Subcommand};
use pathlens::PathlensConfig;
use tracing::Level;

mod commands;

use commands::{extract, mappings, networks, path, serve, taxonomy};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.pathlens/pathlens.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Override the data directory holding the JSON stores
    #[clap(long)]
    data_dir: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve(serve::ServeArgs),

    /// Look up the path between two addresses and correlate its devices
    Path(path::PathArgs),

    /// Extract device records from a topology document, local file or stdin
    Extract(extract::ExtractArgs),

    /// Manage approved network records
    Networks(networks::NetworksArgs),

    /// Manage CIDR-to-application mappings
    Mappings(mappings::MappingsArgs),

    /// Show the tag vocabulary
    Taxonomy(taxonomy::TaxonomyArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
    }

    let mut config = match PathlensConfig::new(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Serve(args) => serve::run(&config, args),
        Commands::Path(args) => path::run(&config, args),
        Commands::Extract(args) => extract::run(args),
        Commands::Networks(args) => networks::run(&config, args),
        Commands::Mappings(args) => mappings::run(&config, args),
        Commands::Taxonomy(args) => taxonomy::run(args),
    }
}
