use clap::{Args, Subcommand};
use pathlens::{MappingStore, PathlensConfig};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;

/// Arguments for the Mappings command
#[derive(Args)]
pub struct MappingsArgs {
    #[clap(subcommand)]
    pub command: Option<MappingsCommands>,
}

/// Mappings subcommands
#[derive(Subcommand)]
pub enum MappingsCommands {
    /// List network-to-application mappings (default when no subcommand)
    List {
        /// Output as JSON objects
        #[clap(long)]
        json: bool,

        /// Pretty-print JSON output
        #[clap(long)]
        pretty: bool,
    },

    /// Add a mapping record
    Add {
        /// Network range in a.b.c.d/len form
        #[clap(name = "CIDR")]
        cidr: String,

        /// Application names, comma separated
        #[clap(short, long, value_delimiter = ',')]
        applications: Vec<String>,
    },

    /// Update a mapping record
    Update {
        /// Record ID
        #[clap(name = "ID")]
        id: String,

        /// Replacement network range in a.b.c.d/len form
        #[clap(long)]
        cidr: Option<String>,

        /// Replacement application names, comma separated
        #[clap(short, long, value_delimiter = ',')]
        applications: Option<Vec<String>>,
    },

    /// Delete a mapping record
    Delete {
        /// Record ID
        #[clap(name = "ID")]
        id: String,
    },
}

pub fn run(config: &PathlensConfig, args: MappingsArgs) {
    let store = match MappingStore::open(config.mapping_store_path()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("ERROR: failed to open mapping store: {e}");
            std::process::exit(1);
        }
    };

    match args.command {
        None => run_list(&store, false, false),
        Some(MappingsCommands::List { json, pretty }) => run_list(&store, json, pretty),
        Some(MappingsCommands::Add { cidr, applications }) => {
            match store.create(&cidr, applications) {
                Ok(record) => println!("✓ added {} ({})", record.cidr, record.id),
                Err(e) => {
                    eprintln!("ERROR: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(MappingsCommands::Update {
            id,
            cidr,
            applications,
        }) => match store.update(&id, cidr.as_deref(), applications) {
            Ok(record) => println!("✓ updated {} ({})", record.cidr, record.id),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
        Some(MappingsCommands::Delete { id }) => match store.delete(&id) {
            Ok(record) => println!("✓ deleted {} ({})", record.cidr, record.id),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
    }
}

fn run_list(store: &MappingStore, json: bool, pretty: bool) {
    if json {
        print_json(&store.document(), pretty);
        return;
    }

    let records = store.list();
    if records.is_empty() {
        println!("no mappings recorded");
        return;
    }

    #[derive(Tabled)]
    struct MappingRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "CIDR")]
        cidr: String,
        #[tabled(rename = "Applications")]
        applications: String,
    }

    let rows: Vec<MappingRow> = records
        .iter()
        .map(|r| MappingRow {
            id: r.id.clone(),
            cidr: r.cidr.clone(),
            applications: r.applications.join(", "),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}
