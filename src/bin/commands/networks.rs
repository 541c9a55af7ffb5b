use clap::{Args, Subcommand};
use pathlens::{NetworkStore, PathlensConfig, TagOutcome};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;

/// Arguments for the Networks command
#[derive(Args)]
pub struct NetworksArgs {
    #[clap(subcommand)]
    pub command: Option<NetworksCommands>,
}

/// Networks subcommands
#[derive(Subcommand)]
pub enum NetworksCommands {
    /// List approved network records (default when no subcommand)
    List {
        /// Output as JSON objects
        #[clap(long)]
        json: bool,

        /// Pretty-print JSON output
        #[clap(long)]
        pretty: bool,
    },

    /// Add an approved network record
    Add {
        /// Network range in a.b.c.d/len form
        #[clap(name = "CIDR")]
        cidr: String,

        /// Tags in category:value form, comma separated
        #[clap(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Update an approved network record
    Update {
        /// Record ID
        #[clap(name = "ID")]
        id: String,

        /// Replacement network range in a.b.c.d/len form
        #[clap(long)]
        cidr: Option<String>,

        /// Replacement tags in category:value form, comma separated
        #[clap(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },

    /// Delete an approved network record
    Delete {
        /// Record ID
        #[clap(name = "ID")]
        id: String,
    },

    /// Merge tags into the /32 record for an address, creating it if missing
    TagByIp {
        /// IPv4 address
        #[clap(name = "IP")]
        ip: String,

        /// Tags in category:value form, comma separated
        #[clap(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },
}

pub fn run(config: &PathlensConfig, args: NetworksArgs) {
    let store = match NetworkStore::open(config.network_store_path()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("ERROR: failed to open network store: {e}");
            std::process::exit(1);
        }
    };

    match args.command {
        None => run_list(&store, false, false),
        Some(NetworksCommands::List { json, pretty }) => run_list(&store, json, pretty),
        Some(NetworksCommands::Add { cidr, tags }) => match store.create(&cidr, tags) {
            Ok(record) => println!("✓ added {} ({})", record.cidr, record.id),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
        Some(NetworksCommands::Update { id, cidr, tags }) => {
            match store.update(&id, cidr.as_deref(), tags) {
                Ok(record) => println!("✓ updated {} ({})", record.cidr, record.id),
                Err(e) => {
                    eprintln!("ERROR: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(NetworksCommands::Delete { id }) => match store.delete(&id) {
            Ok(record) => println!("✓ deleted {} ({})", record.cidr, record.id),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
        Some(NetworksCommands::TagByIp { ip, tags }) => match store.tag_by_ip(&ip, tags) {
            Ok((record, TagOutcome::Created)) => {
                println!("✓ created {} with {} tag(s)", record.cidr, record.tags.len())
            }
            Ok((record, TagOutcome::Updated)) => {
                println!("✓ updated {} to {} tag(s)", record.cidr, record.tags.len())
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
    }
}

fn run_list(store: &NetworkStore, json: bool, pretty: bool) {
    if json {
        print_json(&store.document(), pretty);
        return;
    }

    let records = store.list();
    if records.is_empty() {
        println!("no approved networks recorded");
        return;
    }

    #[derive(Tabled)]
    struct NetworkRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "CIDR")]
        cidr: String,
        #[tabled(rename = "Tags")]
        tags: String,
    }

    let rows: Vec<NetworkRow> = records
        .iter()
        .map(|r| NetworkRow {
            id: r.id.clone(),
            cidr: r.cidr.clone(),
            tags: r.tags.join(", "),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}
