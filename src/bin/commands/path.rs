use std::sync::Arc;

use clap::Args;
use pathlens::{NetworkStore, PathQuery, PathlensConfig, TopologyClient, TopologyLens};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;

/// Arguments for the Path command
#[derive(Args)]
pub struct PathArgs {
    #[clap(flatten)]
    pub query: PathQuery,

    /// Print the upstream document as-is, without device correlation
    #[clap(long)]
    pub raw: bool,

    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

pub fn run(config: &PathlensConfig, args: PathArgs) {
    let PathArgs {
        query,
        raw,
        json,
        pretty,
    } = args;

    let networks = match NetworkStore::open(config.network_store_path()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            eprintln!("ERROR: failed to open network store: {e}");
            std::process::exit(1);
        }
    };
    let lens = TopologyLens::new(TopologyClient::new(&config.upstream), networks);

    if raw {
        match lens.fetch_path(&query) {
            Ok(document) => print_json(&document, pretty),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let report = match lens.fetch_path_with_devices(&query) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&report, pretty);
        return;
    }

    if report.devices.is_empty() {
        println!("no devices found on the path");
        return;
    }

    #[derive(Tabled)]
    struct DeviceRow {
        #[tabled(rename = "Hop")]
        hop: usize,
        #[tabled(rename = "Device")]
        device: String,
        #[tabled(rename = "Type")]
        device_type: String,
        #[tabled(rename = "Interface")]
        iface: String,
        #[tabled(rename = "IP")]
        ip: String,
        #[tabled(rename = "Approved")]
        approved: bool,
        #[tabled(rename = "Tags")]
        tags: String,
    }

    let rows: Vec<DeviceRow> = report
        .devices
        .iter()
        .map(|d| DeviceRow {
            hop: d.hop,
            device: d.device.clone(),
            device_type: d.device_type.clone(),
            iface: d.iface.clone(),
            ip: d.ip.clone(),
            approved: d.approved,
            tags: d.tags.join(", "),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("\n{} devices on path.", report.meta.devices_found);
}
