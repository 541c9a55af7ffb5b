use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use pathlens::extract_devices;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::print_json;

/// Arguments for the Extract command
#[derive(Args)]
pub struct ExtractArgs {
    /// File path to a topology JSON document; reads stdin when omitted
    #[clap(name = "FILE")]
    pub file_path: Option<PathBuf>,

    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

pub fn run(args: ExtractArgs) {
    let ExtractArgs {
        file_path,
        json,
        pretty,
    } = args;

    let text = match read_input(file_path.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("ERROR: failed to read input: {e}");
            std::process::exit(1);
        }
    };

    let doc: Value = match serde_json::from_str(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("ERROR: input is not valid JSON: {e}");
            std::process::exit(1);
        }
    };

    let devices = extract_devices(&doc);

    if json {
        print_json(&devices, pretty);
        return;
    }

    if devices.is_empty() {
        println!("no devices found in the document");
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
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<DeviceRow> = devices
        .iter()
        .map(|d| DeviceRow {
            hop: d.hop,
            device: d.device.clone(),
            device_type: d.device_type.clone(),
            iface: d.iface.clone(),
            ip: d.ip.clone(),
            notes: d.notes.clone(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn read_input(path: Option<&Path>) -> Result<String, std::io::Error> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
