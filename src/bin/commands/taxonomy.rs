use clap::Args;
use json_to_table::json_to_table;
use pathlens::tag_taxonomy;

use super::print_json;

/// Arguments for the Taxonomy command
#[derive(Args)]
pub struct TaxonomyArgs {
    /// Output as JSON objects
    #[clap(long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pub pretty: bool,
}

pub fn run(args: TaxonomyArgs) {
    let TaxonomyArgs { json, pretty } = args;

    let taxonomy = tag_taxonomy();

    if json {
        print_json(&taxonomy, pretty);
        return;
    }

    let mut table = json_to_table(&taxonomy);
    table.collapse();
    println!("{}", table);
}
