use clap::Args;
use pathlens::{start_server, AppState, PathlensConfig, ServerConfig};

/// Arguments for the Serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to, overrides the configured value
    #[clap(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides the configured value
    #[clap(short, long)]
    pub port: Option<u16>,
}

pub fn run(config: &PathlensConfig, args: ServeArgs) {
    let ServeArgs { host, port } = args;

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("ERROR: failed to open data stores: {e}");
            std::process::exit(1);
        }
    };

    let server = ServerConfig::new()
        .with_address(host.unwrap_or_else(|| config.host.clone()))
        .with_port(port.unwrap_or(config.port));

    println!("Pathlens API listening on http://{}", server.bind_address());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("ERROR: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(start_server(state, server)) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
