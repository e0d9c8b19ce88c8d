//! Serve command - expose the pipeline over HTTP.

use garimpo::{Garimpo, GarimpoConfig};

use crate::server;

pub fn run(port: u16, max_rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    let garimpo = Garimpo::with_config(GarimpoConfig {
        max_total_rows: max_rows,
        ..GarimpoConfig::default()
    });
    let state = server::AppState::new(garimpo);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run_server(state, port))
}
