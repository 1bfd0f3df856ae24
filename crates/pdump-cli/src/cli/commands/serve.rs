//! `pdump serve` – run the HTTP pipeline until Ctrl-C.

use anyhow::{Context, Result};
use pdump_core::config::PdumpConfig;
use pdump_core::server;

pub async fn run_serve(cfg: PdumpConfig) -> Result<()> {
    // Re-validate: --listen may have replaced the configured address.
    cfg.validate().context("invalid config")?;
    println!("Listening on {} with {} dump(s)", cfg.listen, cfg.dump.len());
    server::serve(&cfg, server::ctrl_c()).await
}
