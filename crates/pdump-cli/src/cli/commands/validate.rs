//! `pdump validate` – check the config and describe each dump instance.

use anyhow::Result;
use pdump_core::config::PdumpConfig;
use pdump_core::server::DumpRoute;

pub fn run_validate(cfg: &PdumpConfig) -> Result<()> {
    println!("listen: {}", cfg.listen);
    println!("respond: {} ({} byte body)", cfg.respond.status, cfg.respond.body.len());
    if cfg.dump.is_empty() {
        println!("No dumps configured.");
        return Ok(());
    }

    println!("{:<4} {:<10} {:<24} {}", "#", "PATH", "LOGGER", "FILE");
    for (index, dump) in cfg.dump.iter().enumerate() {
        let route = DumpRoute::new(dump).map_err(|e| anyhow::anyhow!("dump #{}: {}", index, e))?;
        let emitter = route.emitter();
        let file = emitter
            .file_template()
            .map(|f| format!("{} (mode {})", f, emitter.file_mode()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<4} {:<10} {:<24} {}",
            index,
            dump.path.as_deref().unwrap_or("*"),
            emitter.logger_name().unwrap_or("-"),
            file
        );
    }
    println!("Config OK.");
    Ok(())
}
