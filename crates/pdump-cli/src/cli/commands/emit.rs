//! `pdump emit` – run every configured dump once against explicit variables.
//!
//! Path matchers are ignored; each dump sees the same variable set.

use anyhow::{Context, Result};
use pdump_core::config::PdumpConfig;
use pdump_core::emitter::{ContentEmitter, Emission, FileOutcome};
use pdump_core::placeholder::Replacer;
use std::collections::HashMap;
use std::path::Path;

/// Parses `KEY=VALUE` for `--var`.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

fn build_replacer(vars: &[(String, String)], vars_file: Option<&Path>) -> Result<Replacer> {
    let mut repl = Replacer::new();
    if let Some(path) = vars_file {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read vars file: {}", path.display()))?;
        let from_file: HashMap<String, String> = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse vars file: {}", path.display()))?;
        for (key, value) in from_file {
            repl.set(key, value);
        }
    }
    for (key, value) in vars {
        repl.set(key, value.as_str());
    }
    Ok(repl)
}

pub fn run_emit(cfg: &PdumpConfig, vars: &[(String, String)], vars_file: Option<&Path>) -> Result<()> {
    let repl = build_replacer(vars, vars_file)?;
    if cfg.dump.is_empty() {
        println!("No dumps configured.");
        return Ok(());
    }

    for (index, dump) in cfg.dump.iter().enumerate() {
        let emitter = ContentEmitter::new(&dump.emitter)
            .map_err(|e| anyhow::anyhow!("dump #{}: {}", index, e))?;
        println!("#{} {}", index, describe(&emitter.handle(&repl)));
    }
    Ok(())
}

fn describe(emission: &Emission) -> String {
    match emission {
        Emission::Skipped => "skipped (empty content)".to_string(),
        Emission::Emitted {
            content,
            logged,
            file,
        } => {
            let mut parts = vec![format!("content={:?}", content)];
            if *logged {
                parts.push("logged".to_string());
            }
            match file {
                Some(FileOutcome::Written(path)) => parts.push(format!("wrote {}", path.display())),
                Some(FileOutcome::Failed(path)) => {
                    parts.push(format!("write failed {} (see log)", path.display()))
                }
                Some(FileOutcome::EmptyPath) => parts.push("file path empty".to_string()),
                None => {}
            }
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdump_core::config::{DumpConfig, EmitterConfig};

    #[test]
    fn parse_var_splits_on_first_equals() {
        assert_eq!(
            parse_var("query=a=b").unwrap(),
            ("query".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_var("path=").unwrap(), ("path".to_string(), String::new()));
        assert!(parse_var("novalue").is_err());
        assert!(parse_var("=x").is_err());
    }

    #[test]
    fn vars_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.json");
        std::fs::write(&path, r#"{"method": "GET", "path": "/from-file"}"#).unwrap();
        let repl = build_replacer(&[("path".to_string(), "/flag".to_string())], Some(&path)).unwrap();
        assert_eq!(repl.replace_all("{method} {path}", ""), "GET /flag");
    }

    #[test]
    fn run_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.log");
        let cfg = PdumpConfig {
            dump: vec![DumpConfig {
                path: Some("/ignored".to_string()),
                emitter: EmitterConfig {
                    content: "{method} {path}".to_string(),
                    file: Some(out.to_string_lossy().into_owned()),
                    ..EmitterConfig::default()
                },
                ..DumpConfig::default()
            }],
            ..PdumpConfig::default()
        };
        let vars = [
            ("method".to_string(), "GET".to_string()),
            ("path".to_string(), "/a".to_string()),
        ];
        run_emit(&cfg, &vars, None).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "GET /a\n");
    }

    #[test]
    fn describe_outcomes() {
        assert_eq!(describe(&Emission::Skipped), "skipped (empty content)");
        let emitted = Emission::Emitted {
            content: "GET /a".to_string(),
            logged: true,
            file: Some(FileOutcome::EmptyPath),
        };
        assert_eq!(describe(&emitted), "content=\"GET /a\", logged, file path empty");
    }
}
