use super::*;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_serve() {
    let cli = parse(&["pdump", "serve"]);
    assert!(cli.config.is_none());
    match cli.command {
        CliCommand::Serve { listen } => assert!(listen.is_none()),
        _ => panic!("expected Serve"),
    }
}

#[test]
fn cli_parse_serve_listen_and_config() {
    let cli = parse(&[
        "pdump",
        "serve",
        "--listen",
        "0.0.0.0:9000",
        "--config",
        "/etc/pdump.toml",
    ]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/pdump.toml")));
    match cli.command {
        CliCommand::Serve { listen } => assert_eq!(listen.as_deref(), Some("0.0.0.0:9000")),
        _ => panic!("expected Serve"),
    }
}

#[test]
fn cli_parse_validate() {
    match parse(&["pdump", "--config", "c.toml", "validate"]).command {
        CliCommand::Validate => {}
        _ => panic!("expected Validate"),
    }
}

#[test]
fn cli_parse_emit_vars() {
    match parse(&[
        "pdump",
        "emit",
        "--var",
        "method=GET",
        "--var",
        "path=/a",
        "--vars-file",
        "vars.json",
    ])
    .command
    {
        CliCommand::Emit { vars, vars_file } => {
            assert_eq!(
                vars,
                vec![
                    ("method".to_string(), "GET".to_string()),
                    ("path".to_string(), "/a".to_string()),
                ]
            );
            assert_eq!(vars_file.as_deref(), Some(Path::new("vars.json")));
        }
        _ => panic!("expected Emit"),
    }
}

#[test]
fn cli_parse_emit_rejects_bad_var() {
    assert!(Cli::try_parse_from(["pdump", "emit", "--var", "novalue"]).is_err());
}

#[test]
fn cli_parse_completions() {
    match parse(&["pdump", "completions", "bash"]).command {
        CliCommand::Completions { shell } => assert_eq!(shell, clap_complete::Shell::Bash),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn load_config_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "listen = \"127.0.0.1:0\"\n\n[[dump]]\ncontent = \"{path}\"\nlogger_suffix = \"t\"\n",
    )
    .unwrap();
    let cfg = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.listen, "127.0.0.1:0");
    assert_eq!(cfg.dump.len(), 1);

    std::fs::write(&path, "[[dump]]\ncontent = \"{path}\"\n").unwrap();
    assert!(load_config(Some(&path)).is_err());
}
