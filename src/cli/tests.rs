#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{Cli, Commands};
use clap::Parser;

#[test]
fn test_generate_defaults_to_typescript() {
    let cli = Cli::parse_from(["sdkgen", "generate", "--spec", "api.yaml", "--output", "sdk"]);
    match cli.command {
        Commands::Generate {
            spec,
            language,
            output,
            force,
        } => {
            assert_eq!(spec.to_str(), Some("api.yaml"));
            assert_eq!(language, "typescript");
            assert_eq!(output.to_str(), Some("sdk"));
            assert!(!force);
        }
        _ => panic!("expected generate subcommand"),
    }
}

#[test]
fn test_generate_accepts_language_and_force() {
    let cli = Cli::parse_from([
        "sdkgen",
        "generate",
        "--spec",
        "api.json",
        "--language",
        "ts",
        "--output",
        "out",
        "--force",
    ]);
    match cli.command {
        Commands::Generate {
            language, force, ..
        } => {
            assert_eq!(language, "ts");
            assert!(force);
        }
        _ => panic!("expected generate subcommand"),
    }
}

#[test]
fn test_resources_subcommand() {
    let cli = Cli::parse_from(["sdkgen", "resources", "--spec", "api.yaml"]);
    match cli.command {
        Commands::Resources { spec } => assert_eq!(spec.to_str(), Some("api.yaml")),
        _ => panic!("expected resources subcommand"),
    }
}

#[test]
fn test_spec_is_required() {
    assert!(Cli::try_parse_from(["sdkgen", "generate", "--output", "sdk"]).is_err());
}
