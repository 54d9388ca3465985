#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Unit tests for CLI commands

use super::commands::write_tree;
use crate::cli::{Cli, Commands};
use crate::generator::GeneratedFile;
use clap::Parser;

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "canvasgen",
        "lint",
        "blog",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    match cli.command {
        Commands::Lint {
            project,
            fail_on_error,
            errors_only,
            json,
        } => {
            assert_eq!(project, "blog");
            assert!(fail_on_error);
            assert!(errors_only);
            assert!(!json);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "canvasgen",
        "generate",
        "blog",
        "--store",
        "projects",
        "--config",
        "gen.toml",
        "-vv",
    ])
    .unwrap();
    assert_eq!(cli.store.to_string_lossy(), "projects");
    assert_eq!(cli.config.unwrap().to_string_lossy(), "gen.toml");
    assert_eq!(cli.verbose, 2);
    assert!(matches!(cli.command, Commands::Generate { project } if project == "blog"));
}

#[test]
fn test_download_requires_output() {
    assert!(Cli::try_parse_from(["canvasgen", "download", "blog"]).is_err());
    let cli = Cli::try_parse_from(["canvasgen", "download", "blog", "-o", "blog.zip"]).unwrap();
    match cli.command {
        Commands::Download { output, .. } => assert_eq!(output.to_string_lossy(), "blog.zip"),
        _ => panic!("Expected Download command"),
    }
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["canvasgen", "list"],
        vec!["canvasgen", "generate", "p1"],
        vec!["canvasgen", "preview", "p1"],
        vec!["canvasgen", "preview", "p1", "--path", "src/index.ts"],
        vec!["canvasgen", "download", "p1", "--output", "p1.zip"],
        vec!["canvasgen", "write", "p1", "--output", "out", "--force", "--dry-run"],
        vec!["canvasgen", "lint", "p1", "--json"],
        vec!["canvasgen", "locked-tests", "p1"],
        vec!["canvasgen", "locked-tests", "p1", "--component", "c1"],
    ];

    for args in commands {
        let result = Cli::try_parse_from(&args);
        assert!(result.is_ok(), "Failed to parse: {args:?}");
    }
}

#[test]
fn test_write_tree_respects_force_and_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        GeneratedFile::new("package.json", "{}\n"),
        GeneratedFile::new("src/index.ts", "new\n"),
    ];

    write_tree(&files, dir.path(), false, true).unwrap();
    assert!(!dir.path().join("package.json").exists());

    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/index.ts"), "mine\n").unwrap();
    write_tree(&files, dir.path(), false, false).unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("package.json")).unwrap(),
        "{}\n"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("src/index.ts")).unwrap(),
        "mine\n"
    );

    write_tree(&files, dir.path(), true, false).unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("src/index.ts")).unwrap(),
        "new\n"
    );
}
