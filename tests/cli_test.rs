mod common;

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use bstv::cli::args::{Cli, Commands, Format, HistoryCommands, RemoteCommands};
use bstv::cli::commands::run_command;
use bstv::cli::CliError;
use bstv::exitcode;
use bstv::util::testing;
use common::{container_in, tree_response_body, MockHttpClient, Recorded};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments parse")
}

fn parse(args: &[&str]) -> Commands {
    cli(args).command.expect("subcommand present")
}

#[test]
fn given_build_args_when_parsing_then_collects_numbers_and_flags() {
    let cmd = parse(&["bstv", "build", "8,3", "10", "--balanced", "-f", "tree"]);
    match cmd {
        Commands::Build {
            numbers,
            balanced,
            no_save,
            format,
        } => {
            assert_eq!(numbers, ["8,3", "10"]);
            assert!(balanced);
            assert!(!no_save);
            assert_eq!(format, Format::Tree);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn given_verbosity_flags_when_parsing_then_counts() {
    let cli = Cli::try_parse_from(["bstv", "-vv", "history", "list"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert!(matches!(
        cli.command,
        Some(Commands::History {
            command: HistoryCommands::List
        })
    ));
}

#[rstest]
#[case(&["bstv", "build", "--format", "xml"])]
#[case(&["bstv", "history", "show"])]
#[case(&["bstv", "remote", "delete"])]
fn given_bad_args_when_parsing_then_rejects(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn given_remote_create_when_parsing_then_balanced_defaults_off() {
    let cmd = parse(&["bstv", "remote", "create", "1", "2"]);
    assert!(matches!(
        cmd,
        Commands::Remote {
            command: RemoteCommands::Create { balanced: false, .. }
        }
    ));
}

#[test]
fn given_build_command_when_running_then_saves_to_history() {
    let dir = TempDir::new().unwrap();
    let container = container_in(&dir, MockHttpClient::new());

    run_command(&cli(&["bstv", "build", "8,3,10"]), &container).unwrap();
    run_command(&cli(&["bstv", "build", "1", "--no-save"]), &container).unwrap();

    let records = container.history().load().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].numbers.len(), 3);
}

#[test]
fn given_empty_build_when_running_then_data_error_exit_code() {
    let dir = TempDir::new().unwrap();
    let container = container_in(&dir, MockHttpClient::new());

    let err = run_command(&cli(&["bstv", "build", "abc"]), &container).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_saved_record_when_deleting_then_gone_and_second_delete_fails() {
    let dir = TempDir::new().unwrap();
    let container = container_in(&dir, MockHttpClient::new());
    let record = container
        .submission()
        .submit("4 2 6", false, true)
        .unwrap()
        .record;

    run_command(&cli(&["bstv", "history", "show", record.id.as_str()]), &container).unwrap();
    run_command(&cli(&["bstv", "history", "delete", record.id.as_str()]), &container).unwrap();

    let err = run_command(&cli(&["bstv", "history", "delete", record.id.as_str()]), &container)
        .unwrap_err();
    assert_eq!(err.exit_code(), exitcode::NOINPUT);
    assert!(container.history().load().unwrap().is_empty());
}

#[test]
fn given_records_when_clearing_with_yes_then_history_empty() {
    let dir = TempDir::new().unwrap();
    let container = container_in(&dir, MockHttpClient::new());
    container.submission().submit("1", false, true).unwrap();

    run_command(&cli(&["bstv", "history", "clear", "--yes"]), &container).unwrap();

    assert!(container.history().load().unwrap().is_empty());
}

#[test]
fn given_saved_record_when_rerunning_then_posts_its_numbers() {
    let dir = TempDir::new().unwrap();
    let http = MockHttpClient::new();
    http.respond(200, &tree_response_body("srv-9"));
    let container = container_in(&dir, http.clone());
    let record = container
        .submission()
        .submit("8 3 10", true, true)
        .unwrap()
        .record;

    run_command(&cli(&["bstv", "history", "rerun", record.id.as_str()]), &container).unwrap();

    assert_eq!(
        http.requests(),
        vec![Recorded::Post {
            url: "http://localhost:9999/api/trees".to_string(),
            body: serde_json::json!({"numbers": [8, 3, 10], "balanced": true}),
        }]
    );
}

#[test]
fn given_unreachable_server_when_listing_then_unavailable_exit_code() {
    let dir = TempDir::new().unwrap();
    let http = MockHttpClient::new();
    http.fail("connection refused");
    let container = container_in(&dir, http);

    let err = run_command(&cli(&["bstv", "remote", "list"]), &container).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
}

#[test]
fn given_config_file_flag_when_running_config_init_then_writes_there() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let container = container_in(&dir, MockHttpClient::new());
    let target = dir.path().join("conf").join("bstv.toml");
    let target_arg = target.to_str().unwrap();

    // Act
    run_command(&cli(&["bstv", "-C", target_arg, "config", "init"]), &container).unwrap();
    let again = run_command(&cli(&["bstv", "-C", target_arg, "config", "init"]), &container);

    // Assert
    let content = std::fs::read_to_string(&target).unwrap();
    assert!(content.contains("history_limit"));
    assert_eq!(again.unwrap_err().exit_code(), exitcode::USAGE);
    run_command(
        &cli(&["bstv", "-C", target_arg, "config", "init", "--force"]),
        &container,
    )
    .unwrap();
}

#[test]
fn given_no_subcommand_when_running_then_usage_error() {
    let dir = TempDir::new().unwrap();
    let container = container_in(&dir, MockHttpClient::new());

    let err = run_command(&cli(&["bstv"]), &container).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_compact_format_when_parsing_history_show_then_selected() {
    let cmd = parse(&["bstv", "history", "show", "abc", "--format", "compact"]);
    assert!(matches!(
        cmd,
        Commands::History {
            command: HistoryCommands::Show {
                format: Format::Compact,
                ..
            }
        }
    ));
}

#[test]
fn given_usage_error_when_mapping_then_usage_exit_code() {
    let err = CliError::Usage("no command".to_string());
    assert_eq!(err.exit_code(), exitcode::USAGE);
}
