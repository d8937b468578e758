//! Integration tests for the `pythiad` binary entry point.
//!
//! Each test redirects the cache root into a temporary directory so daemon
//! runs cannot disturb the invoking user's real cache, and clears `RUST_LOG`
//! so the default filter applies.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

fn daemon_command(cache_root: &TempDir) -> assert_cmd::Command {
    let mut command = cargo_bin_cmd!("pythiad");
    command.env("XDG_CACHE_HOME", cache_root.path());
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn exhausted_input_exits_successfully_without_output() {
    let cache_root = TempDir::new().expect("temporary cache root");

    daemon_command(&cache_root)
        .write_stdin("")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn failed_requests_produce_no_responses() {
    let cache_root = TempDir::new().expect("temporary cache root");
    let input = concat!(
        "not json\n",
        r#"{"uuid":"1","source":"x","line":1,"offset":0}"#,
        "\n",
        r#"{"type":"rename","uuid":"2","source":"x","line":1,"offset":0}"#,
        "\n",
    );

    daemon_command(&cache_root)
        .write_stdin(input)
        .assert()
        .success()
        .stdout("");
}

#[test]
fn disabled_parameter_completion_answers_without_an_interpreter() {
    let cache_root = TempDir::new().expect("temporary cache root");
    let input = concat!(
        r#"{"type":"funcargs","uuid":"9","source":"join(","line":1,"offset":5}"#,
        "\n",
    );

    daemon_command(&cache_root)
        .args(["-f", ""])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("{\"uuid\":\"9\",\"type\":\"funcargs\",\"funcargs\":\"\"}\n");
}

#[test]
fn unsupported_parameter_modes_are_rejected_at_startup() {
    let cache_root = TempDir::new().expect("temporary cache root");

    daemon_command(&cache_root)
        .args(["-f", "junk"])
        .assert()
        .failure()
        .stderr(contains("unsupported parameter completion mode: junk"));
}

#[test]
fn help_lists_the_legacy_flag_spellings() {
    let cache_root = TempDir::new().expect("temporary cache root");

    daemon_command(&cache_root)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--extra_folder"))
        .stdout(contains("--complete_function_params"));
}

#[test]
fn daemon_runs_log_under_the_project_cache_directory() {
    let cache_root = TempDir::new().expect("temporary cache root");

    daemon_command(&cache_root)
        .args(["-p", "sample"])
        .write_stdin("")
        .assert()
        .success();

    let log_directory = cache_root.path().join("pythia").join("sample");
    let log_files: Vec<_> = std::fs::read_dir(&log_directory)
        .expect("cache directory should exist")
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("daemon.log")
        })
        .collect();
    assert!(
        !log_files.is_empty(),
        "expected a daemon.log file under {}",
        log_directory.display()
    );
}
