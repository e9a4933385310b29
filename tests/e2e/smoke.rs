use super::*;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("codereview")
        .expect("Failed to find codereview binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("serve")
                .and(predicate::str::contains("analyze"))
                .and(predicate::str::contains("models")),
        );
}

#[test]
fn version_is_reported() {
    Command::cargo_bin("codereview")
        .expect("Failed to find codereview binary")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("codereview "));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("codereview")
        .expect("Failed to find codereview binary")
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn analyze_help_describes_flags() {
    let ctx = TestContext::new();
    let result = ctx.run_codereview(&["analyze", "--help"]);

    assert_success(&result);
    assert_output_contains(&result, "--language");
    assert_output_contains(&result, "--focus");
}

#[test]
fn config_runs_without_any_files() {
    let ctx = TestContext::new();
    let result = ctx.run_codereview(&["config"]);

    assert_success(&result);
    assert_output_contains(&result, "# source: built-in defaults");
    assert_output_contains(&result, "# GEMINI_API_KEY: not set");
}
