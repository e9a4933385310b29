use super::*;

#[test]
fn analyze_requires_api_key() {
    let ctx = TestContext::new();
    ctx.write_file("app.py", "print('hi')\n");

    let result = ctx.run_codereview(&["analyze", "app.py", "--language", "python"]);

    assert_failure_mentions(&result, "GEMINI_API_KEY");
}

#[test]
fn analyze_reports_missing_source_file() {
    let ctx = TestContext::new().with_env("GEMINI_API_KEY", "test-key-0123456789");

    let result = ctx.run_codereview(&["analyze", "nope.py", "--language", "python"]);

    assert_failure_mentions(&result, "Failed to read");
}

#[test]
fn serve_requires_api_key() {
    let ctx = TestContext::new();

    let result = ctx.run_codereview(&["serve", "--port", "0"]);

    assert_failure_mentions(&result, "GEMINI_API_KEY");
}

#[test]
fn invalid_port_variable_is_rejected() {
    let ctx = TestContext::new().with_env("PORT", "eighty");

    let result = ctx.run_codereview(&["config"]);

    assert_failure_mentions(&result, "Invalid PORT value");
}

#[test]
fn explicit_config_must_exist() {
    let ctx = TestContext::new();

    let result = ctx.run_codereview(&["--config", "missing.toml", "config"]);

    assert_failure_mentions(&result, "Config file not found");
}

#[test]
fn malformed_config_is_reported() {
    let ctx = TestContext::new();
    ctx.write_file("codereview.toml", "[server\nport = 1\n");

    let result = ctx.run_codereview(&["config"]);

    assert_failure_mentions(&result, "Invalid config file");
}
