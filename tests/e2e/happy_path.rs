use super::*;

#[test]
fn config_masks_key_from_dotenv() {
    let ctx = TestContext::new();
    ctx.write_file(".env", "GEMINI_API_KEY=AIzaSyExample1234\n");

    let result = ctx.run_codereview(&["config"]);

    assert_success(&result);
    assert_output_contains(&result, "# GEMINI_API_KEY: AIza...1234");
    assert!(!result.stdout.contains("AIzaSyExample1234"));
}

#[test]
fn process_env_wins_over_dotenv() {
    let ctx = TestContext::new().with_env("GEMINI_API_KEY", "FROMprocessENV9999");
    ctx.write_file(".env", "GEMINI_API_KEY=AIzaSyExample1234\n");

    let result = ctx.run_codereview(&["config"]);

    assert_success(&result);
    assert_output_contains(&result, "# GEMINI_API_KEY: FROM...9999");
}

#[test]
fn port_variable_overrides_config() {
    let ctx = TestContext::new().with_env("PORT", "9191");

    let result = ctx.run_codereview(&["config"]);

    assert_success(&result);
    assert_output_contains(&result, "port = 9191");
}

#[test]
fn local_config_file_is_used() {
    let ctx = TestContext::new();
    ctx.write_file(
        "codereview.toml",
        "[gemini]\nmodel = \"gemini-2.5-pro\"\n\n[review]\ncache_enabled = false\n",
    );

    let result = ctx.run_codereview(&["config"]);

    assert_success(&result);
    assert_output_contains(&result, "codereview.toml");
    assert_output_contains(&result, "model = \"gemini-2.5-pro\"");
    assert_output_contains(&result, "cache_enabled = false");
}

#[test]
#[cfg(target_os = "linux")]
fn user_config_dir_is_used_as_fallback() {
    let ctx = TestContext::new();
    ctx.write_file(
        ".config/codereview/config.toml",
        "[server]\nhost = \"127.0.0.1\"\n",
    );

    let result = ctx.run_codereview(&["config"]);

    assert_success(&result);
    assert_output_contains(&result, "host = \"127.0.0.1\"");
}

#[test]
fn server_answers_without_contacting_the_model() {
    let ctx = TestContext::new().with_env("GEMINI_API_KEY", "test-key-0123456789");
    let port = free_port();
    let server = ctx.spawn_server(port);

    assert!(wait_for_port(port, 30), "server did not start on {}", port);

    let health = server.request("GET", "/", None);
    assert!(health.starts_with("HTTP/1.1 200"), "{}", health);
    assert!(health.contains("\"status\":\"running\""), "{}", health);
    assert!(health.contains("\"gemini_model\":\"gemini-3-flash-preview\""), "{}", health);

    let empty = server.request(
        "POST",
        "/api/analyze",
        Some(r#"{"files":[],"language":"python"}"#),
    );
    assert!(empty.starts_with("HTTP/1.1 400"), "{}", empty);
    assert!(empty.contains("No files provided"), "{}", empty);

    let cleared = server.request("DELETE", "/api/cache", None);
    assert!(cleared.starts_with("HTTP/1.1 200"), "{}", cleared);
    assert!(cleared.contains("Cache cleared"), "{}", cleared);
}
