use assert_cmd::cargo::CommandCargoExt as _;
use std::fs;
use std::io::{Read as _, Write as _};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const ISOLATED_VARS: &[&str] = &["GEMINI_API_KEY", "PORT", "RUST_LOG"];

/// A test context that provides an isolated temporary directory.
/// The binary sees the temp dir as its working directory and home, so no
/// user config or `.env` leaks into a test.
pub struct TestContext {
    pub temp_dir: TempDir,
    envs: Vec<(String, String)>,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            temp_dir,
            envs: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn binary() -> std::process::Command {
        std::process::Command::cargo_bin("codereview").expect("Failed to find codereview binary")
    }

    fn configure(&self, cmd: &mut std::process::Command) {
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"));

        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }

        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
    }

    /// Run codereview in this temp directory
    pub fn run_codereview(&self, args: &[&str]) -> CommandResult {
        let mut cmd = Self::binary();
        cmd.args(args);
        self.configure(&mut cmd);

        let output = cmd.output().expect("Failed to execute codereview command");

        CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }

    /// Start `codereview serve` in the background on the given port
    pub fn spawn_server(&self, port: u16) -> ServerProcess {
        let mut cmd = Self::binary();
        cmd.args(["serve", "--host", "127.0.0.1", "--port", &port.to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        self.configure(&mut cmd);

        let child = cmd.spawn().expect("Failed to spawn codereview serve");
        ServerProcess { child, port }
    }

    pub fn file_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path().join(path)
    }

    /// Write file to temp directory (creates parent directories)
    pub fn write_file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.file_path(&path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|_| panic!("Failed to create directory: {}", parent.display()));
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|_| panic!("Failed to write file: {}", full_path.display()));
    }
}

pub struct ServerProcess {
    child: Child,
    pub port: u16,
}

impl ServerProcess {
    /// Sends a raw HTTP/1.1 request and returns the full response text
    pub fn request(&self, method: &str, path: &str, body: Option<&str>) -> String {
        let mut stream =
            TcpStream::connect(("127.0.0.1", self.port)).expect("Failed to connect to server");
        stream
            .set_read_timeout(Some(Duration::from_secs(10)))
            .expect("Failed to set read timeout");

        let body = body.unwrap_or("");
        let request = format!(
            "{method} {path} HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(request.as_bytes())
            .expect("Failed to send request");

        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .expect("Failed to read response");
        response
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

pub fn assert_success(result: &CommandResult) {
    assert!(
        result.success(),
        "Expected command to succeed but it failed.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        result.stdout,
        result.stderr
    );
}

pub fn assert_failure_mentions(result: &CommandResult, pattern: &str) {
    assert!(
        !result.success(),
        "Expected command to fail but it succeeded.\n\nSTDOUT:\n{}",
        result.stdout
    );
    assert!(
        result.stderr.contains(pattern),
        "Expected stderr to contain '{}', but it didn't.\n\nSTDERR:\n{}",
        pattern,
        result.stderr
    );
}

pub fn assert_output_contains(result: &CommandResult, pattern: &str) {
    assert!(
        result.stdout.contains(pattern),
        "Expected stdout to contain '{}', but it didn't.\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
        pattern,
        result.stdout,
        result.stderr
    );
}

/// Asks the OS for a port that is free right now
pub fn free_port() -> u16 {
    TcpListener::bind(("127.0.0.1", 0))
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .expect("Failed to find a free port")
}

/// Wait for a port to be open with timeout
pub fn wait_for_port(port: u16, timeout_secs: u64) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_secs(timeout_secs);

    while start.elapsed() < timeout {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    false
}

pub mod edge_cases;
pub mod happy_path;
pub mod smoke;
