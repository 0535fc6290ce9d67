// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by every spec: an isolated state directory, a fluent
//! command runner, and a stand-in for the mailbox API.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// Isolated state directory for one spec.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn state_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Where a key lands under the default output directory.
    pub fn export_path(&self, key: &str) -> PathBuf {
        self.dir.path().join("exports").join(key)
    }

    pub fn write(&self, key: &str, contents: &str) {
        let path = self.export_path(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub fn read_json(&self, key: &str) -> serde_json::Value {
        serde_json::from_slice(&std::fs::read(self.export_path(key)).unwrap()).unwrap()
    }

    pub fn mx(&self) -> CliBuilder {
        cli().env("MX_STATE_DIR", self.state_dir().to_str().unwrap())
    }
}

pub fn cli() -> CliBuilder {
    CliBuilder { args: Vec::new(), envs: Vec::new() }
}

pub struct CliBuilder {
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

const SCRUBBED_ENV: &[&str] = &[
    "MX_STATE_DIR",
    "MX_OUTPUT_DIR",
    "MX_PREFIX",
    "MX_TOKEN_FILE",
    "MX_ACCESS_TOKEN",
    "MX_GMAIL_BASE_URL",
    "MX_LOG_FILE",
    "HTTP_PROXY",
    "HTTPS_PROXY",
    "ALL_PROXY",
    "http_proxy",
    "https_proxy",
    "all_proxy",
];

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn output(self) -> Output {
        let mut cmd = assert_cmd::Command::cargo_bin("mx").unwrap();
        for key in SCRUBBED_ENV {
            cmd.env_remove(key);
        }
        cmd.env("MX_LOG", "warn").env("MX_RETRY_BASE_MS", "0");
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.args(&self.args).output().unwrap()
    }

    /// Run and expect exit code 0.
    pub fn passes(self) -> RunAssert {
        let run = RunAssert { output: self.output() };
        assert!(run.output.status.success(), "expected success\n{}", run.describe());
        run
    }

    /// Run and expect a non-zero exit code.
    pub fn fails(self) -> RunAssert {
        let run = RunAssert { output: self.output() };
        assert!(!run.output.status.success(), "expected failure\n{}", run.describe());
        run
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout missing {needle:?}\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr missing {needle:?}\n{}", self.describe());
        self
    }

    pub fn code(self, expected: i32) -> Self {
        assert_eq!(self.output.status.code(), Some(expected), "{}", self.describe());
        self
    }

    pub fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }

    fn describe(&self) -> String {
        format!(
            "status: {:?}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            self.output.status.code(),
            self.stdout(),
            self.stderr()
        )
    }
}

/// Minimal stand-in for the mailbox REST API on a loopback port.
///
/// `GET /messages` lists every ID in one page; `GET /messages/{id}` returns
/// `{"id": id}`. Requests without the expected bearer token get a 401.
pub struct StubMailbox {
    url: String,
}

impl StubMailbox {
    pub fn start(ids: &[&str], token: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        let auth = format!("authorization: bearer {}", token.to_lowercase());

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut head = Vec::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                        break;
                    }
                    head.push(line.trim_end().to_lowercase());
                }
                let path = head.first().and_then(|l| l.split(' ').nth(1)).unwrap_or("/").to_string();
                let (status, body) = if !head.iter().any(|h| *h == auth) {
                    (401, r#"{"error":{"code":401,"message":"Invalid Credentials"}}"#.to_string())
                } else if path.starts_with("/messages?") {
                    let messages: Vec<_> = ids.iter().map(|id| serde_json::json!({ "id": id })).collect();
                    (200, serde_json::json!({ "messages": messages }).to_string())
                } else if let Some(rest) = path.strip_prefix("/messages/") {
                    let id = rest.split('?').next().unwrap_or_default();
                    (200, serde_json::json!({ "id": id }).to_string())
                } else {
                    (404, "{}".to_string())
                };
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        Self { url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
