#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::StatusCode;
use tempfile::TempDir;

use yoga_catalogue::remote::{ApiError, ApiRequest, ApiResponse, Transport};

/// Helper struct to run yoga commands against an isolated data root
pub struct YogaTest {
    pub temp_dir: TempDir,
}

impl YogaTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        YogaTest { temp_dir }
    }

    pub fn data_root(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    /// Run the binary in offline mode so no test ever reaches the network.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_yoga"))
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("YOGA_CATALOGUE_ROOT", self.data_root())
            .env("YOGA_OFFLINE", "1")
            .env_remove("YOGA_API_URL")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute yoga command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Command {args:?} did not print JSON ({e}): {stdout}"))
    }
}

/// Transport that replays canned responses and records every request.
///
/// Clones share the same script, so a test can keep a handle after moving
/// one into a client.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<ApiResponse, ApiError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn reply(self, status: u16, body: &str) -> Self {
        self.responses.lock().push_back(Ok(ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }));
        self
    }

    pub fn reply_times(mut self, times: usize, status: u16, body: &str) -> Self {
        for _ in 0..times {
            self = self.reply(status, body);
        }
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .push_back(Err(ApiError::network(message)));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::network("script exhausted")))
    }
}

pub const TEST_FAULT: &str = r#"{"error": "simulated outage", "is_test_error": true}"#;

/// A page body in the API's response shape.
pub fn page_body(ids: &[u64], page: u32, limit: u32, total: u64) -> String {
    let items: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Remote Pose {id}"),
                "category": "Standing",
                "image_url": format!("https://img.example/{id}.png"),
                "difficulty": "Beginner",
                "tags": "strength, focus",
            })
        })
        .collect();
    serde_json::json!({
        "items": items,
        "pagination": {"page": page, "limit": limit, "total": total},
    })
    .to_string()
}
