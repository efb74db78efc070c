// src/core/gate/testing.rs

// In-memory stand-ins for the gate's collaborators.

use crate::core::database::LocalDatabase;
use crate::core::errors::GateError;
use crate::core::models::ServerKind;
use crate::core::server::ServerCapability;
use crate::core::target::Target;
use crate::ui::{Console, Prompt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub events: Vec<String>,
}

impl Console for RecordingConsole {
    fn banner(&mut self) {
        self.events.push("banner".into());
    }

    fn notice(&mut self, message: &str) {
        self.events.push(format!("notice: {}", message));
    }

    fn update_started(&mut self) {
        self.events.push("update_started".into());
    }

    fn update_finished(&mut self, updated: &[String], _verbose: bool) {
        self.events.push(format!("update_finished: {}", updated.join(",")));
    }

    fn not_fully_configured(&mut self, url: &str) {
        self.events.push(format!("not_fully_configured: {}", url));
    }

    fn ready(&mut self, summary: &str) {
        self.events.push(format!("ready: {}", summary));
    }

    fn aborted(&mut self, message: &str) {
        self.events.push(format!("aborted: {}", message));
    }
}

#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answer: Option<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn answering(answer: &str) -> Self {
        Self { answer: Some(answer.to_string()), questions: Vec::new() }
    }

    pub fn failing() -> Self {
        Self::default()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.questions.push(question.to_string());
        self.answer
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
    }
}

#[derive(Debug)]
pub struct FakeTarget {
    pub url: Url,
    pub expected_cms: bool,
    pub hosted_elsewhere: bool,
    pub homepage: String,
    pub server: Option<ServerKind>,
    pub down: bool,
    pub availability_checks: usize,
    pub bound: Option<Arc<dyn ServerCapability>>,
    pub bind_calls: usize,
}

impl FakeTarget {
    pub fn wordpress() -> Self {
        Self {
            url: Url::parse("http://example.com/").unwrap(),
            expected_cms: true,
            hosted_elsewhere: false,
            homepage: "http://example.com/".into(),
            server: Some(ServerKind::Apache),
            down: false,
            availability_checks: 0,
            bound: None,
            bind_calls: 0,
        }
    }
}

#[async_trait]
impl Target for FakeTarget {
    fn url(&self) -> &Url {
        &self.url
    }

    fn is_expected_cms(&self) -> bool {
        self.expected_cms
    }

    fn is_hosted_elsewhere(&self) -> bool {
        self.hosted_elsewhere
    }

    fn homepage_url(&self) -> String {
        self.homepage.clone()
    }

    fn detected_server(&self) -> Option<ServerKind> {
        self.server
    }

    async fn check_availability(&mut self) -> Result<(), GateError> {
        self.availability_checks += 1;
        if self.down {
            return Err(GateError::TargetDown { url: self.url.to_string(), reason: "refused".into() });
        }
        Ok(())
    }

    fn bind_server_module(&mut self, module: Arc<dyn ServerCapability>) {
        self.bind_calls += 1;
        self.bound = Some(module);
    }

    fn server_module(&self) -> Option<Arc<dyn ServerCapability>> {
        self.bound.clone()
    }
}

#[derive(Debug, Default)]
pub struct FakeDatabase {
    pub missing: bool,
    pub outdated: bool,
    pub last: Option<DateTime<Utc>>,
    pub updated_files: Vec<String>,
    pub fail_update: bool,
    pub updates: AtomicUsize,
}

impl FakeDatabase {
    pub fn update_calls(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalDatabase for FakeDatabase {
    fn missing_files(&self) -> bool {
        self.missing
    }

    fn outdated(&self) -> bool {
        self.outdated
    }

    fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last
    }

    async fn update(&self) -> Result<Vec<String>, GateError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_update {
            return Err(GateError::DatabaseUpdate { file: "metadata.json".into(), reason: "503".into() });
        }
        Ok(self.updated_files.clone())
    }
}
