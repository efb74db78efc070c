// src/core/database.rs

//! The local signature database.
//!
//! The gate only cares about three questions (are files missing, is the data
//! stale, when was it last refreshed) and one action (refresh it). The file
//! contents are opaque here; JSON files are only checked to be well-formed
//! before they replace a local copy.

use crate::core::errors::GateError;
use crate::core::models::DatabaseStatus;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Files a complete database directory must contain.
pub const DATA_FILES: &[&str] = &[
    "metadata.json",
    "wp_fingerprints.json",
    "timthumbs-v3.txt",
    "config_backups.txt",
    "db_exports.txt",
    "dynamic_finders.yml",
    "LICENSE",
    "sponsor.txt",
];

const LAST_UPDATE_FILE: &str = ".last_update";

/// Data older than this is considered outdated.
pub const FRESHNESS_DAYS: i64 = 5;

// `Url::join` replaces the last segment unless the base ends with `/`.
fn as_directory(mut source: Url) -> Url {
    if !source.path().ends_with('/') {
        let path = format!("{}/", source.path());
        source.set_path(&path);
    }
    source
}

#[async_trait]
pub trait LocalDatabase: Send + Sync {
    fn missing_files(&self) -> bool;

    fn outdated(&self) -> bool;

    fn last_update(&self) -> Option<DateTime<Utc>>;

    /// Refreshes the local files and returns the names of those that changed.
    async fn update(&self) -> Result<Vec<String>, GateError>;

    fn status(&self) -> DatabaseStatus {
        DatabaseStatus {
            missing_files: self.missing_files(),
            outdated: self.outdated(),
            last_update: self.last_update(),
        }
    }
}

/// A [`LocalDatabase`] stored in a directory and refreshed over HTTP.
#[derive(Debug, Clone)]
pub struct SignatureDatabase {
    dir: PathBuf,
    source: Url,
    files: Vec<String>,
    client: reqwest::Client,
}

impl SignatureDatabase {
    pub fn new(
        dir: impl Into<PathBuf>,
        source: Url,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(user_agent).timeout(timeout).build()?;
        Ok(Self {
            dir: dir.into(),
            source: as_directory(source),
            files: DATA_FILES.iter().map(|f| f.to_string()).collect(),
            client,
        })
    }

    /// Replaces the list of files the database is made of.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn last_update_path(&self) -> PathBuf {
        self.dir.join(LAST_UPDATE_FILE)
    }

    fn remote_url(&self, file: &str) -> Result<Url, GateError> {
        self.source.join(file).map_err(|e| GateError::DatabaseUpdate {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }

    async fn download(&self, file: &str) -> Result<Vec<u8>, GateError> {
        let url = self.remote_url(file)?;
        let fail = |reason: String| GateError::DatabaseUpdate { file: file.to_string(), reason };

        debug!(%url, "Downloading database file.");
        let response = self.client.get(url.clone()).send().await.map_err(|e| fail(e.to_string()))?;
        if !response.status().is_success() {
            return Err(fail(format!("{} returned {}", url, response.status())));
        }
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;

        if file.ends_with(".json") {
            serde_json::from_slice::<serde_json::Value>(&bytes)
                .map_err(|e| fail(format!("invalid JSON: {}", e)))?;
        }
        Ok(bytes.to_vec())
    }

    // Writes through a temporary file so a failed write never leaves a
    // truncated data file behind.
    async fn replace(&self, file: &str, contents: &[u8]) -> Result<(), GateError> {
        let target = self.dir.join(file);
        let staging = self.dir.join(format!("{}.tmp", file));
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &target).await?;
        Ok(())
    }
}

#[async_trait]
impl LocalDatabase for SignatureDatabase {
    fn missing_files(&self) -> bool {
        self.files.iter().any(|f| !self.dir.join(f).is_file())
    }

    fn outdated(&self) -> bool {
        match self.last_update() {
            Some(date) => date < Utc::now() - TimeDelta::days(FRESHNESS_DAYS),
            None => true,
        }
    }

    fn last_update(&self) -> Option<DateTime<Utc>> {
        let raw = std::fs::read_to_string(self.last_update_path()).ok()?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(date) => Some(date.with_timezone(&Utc)),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable last update timestamp.");
                None
            }
        }
    }

    async fn update(&self) -> Result<Vec<String>, GateError> {
        info!(dir = %self.dir.display(), source = %self.source, "Updating signature database.");
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut updated = Vec::new();
        for file in &self.files {
            let remote = self.download(file).await?;
            let local = tokio::fs::read(self.dir.join(file)).await.ok();
            if local.as_deref() == Some(remote.as_slice()) {
                debug!(file = %file, "Database file already up to date.");
                continue;
            }
            self.replace(file, &remote).await?;
            updated.push(file.clone());
        }

        tokio::fs::write(self.last_update_path(), Utc::now().to_rfc3339()).await?;
        info!(updated = updated.len(), "Signature database updated.");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn database(dir: &Path, source: &str) -> SignatureDatabase {
        SignatureDatabase::new(dir, Url::parse(source).unwrap(), Duration::from_secs(5), "test")
            .unwrap()
            .with_files(["metadata.json", "LICENSE"])
    }

    fn write_last_update(dir: &Path, date: DateTime<Utc>) {
        std::fs::write(dir.join(LAST_UPDATE_FILE), date.to_rfc3339()).unwrap();
    }

    #[test]
    fn empty_dir_is_missing_and_outdated() {
        let tmp = TempDir::new().unwrap();
        let db = database(tmp.path(), "http://127.0.0.1/");
        assert!(db.missing_files());
        assert!(db.outdated());
        assert_eq!(db.last_update(), None);
    }

    #[test]
    fn freshness_window() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("metadata.json"), "{}").unwrap();
        std::fs::write(tmp.path().join("LICENSE"), "x").unwrap();
        let db = database(tmp.path(), "http://127.0.0.1/");
        assert!(!db.missing_files());

        write_last_update(tmp.path(), Utc::now() - TimeDelta::days(1));
        assert!(!db.outdated());

        write_last_update(tmp.path(), Utc::now() - TimeDelta::days(6));
        assert!(db.outdated());
        assert!(db.status().outdated);
    }

    #[test]
    fn garbage_timestamp_counts_as_never_updated() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(LAST_UPDATE_FILE), "yesterday-ish").unwrap();
        let db = database(tmp.path(), "http://127.0.0.1/");
        assert_eq!(db.last_update(), None);
        assert!(db.outdated());
    }

    #[tokio::test]
    async fn update_downloads_changed_files_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/metadata.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"plugins":{}}"#))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/LICENSE"))
            .respond_with(ResponseTemplate::new(200).set_body_string("license"))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("LICENSE"), "license").unwrap();
        let db = database(tmp.path(), &format!("{}/data/", server.uri()));

        let updated = db.update().await.unwrap();
        assert_eq!(updated, vec!["metadata.json".to_string()]);
        assert!(!db.missing_files());
        assert!(!db.outdated());
        assert!(db.last_update().is_some());
    }

    #[tokio::test]
    async fn source_without_trailing_slash_keeps_its_last_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mirror/wpscan/metadata.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/mirror/wpscan/LICENSE"))
            .respond_with(ResponseTemplate::new(200).set_body_string("license"))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let db = database(tmp.path(), &format!("{}/mirror/wpscan", server.uri()));

        let updated = db.update().await.unwrap();
        assert_eq!(updated, vec!["metadata.json".to_string(), "LICENSE".to_string()]);
        assert!(!db.missing_files());
    }

    #[test]
    fn directory_source_is_left_alone() {
        let source = Url::parse("http://mirror.local/wpscan/").unwrap();
        assert_eq!(as_directory(source.clone()), source);
        assert_eq!(
            as_directory(Url::parse("http://mirror.local/wpscan").unwrap()).as_str(),
            "http://mirror.local/wpscan/"
        );
    }

    #[tokio::test]
    async fn update_rejects_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metadata.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let db = database(tmp.path(), &format!("{}/", server.uri()));

        let err = db.update().await.unwrap_err();
        assert!(matches!(err, GateError::DatabaseUpdate { ref file, .. } if file == "metadata.json"));
        assert!(!tmp.path().join("metadata.json").exists());
        assert_eq!(db.last_update(), None);
    }

    #[tokio::test]
    async fn update_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let db = database(tmp.path(), &format!("{}/", server.uri()));
        assert!(matches!(db.update().await, Err(GateError::DatabaseUpdate { .. })));
    }
}
