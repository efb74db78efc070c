// src/core/target.rs

use crate::core::errors::GateError;
use crate::core::models::{ScanOptions, ServerKind, TargetStatus};
use crate::core::server::{ListingPage, ServerCapability};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// The website under assessment, as seen by the gate.
#[async_trait]
pub trait Target: Send + Sync {
    fn url(&self) -> &Url;

    /// Whether the site appears to run WordPress.
    fn is_expected_cms(&self) -> bool;

    /// Whether the site is hosted on WordPress.com.
    fn is_hosted_elsewhere(&self) -> bool;

    /// The URL the homepage ends up at once redirects are followed.
    fn homepage_url(&self) -> String;

    fn detected_server(&self) -> Option<ServerKind>;

    /// Makes sure the target answers and is in scope.
    async fn check_availability(&mut self) -> Result<(), GateError>;

    fn bind_server_module(&mut self, module: Arc<dyn ServerCapability>);

    fn server_module(&self) -> Option<Arc<dyn ServerCapability>>;

    fn status(&self) -> TargetStatus {
        TargetStatus {
            is_expected_cms: self.is_expected_cms(),
            is_hosted_elsewhere: self.is_hosted_elsewhere(),
            homepage_url: self.homepage_url(),
            detected_server: self.detected_server(),
        }
    }
}

// Body signatures of a WordPress install. The generator meta tag is handled
// separately since it goes through the parsed document.
static RE_WP_EMBED: Lazy<Regex> = Lazy::new(|| Regex::new(r"/wp-content/|/wp-includes/").unwrap());
static RE_WP_LOGIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"wp-login\.php").unwrap());
static RE_WP_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<link[^>]+rel=["']https://api\.w\.org/["']"#).unwrap());
static RE_WP_GENERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^WordPress").unwrap());

// Error-page signatures, used when the `Server` header is hidden.
static RE_NGINX_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"<hr><center>nginx</center>").unwrap());
static RE_APACHE_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"Apache Server at").unwrap());
static RE_IIS_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"Microsoft-IIS|Internet Information Services").unwrap());

const HOSTED_SUFFIX: &str = ".wordpress.com";

// What the homepage request returned.
#[derive(Debug, Clone)]
struct Homepage {
    url: Url,
    server_header: Option<String>,
    body: String,
}

/// A [`Target`] backed by real HTTP requests.
#[derive(Debug)]
pub struct HttpTarget {
    url: Url,
    client: reqwest::Client,
    ignore_main_redirect: bool,
    homepage: Option<Homepage>,
    server: Option<Arc<dyn ServerCapability>>,
}

impl HttpTarget {
    pub fn new(url: Url, options: &ScanOptions) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.request_timeout)
            .build()?;
        Ok(Self {
            url,
            client,
            ignore_main_redirect: options.ignore_main_redirect,
            homepage: None,
            server: None,
        })
    }

    // Same host, ignoring a leading `www.` on either side.
    fn in_scope(&self, other: &Url) -> bool {
        fn bare(host: Option<&str>) -> String {
            let host = host.unwrap_or_default().to_ascii_lowercase();
            host.strip_prefix("www.").map(String::from).unwrap_or(host)
        }
        bare(self.url.host_str()) == bare(other.host_str())
    }

    fn generator_says_wordpress(body: &str) -> bool {
        let document = Html::parse_document(body);
        let Ok(selector) = Selector::parse("meta[name='generator']") else {
            return false;
        };
        document
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            .any(|content| RE_WP_GENERATOR.is_match(content))
    }

    /// Fetches `path` relative to the target and reports the directory-listing
    /// entries found there, according to the bound server module.
    ///
    /// Returns an empty list when no module is bound yet.
    pub async fn directory_listing_entries(&self, path: &str) -> Result<Vec<String>, GateError> {
        let Some(server) = &self.server else {
            warn!("Directory listing requested before a server module was bound.");
            return Ok(Vec::new());
        };
        let url = self.url.join(path).map_err(|e| GateError::TargetDown {
            url: self.url.to_string(),
            reason: e.to_string(),
        })?;
        let down = |e: reqwest::Error| GateError::TargetDown { url: url.to_string(), reason: e.to_string() };

        let response = self.client.get(url.clone()).send().await.map_err(down)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(down)?;
        let page = ListingPage { status, host: url.host_str().unwrap_or_default(), body: &body };
        Ok(server.directory_listing_entries(&page))
    }
}

#[async_trait]
impl Target for HttpTarget {
    fn url(&self) -> &Url {
        &self.url
    }

    fn is_expected_cms(&self) -> bool {
        let Some(homepage) = &self.homepage else {
            return false;
        };
        RE_WP_EMBED.is_match(&homepage.body)
            || RE_WP_LOGIN.is_match(&homepage.body)
            || RE_WP_JSON.is_match(&homepage.body)
            || Self::generator_says_wordpress(&homepage.body)
    }

    fn is_hosted_elsewhere(&self) -> bool {
        let url = self.homepage.as_ref().map_or(&self.url, |h| &h.url);
        url.host_str()
            .is_some_and(|host| host.to_ascii_lowercase().ends_with(HOSTED_SUFFIX))
    }

    fn homepage_url(&self) -> String {
        self.homepage.as_ref().map_or(&self.url, |h| &h.url).to_string()
    }

    fn detected_server(&self) -> Option<ServerKind> {
        let homepage = self.homepage.as_ref()?;
        if let Some(kind) = homepage.server_header.as_deref().and_then(ServerKind::from_server_header) {
            return Some(kind);
        }
        if RE_APACHE_ERROR.is_match(&homepage.body) {
            Some(ServerKind::Apache)
        } else if RE_NGINX_ERROR.is_match(&homepage.body) {
            Some(ServerKind::Nginx)
        } else if RE_IIS_ERROR.is_match(&homepage.body) {
            Some(ServerKind::Iis)
        } else {
            None
        }
    }

    async fn check_availability(&mut self) -> Result<(), GateError> {
        info!(url = %self.url, "Checking target availability.");
        let response = self.client.get(self.url.clone()).send().await.map_err(|e| GateError::TargetDown {
            url: self.url.to_string(),
            reason: e.to_string(),
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(GateError::HttpAuthRequired { url: self.url.to_string() }),
            StatusCode::PROXY_AUTHENTICATION_REQUIRED => return Err(GateError::ProxyAuthRequired),
            status => debug!(%status, "Homepage answered."),
        }

        let effective = response.url().clone();
        let server_header = response
            .headers()
            .get("server")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await.map_err(|e| GateError::TargetDown {
            url: self.url.to_string(),
            reason: e.to_string(),
        })?;

        if !self.in_scope(&effective) {
            if !self.ignore_main_redirect {
                return Err(GateError::Redirected { url: effective.to_string() });
            }
            info!(from = %self.url, to = %effective, "Following main redirect to another host.");
            self.url = effective.clone();
        }

        debug!(homepage = %effective, server = ?server_header, bytes = body.len(), "Homepage fetched.");
        self.homepage = Some(Homepage { url: effective, server_header, body });
        Ok(())
    }

    fn bind_server_module(&mut self, module: Arc<dyn ServerCapability>) {
        if let Some(existing) = &self.server {
            warn!(bound = %existing.kind(), requested = %module.kind(), "Server module already bound, keeping the first one.");
            return;
        }
        self.server = Some(module);
    }

    fn server_module(&self) -> Option<Arc<dyn ServerCapability>> {
        self.server.clone()
    }
}
