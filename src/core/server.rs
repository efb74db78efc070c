// src/core/server.rs

//! Server-specific capability modules.
//!
//! Each supported web server renders auto-generated directory indexes a little
//! differently. A capability module knows how to recognise such an index and
//! how to pull the entries out of it. One module is chosen per run and shared
//! by the target and by every [`ScanItem`](crate::core::item::ScanItem).

use crate::core::models::ServerKind;
use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A fetched page that may or may not be a directory index.
#[derive(Debug, Clone, Copy)]
pub struct ListingPage<'a> {
    pub status: u16,
    pub host: &'a str,
    pub body: &'a str,
}

/// Behaviour that differs between web servers.
pub trait ServerCapability: fmt::Debug + Send + Sync {
    fn kind(&self) -> ServerKind;

    /// Whether `page` is an auto-generated directory index.
    fn is_directory_listing(&self, page: &ListingPage<'_>) -> bool;

    /// Entry names of a directory index, parent links excluded.
    /// Empty when `page` is not a listing.
    fn directory_listing_entries(&self, page: &ListingPage<'_>) -> Vec<String>;
}

/// Resolves a server kind to its capability module.
pub fn module_for(kind: ServerKind) -> Arc<dyn ServerCapability> {
    debug!(server = %kind, "Resolving server capability module.");
    match kind {
        ServerKind::Apache => Arc::new(Apache),
        ServerKind::Iis => Arc::new(Iis),
        ServerKind::Nginx => Arc::new(Nginx),
    }
}

// Text of every `<a>` matched by `selector`, skipping the parent link.
fn link_texts(body: &str, selector: &str, parent: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty() && !text.eq_ignore_ascii_case(parent))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Apache;

impl ServerCapability for Apache {
    fn kind(&self) -> ServerKind {
        ServerKind::Apache
    }

    fn is_directory_listing(&self, page: &ListingPage<'_>) -> bool {
        page.status == 200 && page.body.contains("<h1>Index of")
    }

    fn directory_listing_entries(&self, page: &ListingPage<'_>) -> Vec<String> {
        if !self.is_directory_listing(page) {
            return Vec::new();
        }
        // Fancy indexing renders a table, plain indexing a list.
        let mut entries = link_texts(page.body, "td a", "Parent Directory");
        if entries.is_empty() {
            entries = link_texts(page.body, "ul li a", "Parent Directory");
        }
        entries
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Iis;

impl Iis {
    fn heading(host: &str) -> Option<Regex> {
        RegexBuilder::new(&format!(r"<H1>{} - /", regex::escape(host)))
            .case_insensitive(true)
            .build()
            .ok()
    }
}

impl ServerCapability for Iis {
    fn kind(&self) -> ServerKind {
        ServerKind::Iis
    }

    fn is_directory_listing(&self, page: &ListingPage<'_>) -> bool {
        page.status == 200 && Iis::heading(page.host).is_some_and(|re| re.is_match(page.body))
    }

    fn directory_listing_entries(&self, page: &ListingPage<'_>) -> Vec<String> {
        if !self.is_directory_listing(page) {
            return Vec::new();
        }
        link_texts(page.body, "pre a", "[To Parent Directory]")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Nginx;

impl ServerCapability for Nginx {
    fn kind(&self) -> ServerKind {
        ServerKind::Nginx
    }

    fn is_directory_listing(&self, page: &ListingPage<'_>) -> bool {
        page.status == 200 && page.body.contains("<h1>Index of")
    }

    fn directory_listing_entries(&self, page: &ListingPage<'_>) -> Vec<String> {
        if !self.is_directory_listing(page) {
            return Vec::new();
        }
        link_texts(page.body, "pre a", "../")
    }
}
