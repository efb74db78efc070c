// src/core/item.rs

use crate::core::models::ServerKind;
use crate::core::server::{ListingPage, ServerCapability};
use std::sync::Arc;
use url::Url;

// The kind of artifact an item stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Plugin,
    Theme,
    Backup,
    Other,
}

/// A discoverable artifact of the target (plugin, theme, backup file, ...).
///
/// Items never pick a server module themselves: they are built through an
/// [`ItemFactory`] that carries the module selected by the gate for this run.
#[derive(Debug, Clone)]
pub struct ScanItem {
    pub kind: ItemKind,
    pub slug: String,
    pub url: Url,
    server: Arc<dyn ServerCapability>,
}

impl ScanItem {
    pub fn new(kind: ItemKind, slug: impl Into<String>, url: Url, server: Arc<dyn ServerCapability>) -> Self {
        Self { kind, slug: slug.into(), url, server }
    }

    pub fn server(&self) -> ServerKind {
        self.server.kind()
    }

    /// Whether the response fetched from this item's URL is a directory index.
    pub fn has_directory_listing(&self, status: u16, body: &str) -> bool {
        self.server.is_directory_listing(&self.listing_page(status, body))
    }

    pub fn directory_listing_entries(&self, status: u16, body: &str) -> Vec<String> {
        self.server.directory_listing_entries(&self.listing_page(status, body))
    }

    fn listing_page<'a>(&'a self, status: u16, body: &'a str) -> ListingPage<'a> {
        ListingPage { status, host: self.url.host_str().unwrap_or_default(), body }
    }
}

/// Builds [`ScanItem`]s that share the run's server module.
#[derive(Debug, Clone)]
pub struct ItemFactory {
    server: Arc<dyn ServerCapability>,
}

impl ItemFactory {
    pub fn new(server: Arc<dyn ServerCapability>) -> Self {
        Self { server }
    }

    pub fn build(&self, kind: ItemKind, slug: impl Into<String>, url: Url) -> ScanItem {
        ScanItem::new(kind, slug, url, Arc::clone(&self.server))
    }

    pub fn server(&self) -> ServerKind {
        self.server.kind()
    }
}
