// src/core/gate/validator.rs

use crate::core::errors::GateError;
use crate::core::target::Target;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

static RE_INSTALL_WIZARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)/wp-admin/install\.php$").unwrap());

/// Result of a validation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ready,
    /// The homepage is the install wizard. Not an error, but the scan must stop.
    NotFullyConfigured { url: String },
}

/// Whether `homepage_url` points at the WordPress install wizard.
///
/// Only the path is considered, so a query string does not hide it.
pub fn is_install_wizard(homepage_url: &str) -> bool {
    let path = Url::parse(homepage_url)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| homepage_url.to_string());
    RE_INSTALL_WIZARD.is_match(&path)
}

/// Checks the target is in scope. The checks run in a fixed order: hosted
/// on WordPress.com, then install wizard, then "is it WordPress at all".
/// `force` only skips the last one.
pub fn validate(target: &dyn Target, force: bool) -> Result<Validation, GateError> {
    if target.is_hosted_elsewhere() {
        return Err(GateError::HostedElsewhere);
    }

    let homepage_url = target.homepage_url();
    if is_install_wizard(&homepage_url) {
        debug!(url = %homepage_url, "Install wizard detected.");
        return Ok(Validation::NotFullyConfigured { url: homepage_url });
    }

    if !target.is_expected_cms() && !force {
        return Err(GateError::NotExpectedCms);
    }

    Ok(Validation::Ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gate::testing::FakeTarget;

    #[test]
    fn hosted_elsewhere_ignores_force() {
        for force in [true, false] {
            let target = FakeTarget { hosted_elsewhere: true, ..FakeTarget::wordpress() };
            assert!(matches!(validate(&target, force), Err(GateError::HostedElsewhere)));
        }
    }

    #[test]
    fn hosted_elsewhere_is_checked_before_install_wizard() {
        let target = FakeTarget {
            hosted_elsewhere: true,
            homepage: "http://x.wordpress.com/wp-admin/install.php".into(),
            ..FakeTarget::wordpress()
        };
        assert!(matches!(validate(&target, false), Err(GateError::HostedElsewhere)));
    }

    #[test]
    fn install_wizard_stops_even_when_not_wordpress() {
        let target = FakeTarget {
            expected_cms: false,
            homepage: "http://x/wp-admin/install.php".into(),
            ..FakeTarget::wordpress()
        };
        assert_eq!(
            validate(&target, false).unwrap(),
            Validation::NotFullyConfigured { url: "http://x/wp-admin/install.php".into() }
        );
    }

    #[test]
    fn not_wordpress_needs_force() {
        let target = FakeTarget { expected_cms: false, ..FakeTarget::wordpress() };
        assert!(matches!(validate(&target, false), Err(GateError::NotExpectedCms)));
        assert_eq!(validate(&target, true).unwrap(), Validation::Ready);
    }

    #[test]
    fn wordpress_target_is_ready() {
        assert_eq!(validate(&FakeTarget::wordpress(), false).unwrap(), Validation::Ready);
    }

    #[test]
    fn install_wizard_matching() {
        assert!(is_install_wizard("http://x/wp-admin/install.php"));
        assert!(is_install_wizard("https://example.com/blog/WP-ADMIN/Install.PHP"));
        assert!(is_install_wizard("https://example.com/wp-admin/install.php?step=1"));
        assert!(!is_install_wizard("https://example.com/wp-admin/install.php.bak"));
        assert!(!is_install_wizard("https://example.com/wp-admin/"));
        assert!(!is_install_wizard("https://example.com/"));
    }
}
