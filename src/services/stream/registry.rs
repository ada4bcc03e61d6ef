//! Scheme registration for directory streams.
//!
//! Hosts route `scheme://path` targets to [`DirectoryStream`] through a
//! [`ProtocolRegistry`]. A process-wide registry is available through
//! [`global`] for callers that want the usual "register once" lifecycle.

use super::{DirectoryStream, ReadableStream};
use crate::core::errors::{Error, Result};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Scheme registered when no name is given.
pub const DEFAULT_PROTOCOL_NAME: &str = "directory-files";

const SCHEME_SEPARATOR: &str = "://";

/// Splits `target` into its scheme (if any) and the remaining path.
pub fn split_target(target: &str) -> (Option<&str>, &str) {
    match target.find(SCHEME_SEPARATOR) {
        Some(pos) => (
            Some(&target[..pos]),
            &target[pos + SCHEME_SEPARATOR.len()..],
        ),
        None => (None, target),
    }
}

/// Drops a leading `scheme://` from `target`.
pub fn strip_scheme(target: &str) -> &str {
    split_target(target).1
}

/// Scheme names are non-empty and made of ASCII alphanumerics, `+`, `-` and `.`.
pub fn is_valid_protocol_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Set of scheme names that open directory streams.
#[derive(Debug, Default)]
pub struct ProtocolRegistry {
    protocols: BTreeSet<String>,
}

impl ProtocolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` and returns it. Fails on invalid or already taken names.
    pub fn register(&mut self, name: &str) -> Result<String> {
        if !is_valid_protocol_name(name) {
            return Err(Error::InvalidProtocol(name.to_string()));
        }
        if !self.protocols.insert(name.to_string()) {
            return Err(Error::ProtocolTaken(name.to_string()));
        }
        tracing::debug!("registered protocol '{}'", name);
        Ok(name.to_string())
    }

    pub fn register_default(&mut self) -> Result<String> {
        self.register(DEFAULT_PROTOCOL_NAME)
    }

    /// Returns `true` if `name` was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.protocols.remove(name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.protocols.contains(name)
    }

    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.protocols.iter().map(String::as_str)
    }

    /// Opens `url` if its scheme is registered here.
    pub fn open(&self, url: &str, mode: &str) -> Result<DirectoryStream> {
        match split_target(url) {
            (Some(scheme), _) if self.is_registered(scheme) => DirectoryStream::open(url, mode),
            (scheme, _) => Err(Error::UnknownProtocol(scheme.unwrap_or_default().to_string())),
        }
    }
}

/// The process-wide registry.
pub fn global() -> MutexGuard<'static, ProtocolRegistry> {
    static REGISTRY: OnceLock<Mutex<ProtocolRegistry>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Mutex::new(ProtocolRegistry::new()))
        .lock()
        // The set stays consistent even if a holder panicked.
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Registers `name` in the process-wide registry.
pub fn register(name: &str) -> Result<String> {
    global().register(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_target_with_scheme() {
        assert_eq!(
            split_target("directory-files:///var/data"),
            (Some("directory-files"), "/var/data")
        );
        assert_eq!(split_target("custom://."), (Some("custom"), "."));
    }

    #[test]
    fn split_target_without_scheme() {
        assert_eq!(split_target("/var/data"), (None, "/var/data"));
        assert_eq!(strip_scheme("relative/dir"), "relative/dir");
    }

    #[test]
    fn protocol_name_rules() {
        assert!(is_valid_protocol_name(DEFAULT_PROTOCOL_NAME));
        assert!(is_valid_protocol_name("custom"));
        assert!(is_valid_protocol_name("a.b+c-1"));
        assert!(!is_valid_protocol_name("invalid_protocol_name"));
        assert!(!is_valid_protocol_name(""));
        assert!(!is_valid_protocol_name("with space"));
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = ProtocolRegistry::new();
        assert_eq!(registry.register_default().unwrap(), DEFAULT_PROTOCOL_NAME);
        assert!(matches!(
            registry.register(DEFAULT_PROTOCOL_NAME),
            Err(Error::ProtocolTaken(_))
        ));
    }

    #[test]
    fn unregister_frees_the_name() {
        let mut registry = ProtocolRegistry::new();
        registry.register("custom").unwrap();
        assert!(registry.is_registered("custom"));
        assert!(registry.unregister("custom"));
        assert!(!registry.unregister("custom"));
        assert_eq!(registry.register("custom").unwrap(), "custom");
        assert_eq!(registry.protocols().collect::<Vec<_>>(), vec!["custom"]);
    }

    #[test]
    fn open_requires_registered_scheme() {
        let registry = ProtocolRegistry::new();
        assert!(matches!(
            registry.open("nope:///tmp", "r"),
            Err(Error::UnknownProtocol(s)) if s == "nope"
        ));
        assert!(matches!(
            registry.open("/tmp", "r"),
            Err(Error::UnknownProtocol(s)) if s.is_empty()
        ));
    }
}
