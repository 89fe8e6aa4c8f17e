//! Translatable messages and a static message catalog.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Message domain of the built-in admin messages.
pub const ADMIN_DOMAIN: &str = "SonataAdminBundle";

/// A message key plus parameters, translated lazily by a [`Translator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatableMessage {
    pub message: String,
    pub parameters: BTreeMap<String, String>,
    pub domain: Option<String>,
}

impl TranslatableMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            parameters: BTreeMap::new(),
            domain: None,
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn trans(&self, translator: &dyn Translator) -> String {
        translator.trans(&self.message, &self.parameters, self.domain.as_deref())
    }
}

pub trait Translator: Send + Sync {
    fn trans(&self, id: &str, parameters: &BTreeMap<String, String>, domain: Option<&str>) -> String;
}

/// In-memory catalog keyed by `(domain, id)`. Unknown ids translate to themselves.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<(String, String), String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The English admin flash messages and menu labels.
    pub fn with_admin_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.insert(ADMIN_DOMAIN, "flash_edit_success", "Item \"%name%\" has been successfully updated.");
        catalog.insert(ADMIN_DOMAIN, "flash_edit_error", "An error has occurred during update of item \"%name%\".");
        catalog.insert(
            ADMIN_DOMAIN,
            "flash_lock_error",
            "Another user has modified item \"%name%\". Please %link_start%click here%link_end% to reload the page and apply the changes again.",
        );
        catalog
    }

    pub fn insert(&mut self, domain: &str, id: &str, message: &str) {
        self.messages
            .insert((domain.to_string(), id.to_string()), message.to_string());
    }
}

impl Translator for MessageCatalog {
    fn trans(&self, id: &str, parameters: &BTreeMap<String, String>, domain: Option<&str>) -> String {
        let key = (domain.unwrap_or("messages").to_string(), id.to_string());
        let template = self.messages.get(&key).map(String::as_str).unwrap_or(id);
        replace_parameters(template, parameters)
    }
}

/// Replaces every parameter key with its value, longest keys first so that
/// overlapping keys do not clobber each other.
pub fn replace_parameters(template: &str, parameters: &BTreeMap<String, String>) -> String {
    let mut keys: Vec<&String> = parameters.keys().collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let mut out = template.to_string();
    for key in keys {
        out = out.replace(key.as_str(), &parameters[key]);
    }
    out
}

/// Escapes `& < > " '` for inclusion in HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
