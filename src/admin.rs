//! The admin view seam: object lookup, persistence, access checks, URLs and labels.

use std::collections::BTreeMap;

use crate::error::PersistenceError;

/// Capability checked before rendering the transitions menu.
pub const VIEW_TRANSITIONS: &str = "viewTransitions";
/// Capability checked before exposing or applying a transition.
pub const APPLY_TRANSITIONS: &str = "applyTransitions";

/// Outcome of a delegated access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Access::Granted
    }
}

impl From<bool> for Access {
    fn from(granted: bool) -> Self {
        if granted { Access::Granted } else { Access::Denied }
    }
}

/// An admin view managing subjects of type `S`.
pub trait Admin<S>: Send + Sync {
    /// Unique admin code, e.g. `admin.pull_request`.
    fn code(&self) -> String;

    /// Name of the request parameter carrying the object identifier.
    fn id_parameter(&self) -> String {
        "id".to_string()
    }

    /// Route placeholder for the identifier, e.g. `{id}`.
    fn router_id_parameter(&self) -> String {
        format!("{{{}}}", self.id_parameter())
    }

    fn translation_domain(&self) -> String;

    fn object(&self, id: &str) -> Option<S>;

    /// Objects shown on the list page.
    fn list(&self) -> Vec<S> {
        Vec::new()
    }

    /// Called once the controller resolved the subject it works on.
    fn bind_subject(&self, _subject: &S) {}

    fn is_granted(&self, capability: &str, subject: &S) -> Access;

    fn normalized_identifier(&self, subject: &S) -> String;

    /// Human readable representation of the subject.
    fn to_display(&self, subject: &S) -> String;

    /// Persists the subject.
    fn update(&self, subject: &mut S) -> Result<(), PersistenceError>;

    fn has_route(&self, code: &str) -> bool;

    fn generate_url(&self, code: &str, params: &BTreeMap<String, String>) -> String;

    fn generate_object_url(&self, code: &str, subject: &S, params: &BTreeMap<String, String>) -> String;

    /// Label for `name`, e.g. a transition name in the `workflow` context.
    fn label(&self, name: &str, context: &str, kind: &str) -> String;

    /// Where to send the user after an update: edit, else show, else list.
    fn redirect_location(&self, subject: &S) -> String {
        let params = BTreeMap::new();
        for code in ["edit", "show"] {
            if self.has_route(code) {
                return self.generate_object_url(code, subject, &params);
            }
        }
        self.generate_url("list", &params)
    }
}
