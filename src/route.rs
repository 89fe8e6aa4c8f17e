use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

/// Route code of the transition-apply endpoint.
pub const APPLY_TRANSITION_ROUTE: &str = "workflow_apply_transition";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Short code, unique within the admin (`edit`, `workflow_apply_transition`).
    pub code: String,
    /// Globally unique name (`admin_pull_request_edit`).
    pub name: String,
    /// Path pattern with `{param}` placeholders.
    pub path: String,
    pub admin_code: String,
}

/// The named routes of one admin, all under a common base pattern.
#[derive(Debug, Clone)]
pub struct RouteCollection {
    admin_code: String,
    base_name: String,
    base_pattern: String,
    routes: Vec<Route>,
}

impl RouteCollection {
    pub fn new(admin_code: impl Into<String>, base_name: impl Into<String>, base_pattern: impl Into<String>) -> Self {
        Self {
            admin_code: admin_code.into(),
            base_name: base_name.into(),
            base_pattern: base_pattern.into().trim_end_matches('/').to_string(),
            routes: Vec::new(),
        }
    }

    /// Registers `pattern` under the base pattern; re-adding a code replaces it.
    pub fn add(&mut self, code: impl Into<String>, pattern: &str) -> &Route {
        let code = code.into();
        let route = Route {
            name: format!("{}_{}", self.base_name, code),
            path: format!("{}/{}", self.base_pattern, pattern.trim_start_matches('/')),
            admin_code: self.admin_code.clone(),
            code,
        };
        let index = match self.routes.iter().position(|r| r.code == route.code) {
            Some(index) => {
                self.routes[index] = route;
                index
            }
            None => {
                self.routes.push(route);
                self.routes.len() - 1
            }
        };
        &self.routes[index]
    }

    pub fn has(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn get(&self, code: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.code == code)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn base_pattern(&self) -> &str {
        &self.base_pattern
    }

    /// Fills the route's placeholders from `params`; leftover params become
    /// the query string. Values are percent-encoded.
    pub fn generate(&self, code: &str, params: &BTreeMap<String, String>) -> Option<String> {
        let route = self.get(code)?;
        let mut path = route.path.clone();
        let mut query = form_urlencoded::Serializer::new(String::new());
        let mut has_query = false;
        for (key, value) in params {
            let placeholder = format!("{{{key}}}");
            if path.contains(&placeholder) {
                path = path.replace(&placeholder, &encode_segment(value));
            } else {
                query.append_pair(key, value);
                has_query = true;
            }
        }
        if has_query {
            path.push('?');
            path.push_str(&query.finish());
        }
        Some(path)
    }
}

/// `byte_serialize` writes spaces as `+`, which a path takes literally.
fn encode_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
