//! Pull requests: the demo subject, its review workflow and an in-memory admin.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::admin::{APPLY_TRANSITIONS, Access, Admin, VIEW_TRANSITIONS};
use crate::error::{PersistenceError, WorkflowError};
use crate::label::{LabelStrategy, UnderscoreLabelStrategy};
use crate::route::RouteCollection;
use crate::workflow::{Definition, StateMachine, Subject, Transition};

pub const WORKFLOW_NAME: &str = "pull_request";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    marking: Option<String>,
    /// Bumped on every save; a stale version means someone else saved first.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl PullRequest {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            marking: None,
            version: 0,
            updated_at: Utc::now(),
        }
    }
}

impl Subject for PullRequest {
    fn marking(&self) -> Option<&str> {
        self.marking.as_deref()
    }

    fn set_marking(&mut self, marking: &str) {
        self.marking = Some(marking.to_string());
    }
}

/// opened → pending_review → merged | closed
pub fn definition() -> Result<Definition, WorkflowError> {
    Definition::new(
        ["opened", "pending_review", "merged", "closed"],
        vec![
            Transition::new("start_review", "opened", "pending_review"),
            Transition::new("merge", "pending_review", "merged"),
            Transition::new("close", "pending_review", "closed"),
        ],
        Some("opened"),
    )
}

pub fn state_machine() -> Result<StateMachine<PullRequest>, WorkflowError> {
    StateMachine::new(WORKFLOW_NAME, definition()?)
}

/// Admin over an in-memory pull request store.
///
/// Access is granted when the role mapped to a capability is one of the
/// viewer's roles.
pub struct PullRequestAdmin {
    routes: RouteCollection,
    store: Mutex<BTreeMap<u64, PullRequest>>,
    access_mapping: BTreeMap<String, String>,
    viewer_roles: BTreeSet<String>,
    labels: Box<dyn LabelStrategy>,
}

impl PullRequestAdmin {
    pub const CODE: &'static str = "admin.pull_request";

    pub fn new<I, R>(viewer_roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let mut routes = RouteCollection::new(Self::CODE, "admin_pull_request", "/pull-request");
        routes.add("list", "list");
        routes.add("show", "{id}/show");
        routes.add("edit", "{id}/edit");

        Self {
            routes,
            store: Mutex::new(BTreeMap::new()),
            access_mapping: BTreeMap::from([
                (VIEW_TRANSITIONS.to_string(), "EDIT".to_string()),
                (APPLY_TRANSITIONS.to_string(), "EDIT".to_string()),
            ]),
            viewer_roles: viewer_roles.into_iter().map(Into::into).collect(),
            labels: Box::new(UnderscoreLabelStrategy),
        }
    }

    pub fn with_access_mapping(mut self, mapping: BTreeMap<String, String>) -> Self {
        self.access_mapping = mapping;
        self
    }

    pub fn with_label_strategy(mut self, labels: impl LabelStrategy + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    pub fn with_routes(mut self, routes: RouteCollection) -> Self {
        self.routes = routes;
        self
    }

    pub fn routes(&self) -> &RouteCollection {
        &self.routes
    }

    pub fn insert(&self, pull_request: PullRequest) {
        self.lock().insert(pull_request.id, pull_request);
    }

    pub fn find(&self, id: u64) -> Option<PullRequest> {
        self.lock().get(&id).cloned()
    }

    /// Saves a new title, as another user editing the pull request would.
    pub fn rename(&self, id: u64, title: &str) -> bool {
        let mut store = self.lock();
        match store.get_mut(&id) {
            Some(stored) => {
                stored.title = title.to_string();
                stored.version += 1;
                stored.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, PullRequest>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Admin<PullRequest> for PullRequestAdmin {
    fn code(&self) -> String {
        Self::CODE.to_string()
    }

    fn translation_domain(&self) -> String {
        "admin".to_string()
    }

    fn object(&self, id: &str) -> Option<PullRequest> {
        let id = id.parse().ok()?;
        self.find(id)
    }

    fn list(&self) -> Vec<PullRequest> {
        self.lock().values().cloned().collect()
    }

    fn is_granted(&self, capability: &str, _subject: &PullRequest) -> Access {
        self.access_mapping
            .get(capability)
            .is_some_and(|role| self.viewer_roles.contains(role))
            .into()
    }

    fn normalized_identifier(&self, subject: &PullRequest) -> String {
        subject.id.to_string()
    }

    fn to_display(&self, subject: &PullRequest) -> String {
        format!("#{} {}", subject.id, subject.title)
    }

    fn update(&self, subject: &mut PullRequest) -> Result<(), PersistenceError> {
        let mut store = self.lock();
        let stored = store
            .get_mut(&subject.id)
            .ok_or_else(|| PersistenceError::ModelManager(format!("pull request {} does not exist", subject.id)))?;
        if stored.version != subject.version {
            return Err(PersistenceError::Lock(format!(
                "pull request {} is at version {}, got {}",
                subject.id, stored.version, subject.version
            )));
        }
        subject.version += 1;
        subject.updated_at = Utc::now();
        *stored = subject.clone();
        Ok(())
    }

    fn has_route(&self, code: &str) -> bool {
        self.routes.has(code)
    }

    fn generate_url(&self, code: &str, params: &BTreeMap<String, String>) -> String {
        self.routes.generate(code, params).unwrap_or_else(|| "#".to_string())
    }

    fn generate_object_url(&self, code: &str, subject: &PullRequest, params: &BTreeMap<String, String>) -> String {
        let mut params = params.clone();
        params.insert(self.id_parameter(), subject.id.to_string());
        self.generate_url(code, &params)
    }

    fn label(&self, name: &str, context: &str, kind: &str) -> String {
        self.labels.label(name, context, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_with(pr: PullRequest) -> PullRequestAdmin {
        let admin = PullRequestAdmin::new(["EDIT"]);
        admin.insert(pr);
        admin
    }

    #[test]
    fn access_follows_role_mapping() {
        let pr = PullRequest::new(1, "a");
        let editor = PullRequestAdmin::new(["EDIT"]);
        assert!(editor.is_granted(APPLY_TRANSITIONS, &pr).is_granted());
        assert!(!editor.is_granted("delete", &pr).is_granted());

        let viewer = PullRequestAdmin::new(["VIEW"]).with_access_mapping(BTreeMap::from([
            (VIEW_TRANSITIONS.to_string(), "VIEW".to_string()),
            (APPLY_TRANSITIONS.to_string(), "EDIT".to_string()),
        ]));
        assert!(viewer.is_granted(VIEW_TRANSITIONS, &pr).is_granted());
        assert!(!viewer.is_granted(APPLY_TRANSITIONS, &pr).is_granted());
    }

    #[test]
    fn update_bumps_version() {
        let admin = admin_with(PullRequest::new(42, "Fix the parser"));
        let mut pr = admin.object("42").unwrap();
        pr.set_marking("pending_review");

        admin.update(&mut pr).unwrap();

        let stored = admin.find(42).unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.marking(), Some("pending_review"));
    }

    #[test]
    fn stale_update_is_a_lock_error() {
        let admin = admin_with(PullRequest::new(42, "Fix the parser"));
        let mut pr = admin.object("42").unwrap();
        assert!(admin.rename(42, "Fix the lexer"));

        let err = admin.update(&mut pr).unwrap_err();
        assert!(matches!(err, PersistenceError::Lock(_)));
    }

    #[test]
    fn update_of_unknown_object_is_a_model_manager_error() {
        let admin = PullRequestAdmin::new(["EDIT"]);
        let err = admin.update(&mut PullRequest::new(9, "ghost")).unwrap_err();
        assert!(matches!(err, PersistenceError::ModelManager(_)));
    }

    #[test]
    fn urls_and_redirects() {
        let admin = admin_with(PullRequest::new(42, "Fix the parser"));
        let pr = admin.find(42).unwrap();
        assert_eq!(admin.generate_object_url("show", &pr, &BTreeMap::new()), "/pull-request/42/show");
        assert_eq!(admin.redirect_location(&pr), "/pull-request/42/edit");
        assert_eq!(admin.to_display(&pr), "#42 Fix the parser");
        assert!(admin.object("not-a-number").is_none());
    }
}
