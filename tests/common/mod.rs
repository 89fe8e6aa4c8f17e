#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use mockall::mock;

use workflow_admin::admin::{Access, Admin};
use workflow_admin::error::PersistenceError;
use workflow_admin::pull_request::{self, PullRequest};
use workflow_admin::workflow::{Registry, Subject, WorkflowRegistry};

mock! {
    pub PullRequestAdmin {}

    impl Admin<PullRequest> for PullRequestAdmin {
        fn code(&self) -> String;
        fn translation_domain(&self) -> String;
        fn object(&self, id: &str) -> Option<PullRequest>;
        fn is_granted(&self, capability: &str, subject: &PullRequest) -> Access;
        fn normalized_identifier(&self, subject: &PullRequest) -> String;
        fn to_display(&self, subject: &PullRequest) -> String;
        fn update(&self, subject: &mut PullRequest) -> Result<(), PersistenceError>;
        fn has_route(&self, code: &str) -> bool;
        fn generate_url(&self, code: &str, params: &BTreeMap<String, String>) -> String;
        fn generate_object_url(&self, code: &str, subject: &PullRequest, params: &BTreeMap<String, String>) -> String;
        fn label(&self, name: &str, context: &str, kind: &str) -> String;
    }
}

impl MockPullRequestAdmin {
    /// Code, domain, display name and URL expectations every test needs.
    pub fn with_basics(mut self) -> Self {
        self.expect_code().return_const("admin.pull_request".to_string());
        self.expect_translation_domain().return_const("admin".to_string());
        self.expect_normalized_identifier().returning(|pr| pr.id.to_string());
        self.expect_to_display().returning(|pr| pr.title.clone());
        self.expect_has_route().returning(|code| matches!(code, "edit" | "show" | "list"));
        self.expect_generate_url().returning(|code, _| format!("/pull-request/{code}"));
        self.expect_generate_object_url().returning(|code, pr, params| {
            match params.get("transition") {
                Some(transition) => format!("/pull-request/{}/workflow/transition/{transition}/apply", pr.id),
                None => format!("/pull-request/{}/{code}", pr.id),
            }
        });
        self.expect_label()
            .returning(|name, context, _| format!("{context}.transition_{name}"));
        self
    }

    pub fn granting(mut self, capabilities: &'static [&'static str]) -> Self {
        self.expect_is_granted()
            .returning(move |capability, _| capabilities.iter().any(|c| *c == capability).into());
        self
    }
}

pub fn pr_at(id: u64, title: &str, marking: &str) -> PullRequest {
    let mut pr = PullRequest::new(id, title);
    pr.set_marking(marking);
    pr
}

pub fn registry() -> Arc<dyn WorkflowRegistry<PullRequest>> {
    let mut registry = Registry::new();
    registry.add(pull_request::state_machine().unwrap());
    Arc::new(registry)
}

pub fn empty_registry() -> Arc<dyn WorkflowRegistry<PullRequest>> {
    Arc::new(Registry::<PullRequest>::new())
}
