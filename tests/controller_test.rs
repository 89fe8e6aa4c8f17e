mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::StatusCode;

use common::{MockPullRequestAdmin, empty_registry, pr_at, registry};
use workflow_admin::admin::{APPLY_TRANSITIONS, Access, Admin};
use workflow_admin::controller::{ControllerResponse, TransitionApplied, TransitionRequest, WorkflowController};
use workflow_admin::error::{ControllerError, PersistenceError, WorkflowError};
use workflow_admin::flash::{FlashBag, FlashType};
use workflow_admin::i18n::TranslatableMessage;
use workflow_admin::pull_request::{self, PullRequest};
use workflow_admin::translator::FlashTranslator;
use workflow_admin::workflow::{Definition, Registry, StateMachine, Subject, Transition, Workflow};

fn request(id: &str, transition: Option<&str>) -> TransitionRequest {
    TransitionRequest {
        id: id.to_string(),
        transition: transition.map(str::to_string),
        xml_http_request: false,
    }
}

fn admin_holding(pr: PullRequest) -> MockPullRequestAdmin {
    let mut admin = MockPullRequestAdmin::new().with_basics();
    let id = pr.id.to_string();
    admin
        .expect_object()
        .withf(move |requested: &str| requested == id)
        .returning(move |_| Some(pr.clone()));
    admin
}

#[test]
fn unknown_object_is_not_found() {
    let mut admin = MockPullRequestAdmin::new();
    admin.expect_object().returning(|_| None);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), registry());

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut FlashBag::new())
        .unwrap_err();

    assert!(matches!(err, ControllerError::NotFound { source: None, .. }));
    assert_eq!(err.to_string(), "unable to find the object with id: 42");
}

#[test]
fn subject_without_workflow_is_not_found() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), empty_registry());

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut FlashBag::new())
        .unwrap_err();

    match err {
        ControllerError::NotFound { message, source } => {
            assert_eq!(message, "Not found");
            assert!(matches!(source, Some(WorkflowError::NotFound { .. })));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn missing_transition_is_a_bad_request() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), registry());

    let err = controller
        .apply_transition(&request("42", None), &mut FlashBag::new())
        .unwrap_err();

    assert!(matches!(err, ControllerError::BadRequest { .. }));
    assert_eq!(err.to_string(), "missing transition to apply");
}

#[test]
fn disabled_transition_is_a_bad_request() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), registry());

    let err = controller
        .apply_transition(&request("42", Some("merge")), &mut FlashBag::new())
        .unwrap_err();

    assert!(matches!(err, ControllerError::BadRequest { source: None, .. }));
    assert_eq!(err.to_string(), "transition merge could not be applied to object Fix the parser");
}

#[test]
fn access_denied_is_propagated() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), registry());
    let mut flashes = FlashBag::new();

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut flashes)
        .unwrap_err();

    assert!(matches!(err, ControllerError::AccessDenied { ref capability } if capability == APPLY_TRANSITIONS));
    assert!(flashes.is_empty());
}

#[test]
fn model_manager_failure_is_propagated() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin
        .expect_update()
        .times(1)
        .returning(|_| Err(PersistenceError::ModelManager("connection reset".into())));
    let controller = WorkflowController::new(Arc::new(admin), registry());
    let mut flashes = FlashBag::new();

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut flashes)
        .unwrap_err();

    assert!(matches!(err, ControllerError::ModelManager(PersistenceError::ModelManager(_))));
    assert!(flashes.is_empty());
}

#[test]
fn lock_failure_flashes_an_error_and_redirects() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin
        .expect_update()
        .withf(|pr: &PullRequest| pr.marking() == Some("pending_review"))
        .times(1)
        .returning(|_| Err(PersistenceError::Lock("version mismatch".into())));
    let controller = WorkflowController::new(Arc::new(admin), registry());
    let mut flashes = FlashBag::new();

    let response = controller
        .apply_transition(&request("42", Some("start_review")), &mut flashes)
        .unwrap();

    assert_eq!(response, ControllerResponse::Redirect("/pull-request/42/edit".into()));
    assert!(flashes.peek(FlashType::Success).is_empty());
    let errors = flashes.peek(FlashType::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "flash_lock_error");
    assert_eq!(errors[0].parameters["%name%"], "Fix the parser");
    assert_eq!(errors[0].parameters["%link_start%"], "<a href=\"/pull-request/42/edit\">");
    assert_eq!(errors[0].parameters["%link_end%"], "</a>");
    assert_eq!(errors[0].domain.as_deref(), Some("SonataAdminBundle"));
}

#[test]
fn xhr_success_answers_json_without_flash() {
    let mut admin = admin_holding(pr_at(42, "<b>Fix</b> the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().times(1).returning(|_| Ok(()));
    let controller = WorkflowController::new(Arc::new(admin), registry());
    let mut flashes = FlashBag::new();

    let response = controller
        .apply_transition(
            &TransitionRequest {
                xml_http_request: true,
                ..request("42", Some("start_review"))
            },
            &mut flashes,
        )
        .unwrap();

    assert_eq!(
        response,
        ControllerResponse::Json(TransitionApplied {
            result: "ok".into(),
            object_id: "42".into(),
            object_name: "&lt;b&gt;Fix&lt;/b&gt; the parser".into(),
        })
    );
    assert!(flashes.is_empty());
}

#[test]
fn http_success_persists_new_marking_and_flashes() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "pending_review")).granting(&[APPLY_TRANSITIONS]);
    admin
        .expect_update()
        .withf(|pr: &PullRequest| pr.marking() == Some("merged"))
        .times(1)
        .returning(|_| Ok(()));
    let controller = WorkflowController::new(Arc::new(admin), registry());
    let mut flashes = FlashBag::new();

    let response = controller
        .apply_transition(&request("42", Some("merge")), &mut flashes)
        .unwrap();

    assert_eq!(response, ControllerResponse::Redirect("/pull-request/42/edit".into()));
    let successes = flashes.peek(FlashType::Success);
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].message, "flash_edit_success");
    assert_eq!(successes[0].parameters["%name%"], "Fix the parser");
}

#[test]
fn pre_apply_hook_short_circuits() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "pending_review")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), registry()).with_pre_apply(
        |_: &PullRequest, transition: &str| -> Option<ControllerResponse> {
            (transition == "merge").then(|| ControllerResponse::Content {
                status: StatusCode::OK,
                body: format!("confirm {transition}"),
            })
        },
    );
    let mut flashes = FlashBag::new();

    let response = controller
        .apply_transition(&request("42", Some("merge")), &mut flashes)
        .unwrap();

    assert_eq!(
        response,
        ControllerResponse::Content {
            status: StatusCode::OK,
            body: "confirm merge".into(),
        }
    );
    assert!(flashes.is_empty());
}

#[test]
fn guard_flipping_between_check_and_apply_is_a_bad_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let machine = pull_request::state_machine()
        .unwrap()
        .with_guard("start_review", move |_, _| counter.fetch_add(1, Ordering::SeqCst) == 0);
    let mut registry = Registry::new();
    registry.add(machine);

    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), Arc::new(registry));

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut FlashBag::new())
        .unwrap_err();

    assert!(matches!(
        err,
        ControllerError::BadRequest {
            source: Some(WorkflowError::NotEnabled { .. }),
            ..
        }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// Delegates to the demo machine, except that firing always fails on the
/// engine side.
struct BrokenStore(StateMachine<PullRequest>);

impl Workflow<PullRequest> for BrokenStore {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn definition(&self) -> &Definition {
        self.0.definition()
    }

    fn marking(&self, subject: &mut PullRequest) -> String {
        self.0.marking(subject)
    }

    fn enabled_transitions(&self, subject: &PullRequest) -> Vec<Transition> {
        self.0.enabled_transitions(subject)
    }

    fn can(&self, subject: &PullRequest, transition: &str) -> bool {
        self.0.can(subject, transition)
    }

    fn apply(&self, _subject: &mut PullRequest, _transition: &str) -> Result<(), WorkflowError> {
        Err(WorkflowError::InvalidDefinition("marking store misconfigured".into()))
    }
}

#[test]
fn engine_failure_is_not_a_bad_request() {
    let mut registry = Registry::new();
    registry.add(BrokenStore(pull_request::state_machine().unwrap()));

    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let controller = WorkflowController::new(Arc::new(admin), Arc::new(registry));
    let mut flashes = FlashBag::new();

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut flashes)
        .unwrap_err();

    assert!(matches!(err, ControllerError::Workflow(WorkflowError::InvalidDefinition(_))));
    assert_eq!(err.to_string(), "invalid workflow definition: marking store misconfigured");
    assert!(flashes.is_empty());
}

#[test]
fn named_workflow_is_used_when_several_match() {
    let mut registry = Registry::new();
    registry.add(pull_request::state_machine().unwrap());
    registry.add(
        StateMachine::new("pull_request_strict", pull_request::definition().unwrap())
            .unwrap()
            .with_guard("start_review", |_, _| false),
    );
    let registry = Arc::new(registry);

    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().never();
    let ambiguous = WorkflowController::new(Arc::new(admin), registry.clone());
    let err = ambiguous
        .apply_transition(&request("42", Some("start_review")), &mut FlashBag::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ControllerError::NotFound {
            source: Some(WorkflowError::Ambiguous { .. }),
            ..
        }
    ));

    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().times(1).returning(|_| Ok(()));
    let named = WorkflowController::new(Arc::new(admin), registry)
        .with_workflow_name(Some(pull_request::WORKFLOW_NAME.to_string()));
    let response = named
        .apply_transition(&request("42", Some("start_review")), &mut FlashBag::new())
        .unwrap();
    assert!(matches!(response, ControllerResponse::Redirect(_)));
}

#[test]
fn access_is_checked_against_the_loaded_subject() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened"));
    admin
        .expect_is_granted()
        .withf(|capability, pr| capability == APPLY_TRANSITIONS && pr.id == 42)
        .times(1)
        .return_const(Access::Denied);
    let controller = WorkflowController::new(Arc::new(admin), registry());

    let err = controller
        .apply_transition(&request("42", Some("start_review")), &mut FlashBag::new())
        .unwrap_err();
    assert!(matches!(err, ControllerError::AccessDenied { .. }));
}

struct BracketTranslator;

impl FlashTranslator<PullRequest> for BracketTranslator {
    fn transition_success_flash_message(
        &self,
        _admin: &dyn Admin<PullRequest>,
        workflow: &dyn Workflow<PullRequest>,
        subject: &PullRequest,
        transition: &str,
    ) -> TranslatableMessage {
        TranslatableMessage::new(format!("[{}] {transition} applied to #{}", workflow.name(), subject.id))
    }

    fn transition_error_flash_message(
        &self,
        _admin: &dyn Admin<PullRequest>,
        _workflow: &dyn Workflow<PullRequest>,
        _subject: &PullRequest,
        transition: &str,
    ) -> TranslatableMessage {
        TranslatableMessage::new(format!("{transition} was not saved"))
    }
}

#[test]
fn custom_translator_words_the_flash() {
    let mut admin = admin_holding(pr_at(42, "Fix the parser", "opened")).granting(&[APPLY_TRANSITIONS]);
    admin.expect_update().times(1).returning(|_| Ok(()));
    let controller =
        WorkflowController::new(Arc::new(admin), registry()).with_translator(Arc::new(BracketTranslator));
    let mut flashes = FlashBag::new();

    controller
        .apply_transition(&request("42", Some("start_review")), &mut flashes)
        .unwrap();

    let successes = flashes.peek(FlashType::Success);
    assert_eq!(successes[0].message, "[pull_request] start_review applied to #42");
}
