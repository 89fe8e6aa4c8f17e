//! The transition-apply controller action, the only mutating entry point.

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::admin::{APPLY_TRANSITIONS, Admin};
use crate::error::{ControllerError, PersistenceError};
use crate::flash::{FlashBag, FlashType};
use crate::i18n::escape_html;
use crate::translator::{FlashTranslator, StandardTranslator};
use crate::workflow::{Subject, WorkflowRegistry};

/// What the HTTP layer extracted from the incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub id: String,
    pub transition: Option<String>,
    /// `X-Requested-With: XMLHttpRequest` was present.
    pub xml_http_request: bool,
}

/// JSON envelope answered to AJAX callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionApplied {
    pub result: String,
    pub object_id: String,
    pub object_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerResponse {
    Redirect(String),
    Json(TransitionApplied),
    /// A response produced by a pre-apply hook, returned verbatim.
    Content { status: StatusCode, body: String },
}

/// Runs right before a transition is applied; returning a response
/// short-circuits the action (nothing is applied or persisted).
pub trait PreApplyHook<S>: Send + Sync {
    fn pre_apply(&self, subject: &S, transition: &str) -> Option<ControllerResponse>;
}

impl<S, F> PreApplyHook<S> for F
where
    F: Fn(&S, &str) -> Option<ControllerResponse> + Send + Sync,
{
    fn pre_apply(&self, subject: &S, transition: &str) -> Option<ControllerResponse> {
        self(subject, transition)
    }
}

pub struct WorkflowController<S> {
    admin: Arc<dyn Admin<S>>,
    registry: Arc<dyn WorkflowRegistry<S>>,
    translator: Arc<dyn FlashTranslator<S>>,
    pre_apply: Option<Arc<dyn PreApplyHook<S>>>,
    workflow_name: Option<String>,
}

impl<S: Subject> WorkflowController<S> {
    pub fn new(admin: Arc<dyn Admin<S>>, registry: Arc<dyn WorkflowRegistry<S>>) -> Self {
        Self {
            admin,
            registry,
            translator: Arc::new(StandardTranslator),
            pre_apply: None,
            workflow_name: None,
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn FlashTranslator<S>>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_pre_apply<H>(mut self, hook: H) -> Self
    where
        H: PreApplyHook<S> + 'static,
    {
        self.pre_apply = Some(Arc::new(hook));
        self
    }

    /// Picks a named workflow when several are registered for the subject.
    pub fn with_workflow_name(mut self, name: Option<String>) -> Self {
        self.workflow_name = name;
        self
    }

    pub fn admin(&self) -> &Arc<dyn Admin<S>> {
        &self.admin
    }

    /// Applies `request.transition` to the object identified by `request.id`.
    ///
    /// A concurrent modification detected while saving is reported as an error
    /// flash and still redirects; the in-memory marking is not reverted.
    pub fn apply_transition(
        &self,
        request: &TransitionRequest,
        flashes: &mut FlashBag,
    ) -> Result<ControllerResponse, ControllerError> {
        let admin = self.admin.as_ref();
        let id = &request.id;

        let Some(mut subject) = admin.object(id) else {
            return Err(ControllerError::not_found(format!("unable to find the object with id: {id}")));
        };

        admin.bind_subject(&subject);
        if !admin.is_granted(APPLY_TRANSITIONS, &subject).is_granted() {
            warn!(admin = %admin.code(), id, "transition apply denied");
            return Err(ControllerError::AccessDenied {
                capability: APPLY_TRANSITIONS.to_string(),
            });
        }

        let object_id = admin.normalized_identifier(&subject);

        let workflow = self
            .registry
            .get(&subject, self.workflow_name.as_deref())
            .map_err(|err| ControllerError::NotFound {
                message: "Not found".to_string(),
                source: Some(err),
            })?;

        let Some(transition) = request.transition.as_deref() else {
            return Err(ControllerError::bad_request("missing transition to apply"));
        };

        if !workflow.can(&subject, transition) {
            return Err(ControllerError::bad_request(format!(
                "transition {transition} could not be applied to object {}",
                admin.to_display(&subject)
            )));
        }

        if let Some(hook) = &self.pre_apply
            && let Some(response) = hook.pre_apply(&subject, transition)
        {
            info!(object_id, transition, "pre-apply hook answered");
            return Ok(response);
        }

        match workflow.apply(&mut subject, transition) {
            Ok(()) => {}
            Err(err) if err.is_logic() => {
                return Err(ControllerError::BadRequest {
                    message: format!(
                        "transition {transition} could not be applied to object {}",
                        admin.to_display(&subject)
                    ),
                    source: Some(err),
                });
            }
            Err(err) => {
                error!(object_id, transition, %err, "workflow engine failed");
                return Err(ControllerError::Workflow(err));
            }
        }

        match admin.update(&mut subject) {
            Ok(()) => {
                info!(object_id, transition, workflow = workflow.name(), "transition applied");
                if request.xml_http_request {
                    return Ok(ControllerResponse::Json(TransitionApplied {
                        result: "ok".to_string(),
                        object_id,
                        object_name: escape_html(&admin.to_display(&subject)),
                    }));
                }
                flashes.add(
                    FlashType::Success,
                    self.translator
                        .transition_success_flash_message(admin, workflow.as_ref(), &subject, transition),
                );
            }
            Err(PersistenceError::Lock(reason)) => {
                warn!(object_id, transition, %reason, "object modified concurrently, transition not saved");
                flashes.add(
                    FlashType::Error,
                    self.translator
                        .transition_error_flash_message(admin, workflow.as_ref(), &subject, transition),
                );
            }
            Err(err) => return Err(ControllerError::ModelManager(err)),
        }

        Ok(ControllerResponse::Redirect(admin.redirect_location(&subject)))
    }
}
