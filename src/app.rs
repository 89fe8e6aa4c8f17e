//! Wires the pull request admin, its workflow and the extension together.

use std::sync::Arc;

use tracing::info;

use crate::admin::Admin;
use crate::config::AppConfig;
use crate::controller::WorkflowController;
use crate::error::AppError;
use crate::extension::WorkflowExtension;
use crate::http::AdminApp;
use crate::i18n::MessageCatalog;
use crate::pull_request::{self, PullRequest, PullRequestAdmin};
use crate::workflow::{Registry, WorkflowRegistry};

/// Pull requests created on startup when `demo.seed` is set, with the
/// transitions already applied to each.
const SEED: &[(u64, &str, &[&str])] = &[
    (1, "Add workflow transitions to the tab menu", &[]),
    (2, "Fix redirect after applying a transition", &["start_review"]),
    (3, "Bump axum", &["start_review", "merge"]),
];

pub fn build_demo(config: &AppConfig) -> Result<Arc<AdminApp<PullRequest>>, AppError> {
    let mut registry = Registry::new();
    registry.add(pull_request::state_machine()?);
    info!(workflows = registry.len(), "workflow registry ready");
    let registry: Arc<dyn WorkflowRegistry<PullRequest>> = Arc::new(registry);

    let extension = WorkflowExtension::new(registry.clone(), config.extension.clone())?;

    let admin = PullRequestAdmin::new(config.viewer.roles.iter().cloned()).with_access_mapping(extension.access_mapping());
    let mut routes = admin.routes().clone();
    extension.configure_routes(&admin, &mut routes);
    let admin = admin.with_routes(routes.clone());

    if config.demo.seed {
        for (id, title, transitions) in SEED {
            let mut pr = PullRequest::new(*id, *title);
            extension.alter_new_instance(&mut pr);
            let workflow = registry.get(&pr, config.extension.workflow_name.as_deref())?;
            for transition in *transitions {
                workflow.apply(&mut pr, transition)?;
            }
            admin.insert(pr);
        }
        info!(count = SEED.len(), "seeded pull requests");
    }

    let admin: Arc<dyn Admin<PullRequest>> = Arc::new(admin);
    let controller =
        WorkflowController::new(admin.clone(), registry).with_workflow_name(config.extension.workflow_name.clone());

    Ok(Arc::new(AdminApp {
        admin,
        extension: Arc::new(extension),
        controller: Arc::new(controller),
        routes,
        translator: Arc::new(MessageCatalog::with_admin_defaults()),
    }))
}
