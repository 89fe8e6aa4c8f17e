//! HTTP surface: an axum router built from an admin's route collection.

pub mod handlers;
pub mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::admin::Admin;
use crate::controller::WorkflowController;
use crate::extension::WorkflowExtension;
use crate::i18n::Translator;
use crate::menu::MenuItem;
use crate::route::{APPLY_TRANSITION_ROUTE, RouteCollection};
use crate::workflow::Subject;

use handlers::{apply_transition, edit_view, list_view, show_view};
use middleware::{correlation_middleware, logging_middleware};

/// Name of the root node of the rendered tab menu.
pub const TAB_MENU: &str = "tab_menu";

/// Everything the handlers of one admin need.
pub struct AdminApp<S> {
    pub admin: Arc<dyn Admin<S>>,
    pub extension: Arc<WorkflowExtension<S>>,
    pub controller: Arc<WorkflowController<S>>,
    pub routes: RouteCollection,
    /// Renders flash messages into the response headers.
    pub translator: Arc<dyn Translator>,
}

impl<S: Subject> AdminApp<S> {
    /// The tab menu of `action`, decorated by the workflow extension.
    pub fn tab_menu(&self, action: &str, subject: Option<&S>) -> MenuItem {
        let mut menu = MenuItem::new(TAB_MENU);
        self.extension
            .configure_tab_menu(self.admin.as_ref(), &mut menu, action, subject, None);
        menu
    }
}

/// Mounts the admin's `list`, `show`, `edit` and transition-apply routes.
///
/// Routes with other codes are not served.
pub fn build_router<S>(app: Arc<AdminApp<S>>) -> Router
where
    S: Subject + Serialize,
{
    let mut router = Router::new();
    for route in app.routes.routes() {
        let method_router = match route.code.as_str() {
            "list" => get(list_view::<S>),
            "show" => get(show_view::<S>),
            "edit" => get(edit_view::<S>),
            APPLY_TRANSITION_ROUTE => get(apply_transition::<S>).post(apply_transition::<S>),
            other => {
                debug!(code = other, path = %route.path, "route has no handler, skipping");
                continue;
            }
        };
        debug!(name = %route.name, path = %route.path, "mounting route");
        router = router.route(&route.path, method_router);
    }

    router
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(correlation_middleware))
        .with_state(app)
}

/// Binds `addr` and serves `router` until the server fails.
pub async fn serve(addr: &str, router: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %listener.local_addr()?, "HTTP server ready and accepting connections");
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|err| {
            error!(addr, error = %err, "HTTP server terminated unexpectedly");
            anyhow::Error::from(err)
        })
}
