//! Admin extension exposing workflow transitions.
//!
//! [`WorkflowExtension`] plugs into an admin at three points: it registers the
//! transition-apply route, initializes the marking of new subjects, and
//! decorates the tab menu with the transitions currently enabled for the
//! subject being shown or edited.
//!
//! Menu rendering is best effort: a missing subject, a missing workflow or a
//! denied view permission renders nothing and never surfaces an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::admin::{APPLY_TRANSITIONS, Admin, VIEW_TRANSITIONS};
use crate::error::{OptionsError, WorkflowError};
use crate::menu::MenuItem;
use crate::options::ExtensionOptions;
use crate::route::{APPLY_TRANSITION_ROUTE, RouteCollection};
use crate::workflow::{Subject, Transition, Workflow, WorkflowRegistry};

pub struct WorkflowExtension<S> {
    registry: Arc<dyn WorkflowRegistry<S>>,
    options: ExtensionOptions,
}

impl<S: Subject> WorkflowExtension<S> {
    pub fn new(registry: Arc<dyn WorkflowRegistry<S>>, options: ExtensionOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self { registry, options })
    }

    pub fn with_default_options(registry: Arc<dyn WorkflowRegistry<S>>) -> Self {
        Self {
            registry,
            options: ExtensionOptions::default(),
        }
    }

    pub fn options(&self) -> &ExtensionOptions {
        &self.options
    }

    /// Registers `{id}/workflow/transition/{transition}/apply` on the admin's routes.
    pub fn configure_routes(&self, admin: &dyn Admin<S>, collection: &mut RouteCollection) {
        collection.add(
            APPLY_TRANSITION_ROUTE,
            &format!("{}/workflow/transition/{{transition}}/apply", admin.router_id_parameter()),
        );
    }

    /// Puts a freshly created subject in the initial place of its workflow, if any.
    pub fn alter_new_instance(&self, subject: &mut S) {
        match self.workflow(subject) {
            Ok(workflow) => {
                workflow.marking(subject);
            }
            Err(err) => debug!(error = %err, "no workflow for new instance"),
        }
    }

    /// Maps the transition capabilities to the roles that grant them.
    pub fn access_mapping(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (VIEW_TRANSITIONS.to_string(), self.options.view_transitions_role.clone()),
            (APPLY_TRANSITIONS.to_string(), self.options.apply_transitions_role.clone()),
        ])
    }

    /// Adds the transitions dropdown (or the empty-state item) to `menu`.
    pub fn configure_tab_menu(
        &self,
        admin: &dyn Admin<S>,
        menu: &mut MenuItem,
        action: &str,
        subject: Option<&S>,
        child_admin: Option<&str>,
    ) {
        if let Some(child) = child_admin {
            debug!(child, "child admin active, skipping transitions menu");
            return;
        }
        if !self.options.renders_on(action) {
            return;
        }
        let Some(subject) = subject else {
            debug!(action, "no subject bound, skipping transitions menu");
            return;
        };
        if !admin.is_granted(VIEW_TRANSITIONS, subject).is_granted() {
            debug!(admin = %admin.code(), "transitions view denied");
            return;
        }
        let workflow = match self.workflow(subject) {
            Ok(workflow) => workflow,
            Err(err) => {
                debug!(error = %err, "no workflow for subject, skipping transitions menu");
                return;
            }
        };

        let transitions = workflow.enabled_transitions(subject);
        if transitions.is_empty() {
            self.no_transitions(menu, admin);
        } else {
            self.transitions_dropdown(menu, admin, &transitions, subject);
        }
    }

    fn workflow(&self, subject: &S) -> Result<Arc<dyn Workflow<S>>, WorkflowError> {
        self.registry.get(subject, self.options.workflow_name.as_deref())
    }

    fn no_transitions(&self, menu: &mut MenuItem, admin: &dyn Admin<S>) {
        if !self.options.no_transition_display {
            return;
        }
        menu.add_child(
            MenuItem::new(&self.options.no_transition_label)
                .with_uri("#")
                .with_attribute("icon", self.options.no_transition_icon.as_str())
                .with_extra("translation_domain", admin.translation_domain()),
        );
    }

    fn transitions_dropdown(&self, menu: &mut MenuItem, admin: &dyn Admin<S>, transitions: &[Transition], subject: &S) {
        let mut dropdown = MenuItem::new(&self.options.dropdown_transitions_label)
            .with_attribute("dropdown", true)
            .with_extra("translation_domain", admin.translation_domain());
        if let Some(icon) = &self.options.dropdown_transitions_icon {
            dropdown = dropdown.with_attribute("icon", icon.as_str());
        }

        let dropdown = menu.add_child(dropdown);
        for transition in transitions {
            dropdown.add_child(self.transition_item(admin, transition, subject));
        }
    }

    fn transition_item(&self, admin: &dyn Admin<S>, transition: &Transition, subject: &S) -> MenuItem {
        let mut item = MenuItem::new(admin.label(&transition.name, "workflow", "transition"))
            .with_extra("translation_domain", admin.translation_domain());

        if admin.is_granted(APPLY_TRANSITIONS, subject).is_granted() {
            let params = BTreeMap::from([("transition".to_string(), transition.name.clone())]);
            item.uri = Some(admin.generate_object_url(APPLY_TRANSITION_ROUTE, subject, &params));
        }
        if let Some(icon) = self.options.transition_icon(&transition.name) {
            item = item.with_attribute("icon", icon);
        }
        item
    }
}
