//! Options of the workflow admin extension.
//!
//! Options are resolved once when the extension is built. Unknown keys and
//! values of the wrong type are rejected; absent keys take their defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::OptionsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionOptions {
    /// Admin actions on which the transitions menu is rendered.
    pub render_actions: Vec<String>,

    /// Workflow to use when several are registered for a subject.
    pub workflow_name: Option<String>,

    /// Render a placeholder item when no transition is enabled.
    pub no_transition_display: bool,
    pub no_transition_label: String,
    pub no_transition_icon: String,

    pub dropdown_transitions_label: String,
    pub dropdown_transitions_icon: Option<String>,

    /// Icon for transitions without an entry in `transitions_icons`.
    pub transitions_default_icon: Option<String>,
    /// Per-transition icon overrides, keyed by transition name.
    pub transitions_icons: BTreeMap<String, String>,

    pub view_transitions_role: String,
    pub apply_transitions_role: String,
}

impl Default for ExtensionOptions {
    fn default() -> Self {
        Self {
            render_actions: vec!["edit".to_string(), "show".to_string()],
            workflow_name: None,
            no_transition_display: false,
            no_transition_label: "workflow_transitions_empty".to_string(),
            no_transition_icon: "fa fa-code-fork".to_string(),
            dropdown_transitions_label: "workflow_transitions".to_string(),
            dropdown_transitions_icon: Some("fa fa-code-fork".to_string()),
            transitions_default_icon: None,
            transitions_icons: BTreeMap::new(),
            view_transitions_role: "EDIT".to_string(),
            apply_transitions_role: "EDIT".to_string(),
        }
    }
}

impl ExtensionOptions {
    /// Resolves options from a TOML table such as the `[extension]` section
    /// of the configuration file.
    pub fn resolve(table: toml::Table) -> Result<Self, OptionsError> {
        let options: Self = toml::Value::Table(table).try_into()?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, OptionsError> {
        let options: Self = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.view_transitions_role.trim().is_empty() {
            return Err(OptionsError::Empty("view_transitions_role"));
        }
        if self.apply_transitions_role.trim().is_empty() {
            return Err(OptionsError::Empty("apply_transitions_role"));
        }
        if self.dropdown_transitions_label.trim().is_empty() {
            return Err(OptionsError::Empty("dropdown_transitions_label"));
        }
        Ok(())
    }

    /// Icon for a transition: its override, else the default icon.
    pub fn transition_icon(&self, transition: &str) -> Option<&str> {
        self.transitions_icons
            .get(transition)
            .or(self.transitions_default_icon.as_ref())
            .map(String::as_str)
    }

    pub fn renders_on(&self, action: &str) -> bool {
        self.render_actions.iter().any(|a| a == action)
    }
}
