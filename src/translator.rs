//! Flash messages reported after a transition was applied.

use std::collections::BTreeMap;

use crate::admin::Admin;
use crate::i18n::{ADMIN_DOMAIN, TranslatableMessage, escape_html};
use crate::workflow::Workflow;

/// Builds the flash messages of the transition controller.
///
/// Implement it to change the wording without touching the controller flow.
pub trait FlashTranslator<S>: Send + Sync {
    fn transition_success_flash_message(
        &self,
        admin: &dyn Admin<S>,
        workflow: &dyn Workflow<S>,
        subject: &S,
        transition: &str,
    ) -> TranslatableMessage;

    /// Message reported when the subject could not be saved because it was
    /// modified concurrently.
    fn transition_error_flash_message(
        &self,
        admin: &dyn Admin<S>,
        workflow: &dyn Workflow<S>,
        subject: &S,
        transition: &str,
    ) -> TranslatableMessage;
}

/// The admin's stock "item updated" / "item modified by another user" messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardTranslator;

impl<S> FlashTranslator<S> for StandardTranslator {
    fn transition_success_flash_message(
        &self,
        admin: &dyn Admin<S>,
        _workflow: &dyn Workflow<S>,
        subject: &S,
        _transition: &str,
    ) -> TranslatableMessage {
        TranslatableMessage::new("flash_edit_success")
            .with_parameter("%name%", escape_html(&admin.to_display(subject)))
            .with_domain(ADMIN_DOMAIN)
    }

    fn transition_error_flash_message(
        &self,
        admin: &dyn Admin<S>,
        _workflow: &dyn Workflow<S>,
        subject: &S,
        _transition: &str,
    ) -> TranslatableMessage {
        let edit_url = admin.generate_object_url("edit", subject, &BTreeMap::new());
        TranslatableMessage::new("flash_lock_error")
            .with_parameter("%name%", escape_html(&admin.to_display(subject)))
            .with_parameter("%link_start%", format!("<a href=\"{edit_url}\">"))
            .with_parameter("%link_end%", "</a>")
            .with_domain(ADMIN_DOMAIN)
    }
}
