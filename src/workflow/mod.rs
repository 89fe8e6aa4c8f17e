//! The workflow engine seam.
//!
//! The admin integration only talks to [`Workflow`] and [`WorkflowRegistry`].
//! [`StateMachine`] and [`Registry`] are the in-process implementations used
//! by the demo admin and the tests.

mod definition;
mod registry;
mod state_machine;

pub use definition::{Definition, Transition};
pub use registry::{Registry, SupportStrategy, WorkflowRegistry};
pub use state_machine::{Guard, StateMachine};

use crate::error::WorkflowError;

/// A domain object whose state is governed by a workflow.
pub trait Subject: Send + Sync + 'static {
    /// The current place, `None` until the workflow initialized it.
    fn marking(&self) -> Option<&str>;

    fn set_marking(&mut self, marking: &str);
}

/// A workflow bound to subjects of type `S`.
pub trait Workflow<S>: Send + Sync {
    fn name(&self) -> &str;

    fn definition(&self) -> &Definition;

    /// Current marking of the subject, initializing it to the initial place
    /// when the subject has none yet.
    fn marking(&self, subject: &mut S) -> String;

    /// Transitions enabled for the subject, in definition order.
    fn enabled_transitions(&self, subject: &S) -> Vec<Transition>;

    fn can(&self, subject: &S, transition: &str) -> bool;

    /// Fires the transition, updating the subject's marking in place.
    fn apply(&self, subject: &mut S, transition: &str) -> Result<(), WorkflowError>;
}

/// Short type name used in lookup error messages.
pub(crate) fn subject_type_name<S>() -> &'static str {
    let full = std::any::type_name::<S>();
    full.rsplit("::").next().unwrap_or(full)
}
