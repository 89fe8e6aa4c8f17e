use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{Definition, Subject, Transition, Workflow};
use crate::error::WorkflowError;

/// Extra condition a transition must satisfy beyond its source place.
pub type Guard<S> = Arc<dyn Fn(&S, &Transition) -> bool + Send + Sync>;

/// Single-place workflow: a subject is in exactly one place at a time.
pub struct StateMachine<S> {
    name: String,
    definition: Definition,
    guards: HashMap<String, Guard<S>>,
}

impl<S> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("definition", &self.definition)
            .field("guards", &self.guards.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<S: Subject> StateMachine<S> {
    /// Wraps a definition whose transitions each have exactly one target place.
    pub fn new(name: impl Into<String>, definition: Definition) -> Result<Self, WorkflowError> {
        let name = name.into();
        for transition in definition.transitions() {
            if transition.froms.is_empty() {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "transition \"{}\" of state machine \"{name}\" has no source place",
                    transition.name
                )));
            }
            if transition.tos.len() != 1 {
                return Err(WorkflowError::InvalidDefinition(format!(
                    "transition \"{}\" of state machine \"{name}\" must have exactly one target place",
                    transition.name
                )));
            }
        }

        Ok(Self {
            name,
            definition,
            guards: HashMap::new(),
        })
    }

    /// Registers a guard for every transition named `transition`.
    pub fn with_guard<F>(mut self, transition: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&S, &Transition) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(transition.into(), Arc::new(guard));
        self
    }

    fn current_place<'a>(&'a self, subject: &'a S) -> &'a str {
        subject
            .marking()
            .unwrap_or_else(|| self.definition.initial_place())
    }

    fn is_enabled(&self, subject: &S, transition: &Transition) -> bool {
        let place = self.current_place(subject);
        if !transition.froms.iter().any(|from| from == place) {
            return false;
        }
        match self.guards.get(&transition.name) {
            Some(guard) => guard(subject, transition),
            None => true,
        }
    }
}

impl<S: Subject> Workflow<S> for StateMachine<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> &Definition {
        &self.definition
    }

    fn marking(&self, subject: &mut S) -> String {
        if let Some(marking) = subject.marking() {
            return marking.to_string();
        }
        let initial = self.definition.initial_place().to_string();
        subject.set_marking(&initial);
        initial
    }

    fn enabled_transitions(&self, subject: &S) -> Vec<Transition> {
        self.definition
            .transitions()
            .iter()
            .filter(|t| self.is_enabled(subject, t))
            .cloned()
            .collect()
    }

    fn can(&self, subject: &S, transition: &str) -> bool {
        self.definition
            .transitions()
            .iter()
            .filter(|t| t.name == transition)
            .any(|t| self.is_enabled(subject, t))
    }

    fn apply(&self, subject: &mut S, transition: &str) -> Result<(), WorkflowError> {
        if !self.definition.has_transition(transition) {
            return Err(WorkflowError::Undefined {
                transition: transition.to_string(),
                workflow: self.name.clone(),
            });
        }

        let enabled = self
            .definition
            .transitions()
            .iter()
            .find(|t| t.name == transition && self.is_enabled(subject, t))
            .ok_or_else(|| WorkflowError::NotEnabled {
                transition: transition.to_string(),
                workflow: self.name.clone(),
            })?;

        let from = self.current_place(subject).to_string();
        let to = enabled.tos[0].clone();
        subject.set_marking(&to);
        debug!(workflow = %self.name, transition, %from, %to, "transition applied");
        Ok(())
    }
}
