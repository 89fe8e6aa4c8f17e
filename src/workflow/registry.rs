use std::sync::Arc;

use super::{Subject, Workflow, subject_type_name};
use crate::error::WorkflowError;

/// Decides whether a registered workflow applies to a given subject.
pub type SupportStrategy<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Looks up the workflow governing a subject.
pub trait WorkflowRegistry<S>: Send + Sync {
    /// Returns the single workflow supporting `subject`, optionally narrowed by name.
    fn get(&self, subject: &S, name: Option<&str>) -> Result<Arc<dyn Workflow<S>>, WorkflowError>;

    fn has(&self, subject: &S, name: Option<&str>) -> bool {
        self.get(subject, name).is_ok()
    }
}

/// Registry of workflows filled at bootstrap and read-only afterwards.
pub struct Registry<S> {
    workflows: Vec<(Arc<dyn Workflow<S>>, SupportStrategy<S>)>,
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self { workflows: Vec::new() }
    }
}

impl<S: Subject> Registry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a workflow for the subjects accepted by `supports`.
    pub fn add_workflow<W, F>(&mut self, workflow: W, supports: F)
    where
        W: Workflow<S> + 'static,
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.workflows.push((Arc::new(workflow), Arc::new(supports)));
    }

    /// Registers a workflow for every subject of type `S`.
    pub fn add<W>(&mut self, workflow: W)
    where
        W: Workflow<S> + 'static,
    {
        self.add_workflow(workflow, |_| true);
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

impl<S: Subject> WorkflowRegistry<S> for Registry<S> {
    fn get(&self, subject: &S, name: Option<&str>) -> Result<Arc<dyn Workflow<S>>, WorkflowError> {
        let matching: Vec<&Arc<dyn Workflow<S>>> = self
            .workflows
            .iter()
            .filter(|(workflow, supports)| name.is_none_or(|n| workflow.name() == n) && supports(subject))
            .map(|(workflow, _)| workflow)
            .collect();

        match matching.as_slice() {
            [] => Err(WorkflowError::NotFound {
                subject: subject_type_name::<S>().to_string(),
            }),
            [workflow] => Ok(Arc::clone(workflow)),
            many => Err(WorkflowError::Ambiguous {
                names: many.iter().map(|w| w.name()).collect::<Vec<_>>().join(", "),
                subject: subject_type_name::<S>().to_string(),
            }),
        }
    }
}
