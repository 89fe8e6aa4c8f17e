use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// A named edge between source places and target places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub name: String,
    pub froms: Vec<String>,
    pub tos: Vec<String>,
}

impl Transition {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            froms: vec![from.into()],
            tos: vec![to.into()],
        }
    }

    pub fn with_places(name: impl Into<String>, froms: Vec<String>, tos: Vec<String>) -> Self {
        Self {
            name: name.into(),
            froms,
            tos,
        }
    }
}

/// Places, transitions and initial place of a workflow. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    places: Vec<String>,
    transitions: Vec<Transition>,
    initial_place: String,
}

impl Definition {
    /// Builds a definition, defaulting the initial place to the first place.
    ///
    /// Fails when a transition or the initial place references an unknown
    /// place, or when there is no place at all.
    pub fn new<I, P>(
        places: I,
        transitions: Vec<Transition>,
        initial_place: Option<&str>,
    ) -> Result<Self, WorkflowError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for place in places {
            let place = place.into();
            if !unique.contains(&place) {
                unique.push(place);
            }
        }

        let initial_place = match initial_place {
            Some(initial) => initial.to_string(),
            None => unique
                .first()
                .cloned()
                .ok_or_else(|| WorkflowError::InvalidDefinition("a definition needs at least one place".into()))?,
        };
        if !unique.contains(&initial_place) {
            return Err(WorkflowError::InvalidDefinition(format!(
                "initial place \"{initial_place}\" does not exist"
            )));
        }

        for transition in &transitions {
            if transition.name.trim().is_empty() {
                return Err(WorkflowError::InvalidDefinition("transition name must not be empty".into()));
            }
            for place in transition.froms.iter().chain(&transition.tos) {
                if !unique.contains(place) {
                    return Err(WorkflowError::InvalidDefinition(format!(
                        "place \"{place}\" referenced in transition \"{}\" does not exist",
                        transition.name
                    )));
                }
            }
        }

        Ok(Self {
            places: unique,
            transitions,
            initial_place,
        })
    }

    pub fn places(&self) -> &[String] {
        &self.places
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn initial_place(&self) -> &str {
        &self.initial_place
    }

    pub fn has_transition(&self, name: &str) -> bool {
        self.transitions.iter().any(|t| t.name == name)
    }
}
