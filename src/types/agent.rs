use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::GraphError;

/// Opaque model identifier, resolved by the external model-serving endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef(String);

impl ModelRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModelRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ModelRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Declarative role configuration. Immutable after construction; the
/// instruction string is the role's behavioral contract for the model,
/// treated as configuration data rather than logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub model: ModelRef,
    pub created_at: DateTime<Utc>,
}

impl AgentSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
        model: ModelRef,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
            model,
            created_at: Utc::now(),
        }
    }

    pub fn with_model(mut self, model: ModelRef) -> Self {
        self.model = model;
        self
    }
}

/// One root role plus the ordered advisor roles it may consult.
/// Depth-limited to two levels: advisors have no children of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationGraph {
    root: AgentSpec,
    advisors: Vec<AgentSpec>,
}

impl CoordinationGraph {
    /// Validates role names: advisors must be unique and the root may not
    /// consult itself.
    pub fn new(root: AgentSpec, advisors: Vec<AgentSpec>) -> Result<Self, GraphError> {
        if advisors.is_empty() {
            return Err(GraphError::NoAdvisors);
        }

        let mut seen = HashSet::new();
        for advisor in &advisors {
            if advisor.name == root.name {
                return Err(GraphError::SelfConsultation(root.name.clone()));
            }
            if !seen.insert(advisor.name.clone()) {
                return Err(GraphError::DuplicateRole(advisor.name.clone()));
            }
        }

        Ok(Self { root, advisors })
    }

    pub fn root(&self) -> &AgentSpec {
        &self.root
    }

    pub fn advisors(&self) -> &[AgentSpec] {
        &self.advisors
    }
}
