//! Outline export - a mind-map style topic tree
//!
//! Shape mirrors ownership: root -> case -> step -> branch. Branches appear
//! as leaf topics, never as edges between topics.

use serde::Serialize;

use crate::core::entity::Entity;
use crate::entities::TestCase;
use crate::export::ExportError;

/// Title of the root topic
pub const ROOT_TITLE: &str = "Test Cases";

/// One node of the topic tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Topic>,
}

impl Topic {
    fn new(title: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            note: note.into(),
            children: Vec::new(),
        }
    }

    /// Number of levels in this subtree, counting this topic
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Topic::depth).max().unwrap_or(0)
    }
}

fn case_topic(case: &TestCase) -> Topic {
    let mut topic = Topic::new(case.label(), case.precondition.clone());
    topic.children = case
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mut step_topic = Topic::new(
                format!("Step {}: {} [{}]", i + 1, step.action, step.expected_status),
                step.expected_value.clone(),
            );
            step_topic.children = step
                .branches
                .iter()
                .map(|b| {
                    let target = b.next_step.saturating_add(1);
                    Topic::new(format!("Branch: {} -> Step {}", b.condition, target), "")
                })
                .collect();
            step_topic
        })
        .collect();
    topic
}

/// Build the topic tree of a collection
pub fn build_outline(cases: &[TestCase]) -> Topic {
    let mut root = Topic::new(ROOT_TITLE, "");
    root.children = cases.iter().map(case_topic).collect();
    root
}

/// Export the outline document as pretty JSON bytes
pub fn export_outline(cases: &[TestCase]) -> Result<Vec<u8>, ExportError> {
    let mut bytes = serde_json::to_vec_pretty(&build_outline(cases))?;
    bytes.push(b'\n');
    Ok(bytes)
}
