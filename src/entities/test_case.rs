//! Test case entity type (steps, dependencies and branches)

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::CaseId;

/// Outcome a step is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedStatus {
    #[default]
    #[serde(alias = "成功")]
    Success,
    #[serde(alias = "失败")]
    Failure,
    #[serde(alias = "异常")]
    Exception,
}

impl ExpectedStatus {
    /// All statuses in display order
    pub fn all() -> &'static [ExpectedStatus] {
        &[
            ExpectedStatus::Success,
            ExpectedStatus::Failure,
            ExpectedStatus::Exception,
        ]
    }

    /// Stable machine key, also used as the style class in every export
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedStatus::Success => "success",
            ExpectedStatus::Failure => "failure",
            ExpectedStatus::Exception => "exception",
        }
    }

    /// Localized label shown in exported artifacts
    pub fn label(&self) -> &'static str {
        match self {
            ExpectedStatus::Success => "成功",
            ExpectedStatus::Failure => "失败",
            ExpectedStatus::Exception => "异常",
        }
    }
}

impl std::fmt::Display for ExpectedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ExpectedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" | "成功" => Ok(ExpectedStatus::Success),
            "failure" | "失败" => Ok(ExpectedStatus::Failure),
            "exception" | "异常" => Ok(ExpectedStatus::Exception),
            other => Err(format!(
                "Unknown expected status: '{}'. Use success/failure/exception",
                other
            )),
        }
    }
}

/// A conditional jump from one step to another step of the same case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Condition under which the jump is taken
    pub condition: String,

    /// 0-based index of the target step
    pub next_step: usize,
}

impl Branch {
    pub fn new(condition: impl Into<String>, next_step: usize) -> Self {
        Self {
            condition: condition.into(),
            next_step,
        }
    }
}

/// One action within a test case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Action to perform
    #[serde(default)]
    pub action: String,

    /// Expected outcome class
    #[serde(default)]
    pub expected_status: ExpectedStatus,

    /// Expected observable value
    #[serde(default)]
    pub expected_value: String,

    /// 0-based index of a prerequisite step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<usize>,

    /// Conditional jumps out of this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
}

impl Step {
    /// Create a step without dependency or branches
    pub fn new(
        action: impl Into<String>,
        expected_status: ExpectedStatus,
        expected_value: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            expected_status,
            expected_value: expected_value.into(),
            depends_on: None,
            branches: Vec::new(),
        }
    }

    pub fn with_depends_on(mut self, index: usize) -> Self {
        self.depends_on = Some(index);
        self
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty()
    }
}

/// A test case entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Sequential identifier (TC-<n>)
    pub id: CaseId,

    /// Short title
    pub title: String,

    /// State that must hold before the first step
    #[serde(default)]
    pub precondition: String,

    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Entity for TestCase {
    const PREFIX: &'static str = "TC";

    fn id(&self) -> &CaseId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl TestCase {
    pub fn new(
        id: CaseId,
        title: impl Into<String>,
        precondition: impl Into<String>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            precondition: precondition.into(),
            steps,
        }
    }

    /// Get the number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Look up a step by 0-based index
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Check if any step of this case branches
    pub fn has_branches(&self) -> bool {
        self.steps.iter().any(Step::has_branches)
    }

    /// Count `depends_on` and `next_step` references that do not index a step
    pub fn dangling_references(&self) -> usize {
        let len = self.steps.len();
        self.steps
            .iter()
            .map(|s| {
                let dep = usize::from(s.depends_on.is_some_and(|d| d >= len));
                dep + s.branches.iter().filter(|b| b.next_step >= len).count()
            })
            .sum()
    }
}
