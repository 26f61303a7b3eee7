//! Edit sessions on a detached copy of a test case
//!
//! A [`CaseDraft`] owns its own steps. Nothing reaches the store until
//! [`CaseDraft::commit`]; dropping or [`CaseDraft::discard`]ing a draft leaves
//! the collection untouched.

use thiserror::Error;

use crate::core::identity::CaseId;
use crate::core::store::{CasePatch, CaseStore, StoreError};
use crate::entities::{Branch, Step, TestCase};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Step {} does not exist (case has {len} step(s))", .index.saturating_add(1))]
    StepOutOfRange { index: usize, len: usize },

    #[error(
        "Step {} has no branch {} ({len} branch(es))",
        .step.saturating_add(1),
        .index.saturating_add(1)
    )]
    BranchOutOfRange {
        step: usize,
        index: usize,
        len: usize,
    },
}

/// Working copy of a test case during an edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDraft {
    origin: Option<CaseId>,
    pub title: String,
    pub precondition: String,
    steps: Vec<Step>,
}

impl Default for CaseDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseDraft {
    /// Draft for a new case, seeded with one empty step
    pub fn new() -> Self {
        Self {
            origin: None,
            title: String::new(),
            precondition: String::new(),
            steps: vec![Step::default()],
        }
    }

    /// Draft copied from a committed case
    pub fn from_case(case: &TestCase) -> Self {
        Self {
            origin: Some(case.id),
            title: case.title.clone(),
            precondition: case.precondition.clone(),
            steps: case.steps.clone(),
        }
    }

    /// Draft for a new case with explicit content
    pub fn with_steps(
        title: impl Into<String>,
        precondition: impl Into<String>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            origin: None,
            title: title.into(),
            precondition: precondition.into(),
            steps,
        }
    }

    /// Id of the case this draft edits, if any
    pub fn origin(&self) -> Option<CaseId> {
        self.origin
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn check_step(&self, index: usize) -> Result<(), DraftError> {
        if index < self.steps.len() {
            Ok(())
        } else {
            Err(DraftError::StepOutOfRange {
                index,
                len: self.steps.len(),
            })
        }
    }

    pub fn step_mut(&mut self, index: usize) -> Result<&mut Step, DraftError> {
        self.check_step(index)?;
        Ok(&mut self.steps[index])
    }

    /// Append a step and return its index
    pub fn add_step(&mut self, step: Step) -> usize {
        self.steps.push(step);
        self.steps.len() - 1
    }

    /// Remove a step and repair the references of the remaining steps
    ///
    /// References to later steps shift down by one. Dependencies on the
    /// removed step are cleared and branches into it are dropped.
    pub fn remove_step(&mut self, index: usize) -> Result<Step, DraftError> {
        self.check_step(index)?;
        let removed = self.steps.remove(index);

        for step in &mut self.steps {
            step.depends_on = match step.depends_on {
                Some(d) if d == index => None,
                Some(d) if d > index => Some(d - 1),
                other => other,
            };
            step.branches.retain(|b| b.next_step != index);
            for branch in &mut step.branches {
                if branch.next_step > index {
                    branch.next_step -= 1;
                }
            }
        }

        Ok(removed)
    }

    /// Set or clear the prerequisite of a step
    pub fn set_depends_on(
        &mut self,
        step: usize,
        depends_on: Option<usize>,
    ) -> Result<(), DraftError> {
        if let Some(d) = depends_on {
            self.check_step(d)?;
        }
        self.step_mut(step)?.depends_on = depends_on;
        Ok(())
    }

    /// Append a branch to a step; the target must exist
    pub fn add_branch(&mut self, step: usize, branch: Branch) -> Result<usize, DraftError> {
        self.check_step(branch.next_step)?;
        let branches = &mut self.step_mut(step)?.branches;
        branches.push(branch);
        Ok(branches.len() - 1)
    }

    pub fn remove_branch(&mut self, step: usize, index: usize) -> Result<Branch, DraftError> {
        let branches = &mut self.step_mut(step)?.branches;
        if index >= branches.len() {
            return Err(DraftError::BranchOutOfRange {
                step,
                index,
                len: branches.len(),
            });
        }
        Ok(branches.remove(index))
    }

    /// Write the draft back: update its origin case, or create a new one
    pub fn commit(self, store: &mut CaseStore) -> Result<TestCase, StoreError> {
        match self.origin {
            Some(id) => store.update(
                id,
                CasePatch {
                    title: self.title,
                    precondition: self.precondition,
                    steps: self.steps,
                },
            ),
            None => store.create(self.title, self.precondition, self.steps),
        }
    }

    /// Abandon the edit session
    pub fn discard(self) {}
}
