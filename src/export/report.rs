//! Report export - a self-contained HTML document
//!
//! Each case becomes a section with its precondition and an ordered step
//! list. Branches resolve their target within the same case and show the
//! target step's action, linking to it. A target that does not resolve is
//! shown as [`UNKNOWN_STEP`] and never aborts the export.

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::warn;

use crate::core::entity::Entity;
use crate::entities::{ExpectedStatus, TestCase};
use crate::export::ExportError;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Name of the embedded report template
const REPORT_TEMPLATE: &str = "report.html";

/// Placeholder for a branch target that is not a step of the case
pub const UNKNOWN_STEP: &str = "unknown step";

/// Document-level settings
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub generated: DateTime<Utc>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Test Case Report".to_string(),
            generated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBranch {
    pub condition: String,
    /// 1-based target step number as authored
    pub target_number: usize,
    /// Action of the target step, or the placeholder
    pub target_action: String,
    /// Anchor of the target step when it resolves
    pub target_anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportStep {
    pub number: usize,
    pub anchor: String,
    pub action: String,
    pub status_class: &'static str,
    pub status_label: &'static str,
    pub expected_value: String,
    /// 1-based number of the prerequisite step, when it resolves
    pub depends_on: Option<usize>,
    pub branches: Vec<ReportBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportCase {
    pub anchor: String,
    pub heading: String,
    pub precondition: String,
    pub steps: Vec<ReportStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub cases: usize,
    pub steps: usize,
    pub branches: usize,
    pub unresolved: usize,
    pub success: usize,
    pub failure: usize,
    pub exception: usize,
}

fn step_anchor(case: &TestCase, index: usize) -> String {
    format!("{}-step-{}", case.id, index + 1)
}

/// Resolve the sections of one case
pub fn report_case(case: &TestCase) -> ReportCase {
    let steps = case
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let branches = step
                .branches
                .iter()
                .map(|b| match case.step(b.next_step) {
                    Some(target) => ReportBranch {
                        condition: b.condition.clone(),
                        target_number: b.next_step.saturating_add(1),
                        target_action: target.action.clone(),
                        target_anchor: Some(step_anchor(case, b.next_step)),
                    },
                    None => {
                        warn!(
                            "{} step {}: branch '{}' targets missing step {}",
                            case.id,
                            i + 1,
                            b.condition,
                            b.next_step.saturating_add(1)
                        );
                        ReportBranch {
                            condition: b.condition.clone(),
                            target_number: b.next_step.saturating_add(1),
                            target_action: UNKNOWN_STEP.to_string(),
                            target_anchor: None,
                        }
                    }
                })
                .collect();

            ReportStep {
                number: i + 1,
                anchor: step_anchor(case, i),
                action: step.action.clone(),
                status_class: step.expected_status.as_str(),
                status_label: step.expected_status.label(),
                expected_value: step.expected_value.clone(),
                depends_on: step
                    .depends_on
                    .filter(|&d| d < case.steps.len())
                    .map(|d| d + 1),
                branches,
            }
        })
        .collect();

    ReportCase {
        anchor: case.id.to_string(),
        heading: case.label(),
        precondition: case.precondition.clone(),
        steps,
    }
}

/// Totals shown at the top of the report
pub fn summarize(cases: &[TestCase]) -> ReportSummary {
    let mut summary = ReportSummary {
        cases: cases.len(),
        ..Default::default()
    };
    for case in cases {
        summary.unresolved += case.dangling_references();
        for step in &case.steps {
            summary.steps += 1;
            summary.branches += step.branches.len();
            match step.expected_status {
                ExpectedStatus::Success => summary.success += 1,
                ExpectedStatus::Failure => summary.failure += 1,
                ExpectedStatus::Exception => summary.exception += 1,
            }
        }
    }
    summary
}

/// Report renderer backed by the embedded Tera template
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, ExportError> {
        let file = EmbeddedTemplates::get(REPORT_TEMPLATE)
            .ok_or_else(|| ExportError::MissingTemplate(REPORT_TEMPLATE.to_string()))?;
        let source = std::str::from_utf8(&file.data)
            .map_err(|_| ExportError::MissingTemplate(REPORT_TEMPLATE.to_string()))?;

        let mut tera = Tera::default();
        tera.add_raw_template(REPORT_TEMPLATE, source)?;
        Ok(Self { tera })
    }

    /// Render the full document
    pub fn render(
        &self,
        cases: &[TestCase],
        options: &ReportOptions,
    ) -> Result<String, ExportError> {
        let sections: Vec<ReportCase> = cases.iter().map(report_case).collect();

        let mut ctx = Context::new();
        ctx.insert("title", &options.title);
        ctx.insert(
            "generated",
            &options.generated.format("%Y-%m-%d %H:%M UTC").to_string(),
        );
        ctx.insert("summary", &summarize(cases));
        ctx.insert("cases", &sections);
        ctx.insert("unknown_step", UNKNOWN_STEP);

        Ok(self.tera.render(REPORT_TEMPLATE, &ctx)?)
    }
}

/// Export the report document as bytes
pub fn export_report(cases: &[TestCase], options: &ReportOptions) -> Result<Vec<u8>, ExportError> {
    Ok(ReportRenderer::new()?.render(cases, options)?.into_bytes())
}
