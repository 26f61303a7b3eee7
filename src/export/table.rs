//! Tabular export - one row per test case
//!
//! The steps of a case are flattened into a single multi-line cell, so the
//! result opens directly in a spreadsheet. The flattening is lossy and is
//! not meant to be read back.

use crate::entities::{Step, TestCase};
use crate::export::ExportError;

/// Column headers, in output order
pub const HEADERS: [&str; 4] = ["id", "title", "precondition", "steps"];

/// Summary of a step's branches: `[cond -> Step n], [cond -> Step m]`
fn branch_summary(step: &Step) -> String {
    step.branches
        .iter()
        .map(|b| format!("[{} -> Step {}]", b.condition, b.next_step.saturating_add(1)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per step: `Step <n>: <action> | <status> | <value> <branches>`
pub fn steps_text(case: &TestCase) -> String {
    case.steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            format!(
                "Step {}: {} | {} | {} {}",
                i + 1,
                step.action,
                step.expected_status,
                step.expected_value,
                branch_summary(step)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The four cells of a case's row
pub fn row(case: &TestCase) -> [String; 4] {
    [
        case.id.to_string(),
        case.title.clone(),
        case.precondition.clone(),
        steps_text(case),
    ]
}

/// Export the collection as CSV bytes, header first
pub fn export_csv(cases: &[TestCase]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADERS)?;
    for case in cases {
        wtr.write_record(row(case))?;
    }
    wtr.into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::CaseId;
    use crate::entities::{Branch, ExpectedStatus};

    fn login() -> TestCase {
        TestCase::new(
            CaseId::new(1),
            "Login",
            "user exists",
            vec![
                Step::new("enter creds", ExpectedStatus::Success, ""),
                Step::new("submit", ExpectedStatus::Success, "redirect")
                    .with_depends_on(0)
                    .with_branch(Branch::new("invalid", 0)),
            ],
        )
    }

    #[test]
    fn test_steps_text_format() {
        assert_eq!(
            steps_text(&login()),
            "Step 1: enter creds | 成功 |  \n\
             Step 2: submit | 成功 | redirect [invalid -> Step 1]"
        );
    }

    #[test]
    fn test_branch_summary_is_comma_joined() {
        let step = Step::new("pay", ExpectedStatus::Failure, "declined")
            .with_branch(Branch::new("retry", 0))
            .with_branch(Branch::new("abort", 3));
        assert_eq!(branch_summary(&step), "[retry -> Step 1], [abort -> Step 4]");
    }

    #[test]
    fn test_branch_to_largest_index_does_not_overflow() {
        let step = Step::new("jump", ExpectedStatus::Success, "")
            .with_branch(Branch::new("far", usize::MAX));
        assert_eq!(
            branch_summary(&step),
            format!("[far -> Step {}]", usize::MAX)
        );

        let case = TestCase::new(CaseId::new(1), "Far", "", vec![step]);
        assert!(export_csv(&[case]).is_ok());
    }

    #[test]
    fn test_case_without_steps_has_empty_steps_cell() {
        let case = TestCase::new(CaseId::new(2), "Empty", "", Vec::new());
        assert_eq!(row(&case)[3], "");
    }

    #[test]
    fn test_empty_collection_is_header_only() {
        let bytes = export_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "id,title,precondition,steps\n");
    }

    #[test]
    fn test_one_row_per_case() {
        let mut second = login();
        second.id = CaseId::new(2);
        let bytes = export_csv(&[login(), second]).unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "TC-1");
        assert_eq!(&rows[1][0], "TC-2");
        assert_eq!(&rows[0][3], steps_text(&login()));
    }
}
