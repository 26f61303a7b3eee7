//! `tcf step` command - Edit the steps of a test case
//!
//! Step numbers are 1-based on the command line. Each invocation opens a
//! draft of the case, applies one change and commits it.

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{find_case, open_store, to_index};
use crate::cli::GlobalOpts;
use crate::core::{CaseDraft, Config};
use crate::entities::{ExpectedStatus, Step};

#[derive(Subcommand, Debug)]
pub enum StepCommands {
    /// Append a step to a test case
    Add(AddArgs),

    /// Change fields of an existing step
    Set(SetArgs),

    /// Remove a step (references to later steps are renumbered)
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Test case ID (TC-1 or 1)
    pub case: String,

    /// Action to perform
    #[arg(long, short = 'a')]
    pub action: String,

    /// Expected status (success/failure/exception)
    #[arg(long, short = 's', default_value = "success")]
    pub status: ExpectedStatus,

    /// Expected value
    #[arg(long, short = 'e', default_value = "")]
    pub expected: String,

    /// Step number this step depends on
    #[arg(long, value_name = "STEP")]
    pub depends_on: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Test case ID (TC-1 or 1)
    pub case: String,

    /// Step number
    pub step: usize,

    /// New action
    #[arg(long, short = 'a')]
    pub action: Option<String>,

    /// New expected status
    #[arg(long, short = 's')]
    pub status: Option<ExpectedStatus>,

    /// New expected value
    #[arg(long, short = 'e')]
    pub expected: Option<String>,

    /// Step number this step depends on
    #[arg(long, value_name = "STEP", conflicts_with = "no_depends")]
    pub depends_on: Option<usize>,

    /// Remove the dependency
    #[arg(long)]
    pub no_depends: bool,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Test case ID (TC-1 or 1)
    pub case: String,

    /// Step number
    pub step: usize,
}

pub fn run(cmd: StepCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut store = open_store(global, &config);

    let (case_id, message) = match cmd {
        StepCommands::Add(args) => {
            let mut draft = CaseDraft::from_case(find_case(&store, &args.case)?);
            let index = draft.add_step(Step::new(args.action, args.status, args.expected));
            if let Some(d) = args.depends_on {
                draft
                    .set_depends_on(index, Some(to_index(d, "Step")?))
                    .map_err(|e| miette::miette!("{}", e))?;
            }
            let case = draft.commit(&mut store).map_err(|e| miette::miette!("{}", e))?;
            (case.id, format!("Added step {}", index + 1))
        }
        StepCommands::Set(args) => {
            let mut draft = CaseDraft::from_case(find_case(&store, &args.case)?);
            let index = to_index(args.step, "Step")?;
            {
                let step = draft.step_mut(index).map_err(|e| miette::miette!("{}", e))?;
                if let Some(action) = args.action {
                    step.action = action;
                }
                if let Some(status) = args.status {
                    step.expected_status = status;
                }
                if let Some(expected) = args.expected {
                    step.expected_value = expected;
                }
            }
            if args.no_depends {
                draft
                    .set_depends_on(index, None)
                    .map_err(|e| miette::miette!("{}", e))?;
            } else if let Some(d) = args.depends_on {
                draft
                    .set_depends_on(index, Some(to_index(d, "Step")?))
                    .map_err(|e| miette::miette!("{}", e))?;
            }
            let case = draft.commit(&mut store).map_err(|e| miette::miette!("{}", e))?;
            (case.id, format!("Updated step {}", args.step))
        }
        StepCommands::Rm(args) => {
            let mut draft = CaseDraft::from_case(find_case(&store, &args.case)?);
            let removed = draft
                .remove_step(to_index(args.step, "Step")?)
                .map_err(|e| miette::miette!("{}", e))?;
            let case = draft.commit(&mut store).map_err(|e| miette::miette!("{}", e))?;
            (
                case.id,
                format!("Removed step {} ({})", args.step, removed.action),
            )
        }
    };

    println!(
        "{} {} in {}",
        style("✓").green(),
        message,
        style(case_id).cyan()
    );
    Ok(())
}
