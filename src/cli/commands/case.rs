//! `tcf case` command - Test case management

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{find_case, open_store, parse_case_id, truncate_str};
use crate::cli::output::{effective_format, serialized};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{CaseDraft, Config};
use crate::entities::{ExpectedStatus, Step, TestCase};
use crate::export::UNKNOWN_STEP;

#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// Create a new test case
    New(NewArgs),

    /// List test cases
    List(ListArgs),

    /// Show a test case with its steps
    Show(ShowArgs),

    /// Change the title or precondition of a test case
    Edit(EditArgs),

    /// Delete a test case (no-op if it does not exist)
    Delete(DeleteArgs),

    /// Delete every test case
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Title (if not provided, uses placeholder)
    #[arg(long)]
    pub title: Option<String>,

    /// Precondition that must hold before the first step
    #[arg(long, short = 'p')]
    pub precondition: Option<String>,

    /// Read title, precondition and steps from a YAML file
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Use interactive wizard to fill in fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in title and precondition (case-insensitive substring)
    #[arg(long)]
    pub search: Option<String>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Test case ID (TC-1 or 1)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Test case ID (TC-1 or 1)
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New precondition
    #[arg(long, short = 'p')]
    pub precondition: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Test case ID (TC-1 or 1)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Case definition accepted by `case new --from`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CaseFile {
    title: Option<String>,
    precondition: Option<String>,
    steps: Vec<Step>,
}

pub fn run(cmd: CaseCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CaseCommands::New(args) => run_new(args, global),
        CaseCommands::List(args) => run_list(args, global),
        CaseCommands::Show(args) => run_show(args, global),
        CaseCommands::Edit(args) => run_edit(args, global),
        CaseCommands::Delete(args) => run_delete(args, global),
        CaseCommands::Clear(args) => run_clear(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut store = open_store(global, &config);

    let mut draft = if args.interactive {
        interactive_draft()?
    } else if let Some(path) = &args.from {
        let file: CaseFile = crate::yaml::parse_yaml_file(path)?;
        let steps = if file.steps.is_empty() {
            vec![Step::default()]
        } else {
            file.steps
        };
        CaseDraft::with_steps(
            file.title.unwrap_or_default(),
            file.precondition.unwrap_or_default(),
            steps,
        )
    } else {
        CaseDraft::new()
    };

    // Flags win over file contents
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(precondition) = args.precondition {
        draft.precondition = precondition;
    }
    if draft.title.is_empty() {
        draft.title = "New Test Case".to_string();
    }

    let case = draft
        .commit(&mut store)
        .map_err(|e| miette::miette!("{}", e))?;

    if global.format == OutputFormat::Id {
        println!("{}", case.id);
        return Ok(());
    }

    println!(
        "{} Created test case {} ({} step(s))",
        style("✓").green(),
        style(case.id).cyan(),
        case.step_count()
    );
    Ok(())
}

fn interactive_draft() -> Result<CaseDraft> {
    let theme = ColorfulTheme::default();

    let title: String = Input::with_theme(&theme)
        .with_prompt("Title")
        .interact_text()
        .into_diagnostic()?;

    let precondition: String = Input::with_theme(&theme)
        .with_prompt("Precondition (optional)")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let statuses: Vec<String> = ExpectedStatus::all()
        .iter()
        .map(|s| format!("{:<10} {}", s.as_str(), s.label()))
        .collect();

    let mut steps = Vec::new();
    loop {
        let action: String = Input::with_theme(&theme)
            .with_prompt(format!("Step {} action (empty to finish)", steps.len() + 1))
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        if action.is_empty() {
            break;
        }

        let selection = Select::with_theme(&theme)
            .with_prompt("Expected status")
            .items(&statuses)
            .default(0)
            .interact()
            .into_diagnostic()?;

        let expected: String = Input::with_theme(&theme)
            .with_prompt("Expected value (optional)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;

        steps.push(Step::new(action, ExpectedStatus::all()[selection], expected));
    }

    if steps.is_empty() {
        steps.push(Step::default());
    }
    Ok(CaseDraft::with_steps(title, precondition, steps))
}

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "STEPS")]
    steps: usize,
    #[tabled(rename = "BRANCHES")]
    branches: usize,
    #[tabled(rename = "PRECONDITION")]
    precondition: String,
}

impl CaseRow {
    fn from_case(case: &TestCase) -> Self {
        Self {
            id: case.id.to_string(),
            title: truncate_str(&case.title, 40),
            steps: case.step_count(),
            branches: case.steps.iter().map(|s| s.branches.len()).sum(),
            precondition: truncate_str(&case.precondition, 30),
        }
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config);

    let needle = args.search.as_ref().map(|s| s.to_lowercase());
    let cases: Vec<&TestCase> = store
        .cases()
        .iter()
        .filter(|c| match &needle {
            Some(n) => {
                c.title.to_lowercase().contains(n) || c.precondition.to_lowercase().contains(n)
            }
            None => true,
        })
        .collect();

    if args.count {
        println!("{}", cases.len());
        return Ok(());
    }

    let format = effective_format(global.format, true);
    if let Some(text) = serialized(&cases, format)? {
        print!("{}", text);
        return Ok(());
    }

    match format {
        OutputFormat::Id => {
            for case in &cases {
                println!("{}", case.id);
            }
        }
        OutputFormat::Tsv => {
            println!("ID\tTITLE\tSTEPS\tPRECONDITION");
            for case in &cases {
                println!(
                    "{}\t{}\t{}\t{}",
                    case.id,
                    case.title,
                    case.step_count(),
                    case.precondition
                );
            }
        }
        _ => {
            if cases.is_empty() {
                println!("No test cases found.");
                println!();
                println!("Create one with: {}", style("tcf case new").yellow());
                return Ok(());
            }

            let rows = cases.iter().map(|c| CaseRow::from_case(c));
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!();
            println!("{} test case(s) found", style(cases.len()).cyan());
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config);
    let case = find_case(&store, &args.id)?;

    let format = effective_format(global.format, false);
    if let Some(text) = serialized(case, format)? {
        print!("{}", text);
    } else if format == OutputFormat::Id {
        println!("{}", case.id);
    } else {
        print_case(case);
    }

    Ok(())
}

fn print_case(case: &TestCase) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(case.id).cyan());
    println!("{}: {}", style("Title").bold(), style(&case.title).yellow());
    if !case.precondition.is_empty() {
        println!("{}: {}", style("Precondition").bold(), case.precondition);
    }
    println!("{}", style("─".repeat(60)).dim());

    for (i, step) in case.steps.iter().enumerate() {
        let status = match step.expected_status {
            ExpectedStatus::Success => style(step.expected_status.label()).green(),
            ExpectedStatus::Failure => style(step.expected_status.label()).red(),
            ExpectedStatus::Exception => style(step.expected_status.label()).yellow(),
        };
        println!("{:>3}. {} [{}]", i + 1, step.action, status);
        if !step.expected_value.is_empty() {
            println!("     {} {}", style("expected:").dim(), step.expected_value);
        }
        if let Some(d) = step.depends_on {
            println!("     {} Step {}", style("after:").dim(), d.saturating_add(1));
        }
        for branch in &step.branches {
            let target = case
                .step(branch.next_step)
                .map(|s| s.action.as_str())
                .unwrap_or(UNKNOWN_STEP);
            println!(
                "     ↳ {} -> Step {} ({})",
                branch.condition,
                branch.next_step.saturating_add(1),
                target
            );
        }
    }
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut store = open_store(global, &config);
    let case = find_case(&store, &args.id)?;

    if args.title.is_none() && args.precondition.is_none() {
        return Err(miette::miette!(
            "Nothing to change. Use --title and/or --precondition"
        ));
    }

    let mut draft = CaseDraft::from_case(case);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(precondition) = args.precondition {
        draft.precondition = precondition;
    }
    let case = draft
        .commit(&mut store)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Updated test case {}",
        style("✓").green(),
        style(case.id).cyan()
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut store = open_store(global, &config);
    let id = parse_case_id(&args.id)?;

    let removed = store.delete(id).map_err(|e| miette::miette!("{}", e))?;
    if removed {
        println!("{} Deleted test case {}", style("✓").green(), style(id).cyan());
    } else {
        println!("{} No test case {}; nothing deleted", style("!").yellow(), id);
    }
    Ok(())
}

fn run_clear(args: ClearArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut store = open_store(global, &config);

    if store.is_empty() {
        println!("No test cases to clear.");
        return Ok(());
    }

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete all {} test case(s)?", store.len()))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let count = store.len();
    store.clear().map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Cleared {} test case(s)",
        style("✓").green(),
        style(count).cyan()
    );
    Ok(())
}
