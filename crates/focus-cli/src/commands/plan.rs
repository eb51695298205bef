//! One-shot day plan.

use chrono::{Local, NaiveDate};
use clap::Args;
use focus_core::render::{plan_heading, render_table};
use focus_core::{Config, Priority, Schedule, ScheduleBlock, Session, TaskRequest, ViewRange};
use serde::Serialize;

/// A task given on the command line as `NAME:MINUTES:PRIORITY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub minutes: u32,
    pub priority: Priority,
}

/// Split from the right so names may contain colons.
pub fn parse_task_spec(s: &str) -> Result<TaskSpec, String> {
    let mut parts = s.rsplitn(3, ':');
    let (Some(priority), Some(minutes), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected NAME:MINUTES:PRIORITY, got '{s}'"));
    };
    let minutes = minutes
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid minutes '{minutes}'"))?;
    let priority = priority.parse::<Priority>().map_err(|e| e.to_string())?;
    Ok(TaskSpec {
        name: name.to_string(),
        minutes,
        priority,
    })
}

#[derive(Args)]
pub struct PlanArgs {
    /// Task as NAME:MINUTES:PRIORITY (priority: must or want); repeatable
    #[arg(long = "task", short = 't', value_parser = parse_task_spec)]
    pub tasks: Vec<TaskSpec>,
    /// Display range: morning, afternoon or all (default from config)
    #[arg(long)]
    pub view: Option<ViewRange>,
    /// Date shown in the heading (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    date: NaiveDate,
    view: ViewRange,
    blocks: Vec<&'a ScheduleBlock>,
    unplaced: &'a [TaskRequest],
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let mut session = Session::new();
    for spec in &args.tasks {
        session.submit(&spec.name, spec.minutes, spec.priority)?;
    }

    let schedule = session.generate(&config.builder(), &config.routines);
    let view = args.view.unwrap_or(config.view.default);
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    print!("{}", format_plan(&schedule, view, date, args.json)?);
    Ok(())
}

pub fn format_plan(
    schedule: &Schedule,
    view: ViewRange,
    date: NaiveDate,
    json: bool,
) -> Result<String, serde_json::Error> {
    let blocks = view.filter(&schedule.blocks);

    if json {
        let output = PlanOutput {
            date,
            view,
            blocks,
            unplaced: &schedule.unplaced,
        };
        return Ok(format!("{}\n", serde_json::to_string_pretty(&output)?));
    }

    let mut out = format!("### {} ({view})\n", plan_heading(date));
    out.push_str(&render_table(blocks));
    if !schedule.unplaced.is_empty() {
        let names: Vec<_> = schedule.unplaced.iter().map(|t| t.name.as_str()).collect();
        out.push_str(&format!("Did not fit: {}\n", names.join(", ")));
    }
    Ok(out)
}
