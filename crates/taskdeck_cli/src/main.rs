//! Development command line for TaskDeck.
//!
//! Opens (and optionally seeds) a database, runs the session gate the
//! same way an embedding host would, then prints the dashboard summary.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use taskdeck_core::{
    dashboard_summary, default_log_level, flush_logs, init_logging, open_db, seed_demo_data,
    AccessGate, FixedTokenProvider, SeedOptions, Session,
};

const DEV_SESSION_TOKEN: &str = "taskdeck-dev";

const USAGE: &str = "taskdeck - personal task manager development console

USAGE:
    taskdeck [OPTIONS]

OPTIONS:
    --db <PATH>          SQLite database file (default: taskdeck.db)
    --seed <N>           Seed demo data with the given seed before the summary
    --token <TOKEN>      Session token to present at the gate
    --log-dir <PATH>     Enable file logging under this directory
    --log-level <LEVEL>  Log level when logging is enabled (default: info)
    -h, --help           Show this help
";

#[derive(Debug, Default)]
struct CliOptions {
    db_path: Option<PathBuf>,
    seed: Option<u64>,
    token: Option<String>,
    log_dir: Option<PathBuf>,
    log_level: Option<String>,
    show_help: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let options = parse_args(args)?;
    if options.show_help {
        print!("{USAGE}");
        return Ok(());
    }

    if let Some(log_dir) = &options.log_dir {
        let level = options
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    } else if options.log_level.is_some() {
        return Err("--log-level requires --log-dir".to_string());
    }

    let db_path = options
        .db_path
        .unwrap_or_else(|| PathBuf::from("taskdeck.db"));
    let mut conn = open_db(&db_path).map_err(|err| err.to_string())?;

    if let Some(seed) = options.seed {
        let report =
            seed_demo_data(&mut conn, &SeedOptions { seed }).map_err(|err| err.to_string())?;
        println!(
            "seeded: {} categories, {} priorities, {} tasks, {} subtasks, {} notes",
            report.categories_created,
            report.priorities_created,
            report.tasks_created,
            report.subtasks_created,
            report.notes_created
        );
    }

    let gate = AccessGate::new(Arc::new(FixedTokenProvider::new(DEV_SESSION_TOKEN)));
    let session = match &options.token {
        Some(token) => Session::with_token(token),
        None => Session::with_token(DEV_SESSION_TOKEN),
    };
    let session = gate
        .authorize(&session)
        .map_err(|redirect| redirect.to_string())?;

    let summary = dashboard_summary(&conn, &session).map_err(|err| err.to_string())?;
    println!("tasks: {}", summary.task_count);
    println!("subtasks: {}", summary.subtask_count);
    println!("notes: {}", summary.note_count);
    println!("categories: {}", summary.category_count);
    println!("priorities: {}", summary.priority_count);
    if !summary.recent_tasks.is_empty() {
        println!("recent tasks:");
        for task in &summary.recent_tasks {
            println!("  [{}] {}", task.status.display_name(), task.title);
        }
    }
    if !summary.recent_notes.is_empty() {
        println!("recent notes:");
        for note in &summary.recent_notes {
            println!("  - {}", note.preview.as_deref().unwrap_or("(no preview)"));
        }
    }

    flush_logs();
    Ok(())
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => options.db_path = Some(next_value(&mut iter, "--db")?.into()),
            "--seed" => {
                let raw = next_value(&mut iter, "--seed")?;
                options.seed = Some(
                    raw.parse()
                        .map_err(|_| format!("--seed expects an integer, got `{raw}`"))?,
                );
            }
            "--token" => options.token = Some(next_value(&mut iter, "--token")?.clone()),
            "--log-dir" => options.log_dir = Some(next_value(&mut iter, "--log-dir")?.into()),
            "--log-level" => {
                options.log_level = Some(next_value(&mut iter, "--log-level")?.clone());
            }
            "-h" | "--help" => options.show_help = true,
            other => return Err(format!("unknown argument `{other}` (see --help)")),
        }
    }
    Ok(options)
}

fn next_value<'a>(
    iter: &mut std::slice::Iter<'a, String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{flag} expects a value"))
}
