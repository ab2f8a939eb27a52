use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tasklist_cli::cli::{Cli, Command};
use tasklist_core::config::{self, Config, Palette};
use tasklist_core::error::StoreError;
use tasklist_core::model::{Priority, Task};
use tasklist_core::sort::SortKey;
use tasklist_core::storage::json_store;
use tasklist_core::store::TaskStore;

fn print_task_line(task: &Task, palette: &Palette) {
    let marker = if task.completed { "x" } else { " " };
    let due = task.due_date.as_deref().unwrap_or("-");
    let mut line = format!(
        "[{marker}] {} | {} | {} | {}",
        task.id,
        task.title,
        task.priority.label(),
        due
    );
    if !task.description.is_empty() {
        line.push_str(" | ");
        line.push_str(&task.description);
    }

    if task.completed {
        println!("{}", palette.dim(&line));
    } else if task.priority == Priority::High {
        println!("{}", palette.highlight(&line));
    } else {
        println!("{line}");
    }
}

fn print_task_json(task: &Task) -> Result<(), StoreError> {
    let payload =
        serde_json::to_string(task).map_err(|err| StoreError::corrupt(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), StoreError> {
    let payload =
        serde_json::to_string(tasks).map_err(|err| StoreError::corrupt(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn warn_unsaved(err: &StoreError) {
    eprintln!("WARNING: change kept in memory but not written to disk ({err})");
}

fn report_added(json: bool, task: &Task) -> Result<(), StoreError> {
    if json {
        print_task_json(task)
    } else {
        println!("Added task: {} ({})", task.title, task.id);
        Ok(())
    }
}

fn report_removed(json: bool, id: &str, removed: Option<&Task>) -> Result<(), StoreError> {
    match removed {
        Some(task) if json => print_task_json(task),
        Some(task) => {
            println!("Deleted task: {} ({})", task.title, task.id);
            Ok(())
        }
        None if json => {
            println!("null");
            Ok(())
        }
        None => {
            println!("No task with id '{id}'");
            Ok(())
        }
    }
}

fn report_toggled(json: bool, id: &str, toggled: Option<&Task>) -> Result<(), StoreError> {
    match toggled {
        Some(task) if json => print_task_json(task),
        Some(task) => {
            let verb = if task.completed { "Completed" } else { "Reopened" };
            println!("{verb} task: {} ({})", task.title, task.id);
            Ok(())
        }
        None if json => {
            println!("null");
            Ok(())
        }
        None => {
            println!("No task with id '{id}'");
            Ok(())
        }
    }
}

fn run_command(
    cli: Cli,
    store: &mut TaskStore,
    config: &Config,
    palette: &Palette,
) -> Result<(), StoreError> {
    match cli.command {
        Command::Add {
            title,
            description,
            priority,
            due,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(StoreError::invalid_input("title is required")),
            };

            let task = Task::new(
                &title,
                description.as_deref().unwrap_or(""),
                priority.map(Priority::from).unwrap_or_default(),
                due.as_deref(),
            )?;

            let pending = task.clone();
            match store.add(task) {
                Ok(added) => report_added(cli.json, added)?,
                Err(err @ StoreError::Io(_)) => {
                    warn_unsaved(&err);
                    report_added(cli.json, &pending)?;
                }
                Err(err) => return Err(err),
            }
        }
        Command::Delete { id } => {
            let snapshot = store.get(&id).cloned();
            match store.remove(&id) {
                Ok(removed) => report_removed(cli.json, &id, removed.as_ref())?,
                Err(err @ StoreError::Io(_)) => {
                    warn_unsaved(&err);
                    report_removed(cli.json, &id, snapshot.as_ref())?;
                }
                Err(err) => return Err(err),
            }
        }
        Command::Toggle { id } => {
            let snapshot = store.get(&id).cloned();
            match store.toggle_complete(&id) {
                Ok(toggled) => report_toggled(cli.json, &id, toggled)?,
                Err(err @ StoreError::Io(_)) => {
                    warn_unsaved(&err);
                    let updated = snapshot.map(|mut task| {
                        task.completed = !task.completed;
                        task
                    });
                    report_toggled(cli.json, &id, updated.as_ref())?;
                }
                Err(err) => return Err(err),
            }
        }
        Command::List { sort } => {
            let key = sort
                .map(SortKey::from)
                .unwrap_or_else(|| config.default_sort_key());
            let view = store.sorted_view(key);
            if cli.json {
                print_tasks_json(&view)?;
            } else {
                for task in &view {
                    print_task_line(task, palette);
                }
            }
        }
    }

    Ok(())
}

// clap renders multi-line reports; keep only the summary line for the
// ERROR prefix format shared with store errors.
fn command_parse_error(err: &clap::Error) -> StoreError {
    let rendered = err.to_string();
    let summary = rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().trim_start_matches("error: ").to_string())
        .unwrap_or_else(|| "invalid command".to_string());
    StoreError::invalid_input(summary)
}

fn split_command_line(line: &str) -> Result<Vec<String>, StoreError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            _ if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(StoreError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

/// Session mode: one store held in memory, the sorted list re-printed after
/// every successful mutation.
fn run_interactive(
    mut store: TaskStore,
    config: &Config,
    palette: &Palette,
) -> Result<(), StoreError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| StoreError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", command_parse_error(&err));
                continue;
            }
        };

        let mutating = !matches!(cli.command, Command::List { .. });
        match run_command(cli, &mut store, config, palette) {
            Ok(()) => {
                if mutating {
                    for task in &store.sorted_view(config.default_sort_key()) {
                        print_task_line(task, palette);
                    }
                }
            }
            Err(err) => eprintln!("ERROR: {err}"),
        }
    }

    Ok(())
}

fn main() {
    let config_load = config::load_config_with_fallback();
    if let Some(err) = &config_load.error {
        eprintln!("WARNING: using default configuration ({err})");
    }
    let config = config_load.config;
    let palette = config::palette_for_theme(config.theme.as_deref());

    let store_path = match json_store::store_path() {
        Ok(path) => path,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };

    let loaded = TaskStore::load(&store_path);
    if let Some(err) = &loaded.error {
        eprintln!("WARNING: task store reset to empty ({err})");
    }
    let mut store = loaded.store;

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(store, &config, &palette) {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", command_parse_error(&err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &mut store, &config, &palette) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
