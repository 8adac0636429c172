//! MachineDesk terminal shell.
//!
//! # Responsibility
//! - Parse command-line actions and map them onto form actions.
//! - Own the store lifecycle for one process run: open, use, close.
//! - Print every outcome as a single message; exit non-zero on failure.

mod form;

use clap::{Parser, Subcommand};
use form::{ActionResponse, MachineForm};
use log::info;
use machinedesk_core::{
    default_log_level, default_store_path, init_logging, Machine, MachineId, MachineService,
    MachineStatus, MachineStore,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "machinedesk")]
#[command(version)]
#[command(about = "Track manufacturing machines in a local SQLite store", long_about = None)]
struct Args {
    /// Store file (defaults to data.db in the installation directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all machines, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one machine
    Show {
        id: MachineId,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a machine
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        line: String,
        #[arg(long, default_value = "operational")]
        status: String,
    },

    /// Update a machine; omitted fields keep their stored value
    Update {
        id: MachineId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        line: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a machine after confirmation
    Delete {
        id: MachineId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List valid status values
    Statuses,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| err.to_string())?;
    }

    if let Command::Statuses = args.command {
        for status in MachineStatus::ALL {
            println!("{status}");
        }
        return Ok(());
    }

    let db_path = match args.db {
        Some(path) => path,
        None => default_store_path().map_err(|err| format!("cannot resolve store path: {err}"))?,
    };
    let store = MachineStore::open(&db_path)
        .map_err(|err| format!("cannot open store `{}`: {err}", db_path.display()))?;
    let service = MachineService::new(store);

    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&args.command)
    );
    let result = dispatch(&service, args.command);
    service.close();
    result
}

fn dispatch(service: &MachineService, command: Command) -> Result<(), String> {
    let mut form = MachineForm::default();

    match command {
        Command::List { json } => {
            let machines = service.list_machines().map_err(|err| err.to_string())?;
            if json {
                print_json(&machines)
            } else {
                print_table(&machines);
                Ok(())
            }
        }
        Command::Show { id, json } => {
            let machine = service
                .get_machine(id)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| "Machine not found.".to_string())?;
            if json {
                print_json(&machine)
            } else {
                print_table(std::slice::from_ref(&machine));
                println!("created_at: {}", machine.created_at);
                Ok(())
            }
        }
        Command::Create { name, line, status } => {
            form.name = name;
            form.line = line;
            form.status = status;
            report(form.create(service))
        }
        Command::Update {
            id,
            name,
            line,
            status,
        } => {
            require_ok(form.select(service, id))?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(line) = line {
                form.line = line;
            }
            if let Some(status) = status {
                form.status = status;
            }
            report(form.update(service))
        }
        Command::Delete { id, yes } => {
            require_ok(form.select(service, id))?;
            report(form.delete(service, || yes || confirm_delete()))
        }
        Command::Statuses => Ok(()),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List { .. } => "list",
        Command::Show { .. } => "show",
        Command::Create { .. } => "create",
        Command::Update { .. } => "update",
        Command::Delete { .. } => "delete",
        Command::Statuses => "statuses",
    }
}

fn report(response: ActionResponse) -> Result<(), String> {
    let response = require_ok(response)?;
    println!("{}", response.message);
    Ok(())
}

fn require_ok(response: ActionResponse) -> Result<ActionResponse, String> {
    if response.ok {
        Ok(response)
    } else {
        Err(response.message)
    }
}

fn confirm_delete() -> bool {
    print!("Delete this machine? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_confirmation(&answer)
}

fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_table(machines: &[Machine]) {
    println!("{:<6} {:<28} {:<16} STATUS", "ID", "NAME", "LINE");
    for machine in machines {
        println!(
            "{:<6} {:<28} {:<16} {}",
            machine.id, machine.name, machine.line, machine.status
        );
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}
