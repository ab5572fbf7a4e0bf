//! Voltsig Component Tester CLI
//!
//! Command-line interface for recording healthy pin voltage signatures and
//! testing suspect components against them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use voltsig::config;
use voltsig::tester::{TestReport, TesterWorkflow, Verdict};
use voltsig::utils::parsing::{ALLOWED_PIN_COUNTS, parse_voltages};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Pin Voltage Signature Tester
#[derive(Parser, Debug)]
#[command(name = "voltsig-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backing database file (defaults to the configured database)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save measured voltages as the healthy reference for a component
    Save {
        /// Component name
        name: String,

        /// One voltage per pin, in pin order (2, 3, 4, 6 or 8 values)
        #[arg(required = true)]
        voltages: Vec<String>,

        /// Password for overwriting an existing profile (prompted if needed)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Test measured voltages against the stored reference
    Test {
        /// Component name
        name: String,

        /// One voltage per pin, in pin order
        #[arg(required = true)]
        voltages: Vec<String>,
    },

    /// Delete a stored profile
    Delete {
        /// Component name
        name: String,

        /// Password (prompted if not given)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List stored component names matching a prefix
    Search {
        /// Case-sensitive name prefix
        prefix: String,
    },

    /// Show the stored pin set for a component
    Show {
        /// Component name
        name: String,
    },

    /// Switch the default backing database to another file
    Use {
        /// Database file path (created if absent)
        path: PathBuf,
    },

    /// Interactive bench session: test results accumulate and can be exported
    Session,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Save {
            name,
            voltages,
            password,
        } => cmd_save(args.database.as_deref(), &name, &voltages, password),
        Command::Test { name, voltages } => cmd_test(args.database.as_deref(), &name, &voltages),
        Command::Delete { name, password } => {
            cmd_delete(args.database.as_deref(), &name, password)
        }
        Command::Search { prefix } => cmd_search(args.database.as_deref(), &prefix),
        Command::Show { name } => cmd_show(args.database.as_deref(), &name),
        Command::Use { path } => cmd_use(&path),
        Command::Session => cmd_session(args.database.as_deref()),
    }
}

/// Open a workflow against the explicit database, or the configured default.
fn open_workflow(database: Option<&Path>) -> Result<TesterWorkflow> {
    let config = config::load_config().context("Failed to load configuration")?;
    match database {
        Some(path) => TesterWorkflow::open(config, path),
        None => TesterWorkflow::new(config),
    }
    .context("Failed to open profile database")
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_save(
    database: Option<&Path>,
    name: &str,
    entries: &[String],
    password: Option<String>,
) -> Result<()> {
    let mut workflow = open_workflow(database)?;
    do_save(&mut workflow, name, entries, password)
}

fn cmd_test(database: Option<&Path>, name: &str, entries: &[String]) -> Result<()> {
    let mut workflow = open_workflow(database)?;
    do_test(&mut workflow, name, entries)
}

fn cmd_delete(database: Option<&Path>, name: &str, password: Option<String>) -> Result<()> {
    let mut workflow = open_workflow(database)?;
    do_delete(&mut workflow, name, password)
}

fn cmd_search(database: Option<&Path>, prefix: &str) -> Result<()> {
    let workflow = open_workflow(database)?;
    do_search(&workflow, prefix)
}

fn cmd_show(database: Option<&Path>, name: &str) -> Result<()> {
    let workflow = open_workflow(database)?;
    do_show(&workflow, name)
}

fn cmd_use(path: &Path) -> Result<()> {
    let mut config = config::load_config().context("Failed to load configuration")?;

    // Opening creates the file and the profile table if needed, and fails
    // early on an unusable path before anything is persisted.
    TesterWorkflow::open(config.clone(), path).context("Failed to open database")?;

    config.active_database = Some(path.to_path_buf());
    config::save_config(&config).context("Failed to save configuration")?;

    println!("✅ Connected to database: {}", path.display());
    Ok(())
}

// =============================================================================
// Shared Action Bodies (one-shot commands and session dispatch)
// =============================================================================

fn do_save(
    workflow: &mut TesterWorkflow,
    name: &str,
    entries: &[String],
    password: Option<String>,
) -> Result<()> {
    let voltages = parse_voltages(entries)?;

    let password = if password.is_none() && workflow.profile_exists(name)? {
        Some(prompt_password("overwrite")?)
    } else {
        password
    };

    let replaced = workflow.save_profile(name, &voltages, password.as_deref())?;
    if replaced {
        println!("✅ Component '{}' overwritten with new healthy reference.", name.trim());
    } else {
        println!("✅ Component '{}' saved as healthy.", name.trim());
    }
    Ok(())
}

fn do_test(workflow: &mut TesterWorkflow, name: &str, entries: &[String]) -> Result<()> {
    let voltages = parse_voltages(entries)?;
    let report = workflow.test_profile(name, &voltages)?;
    print_report(&report);
    Ok(())
}

fn do_delete(
    workflow: &mut TesterWorkflow,
    name: &str,
    password: Option<String>,
) -> Result<()> {
    // Not-found is reported before any password prompt; only the denial
    // message itself stays state-blind.
    if !workflow.profile_exists(name)? {
        workflow.delete_profile(name, password.as_deref())?;
        return Ok(());
    }

    let password = match password {
        Some(p) => p,
        None => prompt_password("delete")?,
    };

    workflow.delete_profile(name, Some(&password))?;
    println!("🗑️  Component '{}' deleted from database.", name.trim());
    Ok(())
}

fn do_search(workflow: &TesterWorkflow, prefix: &str) -> Result<()> {
    let names = workflow.suggest(prefix)?;
    if names.is_empty() {
        println!("No components matching '{}'.", prefix);
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn do_show(workflow: &TesterWorkflow, name: &str) -> Result<()> {
    let profile = workflow.load_profile(name)?;
    println!("📋 {} ({} pins):", profile.name, profile.pin_count());
    for reading in &profile.pins {
        println!("   Pin {}: {} V", reading.pin, reading.voltage);
    }
    Ok(())
}

fn print_report(report: &TestReport) {
    for comparison in &report.comparisons {
        println!(
            "   Pin {}: {} V (expected {} V) [{}]",
            comparison.pin,
            comparison.entered,
            comparison.expected,
            comparison.status()
        );
    }

    println!("Match: {:.0}%", report.match_percentage());
    match report.verdict() {
        Verdict::Healthy => println!("✅ Component is healthy"),
        Verdict::PossiblyFaulty => {
            println!("❌ Component is possibly faulty");
            for pin in report.mismatches() {
                println!(
                    "   - Pin {}: expected {} V, got {} V",
                    pin.pin, pin.expected, pin.entered
                );
            }
        }
    }
}

fn prompt_password(action: &str) -> Result<String> {
    print!("🔒 Password to {}: ", action);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// =============================================================================
// Interactive Session
// =============================================================================

fn cmd_session(database: Option<&Path>) -> Result<()> {
    let mut workflow = open_workflow(database)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl-C handler")?;
    }

    if let Some(path) = workflow.active_database() {
        println!("🔌 Connected to database: {}", path.display());
    }
    println!(
        "Pin counts: {:?}. Type 'help' for commands, 'quit' to leave.",
        ALLOWED_PIN_COUNTS
    );

    while running.load(Ordering::SeqCst) {
        print!("voltsig> ");
        io::stdout().flush()?;

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            // Ctrl-C interrupts the read; the flag decides whether to continue.
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match dispatch_session(&mut workflow, &tokens) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("❌ {}", e),
        }
    }

    if !workflow.results().is_empty() {
        println!(
            "⚠️  {} unexported result rows discarded.",
            workflow.results().len()
        );
    }
    println!("Bye.");
    Ok(())
}

/// Execute one session command. Returns `false` when the session should end.
fn dispatch_session(workflow: &mut TesterWorkflow, tokens: &[&str]) -> Result<bool> {
    let owned = |slice: &[&str]| -> Vec<String> {
        slice.iter().map(|s| s.to_string()).collect()
    };

    match tokens {
        ["save", name, entries @ ..] if !entries.is_empty() => {
            do_save(workflow, name, &owned(entries), None)?;
        }
        ["test", name, entries @ ..] if !entries.is_empty() => {
            do_test(workflow, name, &owned(entries))?;
        }
        ["delete", name] => {
            do_delete(workflow, name, None)?;
        }
        ["search", prefix] => {
            do_search(workflow, prefix)?;
        }
        ["show", name] => {
            do_show(workflow, name)?;
        }
        ["use", path] => {
            let path = workflow.switch_database(Path::new(path))?;
            println!("🔌 Connected to database: {}", path.display());
        }
        ["export", path] => {
            let written = workflow.export_results(Path::new(path))?;
            println!("✅ {} result rows saved to {}", written, path);
        }
        ["results"] => {
            if workflow.results().is_empty() {
                println!("(no recorded results)");
            }
            for row in workflow.results() {
                println!(
                    "{}, {}, {}, {}, {}",
                    row.name, row.pin, row.input, row.expected, row.status
                );
            }
        }
        ["status"] => {
            match workflow.active_database() {
                Some(path) => println!("Active database: {}", path.display()),
                None => println!("No active database."),
            }
            for path in workflow.known_databases() {
                println!("   known: {}", path.display());
            }
            println!("Pending result rows: {}", workflow.results().len());
        }
        ["help"] => print_session_help(),
        ["quit"] | ["exit"] => return Ok(false),
        _ => println!("⚠️  Unrecognized command. Type 'help' for usage."),
    }

    Ok(true)
}

fn print_session_help() {
    println!("Commands:");
    println!("   save <name> <v1> <v2> ...    save voltages as healthy reference");
    println!("   test <name> <v1> <v2> ...    compare voltages against reference");
    println!("   delete <name>                delete a profile (password required)");
    println!("   search <prefix>              list matching component names");
    println!("   show <name>                  print a stored pin set");
    println!("   use <path>                   switch active database file");
    println!("   export <path>                write recorded results, then clear them");
    println!("   results                      print recorded results");
    println!("   status                       show active database and pending rows");
    println!("   quit                         leave the session");
}
