//! Serialized rsync backup runner with ACL lockdown.
//!
//! Mirrors the paths named in `<base>/filelist` into `<base>/backupdata`,
//! snapshots the destination's ACLs to `acls.bak` and restricts them to a
//! read-only account. A lock marker in the base directory keeps concurrent
//! runs from interleaving.

use std::path::PathBuf;

use anyhow::{Error, Result};
use clap::{Parser, Subcommand};

use mirrorlock::exit_codes;
use mirrorlock::io::filelist::load_selected;
use mirrorlock::io::layout::{BackupLayout, DEFAULT_ACCOUNT, DEFAULT_BASE};
use mirrorlock::io::lock::{LockHeldError, remove_stale_marker};
use mirrorlock::io::tools::SystemToolRunner;
use mirrorlock::logging;
use mirrorlock::run::{RunOutcome, run_backup};
use mirrorlock::status::gather_status;

#[derive(Parser)]
#[command(
    name = "mirrorlock",
    version,
    about = "Serialized rsync backup runner with ACL lockdown"
)]
struct Cli {
    /// Base directory holding the path list, destination and lock marker.
    #[arg(long, global = true, default_value = DEFAULT_BASE)]
    base: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mirror the listed paths, then snapshot and restrict destination ACLs.
    Run {
        /// Account granted read-only access to the destination.
        #[arg(long, default_value = DEFAULT_ACCOUNT)]
        account: String,
    },
    /// Print the paths a run would mirror, one per line.
    List,
    /// Report the base layout, lock state and external tool availability.
    Status {
        /// Account a run would grant read-only access to.
        #[arg(long, default_value = DEFAULT_ACCOUNT)]
        account: String,
    },
    /// Remove a stale lock marker left behind by an interrupted run.
    Unlock,
}

fn main() {
    logging::init();
    if let Err(err) = dispatch() {
        eprintln!("{:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

/// Map an error chain to the stable CLI exit code.
fn exit_code_for(err: &Error) -> i32 {
    if err.downcast_ref::<LockHeldError>().is_some() {
        return exit_codes::LOCKED;
    }
    exit_codes::FAILED
}

fn dispatch() -> Result<()> {
    let cli = Cli::parse();
    let layout = BackupLayout::new(cli.base);
    match cli.command {
        Command::Run { account } => cmd_run(&layout, &account),
        Command::List => cmd_list(&layout),
        Command::Status { account } => cmd_status(&layout, &account),
        Command::Unlock => cmd_unlock(&layout),
    }
}

fn cmd_run(layout: &BackupLayout, account: &str) -> Result<()> {
    match run_backup(layout, account, &SystemToolRunner)? {
        RunOutcome::NothingToDo => println!("nothing to back up"),
        RunOutcome::Completed { mirrored } => println!("backed up {mirrored} paths"),
    }
    Ok(())
}

fn cmd_list(layout: &BackupLayout) -> Result<()> {
    for path in load_selected(layout)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_status(layout: &BackupLayout, account: &str) -> Result<()> {
    print!("{}", gather_status(layout, account).render());
    Ok(())
}

fn cmd_unlock(layout: &BackupLayout) -> Result<()> {
    if remove_stale_marker(&layout.lock_path)? {
        println!("removed lock marker {}", layout.lock_path.display());
    } else {
        println!("no lock marker present");
    }
    Ok(())
}
