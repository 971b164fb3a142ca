//! Dataset commands - create, add, mark, delete, list

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use super::prompt;
use worker_ledger::service::{KeyProvider, Outcome, Session, WorkerService};

/// Report a blocked operation; returns the value when the gate passed
pub fn unwrap_gated<T>(session: &Session, outcome: Outcome<T>) -> Option<T> {
    match outcome {
        Outcome::Done(value) => Some(value),
        Outcome::NotActivated => {
            println!("{}", session.title().bold());
            println!(
                "{} a license key is required for this operation.",
                "Not activated:".yellow()
            );
            None
        }
    }
}

pub fn create<P: KeyProvider>(
    service: &mut WorkerService<P>,
    session: &mut Session,
    dataset: &str,
) -> Result<()> {
    let outcome = service.create_dataset(session, dataset)?;
    if unwrap_gated(session, outcome).is_some() {
        println!("{} worker file '{}' created.", "Success:".green(), dataset);
    }
    Ok(())
}

pub fn add<P: KeyProvider>(
    service: &mut WorkerService<P>,
    session: &mut Session,
    dataset: &str,
    name: &str,
    salary: &str,
) -> Result<()> {
    let outcome = service.append_worker(session, dataset, name, salary)?;
    if unwrap_gated(session, outcome).is_some() {
        println!("{} worker {} added to '{}'.", "Success:".green(), name, dataset);
    }
    Ok(())
}

pub fn mark<P: KeyProvider>(
    service: &mut WorkerService<P>,
    session: &mut Session,
    dataset: &str,
    name: &str,
) -> Result<()> {
    let outcome = service.mark_attendance(session, dataset, name)?;
    match unwrap_gated(session, outcome) {
        Some(0) => println!(
            "{} no worker named {} in '{}'.",
            "Warning:".yellow(),
            name,
            dataset
        ),
        Some(count) => println!(
            "{} attendance marked for {} ({} row(s)).",
            "Success:".green(),
            name,
            count
        ),
        None => {}
    }
    Ok(())
}

pub fn delete<P: KeyProvider>(
    service: &mut WorkerService<P>,
    session: &mut Session,
    dataset: &str,
    yes: bool,
) -> Result<()> {
    // Gate before asking for confirmation so a blocked user is not asked twice
    if !service.gate(session)? {
        unwrap_gated::<()>(session, Outcome::NotActivated);
        return Ok(());
    }

    if !yes && !prompt::confirm(&format!("Delete worker file '{}'?", dataset))? {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = service.delete_dataset(session, dataset)?;
    if unwrap_gated(session, outcome).is_some() {
        println!("{} worker file '{}' deleted.", "Deleted:".green(), dataset);
    }
    Ok(())
}

pub fn list<P: KeyProvider>(service: &WorkerService<P>) -> Result<String> {
    let names = service.list_datasets()?;
    if names.is_empty() {
        return Ok("No worker files found.".to_string());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Worker file")]);
    for name in &names {
        table.add_row(vec![Cell::new(name)]);
    }

    Ok(format!("{}\n\nTotal: {} file(s)", table, names.len()))
}
