//! License commands - init, status, activate, issue

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use worker_ledger::service::{title, KeyProvider, Session, WorkerService};

/// Generate the key pool if this is the first run
pub fn init<P: KeyProvider>(service: &WorkerService<P>) -> Result<()> {
    let pool_file = service.licenses().pool_file().display().to_string();
    if service.ensure_license_pool()? {
        println!("{} {}", "Generated license pool:".green(), pool_file);
    } else {
        println!("License pool already exists: {}", pool_file);
    }
    Ok(())
}

/// Show whether this installation is activated
pub fn status<P: KeyProvider>(service: &WorkerService<P>) -> Result<()> {
    let activated = service
        .is_activated()
        .context("Failed to check license activation")?;

    println!("{}", title(activated).bold());
    if activated {
        println!("License: {}", "activated".green());
    } else {
        println!("License: {}", "not activated".yellow());
        println!("Run `worker-ledger activate <KEY>` to enter a license key.");
    }
    Ok(())
}

/// Validate a key and persist it as this installation's license
pub fn activate<P: KeyProvider>(
    service: &WorkerService<P>,
    session: &mut Session,
    key: &str,
) -> Result<()> {
    if service.prompt_and_activate(session, key.trim())? {
        println!("{}", "The license key is valid!".green());
        println!("{}", session.title().bold());
        Ok(())
    } else {
        anyhow::bail!("The entered license key is invalid.")
    }
}

/// Print keys from the pool
pub fn issue<P: KeyProvider>(service: &WorkerService<P>, count: usize) -> Result<()> {
    let keys = service
        .licenses()
        .issue(count)
        .context("Failed to read license pool")?;
    for key in keys {
        println!("{}", key);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};
    use worker_ledger::config::Paths;
    use worker_ledger::license::LicenseStore;

    fn service(dir: &TempDir) -> WorkerService<impl FnMut() -> Option<String>> {
        let paths = Paths::under(dir.path());
        let licenses = LicenseStore::new(&paths).with_pool_size(10);
        let service =
            WorkerService::new(paths, || -> Option<String> { None }).with_licenses(licenses);
        service.ensure_license_pool().unwrap();
        service
    }

    #[test]
    fn test_activate_rejects_unknown_key() {
        let dir = tempdir().unwrap();
        let service = service(&dir);
        let mut session = Session::new();

        let err = activate(&service, &mut session, "AAAAA-AAAAA-AAAAA-AAAA").unwrap_err();
        assert!(err.to_string().contains("invalid"));
        assert!(!session.is_activated());
        assert!(!service.is_activated().unwrap());
    }

    #[test]
    fn test_activate_trims_key() {
        let dir = tempdir().unwrap();
        let service = service(&dir);
        let key = service.licenses().issue(1).unwrap().remove(0);
        let mut session = Session::new();

        activate(&service, &mut session, &format!("  {}\n", key)).unwrap();
        assert!(session.is_activated());
        assert!(service.is_activated().unwrap());
    }

    #[test]
    fn test_issue_and_status() {
        let dir = tempdir().unwrap();
        let service = service(&dir);
        assert!(issue(&service, 3).is_ok());
        assert!(status(&service).is_ok());
        assert!(init(&service).is_ok());
    }
}
