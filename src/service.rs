//! License-gated worker operations
//!
//! Every dataset operation passes through [`WorkerService::gate`] first. The
//! gate reads the persisted activation and, when there is none, asks the
//! caller-supplied [`KeyProvider`] for a key. Session state that a UI would
//! otherwise keep in globals lives in an explicit [`Session`].

use tracing::{debug, info, warn};

use crate::config::Paths;
use crate::error::{Result, WorkerError};
use crate::license::LicenseStore;
use crate::records::RecordFile;

const APP_TITLE: &str = "Worker Management App";

/// Source of a license key when none is activated yet
///
/// Returning `None` means the user declined to enter one.
pub trait KeyProvider {
    fn request(&mut self) -> Option<String>;
}

impl<F> KeyProvider for F
where
    F: FnMut() -> Option<String>,
{
    fn request(&mut self) -> Option<String> {
        self()
    }
}

/// Where the gate ended up during this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    NoAttempt,
    Activated,
    PromptDeclined,
    PromptInvalid,
}

/// Per-session state, passed explicitly to every operation
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: GateState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_activated(&self) -> bool {
        self.state == GateState::Activated
    }

    /// Window title for the current state
    pub fn title(&self) -> String {
        title(self.is_activated())
    }
}

/// Window title: plain when activated, marked as a demo otherwise
pub fn title(activated: bool) -> String {
    if activated {
        APP_TITLE.to_string()
    } else {
        format!("{} (Demo)", APP_TITLE)
    }
}

/// Result of a gated operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The gate passed and the operation ran
    Done(T),
    /// No key was supplied; nothing was done
    NotActivated,
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::NotActivated => None,
        }
    }
}

/// Caller-facing core operations
pub struct WorkerService<P> {
    paths: Paths,
    licenses: LicenseStore,
    provider: P,
}

impl<P: KeyProvider> WorkerService<P> {
    pub fn new(paths: Paths, provider: P) -> Self {
        let licenses = LicenseStore::new(&paths);
        Self {
            paths,
            licenses,
            provider,
        }
    }

    /// Use a custom license store, e.g. one with a smaller pool
    pub fn with_licenses(mut self, licenses: LicenseStore) -> Self {
        self.licenses = licenses;
        self
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn licenses(&self) -> &LicenseStore {
        &self.licenses
    }

    /// Startup step: make sure the key pool exists
    pub fn ensure_license_pool(&self) -> Result<bool> {
        self.licenses.ensure_pool()
    }

    /// Whether a valid activation is persisted
    pub fn is_activated(&self) -> Result<bool> {
        self.licenses.currently_activated()
    }

    /// Validate `candidate` and persist it as the activation
    ///
    /// Returns `false` and leaves the activation untouched when the key is
    /// not in the pool.
    pub fn prompt_and_activate(&self, session: &mut Session, candidate: &str) -> Result<bool> {
        if !self.licenses.is_valid(candidate)? {
            warn!("rejected license key");
            return Ok(false);
        }
        self.licenses.activate(candidate)?;
        session.state = GateState::Activated;
        Ok(true)
    }

    /// Check-before-mutate step shared by every dataset operation
    ///
    /// `Ok(true)` lets the operation proceed, `Ok(false)` means the user
    /// declined to enter a key. A rejected key or a persisted activation that
    /// no longer validates is an error.
    pub fn gate(&mut self, session: &mut Session) -> Result<bool> {
        if session.is_activated() {
            return Ok(true);
        }

        match self.licenses.load_activation()? {
            Some(key) => {
                if self.licenses.is_valid(&key)? {
                    debug!("persisted license accepted");
                    session.state = GateState::Activated;
                    Ok(true)
                } else {
                    warn!("persisted license is not in the pool");
                    Err(WorkerError::NotActivated)
                }
            }
            None => match self.provider.request() {
                Some(key) => {
                    if self.licenses.is_valid(&key)? {
                        self.licenses.activate(&key)?;
                        session.state = GateState::Activated;
                        Ok(true)
                    } else {
                        warn!("rejected license key");
                        session.state = GateState::PromptInvalid;
                        Err(WorkerError::InvalidLicense)
                    }
                }
                None => {
                    info!("license prompt declined");
                    session.state = GateState::PromptDeclined;
                    Ok(false)
                }
            },
        }
    }

    pub fn create_dataset(&mut self, session: &mut Session, name: &str) -> Result<Outcome<()>> {
        self.gated(session, name, |file| file.create())
    }

    pub fn append_worker(
        &mut self,
        session: &mut Session,
        name: &str,
        worker_name: &str,
        salary: &str,
    ) -> Result<Outcome<()>> {
        self.gated(session, name, |file| file.append(worker_name, salary))
    }

    /// Returns how many rows were incremented
    pub fn mark_attendance(
        &mut self,
        session: &mut Session,
        name: &str,
        worker_name: &str,
    ) -> Result<Outcome<usize>> {
        self.gated(session, name, |file| file.mark_attendance(worker_name))
    }

    pub fn read_dataset(&mut self, session: &mut Session, name: &str) -> Result<Outcome<String>> {
        self.gated(session, name, |file| file.read())
    }

    pub fn delete_dataset(&mut self, session: &mut Session, name: &str) -> Result<Outcome<()>> {
        self.gated(session, name, |file| file.delete())
    }

    /// Names of existing datasets; not gated since it reveals no rows
    pub fn list_datasets(&self) -> Result<Vec<String>> {
        RecordFile::list(&self.paths)
    }

    fn gated<T>(
        &mut self,
        session: &mut Session,
        name: &str,
        op: impl FnOnce(&RecordFile) -> Result<T>,
    ) -> Result<Outcome<T>> {
        if !self.gate(session)? {
            return Ok(Outcome::NotActivated);
        }
        let file = RecordFile::open(&self.paths, name)?;
        op(&file).map(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::{tempdir, TempDir};

    type Provider = Box<dyn FnMut() -> Option<String>>;

    fn service(dir: &TempDir, provider: Provider) -> WorkerService<Provider> {
        let paths = Paths::under(dir.path());
        let licenses = LicenseStore::new(&paths).with_pool_size(100);
        let service = WorkerService::new(paths, provider).with_licenses(licenses);
        service.ensure_license_pool().unwrap();
        service
    }

    fn declining() -> Provider {
        Box::new(|| -> Option<String> { None })
    }

    fn first_key(service: &WorkerService<Provider>) -> String {
        service.licenses().issue(1).unwrap().remove(0)
    }

    #[test]
    fn test_declined_prompt_blocks_silently() {
        let dir = tempdir().unwrap();
        let mut service = service(&dir, declining());
        let mut session = Session::new();

        let outcome = service
            .append_worker(&mut session, "team", "Alice", "50000")
            .unwrap();
        assert_eq!(outcome, Outcome::NotActivated);
        assert_eq!(session.state(), GateState::PromptDeclined);
        assert_eq!(session.title(), "Worker Management App (Demo)");

        let outcome = service.create_dataset(&mut session, "team").unwrap();
        assert!(!outcome.is_done());
        assert!(!Paths::under(dir.path()).dataset_file("team").unwrap().exists());
    }

    #[test]
    fn test_prompted_key_activates() {
        let dir = tempdir().unwrap();
        let mut service = service(&dir, declining());
        let key = first_key(&service);
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        service.provider = Box::new(move || {
            counter.set(counter.get() + 1);
            Some(key.clone())
        });
        let mut session = Session::new();

        assert!(service
            .create_dataset(&mut session, "team")
            .unwrap()
            .is_done());
        assert!(session.is_activated());
        assert_eq!(session.title(), "Worker Management App");
        assert!(service.is_activated().unwrap());

        service
            .append_worker(&mut session, "team", "Alice", "50000")
            .unwrap();
        assert_eq!(asked.get(), 1);
    }

    #[test]
    fn test_invalid_prompted_key_errors() {
        let dir = tempdir().unwrap();
        let mut service = service(&dir, Box::new(|| Some("NOPE".to_string())));
        let mut session = Session::new();

        let err = service.create_dataset(&mut session, "team").unwrap_err();
        assert!(matches!(err, WorkerError::InvalidLicense));
        assert_eq!(session.state(), GateState::PromptInvalid);
        assert!(!service.licenses().activation_file().exists());
    }

    #[test]
    fn test_persisted_activation_skips_prompt() {
        let dir = tempdir().unwrap();
        let mut service = service(
            &dir,
            Box::new(|| -> Option<String> { panic!("should not prompt") }),
        );
        let key = first_key(&service);
        service.licenses().activate(&key).unwrap();
        let mut session = Session::new();

        assert!(service.gate(&mut session).unwrap());
        assert!(session.is_activated());
    }

    #[test]
    fn test_tampered_activation_blocks() {
        let dir = tempdir().unwrap();
        let mut service = service(
            &dir,
            Box::new(|| -> Option<String> { panic!("should not prompt") }),
        );
        fs::write(
            service.licenses().activation_file(),
            "ZZZZZ-ZZZZZ-ZZZZZ-ZZZZ",
        )
        .unwrap();
        let mut session = Session::new();

        let err = service.read_dataset(&mut session, "team").unwrap_err();
        assert!(matches!(err, WorkerError::NotActivated));
        assert!(!session.is_activated());
    }

    #[test]
    fn test_prompt_and_activate() {
        let dir = tempdir().unwrap();
        let service = service(&dir, declining());
        let mut session = Session::new();

        assert!(!service
            .prompt_and_activate(&mut session, "AAAAA-AAAAA-AAAAA-AAAA")
            .unwrap());
        assert!(!service.is_activated().unwrap());

        let key = first_key(&service);
        assert!(service.prompt_and_activate(&mut session, &key).unwrap());
        assert!(session.is_activated());
        assert_eq!(
            service.licenses().load_activation().unwrap().as_deref(),
            Some(key.as_str())
        );
    }

    #[test]
    fn test_full_workflow() {
        let dir = tempdir().unwrap();
        let mut service = service(&dir, declining());
        let key = first_key(&service);
        service.licenses().activate(&key).unwrap();
        let mut session = Session::new();

        service.create_dataset(&mut session, "team").unwrap();
        service
            .append_worker(&mut session, "team", "Alice", "50000")
            .unwrap();
        let marked = service
            .mark_attendance(&mut session, "team", "Alice")
            .unwrap();
        assert_eq!(marked, Outcome::Done(1));

        let text = service.read_dataset(&mut session, "team").unwrap().done();
        assert_eq!(
            text.as_deref(),
            Some("Name,Salary,Attendance\nAlice,50000,1\n")
        );
        assert_eq!(service.list_datasets().unwrap(), vec!["team"]);

        service.delete_dataset(&mut session, "team").unwrap();
        assert!(matches!(
            service.read_dataset(&mut session, "team"),
            Err(WorkerError::NotFound(_))
        ));
    }

    #[test]
    fn test_append_missing_dataset_after_gate() {
        let dir = tempdir().unwrap();
        let mut service = service(&dir, declining());
        let key = first_key(&service);
        service.licenses().activate(&key).unwrap();
        let mut session = Session::new();

        let err = service
            .append_worker(&mut session, "ghost", "Alice", "50000")
            .unwrap_err();
        assert!(matches!(err, WorkerError::NotFound(_)));
        assert!(!Paths::under(dir.path()).dataset_file("ghost").unwrap().exists());
    }
}
