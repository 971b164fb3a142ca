//! Interactive license prompt on stdin

use std::io::{self, BufRead, Write};

use tracing::warn;

use worker_ledger::service::KeyProvider;

/// Asks on the terminal for a key when none is activated
#[derive(Debug, Default)]
pub struct StdinKeyProvider;

impl KeyProvider for StdinKeyProvider {
    fn request(&mut self) -> Option<String> {
        match ask_for_key() {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "could not read license key from stdin");
                None
            }
        }
    }
}

fn ask_for_key() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    print!("License key is required. Would you like to enter one now? (y/N) ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(None);
    }

    print!("Enter your license key: ");
    io::stdout().flush()?;
    let mut key = String::new();
    input.read_line(&mut key)?;
    let key = key.trim();

    Ok((!key.is_empty()).then(|| key.to_string()))
}

/// Yes/no confirmation, defaulting to no
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{} (y/N) ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
