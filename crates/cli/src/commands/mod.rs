//! Command implementations.
//!
//! Every command builds on a [`Context`] holding the API client and its
//! persisted session.

pub mod account;
pub mod addresses;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod wishlist;

use std::io::{BufRead, IsTerminal, Write};
use std::sync::Arc;

use secrecy::SecretString;
use shopvely_client::session::FileStorage;
use shopvely_client::views::Notice;
use shopvely_client::{ApiClient, ApiError, ClientConfig, Navigator, Route, SessionStore};
use thiserror::Error;

use crate::render;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Reading input or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state for one CLI invocation.
pub struct Context {
    pub api: ApiClient,
}

impl Context {
    /// Open the persisted session and build the API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let session = SessionStore::open(FileStorage::new(&config.session_file));
        let api = ApiClient::new(config, session, Arc::new(TerminalNavigator))?;
        Ok(Self { api })
    }
}

/// Tells the user where to go, since a terminal cannot navigate.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        if route == Route::Login {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Session expired. Please log in again with `shopvely login <username>`.");
            }
        } else {
            tracing::debug!(%route, "Ignoring navigation request");
        }
    }
}

// =============================================================================
// Terminal I/O
// =============================================================================

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{text}");
}

/// Print a view notice, if any.
pub fn emit_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        emit(&render::notice(notice));
    }
}

/// Prompt on stderr and read one line from stdin, without the newline.
///
/// # Errors
///
/// Returns the I/O error if stdin cannot be read.
pub fn prompt_line(prompt: &str) -> Result<String, std::io::Error> {
    {
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "{prompt}: ")?;
        stderr.flush()?;
    }
    read_line(std::io::stdin().lock())
}

fn read_line(mut reader: impl BufRead) -> Result<String, std::io::Error> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a password without echoing it.
///
/// When stdin is not a terminal (piped input in scripts) the password is read
/// as a plain line instead.
///
/// # Errors
///
/// Returns the I/O error if the password cannot be read.
pub fn prompt_secret(prompt: &str) -> Result<SecretString, std::io::Error> {
    if std::io::stdin().is_terminal() {
        rpassword::prompt_password(format!("{prompt}: ")).map(SecretString::from)
    } else {
        prompt_line(prompt).map(SecretString::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_read_line_strips_line_ending() {
        let line = read_line("correct-horse\r\nnext\n".as_bytes()).unwrap();
        assert_eq!(line, "correct-horse");
    }

    #[test]
    fn test_piped_secret_is_not_printed_by_debug() {
        let secret = SecretString::from(read_line("hunter2\n".as_bytes()).unwrap());
        assert_eq!(secret.expose_secret(), "hunter2");
        assert!(!format!("{secret:?}").contains("hunter2"));
    }
}
