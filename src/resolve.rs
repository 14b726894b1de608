//! Ordered fallback between resolution strategies.
use tracing::{debug, warn};

use crate::{Error, Result};

/// A named way of obtaining a `T`.
pub struct Strategy<'a, T> {
    name: String,
    run: Box<dyn FnOnce() -> Result<T> + 'a>,
}

impl<'a, T> Strategy<'a, T> {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: FnOnce() -> Result<T> + 'a,
    {
        Self { name: name.into(), run: Box::new(run) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Runs the strategies in order and returns the first success.
///
/// Failures are logged and swallowed, except `UnknownModelName` which stops
/// the search. When every strategy fails the last error is returned.
pub fn first_success<T>(what: &str, strategies: Vec<Strategy<'_, T>>) -> Result<T> {
    let mut last_err = None;
    for strategy in strategies {
        let Strategy { name, run } = strategy;
        match run() {
            Ok(value) => {
                debug!("{what} resolved from {name}");
                return Ok(value);
            }
            Err(err @ Error::UnknownModelName(_)) => return Err(err),
            Err(err) => {
                warn!("{what} not available from {name}: {err}");
                last_err = Some(err);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| Error::Config(format!("no source configured for {what}"))))
}
