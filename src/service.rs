//! Caller-facing `configure` / `classify` pair.
use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::session::{Prediction, Session};
use crate::{Error, Result};

/// Holds at most one configured [`Session`].
///
/// `configure` swaps in a new session only when it succeeds, a failed
/// configuration leaves the previous one in place.
#[derive(Debug)]
pub struct ClassifierService {
    config: Config,
    session: Option<Session>,
}

impl ClassifierService {
    pub fn new(config: Config) -> Self {
        Self { config, session: None }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn configure(&mut self, model_name: &str) -> Result<()> {
        let session = Session::configure(model_name, &self.config)?;
        self.install(session);
        Ok(())
    }

    /// Replaces the current session with one built by the caller.
    pub fn install(&mut self, session: Session) {
        if let Some(previous) = &self.session {
            info!("replacing model {} with {}", previous.model_name(), session.model_name());
        }
        self.session = Some(session);
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn classify<P: AsRef<Path>>(&self, image_path: P) -> Result<Vec<Prediction>> {
        self.session.as_ref().ok_or(Error::NotConfigured)?.classify(image_path)
    }
}
