// src/services/preferences_service.rs
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::AppResult;
use crate::repositories::{LayoutMode, PreferencesRepository};

/// Persisted client preferences, each independently settable and observable.
pub struct PreferencesService {
    repo: Arc<dyn PreferencesRepository>,
    dark_theme_tx: watch::Sender<bool>,
    layout_mode_tx: watch::Sender<LayoutMode>,
}

impl PreferencesService {
    /// Seeds the observable values from the store.
    pub fn new(repo: Arc<dyn PreferencesRepository>) -> AppResult<Self> {
        let (dark_theme_tx, _) = watch::channel(repo.dark_theme()?);
        let (layout_mode_tx, _) = watch::channel(repo.layout_mode()?);

        Ok(Self {
            repo,
            dark_theme_tx,
            layout_mode_tx,
        })
    }

    pub fn set_dark_theme(&self, on: bool) -> AppResult<()> {
        self.repo.set_dark_theme(on)?;
        self.dark_theme_tx.send_replace(on);
        Ok(())
    }

    pub fn dark_theme(&self) -> watch::Receiver<bool> {
        self.dark_theme_tx.subscribe()
    }

    pub fn set_layout_mode(&self, mode: LayoutMode) -> AppResult<()> {
        self.repo.set_layout_mode(mode)?;
        self.layout_mode_tx.send_replace(mode);
        Ok(())
    }

    pub fn layout_mode(&self) -> watch::Receiver<LayoutMode> {
        self.layout_mode_tx.subscribe()
    }
}
