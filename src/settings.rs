use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

const SETTINGS_FILE: &str = "contacts";
const ENV_PREFIX: &str = "CONTACTS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Output file stem; the extension follows the export format.
    pub output_name: String,
    /// Directory for `app.log`.
    pub log_dir: PathBuf,
}

impl Settings {
    /// Defaults, then `contacts.toml` if present, then `CONTACTS_*` variables.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(SETTINGS_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("input_dir", "input_pdfs")?
            .set_default("output_dir", "output")?
            .set_default("output_name", "contacts")?
            .set_default("log_dir", "logs")?
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
