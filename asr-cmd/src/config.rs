//! Store and dashboard configuration shared by every subcommand.
//!
//! Each option can come from a flag or its environment variable; flags win.

use std::path::PathBuf;

use anyhow::Context;
use asr_data::ReportLibrary;
use asr_db::{JsonFileStore, ReportStore, SqliteStore};
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// SQLite database, read a page at a time
    Sqlite,
    /// Single JSON file held fully in memory
    Json,
}

impl Backend {
    /// Store file used when `--store` is not given.
    pub fn default_store(self) -> PathBuf {
        match self {
            Backend::Sqlite => PathBuf::from("asr-reports.sqlite3"),
            Backend::Json => PathBuf::from("asr-reports.json"),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Path of the report store [default: asr-reports.sqlite3 or asr-reports.json]
    #[arg(long, global = true, env = "ASR_STORE")]
    pub store: Option<PathBuf>,

    /// Storage backend
    #[arg(long, global = true, env = "ASR_BACKEND", value_enum, default_value = "sqlite")]
    pub backend: Backend,

    /// Dashboard airports in display order (comma separated)
    #[arg(long, global = true, env = "ASR_AIRPORTS", value_delimiter = ',')]
    pub airports: Vec<String>,
}

impl Config {
    pub fn store_path(&self) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| self.backend.default_store())
    }

    pub fn open_store(&self) -> anyhow::Result<Box<dyn ReportStore>> {
        let path = self.store_path();
        let store: Box<dyn ReportStore> = match self.backend {
            Backend::Sqlite => Box::new(SqliteStore::open(&path)?),
            Backend::Json => Box::new(JsonFileStore::open(&path)?),
        };
        Ok(store)
    }

    /// Open the store, run pending migrations and load summaries.
    pub fn open_library(&self) -> anyhow::Result<ReportLibrary> {
        let store = self
            .open_store()
            .with_context(|| format!("could not open store {}", self.store_path().display()))?;
        let mut library = ReportLibrary::open(store)?;
        let airports: Vec<String> = self
            .airports
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if !airports.is_empty() {
            library = library.with_airports(airports);
        }
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn defaults() {
        let cli = TestCli::try_parse_from(["asr"]).unwrap();
        assert_eq!(cli.config.backend, Backend::Sqlite);
        assert_eq!(cli.config.store_path(), PathBuf::from("asr-reports.sqlite3"));
    }

    #[test]
    fn json_backend_defaults_to_json_file() {
        let cli = TestCli::try_parse_from(["asr", "--backend", "json"]).unwrap();
        assert_eq!(cli.config.store, None);
        assert_eq!(cli.config.store_path(), PathBuf::from("asr-reports.json"));
    }

    #[test]
    fn flags_override() {
        let cli = TestCli::try_parse_from([
            "asr",
            "--store",
            "/tmp/r.json",
            "--backend",
            "json",
            "--airports",
            "제주, 인천",
        ])
        .unwrap();
        assert_eq!(cli.config.backend, Backend::Json);
        assert_eq!(cli.config.store_path(), PathBuf::from("/tmp/r.json"));
        assert_eq!(cli.config.airports, vec!["제주".to_string(), " 인천".to_string()]);
    }

    #[test]
    fn open_library_with_json_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            store: Some(dir.path().join("reports.json")),
            backend: Backend::Json,
            airports: vec!["제주".into(), " 인천 ".into()],
        };
        let library = config.open_library().unwrap();
        assert_eq!(library.airports(), ["제주".to_string(), "인천".to_string()]);
        assert!(library.summaries().is_empty());
    }
}
