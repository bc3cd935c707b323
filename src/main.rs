mod aggregate;
mod codec;
mod data;
mod errors;
mod etl;
mod extract;
mod fetch;
mod ids;
mod lua;
mod sink;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info};
use serde::Deserialize;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use crate::data::category::Category;
use crate::errors::{Error, Result};
use crate::etl::export::ExportEtl;
use crate::etl::Etl;
use crate::extract::{build_extractor, ExtractionStrategy};
use crate::ids::IdResolver;
use crate::sink::LoggerSink;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub out_dir: PathBuf,
    pub map_ids_path: PathBuf,
    pub node_ids_path: PathBuf,
    pub categories: Vec<Category>,
    pub expansion: String,
    pub strategy: ExtractionStrategy,
    pub base_url: String,
    /// Page address for the table strategy; `{base}`, `{expansion}` and `{category}` are substituted.
    pub table_url_template: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            out_dir: PathBuf::from("."),
            map_ids_path: PathBuf::from("map_ids.json"),
            node_ids_path: PathBuf::from("node_ids.json"),
            categories: vec![Category::Herbalism, Category::Mining],
            expansion: "Dragonflight".to_string(),
            strategy: ExtractionStrategy::default(),
            base_url: "https://www.wowhead.com".to_string(),
            table_url_template: "{base}/{expansion}/{category}-nodes".to_string(),
            timeout_secs: fetch::DEFAULT_TIMEOUT.as_secs(),
            log_level: "info".to_string(),
        }
    }
}

/// Scrape gathering node locations and export them as GatherMate2 data files.
#[derive(Debug, Parser)]
#[command(name = "valhalla_nodes", version)]
struct Cli {
    /// JSON config file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the `<Category>Data.lua` files are written to.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Category to export; repeat for several.
    #[arg(long = "category", value_enum)]
    categories: Vec<Category>,

    #[arg(long)]
    expansion: Option<String>,

    #[arg(long, value_enum)]
    strategy: Option<ExtractionStrategy>,
}

impl UserConfig {
    fn apply_cli(&mut self, cli: Cli) {
        if let Some(out_dir) = cli.out_dir {
            self.out_dir = out_dir;
        }
        if !cli.categories.is_empty() {
            self.categories = cli.categories;
        }
        if let Some(expansion) = cli.expansion {
            self.expansion = expansion;
        }
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy;
        }
    }
}

fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path)
        .map_err(|err| Error::config(format!("could not open {}: {err}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| Error::config(format!("could not parse {}: {err}", path.display())))
}

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn run(config: &UserConfig) -> Result<()> {
    let ids = IdResolver::load(&config.map_ids_path, &config.node_ids_path)?;
    let extractor = build_extractor(config);
    let sink = LoggerSink;

    for category in &config.categories {
        let mut etl = ExportEtl::new(*category, extractor.as_ref(), &ids, &sink);
        if let Err(err) = etl.process(&config.out_dir) {
            error!(category = category.name(), err = err.message.as_str(); "Category export failed, continuing");
        }
    }
    info!(out_dir = &*config.out_dir.to_string_lossy(); "Export complete");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_user_config(path)?,
        None => UserConfig::default(),
    };
    config.apply_cli(cli);
    setup_logging(&config.log_level);

    run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::fs;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: UserConfig =
            serde_json::from_str(r#"{"out_dir": "out", "categories": ["gas"], "strategy": "table"}"#).unwrap();
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.categories, vec![Category::Gas]);
        assert_eq!(config.strategy, ExtractionStrategy::Table);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.map_ids_path, PathBuf::from("map_ids.json"));
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "valhalla_nodes",
            "--out-dir",
            "addon/Data",
            "--category",
            "fishing",
            "--category",
            "treasure",
            "--strategy",
            "table",
            "--expansion",
            "The War Within",
        ]);
        let mut config = UserConfig::default();
        config.apply_cli(cli);

        assert_eq!(config.out_dir, PathBuf::from("addon/Data"));
        assert_eq!(config.categories, vec![Category::Fishing, Category::Treasure]);
        assert_eq!(config.strategy, ExtractionStrategy::Table);
        assert_eq!(config.expansion, "The War Within");
    }

    #[test]
    fn cli_without_flags_keeps_config() {
        let mut config = UserConfig::default();
        config.apply_cli(Cli::parse_from(["valhalla_nodes"]));
        assert_eq!(config.categories, vec![Category::Herbalism, Category::Mining]);
        assert_eq!(config.strategy, ExtractionStrategy::Listview);
    }

    #[test]
    fn unreadable_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_user_config(&dir.path().join("missing.json")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);

        let path = dir.path().join("config.json");
        fs::write(&path, "{\"timeout_secs\": \"soon\"}").unwrap();
        let err = load_user_config(&path).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }

    #[test]
    fn malformed_mapping_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let map_ids_path = dir.path().join("map_ids.json");
        fs::write(&map_ids_path, "[1, 2]").unwrap();
        let config = UserConfig {
            out_dir: dir.path().join("out"),
            map_ids_path,
            node_ids_path: dir.path().join("node_ids.json"),
            categories: Vec::new(),
            ..UserConfig::default()
        };
        assert_eq!(run(&config).unwrap_err().kind, ErrorKind::Config);
    }
}
