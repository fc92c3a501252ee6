use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spendscope_core::SpendBuckets;
use spendscope_finance::category_rules::{CategoryRule, CategoryRules, default_rules};
use spendscope_finance::Enricher;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_spendscope_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub buckets: BucketsSection,
    /// Ordered keyword rules; the first match wins
    #[serde(default = "default_rules")]
    pub categories: Vec<CategoryRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketsSection {
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
}

impl Default for BucketsSection {
    fn default() -> Self {
        let b = SpendBuckets::default();
        Self {
            edges: b.edges().to_vec(),
            labels: b.labels().to_vec(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            buckets: BucketsSection::default(),
            categories: default_rules(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Validate the rule table and bucket edges and build the enricher.
    pub fn enricher(&self) -> Result<Enricher> {
        let rules = CategoryRules::new(self.categories.clone()).context("invalid [[categories]]")?;
        let buckets = SpendBuckets::new(self.buckets.edges.clone(), self.buckets.labels.clone())
            .context("invalid [buckets]")?;
        Ok(Enricher::new(rules, buckets))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_spendscope_home()?.join("config.toml"))
}

/// Load `explicit` if given, else the home config; a missing home config means defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = match explicit {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
