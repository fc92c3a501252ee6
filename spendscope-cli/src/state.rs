use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn spendscope_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".spendscope"))
}

pub fn ensure_spendscope_home() -> Result<PathBuf> {
    let dir = spendscope_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Refuse to clobber an existing output unless asked to, and make sure the
/// parent directory exists.
pub fn prepare_output(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        anyhow::bail!(
            "output file {} exists (pass --overwrite to replace it)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}
