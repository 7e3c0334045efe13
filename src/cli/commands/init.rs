//! Init command: write a configuration file holding every default, ready to
//! be edited.
//!
//! An existing file is never overwritten without `--force`, and `--dry-run`
//! only reports what would be written.

use crate::config::{ScanRelocateConfig, CONFIG_FILE_NAME};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub struct InitCommand {
    pub path: PathBuf,
    pub force: bool,
    pub dry_run: bool,
}

impl InitCommand {
    pub fn new(path: Option<PathBuf>, force: bool, dry_run: bool) -> Self {
        Self {
            path: path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME)),
            force,
            dry_run,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        if self.dry_run {
            println!("⚙️  SCAN-RELOCATE INIT (DRY RUN)");
        } else {
            println!("⚙️  SCAN-RELOCATE INIT");
        }
        println!("======================");

        self.generate_configuration(&ScanRelocateConfig::default())
            .await?;

        if !self.dry_run {
            println!();
            println!("🚀 Next steps:");
            println!("   • Point table.path at your reference table");
            println!("   • scan-relocate table    # Check the table loads");
            println!("   • scan-relocate scan     # Start scanning");
        }
        Ok(())
    }

    async fn generate_configuration(&self, config: &ScanRelocateConfig) -> Result<()> {
        let config_path = self.path.as_path();

        if config_path.exists() && !self.force {
            return Err(anyhow!(
                "Configuration file {} already exists. Use --force to overwrite.",
                config_path.display()
            ));
        }

        if self.dry_run {
            println!("Would create configuration file: {}", config_path.display());
            println!();
            print!("{}", toml::to_string_pretty(config)?);
            return Ok(());
        }

        ensure_parent_dir(config_path).await?;
        config
            .save_to_file(config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("✅ Wrote {}", config_path.display());
        Ok(())
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        _ => {}
    }
    Ok(())
}
