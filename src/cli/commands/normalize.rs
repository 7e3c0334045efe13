use crate::config::ScanRelocateConfig;
use crate::normalize::CodeNormalizer;
use anyhow::Result;

/// Show how raw scans are read before matching. Does not touch the table.
pub struct NormalizeCommand {
    pub normalizer: CodeNormalizer,
    pub codes: Vec<String>,
}

impl NormalizeCommand {
    pub fn new(config: &ScanRelocateConfig, codes: Vec<String>) -> Self {
        Self {
            normalizer: CodeNormalizer::from_config(&config.normalization),
            codes,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        for code in &self.codes {
            println!("{} → {}", code, self.normalizer.normalize(code));
        }
        Ok(())
    }
}
