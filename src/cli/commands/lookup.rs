use super::build_engine;
use crate::config::ScanRelocateConfig;
use anyhow::Result;

pub struct LookupCommand {
    pub config: ScanRelocateConfig,
    pub code: String,
    pub json: bool,
}

impl LookupCommand {
    pub fn new(config: ScanRelocateConfig, code: impl Into<String>) -> Self {
        Self {
            config,
            code: code.into(),
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Print where `code` is headed. An unknown code is reported, not an error.
    pub async fn execute(&self) -> Result<()> {
        let engine = build_engine(&self.config);
        let normalized = engine.normalizer().normalize(&self.code);
        let record = engine.lookup(&self.code);

        if self.json {
            let line = serde_json::json!({
                "code": normalized,
                "record": record,
            });
            println!("{line}");
            return Ok(());
        }

        match record {
            Some(record) => {
                println!("📍 {}", record.source_code);
                println!("   Destination: {}", record.destination_code);
                println!("   Quantity:    {} piece(s)", record.quantity);
            }
            None => println!("❌ Code not found: {normalized}"),
        }
        Ok(())
    }
}
