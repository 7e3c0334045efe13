use super::build_engine;
use crate::config::ScanRelocateConfig;
use anyhow::Result;

pub struct TableCommand {
    pub config: ScanRelocateConfig,
    pub limit: Option<usize>,
}

impl TableCommand {
    pub fn new(config: ScanRelocateConfig, limit: Option<usize>) -> Self {
        Self { config, limit }
    }

    pub async fn execute(&self) -> Result<()> {
        let engine = build_engine(&self.config);
        let table = engine.table();

        println!("📋 Reference table: {}", table.origin());
        println!("   {} row(s)", table.len());
        println!();

        let limit = self.limit.unwrap_or(table.len());
        let source_width = table
            .iter()
            .take(limit)
            .map(|record| record.source_code.chars().count())
            .max()
            .unwrap_or(0)
            .max("SOURCE".len());

        println!("{:<source_width$}  {:>8}  DESTINATION", "SOURCE", "QUANTITY");
        for record in table.iter().take(limit) {
            println!(
                "{:<source_width$}  {:>8}  {}",
                record.source_code, record.quantity, record.destination_code
            );
        }

        if limit < table.len() {
            println!("... {} more row(s)", table.len() - limit);
        }
        Ok(())
    }
}
