use crate::catalog::{cached_table, TableLoader, TableOrigin};
use crate::config::ScanRelocateConfig;
use crate::normalize::CodeNormalizer;
use crate::workflows::ScanEngine;
use anyhow::Result;

pub mod display;
pub mod init;
pub mod lookup;
pub mod normalize;
pub mod replay;
pub mod scan;
pub mod table;

/// Load the configured reference table (once per process) and wrap it in an
/// engine with the configured normalization rules.
pub fn build_engine(config: &ScanRelocateConfig) -> ScanEngine {
    let loader = TableLoader::from_config(&config.table);
    let table = cached_table(&loader, &config.table.path);

    if let TableOrigin::Fallback { reason } = table.origin() {
        eprintln!("⚠️  Reference table unavailable: {reason}");
        eprintln!("   Using the built-in sample table ({} rows)", table.len());
    }

    ScanEngine::new(table).with_normalizer(CodeNormalizer::from_config(&config.normalization))
}

pub fn show_how_to_get_started(config: &ScanRelocateConfig) -> Result<()> {
    println!("📦 scan-relocate - Location Move Tracking");
    println!();
    println!("Reference table: {}", config.table.path.display());
    println!();
    println!("To get started:");
    println!("  🎯 scan-relocate scan                  # Scan with a USB/Bluetooth scanner");
    println!("  ⌨️  scan-relocate scan --input manual   # Type codes by hand");
    println!("  🔍 scan-relocate lookup <code>         # Where does a location go?");
    println!("  📋 scan-relocate table                 # Show the reference table");
    println!();
    println!("Other commands:");
    println!("  🔁 scan-relocate replay <file>         # Replay a scan log");
    println!("  🔤 scan-relocate normalize <code>      # Show how a code is read");
    println!("  ⚙️  scan-relocate init                  # Write a default configuration");
    println!();
    println!("💡 Scan the OLD location first, then the NEW location to confirm the move.");
    Ok(())
}
