//! Verify command implementation.

use bookcase_core::IntegrityReport;
use std::path::Path;

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying catalog at {}", path.display());
    println!();

    let catalog = super::open_existing(path)?;
    let report = catalog.verify();
    print_report(&report);

    println!();
    if report.is_ok() {
        println!("✓ Catalog verification passed");
        Ok(())
    } else {
        println!("✗ Catalog verification failed");
        Err("Verification failed".into())
    }
}

fn print_report(report: &IntegrityReport) {
    println!("  Errors:   {}", report.errors.len());
    println!("  Warnings: {}", report.warnings.len());
    for error in &report.errors {
        println!("    ERROR: {error}");
    }
    for warning in &report.warnings {
        println!("    WARN:  {warning}");
    }
}
