//! `imgrab status` – show keyword directories and their completion markers.

use anyhow::Result;
use imgrab_core::audit::status;
use imgrab_core::source::SourceFamily;
use std::path::Path;

pub fn run_status(root: &Path) -> Result<()> {
    let labels: Vec<&'static str> = SourceFamily::ALL.iter().map(|f| f.label()).collect();
    let rows = status(root, &labels)?;
    if rows.is_empty() {
        println!("No keyword directories under {}.", root.display());
        return Ok(());
    }
    println!("{:<30} {:<8} {}", "KEYWORD", "FILES", "DONE");
    for row in rows {
        let done = if row.completed.is_empty() {
            "-".to_string()
        } else {
            row.completed.join(",")
        };
        println!("{:<30} {:<8} {}", row.count.keyword(), row.count.files, done);
    }
    Ok(())
}
