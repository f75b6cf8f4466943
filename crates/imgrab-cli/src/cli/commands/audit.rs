//! `imgrab audit` and the interactive remediation prompt shared with `crawl`.

use anyhow::Result;
use imgrab_core::audit::{audit_and_remediate, AuditReport, Remediation};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Lists flagged directories on `output` and asks whether to delete them.
/// Anything but `y`/`yes` (or a read failure) keeps them.
pub fn ask_remediation<R: BufRead, W: Write>(
    report: &AuditReport,
    input: &mut R,
    output: &mut W,
) -> Remediation {
    let _ = writeln!(
        output,
        "Average files per keyword: {:.1}. Directories below {:.1}:",
        report.mean,
        report.threshold()
    );
    for flagged in &report.flagged {
        let _ = writeln!(output, "  {:<30} {}", flagged.keyword(), flagged.files);
    }
    let _ = write!(output, "Delete them so the next run refills them? (y/n) ");
    let _ = output.flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return Remediation::Keep;
    }
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Remediation::RemoveFlagged,
        _ => Remediation::Keep,
    }
}

/// Decision function backed by the terminal.
pub fn prompt_on_terminal(report: &AuditReport) -> Remediation {
    ask_remediation(report, &mut io::stdin().lock(), &mut io::stdout())
}

pub fn run_audit(root: &Path, yes: bool) -> Result<()> {
    let (report, removed) = if yes {
        audit_and_remediate(root, |_| Remediation::RemoveFlagged)?
    } else {
        audit_and_remediate(root, prompt_on_terminal)?
    };
    print_outcome(&report, &removed);
    Ok(())
}

pub(super) fn print_outcome(report: &AuditReport, removed: &[std::path::PathBuf]) {
    if report.is_balanced() {
        println!(
            "Data set is balanced ({} keyword directories).",
            report.counts.len()
        );
        return;
    }
    if removed.is_empty() {
        println!("Kept {} under-populated directories.", report.flagged.len());
    } else {
        for path in removed {
            println!("Removed {}", path.display());
        }
    }
}
