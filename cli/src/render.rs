//! Plain-text rendering of ledger query results.

use std::fmt::Write;

use petition_contracts::report::{IntegrityReport, LedgerStats};
use petition_registry::CountryRegistry;

const BAR_WIDTH: usize = 40;

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// First 16 characters of the root followed by an ellipsis.
pub fn short_root(root: Option<&str>) -> String {
    match root {
        Some(root) if root.len() > 16 => format!("{}...", &root[..16]),
        Some(root) => root.to_string(),
        None => "No signatures yet".to_string(),
    }
}

pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One-line integrity status.
pub fn integrity_line(report: &IntegrityReport) -> String {
    if report.valid {
        "Chain Integrity Verified".to_string()
    } else {
        format!("Integrity Issues Detected ({})", report.issues.len())
    }
}

/// The full integrity report, one line per issue.
///
/// `load_error` is the reason stored state was discarded at open; the report
/// then covers an empty ledger and is not shown as verified.
pub fn integrity(report: &IntegrityReport, load_error: Option<&str>) -> String {
    let mut out = String::new();
    match load_error {
        Some(reason) => {
            let _ = writeln!(out, "Ledger State Unreadable: {}", reason);
        }
        None => {
            let _ = writeln!(out, "{}", integrity_line(report));
        }
    }
    let _ = writeln!(out, "Signatures:  {}", group_thousands(report.total_signatures));
    let _ = writeln!(
        out,
        "Merkle root: {}",
        report.merkle_root.as_deref().unwrap_or("No signatures yet")
    );
    for issue in &report.issues {
        let _ = writeln!(
            out,
            "  {} at #{} ({})",
            issue.kind, issue.sequence, issue.signature_id
        );
    }
    out
}

/// The stats panel: total, goal progress, top countries, integrity, root.
pub fn stats(stats: &LedgerStats, registry: &CountryRegistry, report: &IntegrityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} signatures", group_thousands(stats.total));
    let _ = writeln!(
        out,
        "Goal: {}  {:.2}%",
        group_thousands(stats.goal),
        stats.percentage
    );
    let _ = writeln!(out, "{}", progress_bar(stats.percentage, BAR_WIDTH));

    if !stats.top_countries.is_empty() {
        let _ = writeln!(out);
        for row in &stats.top_countries {
            let _ = writeln!(
                out,
                "  {:<16} {:>10}",
                registry.display_name(&row.country),
                group_thousands(row.count)
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", integrity_line(report));
    let _ = writeln!(out, "Merkle Root: {}", short_root(report.merkle_root.as_deref()));
    out
}

/// The registry as a table of code, name, ID label and format.
pub fn countries(registry: &CountryRegistry) -> String {
    let mut out = String::new();
    for country in registry.iter() {
        let rule = &country.rule;
        let _ = writeln!(
            out,
            "{}  {:<12} {:<28} {}",
            rule.code, rule.name, rule.id_label, rule.format
        );
    }
    out
}
