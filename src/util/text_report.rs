use crate::report::{stack_chart, DiskSpaceReport};
use crate::util::human::fmt_gb_short;

const BAR_WIDTH: usize = 40;

/// Generate a human-readable disk space report to a String.
pub fn generate(report: &DiskSpaceReport, source: &str) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  Disk Space Report: {}\n", now));
    out.push_str(&format!("  Source:       {}\n", source));
    out.push_str(&format!("  Selection:    {}\n", report.selection));
    out.push_str(&format!("  Last updated: {}\n", report.last_updated));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Summary table ──────────────────────────────────────────────────
    out.push_str(&format!("── Drives ({}) ─────────────────────────────────\n", report.summary.len()));
    if report.summary.is_empty() {
        out.push_str("  (no drives for this selection)\n\n");
        out.push_str("═══════════════════════════════════════════════\n");
        return out;
    }

    let computer_w = report.summary.iter().map(|s| s.computer.chars().count()).max().unwrap_or(0).max(8);
    out.push_str(&format!(
        "  {:<cw$} {:<6} {:>16} {:>16} {:>16} {:>8}\n",
        "Computer", "Drive", "Used", "Free", "Total", "Used%",
        cw = computer_w,
    ));
    out.push_str(&format!("  {}\n", "─".repeat(computer_w + 66)));
    for s in &report.summary {
        out.push_str(&format!(
            "  {:<cw$} {:<6} {:>16} {:>16} {:>16} {:>8}\n",
            s.computer, s.drive, s.used_space, s.free_space, s.total_size, s.percentage_used,
            cw = computer_w,
        ));
    }
    out.push('\n');

    // ── Chart ──────────────────────────────────────────────────────────
    out.push_str(&format!("── {} ─────────────────────────\n", report.title));
    out.push_str("  # used   . free\n");
    let bars = stack_chart(&report.chart);
    let max_total = bars.iter().map(|b| b.total_gb()).fold(0.0_f64, f64::max);
    let label_w = bars.iter().map(|b| b.label().chars().count()).max().unwrap_or(0);
    for b in &bars {
        let (used, free) = bar_cells(b.used_gb, b.free_gb, max_total, BAR_WIDTH);
        out.push_str(&format!(
            "  {:<lw$} |{}{}{}| {}\n",
            b.label(),
            "#".repeat(used),
            ".".repeat(free),
            " ".repeat(BAR_WIDTH - used - free),
            fmt_gb_short(b.total_gb()),
            lw = label_w,
        ));
    }
    out.push('\n');

    out.push_str("═══════════════════════════════════════════════\n");
    out
}

/// Split `width` cells between used and free, scaled against the largest bar.
/// Negative segments (free > total anomalies) draw as empty.
pub fn bar_cells(used_gb: f64, free_gb: f64, max_total: f64, width: usize) -> (usize, usize) {
    if max_total <= 0.0 || width == 0 {
        return (0, 0);
    }
    let scale = width as f64 / max_total;
    let used = (used_gb.max(0.0) * scale).round() as usize;
    let free = (free_gb.max(0.0) * scale).round() as usize;
    let used = used.min(width);
    (used, free.min(width - used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::disk::{DiskRow, Selection};
    use crate::report::DiskSpaceReportBuilder;

    #[test]
    fn report_lists_every_drive_and_placeholder() {
        let rows = vec![
            DiskRow::new("SRV01", "C:", 500.0, 100.0, None),
            DiskRow::new("SRV01", "Z:", 0.0, 0.0, None),
            DiskRow::new("SRV02", "C:", 2000.0, 1500.0, None),
        ];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::AllComputers);
        let text = generate(&report, "disk.json");

        assert!(text.contains("Selection:    All Computers"));
        assert!(text.contains("Last updated: N/A"));
        assert!(text.contains("400.00 GB"));
        assert!(text.contains("2,000.00 GB"));
        assert!(text.contains("N/A"));
        assert!(text.contains("SRV01 C:"));
        assert!(text.contains("SRV02 C:"));
    }

    #[test]
    fn empty_selection_says_so() {
        let report = DiskSpaceReportBuilder::default().build(&[], &Selection::Computer("X".into()));
        let text = generate(&report, "disk.json");
        assert!(text.contains("Drives (0)"));
        assert!(text.contains("no drives for this selection"));
    }

    #[test]
    fn non_ascii_names_align_by_characters() {
        let rows = vec![
            DiskRow::new("Ærø-SRV", "C:", 100.0, 50.0, None),
            DiskRow::new("SRV02", "D:", 100.0, 50.0, None),
        ];
        let report = DiskSpaceReportBuilder::default().build(&rows, &Selection::AllComputers);
        let out = generate(&report, "test.json");
        assert!(out.contains("  Computer Drive "));
        assert!(out.contains("  Ærø-SRV  C:     "));
        assert!(out.contains("  Ærø-SRV C: |"));
        assert!(out.contains("  SRV02 D:   |"));
    }

    #[test]
    fn bar_cells_scale_and_clamp() {
        assert_eq!(bar_cells(400.0, 100.0, 1000.0, 40), (16, 4));
        assert_eq!(bar_cells(0.0, 1000.0, 1000.0, 40), (0, 40));
        assert_eq!(bar_cells(-50.0, 150.0, 100.0, 40), (0, 40));
        assert_eq!(bar_cells(1.0, 1.0, 0.0, 40), (0, 0));
    }
}
