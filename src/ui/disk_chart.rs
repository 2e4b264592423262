use crate::models::disk::SpaceType;
use crate::report::{stack_chart, DiskSpaceReport};
use crate::ui::theme::Theme;
use crate::util::human::fmt_gb_short;
use crate::util::text_report::bar_cells;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Stacked used/free bar per (computer, drive), scaled to the largest drive.
pub fn render_disk_chart(
    f: &mut Frame,
    area: Rect,
    report: &DiskSpaceReport,
    scroll: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_focused)
        .title(Span::styled(format!(" {} ", report.title), theme.title));

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 || inner.width < 20 { return; }

    let bars = stack_chart(&report.chart);
    if bars.is_empty() {
        f.render_widget(Paragraph::new(Span::styled("No drives for this selection", theme.text_dim)), inner);
        return;
    }

    let max_total = bars.iter().map(|b| b.total_gb()).fold(0.0_f64, f64::max);
    let label_w   = bars.iter().map(|b| b.label().chars().count()).max().unwrap_or(0).min(28);
    let bar_w     = (inner.width as usize).saturating_sub(label_w + 10);

    let legend = Line::from(vec![
        Span::styled("█", theme.used_bar),
        Span::styled(format!(" {}  ", SpaceType::Used.label()), theme.text_dim),
        Span::styled("█", theme.free_bar),
        Span::styled(format!(" {}", SpaceType::Free.label()), theme.text_dim),
    ]);

    // One row for the legend, the rest for bars
    let visible = (inner.height as usize).saturating_sub(1).max(1);
    let start   = scroll.min(bars.len().saturating_sub(visible));

    let mut lines = vec![legend];
    for b in bars.iter().skip(start).take(visible) {
        let (used, free) = bar_cells(b.used_gb, b.free_gb, max_total, bar_w);
        let label: String = b.label().chars().take(label_w).collect();
        lines.push(Line::from(vec![
            Span::styled(format!("{:<w$} ", label, w = label_w), theme.text),
            Span::styled("█".repeat(used), theme.used_bar),
            Span::styled("█".repeat(free), theme.free_bar),
            Span::raw(" ".repeat(bar_w - used - free)),
            Span::styled(format!(" {:>7}", fmt_gb_short(b.total_gb())), theme.text_dim),
        ]));
    }
    f.render_widget(Paragraph::new(lines), inner);
}
