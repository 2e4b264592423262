use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

pub fn render_summary_table(f: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let report = &app.report;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled(
            format!("Disk Space for {} ({})", report.selection, report.summary.len()),
            theme.title,
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if report.summary.is_empty() {
        f.render_widget(Paragraph::new(Span::styled("  No drives", theme.text_dim)), inner);
        return;
    }

    let header_cells = ["Computer", "Drive", "Used", "Free", "Total", "Used%"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.text_dim));
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1);

    // summary[i] is the formatted view of rows[i]
    let rows: Vec<Row> = report.summary.iter().zip(&report.rows).map(|(s, d)| {
        let style = theme.usage_style(d.percentage_used.value());
        let flag  = if d.row.is_anomalous() { " !" } else { "" };
        Row::new(vec![
            Cell::from(s.computer.clone()),
            Cell::from(s.drive.clone()),
            Cell::from(s.used_space.clone()).style(style),
            Cell::from(s.free_space.clone()).style(theme.text_dim),
            Cell::from(s.total_size.clone()).style(theme.text_dim),
            Cell::from(format!("{}{}", s.percentage_used, flag)).style(style),
        ])
    }).collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(theme.selected);

    f.render_stateful_widget(table, inner, &mut app.table_state);
}
