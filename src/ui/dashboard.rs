use crate::app::App;
use crate::ui::{disk_chart, footer, summary_table};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // computer picker
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, root[0], app);
    render_picker(f, root[1], app);

    if app.show_chart {
        let bars = crate::report::stack_chart(&app.report.chart).len() as u16;
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((bars + 3).min(root[2].height / 2).max(5)),
                Constraint::Min(0),
            ])
            .split(root[2]);
        disk_chart::render_disk_chart(f, body[0], &app.report, app.chart_scroll, &app.theme);
        summary_table::render_summary_table(f, body[1], app);
    } else {
        summary_table::render_summary_table(f, root[2], app);
    }

    footer::render_footer(f, root[3], &app.theme, app.show_chart);
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let theme = &app.theme;
    let loaded = app.loaded_at.format("%H:%M:%S").to_string();
    let mut spans = vec![
        Span::styled(" invtop: Disk Space", theme.title),
        Span::styled(format!("   {}  (loaded {})  [{}]", app.source_name(), loaded, app.theme_variant.name()), theme.text_dim),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("   {}", status), theme.crit));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.header), area);
}

fn render_picker(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(Span::styled("Select a Computer", theme.title));

    let tabs = Tabs::new(app.options.iter().map(|o| Line::from(o.as_str())).collect::<Vec<_>>())
        .block(block)
        .style(theme.text_dim)
        .highlight_style(theme.selected)
        .select(app.selected)
        .divider(Span::styled("│", theme.border));
    f.render_widget(tabs, area);
}
