use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_footer(f: &mut Frame, area: Rect, theme: &Theme, chart_open: bool) {
    let chart = if chart_open { "Hide chart" } else { "Show chart" };
    let keys: [(&str, &str); 8] = [
        ("q", "Quit"), ("←→", "Computer"), ("a", "All"), ("↑↓", "Select"),
        ("c", chart), ("r", "Reload"), ("t", "Theme"), ("?", "Help"),
    ];

    let mut spans: Vec<Span> = vec![Span::styled(" ", theme.footer_bg)];
    for (key, desc) in keys {
        spans.push(Span::styled(format!(" {} ", key), theme.footer_key));
        spans.push(Span::styled(format!("{}  ", desc), theme.footer_text));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.footer_bg), area);
}
