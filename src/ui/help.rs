use crate::ui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, theme: &Theme) {
    let area = centered_rect(64, 22, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_focused)
        .title(Span::styled(" invtop: Keybindings (? or Esc to close) ", theme.title));

    let lines = vec![
        key_line(theme, "Computer picker", ""),
        key_line(theme, "  → / l / Tab",     "Next computer"),
        key_line(theme, "  ← / h / S-Tab",   "Previous computer"),
        key_line(theme, "  a",               "All Computers"),
        Line::from(""),
        key_line(theme, "Drive table", ""),
        key_line(theme, "  ↑↓ / j k",        "Select drive"),
        key_line(theme, "  PageUp/Dn",       "Move by page"),
        key_line(theme, "  g / G",           "Jump first / last"),
        Line::from(""),
        key_line(theme, "General", ""),
        key_line(theme, "  c",               "Show / hide disk space chart"),
        key_line(theme, "  r / F5",          "Reload inventory"),
        key_line(theme, "  t",               "Cycle color theme"),
        key_line(theme, "  q / Ctrl-C",      "Quit"),
        Line::from(""),
        key_line(theme, "Drives are sorted by free space, least first.", ""),
        key_line(theme, "A trailing ! marks free space larger than the drive.", ""),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn key_line<'a>(theme: &Theme, key: &'a str, desc: &'a str) -> Line<'a> {
    if desc.is_empty() {
        Line::from(Span::styled(key, theme.title))
    } else {
        Line::from(vec![
            Span::styled(format!("{:<20}", key), theme.warn),
            Span::styled(desc, theme.text),
        ])
    }
}

/// Centered Rect of `width` x `height` cells, capped at the available area.
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let w = width.min(r.width);
    let h = height.min(r.height);
    let x = r.x + (r.width.saturating_sub(w)) / 2;
    let y = r.y + (r.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
