use ratatui::style::{Color, Modifier, Style};

const fn rgb(hex: u32) -> Color {
    Color::Rgb(
        ((hex >> 16) & 0xFF) as u8,
        ((hex >>  8) & 0xFF) as u8,
        ( hex        & 0xFF) as u8,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThemeVariant {
    Default,
    Dracula,
    Gruvbox,
    Nord,
}

impl ThemeVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Dracula => "Dracula",
            Self::Gruvbox => "Gruvbox",
            Self::Nord    => "Nord",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Default => Self::Dracula,
            Self::Dracula => Self::Gruvbox,
            Self::Gruvbox => Self::Nord,
            Self::Nord    => Self::Default,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dracula" => Self::Dracula,
            "gruvbox" => Self::Gruvbox,
            "nord"    => Self::Nord,
            _         => Self::Default,
        }
    }
}

/// Raw colors a variant is built from.
struct Palette {
    fg:      Color,
    dim:     Color,
    accent:  Color,
    panel:   Color,
    border:  Color,
    select:  Color,
    on_sel:  Color,
    green:   Color,
    yellow:  Color,
    orange:  Color,
    red:     Color,
}

#[derive(Clone)]
pub struct Theme {
    pub border:         Style,
    pub border_focused: Style,
    pub title:          Style,
    pub text:           Style,
    pub text_dim:       Style,
    pub selected:       Style,
    pub header:         Style,
    pub warn:           Style,
    pub crit:           Style,
    /// Used segment of a drive bar (orange).
    pub used_bar:       Style,
    /// Free segment of a drive bar (green).
    pub free_bar:       Style,
    pub pct_low:        Style,
    pub pct_mid:        Style,
    pub pct_high:       Style,
    pub pct_crit:       Style,
    pub footer_bg:      Style,
    pub footer_key:     Style,
    pub footer_text:    Style,
}

impl Theme {
    pub fn for_variant(v: ThemeVariant) -> Self {
        let p = match v {
            ThemeVariant::Default => Palette {
                fg: Color::White, dim: Color::DarkGray, accent: Color::Cyan,
                panel: Color::DarkGray, border: Color::DarkGray,
                select: Color::Cyan, on_sel: Color::Black,
                green: Color::Green, yellow: Color::Yellow,
                orange: rgb(0xffa500), red: Color::Red,
            },
            // https://draculatheme.com/
            ThemeVariant::Dracula => Palette {
                fg: rgb(0xf8f8f2), dim: rgb(0x6272a4), accent: rgb(0xbd93f9),
                panel: rgb(0x44475a), border: rgb(0x6272a4),
                select: rgb(0xff79c6), on_sel: rgb(0x282a36),
                green: rgb(0x50fa7b), yellow: rgb(0xf1fa8c),
                orange: rgb(0xffb86c), red: rgb(0xff5555),
            },
            // https://github.com/morhetz/gruvbox
            ThemeVariant::Gruvbox => Palette {
                fg: rgb(0xebdbb2), dim: rgb(0xa89984), accent: rgb(0x83a598),
                panel: rgb(0x3c3836), border: rgb(0x504945),
                select: rgb(0xd79921), on_sel: rgb(0x282828),
                green: rgb(0xb8bb26), yellow: rgb(0xfabd2f),
                orange: rgb(0xfe8019), red: rgb(0xfb4934),
            },
            // https://www.nordtheme.com/
            ThemeVariant::Nord => Palette {
                fg: rgb(0xe5e9f0), dim: rgb(0x4c566a), accent: rgb(0x88c0d0),
                panel: rgb(0x3b4252), border: rgb(0x4c566a),
                select: rgb(0x88c0d0), on_sel: rgb(0x2e3440),
                green: rgb(0xa3be8c), yellow: rgb(0xebcb8b),
                orange: rgb(0xd08770), red: rgb(0xbf616a),
            },
        };
        Self::from_palette(&p)
    }

    fn from_palette(p: &Palette) -> Self {
        let bold = Modifier::BOLD;
        Self {
            border:         Style::default().fg(p.border),
            border_focused: Style::default().fg(p.accent),
            title:          Style::default().fg(p.fg).add_modifier(bold),
            text:           Style::default().fg(p.fg),
            text_dim:       Style::default().fg(p.dim),
            selected:       Style::default().fg(p.on_sel).bg(p.select),
            header:         Style::default().fg(p.fg).bg(p.panel).add_modifier(bold),
            warn:           Style::default().fg(p.yellow),
            crit:           Style::default().fg(p.red).add_modifier(bold),
            used_bar:       Style::default().fg(p.orange),
            free_bar:       Style::default().fg(p.green),
            pct_low:        Style::default().fg(p.green),
            pct_mid:        Style::default().fg(p.yellow),
            pct_high:       Style::default().fg(p.orange),
            pct_crit:       Style::default().fg(p.red).add_modifier(bold),
            footer_bg:      Style::default().bg(p.panel).fg(p.fg),
            footer_key:     Style::default().bg(p.panel).fg(p.accent).add_modifier(bold),
            footer_text:    Style::default().bg(p.panel).fg(p.dim),
        }
    }

    /// Style for a usage ratio; `None` (undefined usage) is dimmed.
    pub fn usage_style(&self, ratio: Option<f64>) -> Style {
        match ratio {
            None                  => self.text_dim,
            Some(r) if r >= 0.95  => self.pct_crit,
            Some(r) if r >= 0.85  => self.pct_high,
            Some(r) if r >= 0.60  => self.pct_mid,
            Some(r) if r < 0.0    => self.warn,
            Some(_)               => self.pct_low,
        }
    }
}
