use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    NextComputer,  // →/l/Tab: next entry in the computer picker
    PrevComputer,  // ←/h/Shift-Tab
    AllComputers,  // a: jump back to "All Computers"
    SelectUp,
    SelectDown,
    ScrollUp,
    ScrollDown,
    JumpTop,
    JumpBottom,
    ToggleChart,   // c: show / hide the disk space chart
    Reload,        // r: re-read the inventory source
    CycleTheme,
    ShowHelp,
    Back,
    None,
}

pub fn handle_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Right, _) | (KeyCode::Char('l'), _) | (KeyCode::Tab, _) => Action::NextComputer,
        (KeyCode::Left,  _) | (KeyCode::Char('h'), _) | (KeyCode::BackTab, _) => Action::PrevComputer,
        (KeyCode::Char('a'), _) => Action::AllComputers,

        (KeyCode::Up,   _) | (KeyCode::Char('k'), _) => Action::SelectUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Action::SelectDown,
        (KeyCode::PageUp,   _) => Action::ScrollUp,
        (KeyCode::PageDown, _) => Action::ScrollDown,

        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Action::JumpTop,
        (KeyCode::Char('G'), _) | (KeyCode::End,  _) => Action::JumpBottom,

        (KeyCode::Char('c'), _) => Action::ToggleChart,
        (KeyCode::Char('r'), _) | (KeyCode::F(5), _) => Action::Reload,
        (KeyCode::Char('t'), _) => Action::CycleTheme,
        (KeyCode::Char('?'), _) | (KeyCode::F(1), _) => Action::ShowHelp,
        (KeyCode::Esc, _) => Action::Back,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_toggles_chart() {
        assert_eq!(handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(handle_key(key(KeyCode::Char('c'))), Action::ToggleChart);
    }

    #[test]
    fn picker_keys() {
        assert_eq!(handle_key(key(KeyCode::Right)), Action::NextComputer);
        assert_eq!(handle_key(key(KeyCode::Char('h'))), Action::PrevComputer);
        assert_eq!(handle_key(key(KeyCode::Char('a'))), Action::AllComputers);
        assert_eq!(handle_key(key(KeyCode::Char('x'))), Action::None);
    }
}
