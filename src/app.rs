use crate::config::Config;
use crate::input::{handle_key, Action};
use crate::models::disk::{DiskRow, Selection};
use crate::report::{selection_options, DiskSpaceReport, DiskSpaceReportBuilder};
use crate::source::InventorySource;
use crate::ui::theme::{Theme, ThemeVariant};
use crate::ui::{dashboard, help};
use anyhow::Result;
use crossterm::event::{self, Event, MouseEventKind};
use ratatui::widgets::TableState;
use std::time::Duration;
use tracing::{info, warn};

const POLL_TIMEOUT: Duration = Duration::from_millis(200);
const PAGE: usize = 10;

pub struct App {
    // Theme
    pub theme:         Theme,
    pub theme_variant: ThemeVariant,

    source:  Box<dyn InventorySource>,
    builder: DiskSpaceReportBuilder,

    // Immutable snapshot of the last successful load
    rows: Vec<DiskRow>,

    // Computer picker: "All Computers" + every computer in the snapshot
    pub options:  Vec<String>,
    pub selected: usize,

    // Report for the current selection, rebuilt on every change
    pub report: DiskSpaceReport,

    pub table_state:  TableState,
    pub chart_scroll: usize,
    pub show_chart:   bool,
    pub show_help:    bool,

    /// Last reload failure, shown in the header until the next good load.
    pub status: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Local>,

    pub should_quit: bool,
}

impl App {
    pub fn new(
        source: Box<dyn InventorySource>,
        config: &Config,
        theme_variant: ThemeVariant,
        initial: &Selection,
    ) -> Result<Self> {
        let rows    = source.fetch_disk_rows()?;
        let builder = config.report_builder();
        let options = selection_options(&rows);
        let report  = builder.build(&rows, &Selection::AllComputers);

        let mut app = Self {
            theme: Theme::for_variant(theme_variant),
            theme_variant,
            source,
            builder,
            rows,
            options,
            selected:     0,
            report,
            table_state:  TableState::default(),
            chart_scroll: 0,
            show_chart:   true,
            show_help:    false,
            status:       None,
            loaded_at:    chrono::Local::now(),
            should_quit:  false,
        };
        app.select(initial);
        Ok(app)
    }

    /// Picker labels are taken verbatim: inventory names are matched exactly,
    /// so padding or an empty name must survive the round trip.
    pub fn selection(&self) -> Selection {
        match self.options.get(self.selected) {
            Some(name) if self.selected > 0 => Selection::Computer(name.clone()),
            _                               => Selection::AllComputers,
        }
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    // ── Main event loop ───────────────────────────────────────────────

    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> Result<()> {
        loop {
            let show_help  = self.show_help;
            let theme_snap = self.theme.clone();

            terminal.draw(|f| {
                dashboard::render(f, self);
                if show_help {
                    help::render(f, &theme_snap);
                }
            })?;

            if event::poll(POLL_TIMEOUT)? {
                match event::read()? {
                    Event::Key(key) => {
                        let action = handle_key(key);
                        self.handle_action(action);
                    }
                    Event::Mouse(me) => match me.kind {
                        MouseEventKind::ScrollDown => self.handle_action(Action::SelectDown),
                        MouseEventKind::ScrollUp   => self.handle_action(Action::SelectUp),
                        _ => {}
                    },
                    _ => {}
                }
            }

            if self.should_quit { break; }
        }
        Ok(())
    }

    // ── Input dispatch ────────────────────────────────────────────────

    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ShowHelp | Action::Back => self.show_help = false,
                _ => {}
            }
            return;
        }

        match action {
            Action::Quit         => self.should_quit = true,
            Action::NextComputer => self.cycle_selection(1),
            Action::PrevComputer => self.cycle_selection(-1),
            Action::AllComputers => self.set_selected(0),
            Action::SelectUp     => self.select_delta(-1),
            Action::SelectDown   => self.select_delta(1),
            Action::ScrollUp     => self.select_delta(-(PAGE as i64)),
            Action::ScrollDown   => self.select_delta(PAGE as i64),
            Action::JumpTop      => self.select_delta(i64::MIN),
            Action::JumpBottom   => self.select_delta(i64::MAX),
            Action::ToggleChart  => self.show_chart = !self.show_chart,
            Action::Reload       => self.reload(),
            Action::CycleTheme   => {
                self.theme_variant = self.theme_variant.next();
                self.theme = Theme::for_variant(self.theme_variant);
            }
            Action::ShowHelp     => self.show_help = true,
            Action::Back         => {}
            Action::None         => {}
        }
    }

    // ── Selection ─────────────────────────────────────────────────────

    fn select(&mut self, selection: &Selection) {
        let name = match selection {
            Selection::AllComputers => return self.set_selected(0),
            Selection::Computer(name) => name,
        };
        match self.options.iter().skip(1).position(|o| o == name) {
            Some(i) => self.set_selected(i + 1),
            None => {
                warn!(computer = %name, "computer not in inventory, showing all computers");
                self.set_selected(0);
            }
        }
    }

    fn cycle_selection(&mut self, dir: i64) {
        let n = self.options.len() as i64;
        if n == 0 { return; }
        let next = (self.selected as i64 + dir).rem_euclid(n);
        self.set_selected(next as usize);
    }

    fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.options.len().saturating_sub(1));
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.report = self.builder.build(&self.rows, &self.selection());
        self.chart_scroll = 0;
        let first = if self.report.is_empty() { None } else { Some(0) };
        self.table_state.select(first);
    }

    fn select_delta(&mut self, delta: i64) {
        let len = self.report.summary.len();
        if len == 0 { return; }
        let cur  = self.table_state.selected().unwrap_or(0) as i64;
        let next = cur.saturating_add(delta).clamp(0, len as i64 - 1) as usize;
        self.table_state.select(Some(next));
        self.chart_scroll = self.report.bar_index(next).unwrap_or(0);
    }

    // ── Data ──────────────────────────────────────────────────────────

    /// Re-read the source. On failure the previous snapshot stays on screen.
    pub fn reload(&mut self) {
        match self.source.fetch_disk_rows() {
            Ok(rows) => {
                let current = self.selection();
                info!(rows = rows.len(), "inventory reloaded");
                self.options   = selection_options(&rows);
                self.rows      = rows;
                self.status    = None;
                self.loaded_at = chrono::Local::now();
                self.select(&current);
            }
            Err(e) => {
                warn!(error = %e, "reload failed; keeping previous snapshot");
                self.status = Some(format!("reload failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Hands out queued responses, repeating the last one.
    struct ScriptedSource {
        responses: Rc<RefCell<Vec<Result<Vec<DiskRow>, SourceError>>>>,
    }

    impl InventorySource for ScriptedSource {
        fn fetch_disk_rows(&self) -> Result<Vec<DiskRow>, SourceError> {
            let mut q = self.responses.borrow_mut();
            if q.len() > 1 {
                q.remove(0)
            } else {
                match q.first() {
                    Some(Ok(rows)) => Ok(rows.clone()),
                    _              => Err(SourceError::NotAnArray),
                }
            }
        }

        fn describe(&self) -> String {
            "scripted".into()
        }
    }

    fn rows() -> Vec<DiskRow> {
        vec![
            DiskRow::new("SRV01", "C:", 500.0, 100.0, None),
            DiskRow::new("SRV02", "C:", 200.0, 10.0, None),
            DiskRow::new("SRV01", "D:", 1000.0, 1000.0, None),
        ]
    }

    fn app_with(responses: Vec<Result<Vec<DiskRow>, SourceError>>, initial: &Selection) -> App {
        let source = ScriptedSource { responses: Rc::new(RefCell::new(responses)) };
        App::new(Box::new(source), &Config::default(), ThemeVariant::Default, initial).unwrap()
    }

    #[test]
    fn starts_on_requested_computer() {
        let app = app_with(vec![Ok(rows())], &Selection::Computer("SRV02".into()));
        assert_eq!(app.options, ["All Computers", "SRV01", "SRV02"]);
        assert_eq!(app.selection(), Selection::Computer("SRV02".into()));
        assert_eq!(app.report.rows.len(), 1);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn unknown_computer_falls_back_to_all() {
        let app = app_with(vec![Ok(rows())], &Selection::Computer("NOPE".into()));
        assert_eq!(app.selection(), Selection::AllComputers);
        assert_eq!(app.report.rows.len(), 3);
    }

    #[test]
    fn picker_wraps_both_ways() {
        let mut app = app_with(vec![Ok(rows())], &Selection::AllComputers);
        app.handle_action(Action::PrevComputer);
        assert_eq!(app.selection(), Selection::Computer("SRV02".into()));
        app.handle_action(Action::NextComputer);
        assert_eq!(app.selection(), Selection::AllComputers);
        app.handle_action(Action::NextComputer);
        assert_eq!(app.selection(), Selection::Computer("SRV01".into()));
        assert_eq!(app.report.rows.len(), 2);
        app.handle_action(Action::AllComputers);
        assert_eq!(app.selection(), Selection::AllComputers);
    }

    #[test]
    fn row_selection_is_clamped() {
        let mut app = app_with(vec![Ok(rows())], &Selection::AllComputers);
        app.handle_action(Action::JumpBottom);
        assert_eq!(app.table_state.selected(), Some(2));
        app.handle_action(Action::SelectDown);
        assert_eq!(app.table_state.selected(), Some(2));
        app.handle_action(Action::JumpTop);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn chart_scroll_tracks_merged_bar() {
        let rows = vec![
            DiskRow::new("SRV01", "C:", 100.0, 10.0, None),
            DiskRow::new("SRV01", "C:", 100.0, 20.0, None),
            DiskRow::new("SRV02", "D:", 100.0, 30.0, None),
        ];
        let mut app = app_with(vec![Ok(rows)], &Selection::AllComputers);
        app.handle_action(Action::JumpBottom);
        assert_eq!(app.table_state.selected(), Some(2));
        assert_eq!(app.chart_scroll, 1);
        app.handle_action(Action::SelectUp);
        assert_eq!(app.chart_scroll, 0);
    }

    #[test]
    fn failed_reload_keeps_snapshot() {
        let mut app = app_with(
            vec![Ok(rows()), Err(SourceError::NotAnArray)],
            &Selection::Computer("SRV01".into()),
        );
        app.handle_action(Action::Reload);
        assert!(app.status.as_deref().unwrap_or("").contains("reload failed"));
        assert_eq!(app.report.rows.len(), 2);
        assert_eq!(app.selection(), Selection::Computer("SRV01".into()));
    }

    #[test]
    fn reload_keeps_selection_by_name() {
        let mut fresh = rows();
        fresh.insert(0, DiskRow::new("SRV00", "C:", 10.0, 5.0, None));
        let mut app = app_with(vec![Ok(rows()), Ok(fresh)], &Selection::Computer("SRV02".into()));
        app.handle_action(Action::Reload);
        assert!(app.status.is_none());
        assert_eq!(app.options.len(), 4);
        assert_eq!(app.selection(), Selection::Computer("SRV02".into()));
    }

    #[test]
    fn picker_keeps_names_verbatim() {
        let rows = vec![
            DiskRow::new("SRV01 ", "C:", 100.0, 40.0, None),
            DiskRow::new("SRV02", "C:", 100.0, 60.0, None),
            DiskRow::new("", "D:", 50.0, 5.0, None),
        ];
        let mut app = app_with(vec![Ok(rows)], &Selection::AllComputers);
        app.handle_action(Action::NextComputer);
        assert_eq!(app.selection(), Selection::Computer("SRV01 ".into()));
        assert_eq!(app.report.rows.len(), 1);

        app.handle_action(Action::PrevComputer);
        app.handle_action(Action::PrevComputer);
        assert_eq!(app.selection(), Selection::Computer(String::new()));
        assert_eq!(app.report.rows.len(), 1);
        assert_eq!(app.report.rows[0].row.drive, "D:");
    }

    #[test]
    fn padded_initial_selection_is_matched_exactly() {
        let rows = vec![DiskRow::new("SRV01 ", "C:", 100.0, 40.0, None)];
        let app = app_with(vec![Ok(rows)], &Selection::Computer("SRV01 ".into()));
        assert_eq!(app.selected, 1);
        assert_eq!(app.report.rows.len(), 1);
    }

    #[test]
    fn help_swallows_other_keys() {
        let mut app = app_with(vec![Ok(rows())], &Selection::AllComputers);
        app.handle_action(Action::ShowHelp);
        app.handle_action(Action::NextComputer);
        assert_eq!(app.selection(), Selection::AllComputers);
        app.handle_action(Action::Back);
        assert!(!app.show_help);
    }
}
