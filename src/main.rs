mod app;
mod config;
mod input;
mod logging;
mod models;
mod report;
mod source;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::App;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use config::Config;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use models::disk::{DiskRow, Selection};
use ratatui::{backend::CrosstermBackend, Terminal};
use source::{InventorySource, JsonFileSource};
use std::io;
use std::panic;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "invtop", about = "btop-style disk space viewer for server inventory", version = "0.1")]
struct Cli {
    /// Computer to show, or "All Computers"
    #[arg(short, long)]
    computer: Option<String>,

    /// JSON export of the DiskSpace table (overrides config and INVTOP_DATA_FILE)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Color theme: default, dracula, gruvbox, nord
    #[arg(short = 't', long)]
    theme: Option<String>,

    /// Print the disk space report as JSON and exit
    #[arg(long)]
    json: bool,

    /// Print a human-readable disk space report and exit
    #[arg(long)]
    report: bool,

    /// List the selectable computers and exit
    #[arg(long)]
    computers: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "invtop", &mut io::stdout());
        return Ok(());
    }

    let cfg = Config::load();
    if cli.config {
        return run_print_config(&cfg);
    }

    let one_shot = cli.json || cli.report || cli.computers;
    let target = if one_shot { logging::LogTarget::Stderr } else { logging::LogTarget::File };
    // Logging is best-effort; a missing data dir must not block the viewer.
    let _ = logging::init(&cfg.logging.level, cli.verbose, target);

    let source = resolve_source(&cli, &cfg)?;
    let selection = Selection::parse(
        cli.computer.as_deref().unwrap_or(&cfg.general.default_selection),
    );

    if cli.computers {
        return run_list_computers(&source);
    }
    if cli.json {
        return run_json(&source, &cfg, &selection);
    }
    if cli.report {
        return run_report(&source, &cfg, &selection);
    }

    let theme_name = cli.theme.as_deref().unwrap_or(&cfg.display.theme);
    let initial_theme = ui::theme::ThemeVariant::from_name(theme_name);

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    // Load before entering the alternate screen so schema errors print normally.
    let mut app = App::new(Box::new(source), &cfg, initial_theme, &selection)?;
    let result = run(&mut app);
    restore_terminal()?;
    result
}

fn resolve_source(cli: &Cli, cfg: &Config) -> Result<JsonFileSource> {
    let path = cli.file.clone().or_else(|| cfg.data_file()).with_context(|| {
        let cfg_path = Config::config_path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(unknown)".to_string());
        format!(
            "no inventory file: pass --file, set {}, or set general.data_file in {}",
            config::ENV_DATA_FILE, cfg_path
        )
    })?;
    Ok(JsonFileSource::new(path))
}

fn load_rows(source: &JsonFileSource) -> Result<Vec<DiskRow>> {
    source
        .fetch_disk_rows()
        .with_context(|| format!("loading {}", source.describe()))
}

fn run_list_computers(source: &JsonFileSource) -> Result<()> {
    let rows = load_rows(source)?;
    for name in report::selection_options(&rows) {
        println!("{}", name);
    }
    Ok(())
}

fn run_json(source: &JsonFileSource, cfg: &Config, selection: &Selection) -> Result<()> {
    use serde_json::json;

    let rows = load_rows(source)?;
    let report = cfg.report_builder().build(&rows, selection);
    let snapshot = json!({
        "invtop_version": "0.1",
        "generated_at":   chrono::Local::now().to_rfc3339(),
        "source":         source.describe(),
        "report":         report,
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn run_report(source: &JsonFileSource, cfg: &Config, selection: &Selection) -> Result<()> {
    let rows = load_rows(source)?;
    let report = cfg.report_builder().build(&rows, selection);
    print!("{}", util::text_report::generate(&report, &source.describe()));
    Ok(())
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let data_file = cfg.data_file()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(not set)".to_string());
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  data_file         = {}", data_file);
    println!("  default_selection = {}", cfg.general.default_selection);
    println!();
    println!("[display]");
    println!("  theme            = {}", cfg.display.theme);
    println!("  timestamp_format = {}", cfg.display.timestamp_format);
    println!("  placeholder      = {}", cfg.display.placeholder);
    println!();
    println!("[logging]");
    println!("  level = {}", cfg.logging.level);
    if let Some(log) = logging::log_path() {
        println!("  file  = {}", log.to_string_lossy());
    }
    Ok(())
}

fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    app.run(&mut term)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
