mod app;
mod config;
mod input;
mod keybinds;
mod ui;

use app::App;
use config::Config;
use directories::ProjectDirs;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
};
use ratatui::crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("io", "mailcapsule", "capsule-link") {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config/default.toml")
    }
}

// Logs go to a file: stdout and stderr belong to the terminal UI.
fn init_tracing() {
    let log_dir = ProjectDirs::from("io", "mailcapsule", "capsule-link")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }

    if let Ok(file) = std::fs::File::create(log_dir.join("capsule-link.log")) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init();
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    init_tracing();

    terminal::enable_raw_mode()?;
    let mut terminal = ratatui::init();
    ratatui::crossterm::execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let result = run(&mut terminal);

    let _ = ratatui::crossterm::execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    ratatui::restore();

    result
}

fn run(
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
) -> color_eyre::Result<()> {
    let config_path = get_config_path();
    let mut config = Config::load_or_default(&config_path);
    config.apply_env_overrides();

    // The first argument, when present, is a redirect URL to interpret at
    // startup.
    let startup_callback = std::env::args().nth(1);

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();
    let mut app = App::new(config.clone());

    rt.block_on(async {
        if let Err(e) = app.init(&config, startup_callback.as_deref()).await {
            eprintln!("Failed to initialize app: {}", e);
        }
    });

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;

            if let Event::Key(key) = &event {
                if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    break;
                }
            }

            if let Ok(should_quit) = app.handle_event(event) {
                if should_quit {
                    break;
                }
            }
        }

        app.process_app_events();

        if let Some(url) = app.take_pending_navigation() {
            tracing::info!("Opening the consent page in the browser");
            if let Err(e) = open::that_detached(&url) {
                app.report_error("Failed to open the browser", e);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
