use directories::ProjectDirs;
use oauth2_auth::app::App;
use oauth2_auth::Config;
use ratatui::crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "oauth2-auth", "oauth2-auth")
}

fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = project_dirs() {
        proj_dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config/default.toml")
    }
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing() -> io::Result<()> {
    let log_dir = project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("oauth2-auth.log"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = init_tracing() {
        eprintln!("Logging disabled: {e}");
    }

    let config = Config::load_or_default(&get_config_path());
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();
    let mut app = App::from_config(config).map_err(|e| color_eyre::eyre::eyre!("{e:#}"))?;

    let mut terminal = ratatui::init();
    ratatui::crossterm::execute!(io::stdout(), EnableBracketedPaste)?;

    let result = run(&mut terminal, &mut app);

    let _ = ratatui::crossterm::execute!(io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> color_eyre::Result<()> {
    app.init();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            match app.handle_event(event) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => tracing::warn!("Event handling failed: {e:#}"),
            }
        }

        app.process_events();

        if app.should_quit {
            break;
        }
    }

    app.quit();
    Ok(())
}
