use serde::{Deserialize, Serialize};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PopupError {
    #[error("Popup command is empty")]
    EmptyCommand,

    #[error("Failed to launch popup command `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open the system browser: {0}")]
    Browser(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for PopupGeometry {
    fn default() -> Self {
        Self {
            width: 600,
            height: 700,
        }
    }
}

/// Opens an external URL in a secondary window.
///
/// Fire-and-forget: the caller never observes the window afterwards.
pub trait PopupOpener: Send + Sync {
    fn open(&self, url: &str);
}

/// How a popup request is carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Hand the URL untouched to the platform's default browser.
    SystemBrowser(String),
    /// Run a configured command with placeholders already substituted.
    Command(Vec<String>),
}

/// Launches the popup in the system browser, or through a configured
/// command.
///
/// Command arguments may contain `{url}`, `{width}` and `{height}`
/// placeholders. If no argument mentions `{url}`, the URL is appended as the
/// last argument. Commands must be spawned from within a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct CommandPopupOpener {
    command: Vec<String>,
    geometry: PopupGeometry,
}

impl CommandPopupOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty command keeps the system browser.
    pub fn with_command(mut self, command: Vec<String>) -> Self {
        self.command = command;
        self
    }

    pub fn with_geometry(mut self, geometry: PopupGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> PopupGeometry {
        self.geometry
    }

    pub fn launch_for(&self, url: &str) -> Result<Launch, PopupError> {
        if self.command.is_empty() {
            return Ok(Launch::SystemBrowser(url.to_string()));
        }
        if self.command[0].trim().is_empty() {
            return Err(PopupError::EmptyCommand);
        }

        let width = self.geometry.width.to_string();
        let height = self.geometry.height.to_string();
        let mut has_url = false;

        let mut argv: Vec<String> = self
            .command
            .iter()
            .map(|arg| {
                if arg.contains("{url}") {
                    has_url = true;
                }
                arg.replace("{url}", url)
                    .replace("{width}", &width)
                    .replace("{height}", &height)
            })
            .collect();

        if !has_url {
            argv.push(url.to_string());
        }

        Ok(Launch::Command(argv))
    }

    pub fn spawn(&self, url: &str) -> Result<(), PopupError> {
        match self.launch_for(url)? {
            Launch::SystemBrowser(url) => {
                debug!("Opening authorization popup in the system browser");
                open::that_detached(&url).map_err(PopupError::Browser)
            }
            Launch::Command(argv) => {
                let (program, args) = argv.split_first().ok_or(PopupError::EmptyCommand)?;

                debug!(
                    program = %program,
                    width = self.geometry.width,
                    height = self.geometry.height,
                    "Opening authorization popup"
                );

                Command::new(program)
                    .args(args)
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .map_err(|source| PopupError::Spawn {
                        program: program.clone(),
                        source,
                    })?;

                Ok(())
            }
        }
    }
}

impl PopupOpener for CommandPopupOpener {
    fn open(&self, url: &str) {
        if let Err(e) = self.spawn(url) {
            warn!("Failed to open authorization popup: {e}");
        }
    }
}
