pub mod app;
pub mod catalog;
pub mod cli;
pub mod constants;
pub mod models;
pub mod runtime;
pub mod session;
pub mod timeline;
pub mod tui;
pub mod utils;

pub use app::{load_config, Config};
pub use models::{AnsweringService, HttpAnsweringService};
pub use runtime::{Launcher, Orchestrator};
pub use tui::run_ui;
pub use utils::{ClientError, ExchangeError};
