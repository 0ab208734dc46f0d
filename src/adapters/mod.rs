// Adapters - External system implementations

pub mod console_prompt;
pub mod fs_local;
pub mod process_tokio;
pub mod terminal_reporter;
pub mod toml_config;
pub mod viewer_launcher;

// Re-export adapters
pub use console_prompt::ConsolePromptAdapter;
pub use fs_local::LocalFsAdapter;
pub use process_tokio::TokioProcessAdapter;
pub use terminal_reporter::TerminalReporter;
pub use toml_config::TomlConfigAdapter;
pub use viewer_launcher::ViewerLauncherAdapter;
