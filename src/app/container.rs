use std::io;
use std::sync::Arc;

use crate::adapters::{
    ConsolePromptAdapter, LocalFsAdapter, TerminalReporter, TokioProcessAdapter,
    ViewerLauncherAdapter,
};
use crate::app::compress_interactor::CompressInteractor;
use crate::config::AppConfig;
use crate::ports::{FsPort, LauncherPort, ProcessPort, PromptPort, ReporterPort};

pub trait AppContainer: Send + Sync {
    fn compress_interactor(&self) -> Arc<CompressInteractor>;
}

pub struct DefaultAppContainer {
    compress_interactor: Arc<CompressInteractor>,
}

impl DefaultAppContainer {
    /// Wire the real adapters. With `json_output`, messages and questions move to stderr.
    pub fn new(config: &AppConfig, json_output: bool) -> Self {
        let process_port = Arc::new(TokioProcessAdapter::new());
        let fs_port = Arc::new(LocalFsAdapter::new());
        let prompt_port = Arc::new(if json_output {
            ConsolePromptAdapter::with_io(
                Box::new(io::BufReader::new(io::stdin())),
                Box::new(io::stderr()),
            )
        } else {
            ConsolePromptAdapter::new()
        });
        let launcher_port = Arc::new(ViewerLauncherAdapter::new(&config.viewer));
        let reporter_port = Arc::new(TerminalReporter::new(json_output));

        let compress_interactor = Arc::new(CompressInteractor::new(
            process_port as Arc<dyn ProcessPort>,
            fs_port as Arc<dyn FsPort>,
            prompt_port as Arc<dyn PromptPort>,
            launcher_port as Arc<dyn LauncherPort>,
            reporter_port as Arc<dyn ReporterPort>,
            &config.tools.ffprobe,
            &config.tools.ffmpeg,
        ));

        Self { compress_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn compress_interactor(&self) -> Arc<CompressInteractor> {
        Arc::clone(&self.compress_interactor)
    }
}
