//! Command implementations

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::app::{AppContainer, CompressRequest, DefaultAppContainer};
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::domain::model::QualityLevel;
use crate::engine::Cancellation;
use crate::error::CompressXError;
use crate::output;

/// Execute the compress command
pub async fn compress(cli: &Cli, config: &AppConfig) -> Result<()> {
    let args = &cli.compress;
    info!("Input: {}", args.input.display());

    // Validate input file exists
    if !args.input.is_file() {
        return Err(CompressXError::InputFileNotFound {
            path: args.input.display().to_string(),
        }
        .into());
    }

    let quality = QualityLevel::from_option(args.quality.as_deref()).map_err(|_| {
        CompressXError::InvalidQuality {
            token: args.quality.clone().unwrap_or_default(),
        }
    })?;
    info!("Quality: {}", quality);

    let mut request = CompressRequest::new(&args.input, quality);
    if args.no_prompt {
        request = request.non_interactive();
    }

    let container = DefaultAppContainer::new(config, args.json);
    let report = container
        .compress_interactor()
        .execute(request, install_interrupt_handler())
        .await
        .map_err(CompressXError::from)
        .context("Failed to compress video")?;

    if args.json {
        println!("{}", output::render_json(&report)?);
    }

    info!("Compression workflow completed: {:?}", report.state);
    Ok(())
}

/// Whether the workflow already showed this failure to the operator
pub fn already_reported(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<CompressXError>(), Some(CompressXError::Domain(_)))
}

/// Forward Ctrl-C to the running workflow. Exits outright once nothing listens any more.
fn install_interrupt_handler() -> Cancellation {
    let (stop_tx, stop_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received");
            if stop_tx.send(()).is_err() {
                std::process::exit(130);
            }
        }
    });
    Cancellation::new(stop_rx)
}
