//! Soundproc CLI
//!
//! Command-line front end for inspecting and editing PCM WAVE files.

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use soundproc::cli::commands;
use soundproc::cli::{Cli, Commands};
use soundproc::SoundError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Soundproc v{}", env!("CARGO_PKG_VERSION"));
    debug!("{:?}", cli.command);

    if let Err(e) = handle_command(cli.command) {
        if let Some(hint) = e
            .downcast_ref::<SoundError>()
            .and_then(SoundError::recovery_suggestion)
        {
            eprintln!("hint: {}", hint);
        }
        return Err(e);
    }
    Ok(())
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Info { path, json } => {
            let context = format!("failed to inspect {}", path.display());
            commands::info(&path, json).context(context)
        }
        Commands::Validate { paths } => {
            let report = commands::validate(&paths)?;
            if !report.all_passed() {
                bail!(
                    "{} of {} files failed validation",
                    report.failed.len(),
                    report.checked()
                );
            }
            Ok(())
        }
        Commands::DropChannel {
            input,
            output,
            channel,
        } => {
            let context = format!("failed to drop channel from {}", input.display());
            commands::drop_channel(&input, &output, channel).context(context)
        }
        Commands::DuplicateChannel {
            input,
            output,
            source,
            position,
        } => {
            let context = format!("failed to duplicate channel in {}", input.display());
            commands::duplicate_channel(&input, &output, source, position).context(context)
        }
        Commands::SelectChannels {
            input,
            output,
            channels,
        } => {
            let context = format!("failed to select channels from {}", input.display());
            commands::select_channels(&input, &output, &channels).context(context)
        }
        Commands::Reencode { input, output } => {
            let context = format!("failed to re-encode {}", input.display());
            commands::reencode(&input, &output).context(context)
        }
    }
}
