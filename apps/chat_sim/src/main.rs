use std::{io, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use shared::protocol::{CommandOutcome, SimulationEvent};
use sim_core::{
    spawn_simulation, ControllerOptions, RandomMessageSource, Renderer, SimulationController,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod input;
mod render;

use config::{load_settings, OutputFormat, Settings};
use input::{parse_operator_line, OperatorInput, HELP};
use render::{JsonLinesRenderer, TerminalRenderer};

#[derive(Parser, Debug)]
#[command(about = "Simulated live chat for demos and stream overlays")]
struct Args {
    /// TOML settings file (defaults to ./chat_sim.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Initial messages per second, clamped to 1-200
    #[arg(long)]
    rate: Option<i64>,
    /// Seed for reproducible user names and messages
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,
    /// Label used for your own messages
    #[arg(long)]
    label: Option<String>,
    /// Start emitting immediately
    #[arg(long)]
    autostart: bool,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(rate) = self.rate {
            settings.initial_rate = shared::domain::RateSetting::clamped(rate);
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(label) = &self.label {
            settings.operator_label = label.clone();
        }
        if self.autostart {
            settings.autostart = true;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let renderer: Arc<dyn Renderer> = match settings.output {
        OutputFormat::Terminal => Arc::new(TerminalRenderer::new(io::stdout())),
        OutputFormat::Json => Arc::new(JsonLinesRenderer::new(io::stdout())),
    };
    let source = match settings.seed {
        Some(seed) => RandomMessageSource::seeded(seed),
        None => RandomMessageSource::new(),
    };
    let controller = SimulationController::new(
        Box::new(source),
        renderer,
        ControllerOptions {
            initial_rate: settings.initial_rate,
            operator_label: settings.operator_label.clone(),
            operator_color: settings.operator_color.clone(),
        },
    );
    let (handle, runtime_task) = spawn_simulation(controller);
    let notices = tokio::spawn(announce_events(handle.subscribe_events(), settings.output));

    info!(rate = settings.initial_rate.get(), output = ?settings.output, "chat simulation ready");
    if settings.output == OutputFormat::Terminal {
        eprintln!("{HELP}");
    }
    if settings.autostart {
        handle.start().await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read operator input")?
    {
        match parse_operator_line(&line) {
            Ok(OperatorInput::Command(command)) => {
                if let CommandOutcome::Ignored(reason) = handle.send(command).await? {
                    eprintln!("{}", console::ignored_notice(reason));
                }
            }
            Ok(OperatorInput::Status) => {
                let snapshot = handle.snapshot().await?;
                eprintln!("{}", console::status_line(&snapshot));
            }
            Ok(OperatorInput::Help) => eprintln!("{HELP}"),
            Ok(OperatorInput::Quit) => break,
            Err(error) => eprintln!("{error}"),
        }
    }

    handle.shutdown().await?;
    runtime_task
        .await
        .context("simulation runtime task failed")?;
    notices.abort();
    Ok(())
}

async fn announce_events(mut events: broadcast::Receiver<SimulationEvent>, format: OutputFormat) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = console::event_line(format, &event) {
                    println!("{line}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "simulation event listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
