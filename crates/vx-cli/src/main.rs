//! VoxCommand CLI: classify one command typed at the terminal.

use tracing_subscriber::EnvFilter;

use vx_cli::config::CliConfig;
use vx_cli::{input, session};
use vx_nlu::CommandProcessor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the report on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VX_CONFIG").ok());
    let config = CliConfig::load(config_path.as_deref())?;
    tracing::info!(
        backend = %config.nlu.backend,
        model_path = %config.nlu.model_path.display(),
        threshold = %config.nlu.confidence_threshold,
        "config loaded"
    );

    // ── Load model ──────────────────────────────────────────────
    let processor = CommandProcessor::from_config(&config.nlu);
    if let Err(e) = processor.manager().load(&config.nlu.model_path).await {
        tracing::error!(error = %e, "NLU model unavailable, not prompting");
        println!("Error loading NLU model: {e}");
        return Ok(());
    }

    // ── Read and process one command ────────────────────────────
    let command = tokio::task::spawn_blocking(|| {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        input::read_command(&mut stdin.lock(), &mut stdout)
    })
    .await??;

    print!("{}", session::respond(&processor, command.as_deref()).await);

    processor.manager().teardown().await;
    tracing::info!("vx-cli finished");
    Ok(())
}
