use bandwatch::{AppResult, cli::Cli, config::Config, init_logging, session::SessionManager};

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Config subcommands print and exit without starting the dashboard
    if let Some(action) = cli.config_action() {
        Config::handle_command(&cli.config_file, &action)?;
        return Ok(());
    }

    // Load configuration, then apply CLI overrides
    let mut config = Config::load_or_default(&cli.config_file);
    cli.apply_overrides(&mut config);

    let _log_guard = init_logging(&cli.effective_log_level(), &config.log.file_path)?;

    tracing::info!("Bandwatch price band dashboard starting...");
    tracing::debug!("CLI arguments: {:?}", cli);

    // Create session manager
    let mut session_manager = SessionManager::new(config)?;

    // Initialize session (spawns the UI task and the initial data load)
    session_manager.initialize().await?;

    // Run the refresh scheduler until shutdown
    session_manager.run().await?;

    Ok(())
}
