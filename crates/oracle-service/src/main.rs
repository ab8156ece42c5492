use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oracle_account::{LocalSigner, SignerInterface, SignerQuorum};
use oracle_chains::{ChainSource, FeederClient};
use oracle_config::{ConfigLoader, SignerSettings};
use oracle_core::{AttestationPipeline, Poller};
use oracle_service::api::ApiServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bridge-oracle")]
#[command(about = "Cross-domain bridge attestation oracle", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(short, long, value_name = "FILE", default_value = "config/oracle.toml")]
	config: PathBuf,

	#[arg(long, env = "ORACLE_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Start the oracle service
	Start,
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match cli.command {
		Some(Commands::Start) | None => start_service(cli).await,
		Some(Commands::Validate) => validate_config(cli).await,
	}
}

async fn start_service(cli: Cli) -> Result<()> {
	info!("Starting bridge oracle");
	info!("Loading configuration from: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	info!("Configuration loaded successfully");
	info!("Oracle name: {}", config.oracle.name);
	info!(
		"Watching {} on {} for {}",
		config.chain.gateway_address, config.chain.server, config.chain.event_name
	);

	let quorum = Arc::new(build_quorum(&config.signers).context("Failed to initialize signers")?);
	info!("Signer quorum ready with {} signer(s)", quorum.len());

	let chain: Arc<dyn ChainSource> = Arc::new(FeederClient::new(&config.chain.server));
	let pipeline = Arc::new(
		AttestationPipeline::new(
			chain.clone(),
			quorum,
			&config.chain.gateway_address,
			&config.chain.event_name,
			config.oracle.message_kind,
		)
		.context("Failed to build attestation pipeline")?,
	);

	let mut handles = Vec::new();

	if config.poller.enabled {
		let poller = Poller::new(
			chain.clone(),
			pipeline.clone(),
			Duration::from_secs(config.poller.poll_interval_secs),
		);
		let (sink, mut observed) = mpsc::unbounded_channel::<Vec<oracle_types::Attestation>>();

		handles.push(tokio::spawn(async move {
			while let Some(attestations) = observed.recv().await {
				match attestations.first() {
					Some(first) => info!(
						"Observed transfer {} with {} attestation(s)",
						first.data.hash,
						attestations.len()
					),
					None => info!("Observed transfer with an empty signer set"),
				}
			}
		}));
		handles.push(tokio::spawn(poller.run(sink)));
	}

	if config.api.enabled {
		let server = ApiServer::new(
			config.api.host.clone(),
			config.api.port,
			config.oracle.protocol.clone(),
			pipeline.clone(),
		);
		handles.push(tokio::spawn(async move {
			if let Err(e) = server.run().await {
				tracing::error!("API server error: {}", e);
			}
		}));
	}

	info!("Bridge oracle started");

	setup_shutdown_signal().await;

	info!("Shutdown signal received, stopping services...");

	for handle in handles {
		handle.abort();
	}

	info!("Bridge oracle stopped");
	Ok(())
}

async fn validate_config(cli: Cli) -> Result<()> {
	info!("Validating configuration file: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	// Deriving the quorum catches bad credentials and duplicate addresses.
	let quorum = build_quorum(&config.signers).context("Invalid signer configuration")?;

	info!("Configuration is valid");
	info!("Oracle name: {}", config.oracle.name);
	info!("Protocol tag: {}", config.oracle.protocol);
	info!(
		"Watching {} on {} for {}",
		config.chain.gateway_address, config.chain.server, config.chain.event_name
	);
	for address in quorum.addresses() {
		info!("  Signer: {}", address);
	}

	Ok(())
}

fn build_quorum(signers: &[SignerSettings]) -> Result<SignerQuorum> {
	let mut built: Vec<Arc<dyn SignerInterface>> = Vec::with_capacity(signers.len());

	for settings in signers {
		let signer = match (&settings.mnemonic, &settings.private_key) {
			(Some(mnemonic), None) => {
				LocalSigner::from_mnemonic(mnemonic, settings.index.unwrap_or(0))?
			}
			(None, Some(key)) => LocalSigner::from_private_key(key)?,
			_ => anyhow::bail!("signer entry must set exactly one of mnemonic and private_key"),
		};
		built.push(Arc::new(signer));
	}

	Ok(SignerQuorum::new(built)?)
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
