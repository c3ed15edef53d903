//! airclaim CLI Application

mod cli;

use airclaim_proofs::{KeyContext, SigningPolicy};
use airclaim_sdk::commands::SigningInputs;
use clap::Parser as _;
use cli::{Cli, Commands, ConfigCommands, KeyCommands, ProofCommands};

fn init_tracing() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_target(false)
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Load .env file (fails silently if not found)
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    // No group-signature backend is linked; RSA and GOO operations fail closed.
    let ctx = KeyContext::default();

    let res = match cli.command {
        Commands::Key { command } => match command {
            KeyCommands::Address { args } => {
                airclaim_sdk::commands::key_address(
                    &args.address,
                    args.value,
                    args.sponsor,
                    &args.output,
                )
                .await
                .map(|_| ())
            }
            KeyCommands::Blind { args } => {
                airclaim_sdk::commands::key_blind(&args.key, &args.key_out, &args.tweak_out, &ctx)
                    .await
                    .map(|_| ())
            }
        },
        Commands::Proof { command } => match command {
            ProofCommands::Inspect { args } => {
                airclaim_sdk::commands::proof_inspect(
                    &args.proof,
                    &args.config,
                    args.output.as_deref(),
                )
                .await
                .map(|_| ())
            }
            ProofCommands::Sign { args } => {
                let ctx = ctx.with_policy(SigningPolicy {
                    allow_tweaked_ec: args.allow_tweaked_ec,
                });
                let inputs = SigningInputs {
                    proof_file: args.proof,
                    key_file: args.key,
                    secret_file: args.secret,
                    tweak_file: args.tweak,
                    origin_file: args.origin,
                };
                airclaim_sdk::commands::proof_sign(&inputs, &args.output, &ctx)
                    .await
                    .map(|_| ())
            }
            ProofCommands::Verify { args } => {
                airclaim_sdk::commands::proof_verify(
                    &args.proofs,
                    &args.config,
                    args.expected_root,
                    &ctx,
                )
                .await
                .map(|_| ())
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Schema => airclaim_sdk::commands::snapshot_config_schema(),
            ConfigCommands::Check { config } => airclaim_sdk::commands::config_check(&config)
                .await
                .map(|_| ()),
        },
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
