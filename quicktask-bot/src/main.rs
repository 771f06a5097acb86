use dotenv::dotenv;
use std::sync::Arc;
use tokio::sync::oneshot;

mod broadcast;
mod chain;
mod channels;
mod commands;
mod config;
mod domain_types;
mod error;
mod http;
#[cfg(test)]
mod mocks;
mod simulation;
mod staging;
mod units;
mod wallet;

use broadcast::ChainBroadcaster;
use chain::{ChainClient, EthersRpc};
use commands::CommandContext;
use config::Config;
use simulation::TenderlySimulator;
use staging::TxStager;
use wallet::OperatorWallet;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Loaded configuration: {:?}", config);

    let commands = match build_commands(&config) {
        Ok(commands) => Arc::new(commands),
        Err(e) => {
            log::error!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let bot_token = config.bot_token.clone();
    let authorized_user_id = config.authorized_user_id.clone();
    let mut listener = tokio::spawn(async move {
        channels::start_discord_listener(&bot_token, &authorized_user_id, commands, shutdown_rx)
            .await
    });

    tokio::select! {
        _ = shutdown_signal() => {
            log::info!("Shutdown signal received, stopping Discord listener");
            let _ = shutdown_tx.send(());
            if let Err(e) = listener.await {
                log::error!("Discord listener task failed: {}", e);
            }
        }
        result = &mut listener => {
            match result {
                Ok(Ok(())) => log::info!("Discord listener exited"),
                Ok(Err(e)) => {
                    log::error!("Chat session failed: {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    log::error!("Discord listener task failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    log::info!("Quicktask bot stopped");
}

fn build_commands(config: &Config) -> error::Result<CommandContext> {
    let wallet = OperatorWallet::from_private_key(&config.private_key, config.chain_id)?;

    let chain: Arc<dyn ChainClient> = Arc::new(EthersRpc::new(
        &config.rpc_url,
        http::shared_client().clone(),
    )?);

    let simulator = TenderlySimulator::from_config(config);
    log::info!("Simulating through {}", simulator.endpoint());
    let simulation_dashboard_url = simulator.dashboard_url();

    let broadcaster = ChainBroadcaster::new(chain.clone(), wallet);

    let stager = TxStager::new(
        chain.clone(),
        Arc::new(simulator),
        Arc::new(broadcaster),
        config.operator_address,
    )
    .with_timeout(config.stage_timeout);

    log::info!(
        "Operator {:?} on chain {}, staged transactions expire after {}s",
        config.operator_address,
        config.chain_id,
        config.stage_timeout.as_secs()
    );

    Ok(CommandContext {
        chain,
        stager: Arc::new(stager),
        operator: config.operator_address,
        explorer_tx_url: config.explorer_tx_url.clone(),
        simulation_dashboard_url: Some(simulation_dashboard_url),
    })
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                log::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
