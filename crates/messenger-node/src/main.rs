mod constants;
mod page;
mod routes;

use clap::Parser;
use messenger_core::{Chain, ChainConfig, ResolvePolicy, TxEncoding};
use routes::AppState;
use std::net::SocketAddr;
use tracing::{info, Level};

#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, default_value = constants::DEFAULT_LISTEN)]
    listen: String,

    /// Transaction encoding used in block hashes: json | legacy-text
    #[arg(long, default_value_t = TxEncoding::Json)]
    tx_encoding: TxEncoding,

    /// Refuse to append blocks without transactions
    #[arg(long)]
    reject_empty_blocks: bool,

    /// Conflict resolution policy: max-transactions | longest-valid
    #[arg(long, default_value_t = ResolvePolicy::MaxTransactions)]
    resolve_policy: ResolvePolicy,
}

impl Args {
    fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            encoding: self.tx_encoding,
            allow_empty_blocks: !self.reject_empty_blocks,
            resolve_policy: self.resolve_policy,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.chain_config();
    let chain = Chain::with_config(config);
    info!(
        encoding = %config.encoding,
        resolve_policy = %config.resolve_policy,
        allow_empty_blocks = config.allow_empty_blocks,
        "chain initialized with genesis block"
    );

    let app = routes::router(AppState::new(chain));

    let addr: SocketAddr = args.listen.parse()?;
    info!("messenger-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_chain_config_defaults() {
        let args = Args::parse_from(["messenger-node"]);
        assert_eq!(args.listen, "127.0.0.1:8080");
        assert_eq!(args.chain_config(), ChainConfig::default());
    }

    #[test]
    fn flags_map_onto_chain_config() {
        let args = Args::parse_from([
            "messenger-node",
            "--tx-encoding",
            "legacy-text",
            "--reject-empty-blocks",
            "--resolve-policy",
            "longest-valid",
        ]);
        assert_eq!(
            args.chain_config(),
            ChainConfig {
                encoding: TxEncoding::LegacyText,
                allow_empty_blocks: false,
                resolve_policy: ResolvePolicy::LongestValid,
            }
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(Args::try_parse_from(["messenger-node", "--resolve-policy", "longest"]).is_err());
    }
}
