use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use messenger_core::{validate, Block, TxEncoding};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "messenger-cli")]
#[command(about = "CLI client for the blockchain messenger node")]
struct Cli {
    /// Node base URL (e.g. http://127.0.0.1:8080)
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a message in a new block
    Send {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        receiver: String,
        #[arg(long)]
        message: String,
    },
    /// Print every block held by the node
    Chain {
        /// Print the raw JSON instead of one line per block
        #[arg(long)]
        json: bool,
        /// Re-check hash linkage locally with this encoding (json | legacy-text)
        #[arg(long)]
        verify_with: Option<TxEncoding>,
    },
    /// Print the node's tip height and hash
    Head,
    /// Ask the node to validate its chain
    Validate,
    /// Ask the node to run conflict resolution
    Resolve,
}

#[derive(Serialize)]
struct MessageOut {
    sender: String,
    receiver: String,
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let node = cli.node.trim_end_matches('/');

    match cli.cmd {
        Command::Send {
            sender,
            receiver,
            message,
        } => {
            let body = MessageOut {
                sender,
                receiver,
                message,
            };
            let res = client.post(format!("{node}/tx")).json(&body).send().await?;
            let status = res.status();
            let reply: Value = res.json().await.context("decoding /tx reply")?;
            debug!(%status, "tx submitted");
            if !status.is_success() {
                bail!("node rejected message ({status}): {}", reply["error"]);
            }
            println!("recorded in block {}", reply["index"]);
        }
        Command::Chain { json, verify_with } => {
            let blocks: Vec<Block> = client
                .get(format!("{node}/chain"))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
                .context("decoding /chain reply")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else {
                for block in &blocks {
                    println!("{}", block_line(block));
                }
            }
            if let Some(encoding) = verify_with {
                let verdict = match validate::verify(&blocks, encoding) {
                    Ok(()) => "valid".to_string(),
                    Err(err) => format!("invalid: {err}"),
                };
                println!("local check ({encoding}): {verdict}");
            }
        }
        Command::Head => {
            let head: Value = get_json(&client, &format!("{node}/chain/head")).await?;
            println!("height: {}", head["height"]);
            println!("hash:   {}", head["hash"].as_str().unwrap_or("-"));
        }
        Command::Validate => {
            let verdict: Value = get_json(&client, &format!("{node}/chain/validate")).await?;
            if verdict["valid"].as_bool().unwrap_or(false) {
                println!("Blockchain is valid.");
            } else {
                println!(
                    "Blockchain is not valid: {}",
                    verdict["error"].as_str().unwrap_or("unknown reason")
                );
            }
        }
        Command::Resolve => {
            client
                .post(format!("{node}/resolve"))
                .send()
                .await?
                .error_for_status()?;
            let stats: Value = get_json(&client, &format!("{node}/chain/stats")).await?;
            println!(
                "Conflict resolution completed: {} blocks, {} resolutions so far",
                stats["blocks"], stats["conflict_resolutions"]
            );
        }
    }
    Ok(())
}

async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value> {
    let value = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .with_context(|| format!("decoding {url}"))?;
    Ok(value)
}

fn block_line(block: &Block) -> String {
    let messages: Vec<String> = block
        .transactions
        .iter()
        .map(|t| format!("{}->{}: {}", t.sender, t.receiver, t.message))
        .collect();
    format!(
        "#{:<4} {} {} prev={} [{}]",
        block.index,
        block.timestamp,
        short(&block.hash),
        short(&block.prev_hash),
        messages.join("; ")
    )
}

fn short(hash: &str) -> &str {
    if hash.is_empty() {
        "-"
    } else {
        hash.get(..12).unwrap_or(hash)
    }
}
