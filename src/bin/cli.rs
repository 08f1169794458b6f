//! TrustFlow CLI
//!
//! Command-line client of the TrustFlow API server:
//! - Browse campaigns and inspect one in detail
//! - Prepare tier, funding and creation transactions for a wallet to sign
//! - Wait for a submitted transaction
//! - Check server status

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trustflow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse and manage on-chain crowdfunding campaigns")]
#[command(long_about = "TrustFlow talks to the dashboard API server.\nWrite commands print unsigned transactions; sign and submit them with your wallet, then `trustflow wait <hash>`.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List campaigns
    List {
        /// Only campaigns created by this address
        #[arg(long)]
        owner: Option<String>,
    },

    /// Show one campaign
    Show {
        /// Campaign address
        address: String,
        /// Connected account, to report edit rights
        #[arg(long)]
        account: Option<String>,
    },

    /// Prepare an addTier transaction
    AddTier {
        /// Campaign address
        campaign: String,
        /// Tier name
        name: String,
        /// Contribution amount in the smallest unit
        amount: String,
    },

    /// Prepare a removeTier transaction
    RemoveTier {
        /// Campaign address
        campaign: String,
        /// Tier position
        index: usize,
        /// Refuse if the tier at INDEX is no longer named this
        #[arg(long, requires = "expect_amount")]
        expect_name: Option<String>,
        /// Refuse if the tier at INDEX no longer costs this
        #[arg(long, requires = "expect_name")]
        expect_amount: Option<String>,
    },

    /// Prepare a fund transaction for a tier
    Fund {
        /// Campaign address
        campaign: String,
        /// Tier position
        index: usize,
        #[arg(long, requires = "expect_amount")]
        expect_name: Option<String>,
        #[arg(long, requires = "expect_name")]
        expect_amount: Option<String>,
    },

    /// Prepare a createCampaign transaction
    Create {
        /// Campaign name
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Funding goal in the smallest unit
        #[arg(short, long, default_value = "1")]
        goal: String,
        /// Campaign length in days
        #[arg(long, default_value = "1")]
        days: u64,
    },

    /// Wait for a submitted transaction
    Wait {
        /// Transaction hash
        hash: String,
        /// Contracts the transaction touched (repeatable)
        #[arg(short, long)]
        affected: Vec<String>,
        /// add_tier, remove_tier, fund or create_campaign
        #[arg(short, long)]
        kind: Option<String>,
        /// Creator address, for create_campaign
        #[arg(long)]
        owner: Option<String>,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api/v1", cli.api_url.trim_end_matches('/'));

    match cli.command {
        Commands::List { owner } => {
            let url = match &owner {
                Some(owner) => format!("{}/owners/{}/campaigns", api, owner),
                None => format!("{}/campaigns", api),
            };
            let listing = send(client.get(url)).await?;
            let entries = listing["campaigns"].as_array().cloned().unwrap_or_default();

            if entries.is_empty() {
                println!("No Campaigns Found");
                return Ok(());
            }

            // Cards resolve independently, so fetch them side by side
            let summaries = join_all(entries.iter().map(|entry| {
                let url = format!(
                    "{}/campaigns/{}/summary",
                    api,
                    entry["campaign_address"].as_str().unwrap_or_default()
                );
                send(client.get(url))
            }))
            .await;

            if cli.format == "json" {
                let summaries: Vec<Value> = summaries
                    .into_iter()
                    .map(|s| s.unwrap_or_else(|e| json!({ "error": e.to_string() })))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            println!(
                "{:<24} {:>14} {:>14} {:>6} {:<14} {}",
                "Name", "Goal", "Raised", "%", "Time", "Address"
            );
            println!("{}", "-".repeat(120));
            for (entry, summary) in entries.iter().zip(summaries) {
                match summary {
                    Ok(s) => println!(
                        "{:<24} {:>14} {:>14} {:>6} {:<14} {}",
                        truncate(&field(&s["name"]), 24),
                        field(&s["goal"]),
                        field(&s["balance"]),
                        s["read_model"]["percentage"]
                            .as_f64()
                            .map(|p| format!("{:.0}", p))
                            .unwrap_or_else(|| "-".to_string()),
                        s["read_model"]["days_left_label"].as_str().unwrap_or("-"),
                        entry["campaign_address"].as_str().unwrap_or("-"),
                    ),
                    Err(e) => println!(
                        "{:<24} {}",
                        entry["name"].as_str().unwrap_or("-"),
                        e
                    ),
                }
            }
        }

        Commands::Show { address, account } => {
            let mut request = client.get(format!("{}/campaigns/{}", api, address));
            if let Some(account) = &account {
                request = request.query(&[("account", account)]);
            }
            let detail = send(request).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&detail)?);
                return Ok(());
            }
            print_detail(&detail);
        }

        Commands::AddTier {
            campaign,
            name,
            amount,
        } => {
            let body = json!({ "name": name, "amount": amount });
            let tx = send(
                client
                    .post(format!("{}/campaigns/{}/tiers/prepare-add", api, campaign))
                    .json(&body),
            )
            .await?;
            print_prepared(&tx);
        }

        Commands::RemoveTier {
            campaign,
            index,
            expect_name,
            expect_amount,
        } => {
            let body = expectation(expect_name, expect_amount);
            let tx = send(
                client
                    .post(format!(
                        "{}/campaigns/{}/tiers/{}/prepare-remove",
                        api, campaign, index
                    ))
                    .json(&body),
            )
            .await?;
            print_prepared(&tx);
        }

        Commands::Fund {
            campaign,
            index,
            expect_name,
            expect_amount,
        } => {
            let body = expectation(expect_name, expect_amount);
            let tx = send(
                client
                    .post(format!(
                        "{}/campaigns/{}/tiers/{}/prepare-fund",
                        api, campaign, index
                    ))
                    .json(&body),
            )
            .await?;
            print_prepared(&tx);
        }

        Commands::Create {
            name,
            description,
            goal,
            days,
        } => {
            let body = json!({
                "name": name,
                "description": description,
                "goal": goal,
                "duration_days": days,
            });
            let tx = send(
                client
                    .post(format!("{}/campaigns/prepare-create", api))
                    .json(&body),
            )
            .await?;
            print_prepared(&tx);
        }

        Commands::Wait {
            hash,
            affected,
            kind,
            owner,
        } => {
            let body = json!({ "affected": affected, "kind": kind, "owner": owner });
            println!("Waiting for {}...", hash);
            let result = send(
                client
                    .post(format!("{}/transactions/{}/wait", api, hash))
                    .json(&body),
            )
            .await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            match result["outcome"].as_str() {
                Some("confirmed") => {
                    println!("Confirmed in block {}", result["block_number"]);
                    if let Some(address) = result["created_campaign"]["campaign_address"].as_str() {
                        println!("Campaign created at {}", address);
                    }
                }
                Some("reverted") => {
                    eprintln!("Reverted in block {}", result["block_number"]);
                    std::process::exit(1);
                }
                _ => println!("Still pending; run `wait` again later"),
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!("TrustFlow v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!(
                        "Chain: {} (id {}, expected {})",
                        health["chain"].as_str().unwrap_or("unknown"),
                        health["chain_id"],
                        health["expected_chain_id"]
                    );
                    if let Some(entries) = health["cache_entries"].as_u64() {
                        println!("Cached reads: {}", entries);
                    }
                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to TrustFlow API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the TrustFlow API server is running:");
                    eprintln!("  cargo run --bin trustflow");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = trustflow::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("creating {}", parent.display()))?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Send a request and decode the JSON body, turning API errors into messages
async fn send(request: reqwest::RequestBuilder) -> anyhow::Result<Value> {
    let response = request.send().await.context("API server unreachable")?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(body);
    }
    Err(api_error(status, &body))
}

fn api_error(status: reqwest::StatusCode, body: &Value) -> anyhow::Error {
    match (body["error"]["code"].as_str(), body["error"]["message"].as_str()) {
        (Some(code), Some(message)) => anyhow::anyhow!("{} ({}): {}", code, status, message),
        _ => anyhow::anyhow!("Request failed ({})", status),
    }
}

fn expectation(name: Option<String>, amount: Option<String>) -> Value {
    match (name, amount) {
        (Some(name), Some(amount)) => json!({ "expected": { "name": name, "amount": amount } }),
        _ => json!({}),
    }
}

/// Render an availability field: its value, or why it is missing
fn field(value: &Value) -> String {
    match value["status"].as_str() {
        Some("ok") => match &value["value"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
        Some("unavailable") => "unavailable".to_string(),
        _ => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

fn print_detail(detail: &Value) {
    println!("{}", field(&detail["name"]));
    println!("{}", "=".repeat(40));
    println!("{}", field(&detail["description"]));
    println!();
    println!("Status:    {}", detail["status_label"].as_str().unwrap_or("unavailable"));
    println!("Owner:     {}", field(&detail["owner"]));
    println!("Deadline:  {}", detail["deadline_date"].as_str().unwrap_or("unavailable"));
    println!(
        "Funding:   {} / {} ({})",
        field(&detail["balance"]),
        field(&detail["goal"]),
        detail["read_model"]["percentage"]
            .as_f64()
            .map(|p| format!("{:.0}%", p))
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Time:      {}",
        detail["read_model"]["days_left_label"].as_str().unwrap_or("-")
    );
    if detail["is_owner"].as_bool() == Some(true) {
        println!("You own this campaign");
    }

    println!();
    println!("Tiers:");
    match (detail["tiers"]["status"].as_str(), detail["tiers"]["value"].as_array()) {
        (Some("ok"), Some(tiers)) if tiers.is_empty() => println!("  No Tiers Found"),
        (Some("ok"), Some(tiers)) => {
            for (index, tier) in tiers.iter().enumerate() {
                println!(
                    "  [{}] {:<20} {:>14}  {} backers",
                    index,
                    tier["name"].as_str().unwrap_or("-"),
                    tier["amount"].as_str().unwrap_or("-"),
                    tier["backers"]
                );
            }
        }
        _ => println!("  unavailable"),
    }
}

fn print_prepared(tx: &Value) {
    println!("Unsigned transaction ({})", tx["method"].as_str().unwrap_or("-"));
    println!("{}", serde_json::to_string_pretty(tx).unwrap_or_default());
    println!();
    println!("Sign and send it with eth_sendTransaction, then run:");
    println!("  trustflow-cli wait <hash> --affected {}", tx["to"].as_str().unwrap_or("<address>"));
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rendering() {
        assert_eq!(field(&json!({"status": "ok", "value": "1000"})), "1000");
        assert_eq!(field(&json!({"status": "ok", "value": 5})), "5");
        assert_eq!(field(&json!({"status": "unavailable", "error": "x"})), "unavailable");
        assert_eq!(field(&Value::Null), "-");
    }

    #[test]
    fn test_expectation_body() {
        assert_eq!(expectation(None, None), json!({}));
        assert_eq!(
            expectation(Some("Seed".into()), Some("10".into())),
            json!({"expected": {"name": "Seed", "amount": "10"}})
        );
    }

    #[test]
    fn test_api_error_message() {
        let body = json!({"error": {"code": "TIER_CONFLICT", "message": "Tier 2 changed"}});
        let error = api_error(reqwest::StatusCode::CONFLICT, &body);
        assert_eq!(error.to_string(), "TIER_CONFLICT (409 Conflict): Tier 2 changed");

        let error = api_error(reqwest::StatusCode::BAD_GATEWAY, &Value::Null);
        assert_eq!(error.to_string(), "Request failed (502 Bad Gateway)");
    }

    #[tokio::test]
    async fn test_unreachable_server_has_context() {
        let client = reqwest::Client::new();
        let error = send(client.get("http://127.0.0.1:1/health")).await.unwrap_err();
        assert_eq!(error.to_string(), "API server unreachable");
        assert!(error.chain().count() > 1);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer campaign name", 8).chars().count(), 8);
    }
}
