//! Paygate CLI
//!
//! Command-line interface for the payment gateway API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use paygate_client::PaygateClient;
use paygate_types::SessionId;

#[derive(Parser)]
#[command(name = "paygate")]
#[command(author, version, about = "Paygate API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the payment gateway API
    #[arg(long, env = "PAYGATE_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Payment session operations
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Submit card data against a payment session
    Pay {
        /// Payment session token (UUID)
        session_id: String,
        /// 16-digit card number
        #[arg(long)]
        number: String,
        #[arg(long)]
        cardholder_name: String,
        /// Expiry in MM/YY or MM/YYYY form
        #[arg(long)]
        expiry_date: String,
        /// Three-digit security code
        #[arg(long)]
        security_number: String,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Register a new payment
    Register {
        #[arg(long)]
        purpose: String,
        /// Decimal amount, e.g. 149.99
        #[arg(long)]
        amount: String,
        /// Optional callback URL notified on completion
        #[arg(long)]
        notification: Option<String>,
        #[arg(long)]
        order_id: String,
    },
    /// Get payment data by order id
    Get {
        order_id: String,
        /// Extra fields to include (notification, createdAt)
        #[arg(long, default_value = "")]
        fields: String,
    },
    /// Payments created inside a period
    Period {
        /// Exclusive lower bound, e.g. 2020-04-01T00:00:00
        #[arg(long)]
        starts_on: String,
        /// Exclusive upper bound
        #[arg(long)]
        ends_on: String,
        #[arg(long, default_value = "")]
        fields: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        res_on_page: Option<u32>,
    },
    /// Full payments listing
    List {
        /// Ordering expression, e.g. desc_createdAt or ASC(amount)
        #[arg(long, default_value = "")]
        order_by: String,
        #[arg(long, default_value = "")]
        fields: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        res_on_page: Option<u32>,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Open a session for a pending payment
    Create { order_id: String },
}

fn parse_session_id(raw: &str) -> Result<SessionId> {
    raw.parse()
        .map_err(|e| anyhow::anyhow!("invalid session id {raw:?}: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let client = PaygateClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            println!("{}", if healthy { "healthy" } else { "unhealthy" });
        }
        Commands::Payment { action } => match action {
            PaymentCommands::Register {
                purpose,
                amount,
                notification,
                order_id,
            } => {
                let registered = client
                    .register_payment(&purpose, &amount, notification.as_deref(), &order_id)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&registered)?);
            }
            PaymentCommands::Get { order_id, fields } => {
                let payment = client.get_payment(&order_id, &fields).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::Period {
                starts_on,
                ends_on,
                fields,
                page,
                res_on_page,
            } => {
                let result = client
                    .payments_from_period(&starts_on, &ends_on, &fields, page, res_on_page)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            PaymentCommands::List {
                order_by,
                fields,
                page,
                res_on_page,
            } => {
                let result = client.payments(&order_by, &fields, page, res_on_page).await?;
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        },
        Commands::Session { action } => match action {
            SessionCommands::Create { order_id } => {
                let session = client.create_session(&order_id).await?;
                println!("{}", serde_json::to_string_pretty(&session)?);
            }
        },
        Commands::Pay {
            session_id,
            number,
            cardholder_name,
            expiry_date,
            security_number,
        } => {
            let session_id = parse_session_id(&session_id)?;
            let result = client
                .pay(
                    &session_id,
                    &number,
                    &cardholder_name,
                    &expiry_date,
                    &security_number,
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
