//! Client demo driving a full payment flow against an in-process server.
//!
//! Run with: cargo run -p paygate-app --example client_demo

use paygate_client::PaygateClient;
use paygate_hex::{HttpNotifier, PaymentService, inbound::HttpServer};
use paygate_repo::{MemorySessionStore, build_repo};
use std::net::SocketAddr;
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("paygate.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and migration)
    let repo = build_repo(&db_url).await?;

    // Start server in background
    let service = PaymentService::new(repo, MemorySessionStore::new(), HttpNotifier::new());
    let router = HttpServer::new(service).router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        axum::serve(
            TcpListener::bind(&server_addr).await.unwrap(),
            router.into_make_service(),
        )
        .await
        .unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = PaygateClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: Full payment flow
    // ─────────────────────────────────────────────────────────────────────────

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    // Register a payment
    let registered = client
        .register_payment("Office chair, order #4711", "149.99", None, "order-4711")
        .await?;
    println!("✅ Registered payment, session {}", registered.session_id);

    // The card form shows what is being paid
    let form = client.card_form_data(&registered.session_id).await?;
    println!("✅ Card form: {} for {:?}", form.amount, form.purpose);

    // Submit card data
    client
        .pay(
            &registered.session_id,
            "4242424242424242",
            "JANE A DOE",
            "12/2030",
            "123",
        )
        .await?;
    println!("✅ Payment completed");

    // The payment now reads as completed
    let payment = client.get_payment("order-4711", "createdAt").await?;
    println!("✅ Payment data: {}", serde_json::to_string_pretty(&payment)?);

    // Period query sees it
    let page = client
        .payments_from_period("2000-01-01T00:00:00", "2100-01-01T00:00:00", "", None, None)
        .await?;
    println!(
        "✅ Period query: page {} with {} payment(s)",
        page.page,
        page.payments.len()
    );

    // Duplicate registration is rejected
    let duplicate = client
        .register_payment("Office chair, order #4711", "149.99", None, "order-4711")
        .await;
    assert!(duplicate.is_err());
    println!("✅ Duplicate order id rejected: {}", duplicate.unwrap_err());

    Ok(())
}
