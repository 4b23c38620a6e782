//! # TablePay RS
//!
//! Restaurant ordering backend with PayOS checkout.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYOS_CLIENT_ID=...
//! export PAYOS_API_KEY=...
//! export PAYOS_CHECKSUM_KEY=...
//!
//! # Run the server
//! tablepay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Menu items loaded: {}", state.menu.items.len());
    info!("Payment provider: {}", state.gateway.provider_name());

    let webhook_path = state.gateway.webhook_path();
    let app = routes::create_router(state);

    info!("TablePay starting on http://{}", addr);

    if !is_prod {
        info!("Menu: GET http://{}/api/v1/menu", addr);
        info!("Orders: POST http://{}/api/v1/orders", addr);
        info!("Webhook: POST http://{}{}", addr, webhook_path);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  TablePay RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Menu, orders and PayOS checkout
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
