//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment gateway, menu, order store and configuration.

use anyhow::Context;
use pay_core::{BoxedPaymentGateway, CheckoutUrls, InMemoryOrderStore, Menu, OrderStore};
use pay_payos::PayOsGateway;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Customer-facing site; PayOS redirects here after checkout
    pub frontend_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (PayOS in production)
    pub gateway: BoxedPaymentGateway,
    /// Restaurant menu
    pub menu: Arc<Menu>,
    /// Order bookkeeping
    pub orders: Arc<dyn OrderStore>,
    /// Return/cancel URLs handed to the gateway
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by PayOS and an in-memory order store
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let menu = load_menu()?;

        let gateway = PayOsGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize PayOS: {}", e))?;

        Ok(Self::with_parts(
            config,
            Arc::new(gateway),
            menu,
            Arc::new(InMemoryOrderStore::new()),
        ))
    }

    /// Assemble state from explicit parts
    pub fn with_parts(
        config: AppConfig,
        gateway: BoxedPaymentGateway,
        menu: Menu,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            gateway,
            menu: Arc::new(menu),
            orders,
            urls: CheckoutUrls::new(&config.frontend_url),
            config,
        }
    }
}

/// Load the menu from config file
fn load_menu() -> anyhow::Result<Menu> {
    let config_paths = [
        "config/menu.toml",
        "../config/menu.toml",
        "../../config/menu.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let menu = Menu::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} menu items from {}", menu.items.len(), path);
            return Ok(menu);
        }
    }

    // Return empty menu if no config found
    tracing::warn!("No menu found, using empty menu");
    Ok(Menu::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_url: "http://localhost:3000".to_string(),
            environment: "test".to_string(),
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
    }

    #[test]
    fn test_bad_socket_addr() {
        let config = AppConfig {
            host: "not a host".to_string(),
            port: 3000,
            frontend_url: String::new(),
            environment: "production".to_string(),
        };

        assert!(config.socket_addr().is_err());
        assert!(config.is_production());
    }
}
