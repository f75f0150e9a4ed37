mod app;
mod network;
mod provider;

pub use app::{AppConfig, UIConfig};
pub use network::NetworkConfig;
pub use provider::{Language, ProviderKind};
