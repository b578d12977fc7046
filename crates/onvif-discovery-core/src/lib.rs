//! ONVIF camera discovery over WS-Discovery.
//!
//! ```no_run
//! # async fn run() -> onvif_discovery_core::Result<()> {
//! use onvif_discovery_core::WsDiscovery;
//!
//! let devices = WsDiscovery::new().discover(5, None).await?;
//! for device in &devices {
//!     println!("{} {} {:?}", device.address, device.manufacturer, device.model);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod protocol;
pub mod types;

pub use config::DiscoveryConfig;
pub use discovery::{discover, WsDiscovery};
pub use error::{ConfigError, CoreError, DiscoveryError, Result};
pub use types::DiscoveredDevice;

pub use tokio_util::sync::CancellationToken;
