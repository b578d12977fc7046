//! Discover command implementation.

use std::path::Path;

use onvif_discovery_core::{CancellationToken, DiscoveredDevice, DiscoveryConfig, WsDiscovery};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::cli::DiscoverArgs;
use crate::error::CliError;
use crate::output::get_formatter;

/// Case-insensitive model and manufacturer filters.
#[derive(Debug, Default)]
pub struct DeviceFilter {
    model: Option<Regex>,
    manufacturer: Option<Regex>,
}

impl DeviceFilter {
    pub fn new(model: Option<&str>, manufacturer: Option<&str>) -> Result<Self, CliError> {
        Ok(Self {
            model: model.map(compile).transpose()?,
            manufacturer: manufacturer.map(compile).transpose()?,
        })
    }

    /// A device without a model never matches a model filter.
    pub fn matches(&self, device: &DiscoveredDevice) -> bool {
        let model_ok = match (&self.model, &device.model) {
            (None, _) => true,
            (Some(re), Some(model)) => re.is_match(model),
            (Some(_), None) => false,
        };
        let mfr_ok = self
            .manufacturer
            .as_ref()
            .map_or(true, |re| re.is_match(&device.manufacturer));
        model_ok && mfr_ok
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Apply filters and sort by address.
pub fn filter_devices(devices: Vec<DiscoveredDevice>, filter: &DeviceFilter) -> Vec<DiscoveredDevice> {
    let mut devices: Vec<_> = devices.into_iter().filter(|d| filter.matches(d)).collect();
    devices.sort_by(|a, b| a.address.cmp(&b.address));
    devices
}

/// Run the discover command
pub async fn run_discover(
    args: DiscoverArgs,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let mut config = DiscoveryConfig::load_or_default(config_path)?;
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if !args.interfaces.is_empty() {
        config.interfaces = args.interfaces;
    }
    config.validate()?;

    let filter = DeviceFilter::new(args.filter_model.as_deref(), args.filter_mfr.as_deref())?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received, cancelling discovery");
            on_signal.cancel();
        }
    });

    eprintln!(
        "{}",
        formatter.format_message(&format!(
            "Discovering devices for {} seconds...",
            config.timeout_secs
        ))
    );

    let result = WsDiscovery::from_config(&config)
        .discover(config.timeout_secs, Some(cancel.clone()))
        .await;
    signal_task.abort();

    if cancel.is_cancelled() {
        return Err(CliError::Cancelled);
    }

    let devices = filter_devices(result?, &filter);
    println!("{}", formatter.format_devices(&devices));

    if devices.is_empty() {
        return Err(CliError::NoDevicesFound);
    }

    Ok(())
}
