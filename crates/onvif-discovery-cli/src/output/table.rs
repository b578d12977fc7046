//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};
use onvif_discovery_core::DiscoveredDevice;

use super::OutputFormatter;

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn short_types(types: &[String]) -> String {
        types
            .iter()
            .map(|t| t.rsplit(':').next().unwrap_or(t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &[DiscoveredDevice]) -> String {
        if devices.is_empty() {
            return "No devices found.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Address", "Manufacturer", "Model", "Service", "Types"]);

        for device in devices {
            table.add_row(vec![
                Cell::new(device.address),
                Cell::new(&device.manufacturer),
                Cell::new(device.model.as_deref().unwrap_or("-")),
                Cell::new(device.service_address().unwrap_or("-")),
                Cell::new(Self::short_types(&device.types)),
            ]);
        }

        format!("{}\n\nFound {} device(s)", table, devices.len())
    }

    fn format_message(&self, message: &str) -> String {
        message.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_devices_lists_every_device() {
        let devices = vec![
            DiscoveredDevice {
                address: "192.168.1.64".parse().unwrap(),
                model: Some("X-1000".to_string()),
                manufacturer: "Acme".to_string(),
                xaddrs: vec!["http://192.168.1.64/onvif/device_service".to_string()],
                types: vec!["dn:NetworkVideoTransmitter".to_string(), "tds:Device".to_string()],
            },
            DiscoveredDevice {
                address: "192.168.1.65".parse().unwrap(),
                model: None,
                manufacturer: String::new(),
                xaddrs: Vec::new(),
                types: Vec::new(),
            },
        ];

        let output = TableOutput::new().format_devices(&devices);

        assert!(output.contains("192.168.1.64"));
        assert!(output.contains("192.168.1.65"));
        assert!(output.contains("NetworkVideoTransmitter, Device"));
        assert!(output.ends_with("Found 2 device(s)"));
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(TableOutput::new().format_devices(&[]), "No devices found.");
    }
}
