//! Turning ProbeMatches datagrams into discovered devices.

use tracing::trace;
use uuid::Uuid;

use super::envelope::ProbeMatchEnvelope;
use super::scopes::{split_list, ScopeInfo};
use crate::types::{DiscoveredDevice, RawResponse};

/// Build a device from a datagram received in answer to `message_id`.
///
/// Returns `None` for anything that is not a correlated ProbeMatches
/// envelope with a non-empty scopes string. Multicast groups are shared, so
/// such traffic is expected and only logged at trace level.
pub fn parse_probe_response(raw: &RawResponse, message_id: &Uuid) -> Option<DiscoveredDevice> {
    let envelope = match ProbeMatchEnvelope::parse(&raw.payload) {
        Ok(envelope) => envelope,
        Err(e) => {
            trace!(source = %raw.source, error = %e, "dropping non-envelope datagram");
            return None;
        }
    };

    if !envelope.relates_to_probe(message_id) {
        trace!(source = %raw.source, relates_to = ?envelope.relates_to, "dropping uncorrelated response");
        return None;
    }

    let Some(probe_match) = envelope.first_usable_match() else {
        trace!(source = %raw.source, "dropping response without scopes");
        return None;
    };
    let scopes = probe_match.non_empty_scopes()?;
    let info = ScopeInfo::parse(scopes);

    Some(DiscoveredDevice {
        address: raw.source.ip(),
        model: info.model,
        manufacturer: info.manufacturer,
        xaddrs: probe_match
            .xaddrs
            .as_deref()
            .map(split_list)
            .unwrap_or_default(),
        types: probe_match
            .types
            .as_deref()
            .map(split_list)
            .unwrap_or_default(),
    })
}
