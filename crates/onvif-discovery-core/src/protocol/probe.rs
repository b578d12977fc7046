//! Probe message builder.

use uuid::Uuid;

/// WS-Addressing destination for discovery messages
pub const DISCOVERY_TO: &str = "urn:schemas-xmlsoap-org:ws:2005:04:discovery";

/// WS-Addressing action of a Probe
pub const PROBE_ACTION: &str = "http://schemas.xmlsoap.org/ws/2005/04/discovery/Probe";

/// ONVIF network namespace, bound to the `dn` prefix in the Types filter
pub const ONVIF_NETWORK_NS: &str = "http://www.onvif.org/ver10/network/wsdl";

/// Types filter restricting answers to ONVIF cameras
pub const PROBE_TYPES: &str = "dn:NetworkVideoTransmitter";

/// Build the Probe datagram for a discovery round.
///
/// The message id is written as `uuid:<hyphenated id>`, which is what
/// responders echo back in `RelatesTo`.
pub fn build_probe(message_id: &Uuid) -> Vec<u8> {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<s:Envelope xmlns:s="http://www.w3.org/2003/05/soap-envelope" "#,
            r#"xmlns:a="http://schemas.xmlsoap.org/ws/2004/08/addressing" "#,
            r#"xmlns:d="http://schemas.xmlsoap.org/ws/2005/04/discovery" "#,
            r#"xmlns:dn="{ns}">"#,
            r#"<s:Header>"#,
            r#"<a:MessageID>uuid:{id}</a:MessageID>"#,
            r#"<a:To s:mustUnderstand="1">{to}</a:To>"#,
            r#"<a:Action s:mustUnderstand="1">{action}</a:Action>"#,
            r#"</s:Header>"#,
            r#"<s:Body>"#,
            r#"<d:Probe><d:Types>{types}</d:Types><d:Scopes /></d:Probe>"#,
            r#"</s:Body>"#,
            r#"</s:Envelope>"#,
        ),
        ns = ONVIF_NETWORK_NS,
        id = message_id.hyphenated(),
        to = DISCOVERY_TO,
        action = PROBE_ACTION,
        types = PROBE_TYPES,
    )
    .into_bytes()
}
