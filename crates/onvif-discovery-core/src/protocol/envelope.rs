//! ProbeMatches envelope parsing.
//!
//! Responders disagree on namespace prefixes (`s:`, `SOAP-ENV:`, `env:`,
//! default namespaces), so elements are matched by local name only.

use roxmltree::{Document, Node};
use uuid::Uuid;

use crate::error::EnvelopeError;

/// A single `ProbeMatch` element.
///
/// Fields hold the raw, space-delimited element text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeMatch {
    pub scopes: Option<String>,
    pub xaddrs: Option<String>,
    pub types: Option<String>,
}

impl ProbeMatch {
    /// Scopes text, if present and not blank.
    pub fn non_empty_scopes(&self) -> Option<&str> {
        self.scopes.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// The parts of a ProbeMatches envelope the engine consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeMatchEnvelope {
    /// `Header/RelatesTo` text
    pub relates_to: Option<String>,
    /// `Body/ProbeMatches/ProbeMatch` elements in document order
    pub matches: Vec<ProbeMatch>,
}

impl ProbeMatchEnvelope {
    /// Parse a received datagram.
    pub fn parse(payload: &[u8]) -> Result<Self, EnvelopeError> {
        let text = std::str::from_utf8(payload)?;
        Self::parse_str(text)
    }

    /// Parse envelope text.
    pub fn parse_str(xml: &str) -> Result<Self, EnvelopeError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        if root.tag_name().name() != "Envelope" {
            return Err(EnvelopeError::NotAnEnvelope(
                root.tag_name().name().to_string(),
            ));
        }

        let body = child_element(root, "Body").ok_or(EnvelopeError::MissingBody)?;

        let relates_to = child_element(root, "Header")
            .and_then(|header| child_element(header, "RelatesTo"))
            .and_then(|n| n.text())
            .map(|s| s.trim().to_string());

        let matches = body
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "ProbeMatch")
            .map(|m| ProbeMatch {
                scopes: child_text(m, "Scopes"),
                xaddrs: child_text(m, "XAddrs"),
                types: child_text(m, "Types"),
            })
            .collect();

        Ok(Self {
            relates_to,
            matches,
        })
    }

    /// Whether this envelope answers the probe sent with `message_id`.
    pub fn relates_to_probe(&self, message_id: &Uuid) -> bool {
        let id = message_id.hyphenated().to_string();
        self.relates_to
            .as_deref()
            .map(|r| r.contains(&id))
            .unwrap_or(false)
    }

    /// First probe match, provided it carries scopes.
    pub fn first_usable_match(&self) -> Option<&ProbeMatch> {
        self.matches
            .first()
            .filter(|m| m.non_empty_scopes().is_some())
    }
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    child_element(node, name)
        .and_then(|n| n.text())
        .map(|s| s.trim().to_string())
}
