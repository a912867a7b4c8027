//! Site map transaction model
//!
//! Represents a single captured HTTP request/response pair as the host
//! exposes it through its extension API.

use serde::{Deserialize, Serialize};

/// The origin a request was sent to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpService {
    /// Host name or address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Protocol ("http" or "https")
    pub protocol: String,
}

impl HttpService {
    pub fn new(host: &str, port: u16, protocol: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            protocol: protocol.to_string(),
        }
    }

    /// Get the origin URL, omitting the port when it is the protocol default
    pub fn origin(&self) -> String {
        let port_str = if (self.protocol.eq_ignore_ascii_case("https") && self.port == 443)
            || (self.protocol.eq_ignore_ascii_case("http") && self.port == 80)
        {
            String::new()
        } else {
            format!(":{}", self.port)
        };
        format!("{}://{}{}", self.protocol, self.host, port_str)
    }
}

/// One entry of the host's site map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMapItem {
    /// Where the request was sent
    pub http_service: HttpService,
    /// Raw request bytes (if any)
    pub request: Option<Vec<u8>>,
    /// Raw response bytes (if any)
    pub response: Option<Vec<u8>>,
    /// User annotation, empty when unset
    pub comment: String,
    /// Highlight colour tag, empty when unset
    pub highlight: String,
}

impl SiteMapItem {
    /// Create an item with no payloads or annotations
    pub fn new(http_service: HttpService) -> Self {
        Self {
            http_service,
            request: None,
            response: None,
            comment: String::new(),
            highlight: String::new(),
        }
    }

    pub fn with_request(mut self, request: impl Into<Vec<u8>>) -> Self {
        self.request = Some(request.into());
        self
    }

    pub fn with_response(mut self, response: impl Into<Vec<u8>>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn with_highlight(mut self, highlight: &str) -> Self {
        self.highlight = highlight.to_string();
        self
    }

    /// Total payload size in bytes
    pub fn payload_len(&self) -> usize {
        self.request.as_ref().map_or(0, Vec::len) + self.response.as_ref().map_or(0, Vec::len)
    }
}
