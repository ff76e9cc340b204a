//! WebSocket handshake policy.
//!
//! Origin allow-listing, optional subprotocol negotiation and CORS headers
//! for the upgrade request, applied from inside the tungstenite handshake
//! callback.

use std::fmt;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::{HeaderValue, StatusCode};

/// Handshake policy for incoming WebSocket upgrades.
#[derive(Debug, Clone, Default)]
pub struct HandshakePolicy {
    /// Allowed origins (empty allows all).
    pub allowed_origins: Vec<String>,
    /// Whether an Origin header is required.
    pub require_origin: bool,
    /// Subprotocol to select when the client offers it.
    pub subprotocol: Option<String>,
    /// Whether to echo CORS headers for the accepted origin.
    pub enable_cors: bool,
}

/// Outcome of validating an upgrade request.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandshakeResult {
    /// Handshake accepted with negotiated parameters.
    Accept {
        /// The negotiated subprotocol, if any.
        subprotocol: Option<String>,
        /// The client's origin, if provided.
        origin: Option<String>,
    },
    /// Handshake rejected.
    Reject {
        /// HTTP status code to return.
        status: u16,
        /// Human-readable rejection reason.
        reason: String,
    },
}

impl fmt::Display for HandshakeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeResult::Accept {
                subprotocol,
                origin,
            } => {
                write!(f, "Accept")?;
                if let Some(proto) = subprotocol {
                    write!(f, " (protocol: {proto})")?;
                }
                if let Some(orig) = origin {
                    write!(f, " (origin: {orig})")?;
                }
                Ok(())
            }
            HandshakeResult::Reject { status, reason } => write!(f, "Reject {status} - {reason}"),
        }
    }
}

impl HandshakePolicy {
    /// Validate an upgrade request against this policy.
    pub fn validate(&self, req: &Request) -> HandshakeResult {
        let origin = req
            .headers()
            .get("Origin")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if self.require_origin && origin.is_none() {
            return HandshakeResult::Reject {
                status: 403,
                reason: "Origin header required".to_string(),
            };
        }

        if let Some(origin_value) = &origin
            && !self.allowed_origins.is_empty()
            && !self
                .allowed_origins
                .iter()
                .any(|allowed| allowed == origin_value || allowed == "*")
        {
            return HandshakeResult::Reject {
                status: 403,
                reason: format!("Origin '{origin_value}' not allowed"),
            };
        }

        let subprotocol = self.subprotocol.as_ref().and_then(|wanted| {
            req.headers()
                .get_all("Sec-WebSocket-Protocol")
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(','))
                .map(str::trim)
                .find(|offered| offered == wanted)
                .map(str::to_string)
        });

        HandshakeResult::Accept {
            subprotocol,
            origin,
        }
    }

    /// Run the policy against `req` and finish the handshake.
    ///
    /// `response` is the 101 response prepared by tungstenite; accepted
    /// handshakes extend it with CORS and subprotocol headers, rejected ones
    /// are replaced with an error response.
    #[allow(clippy::result_large_err)]
    pub fn apply(&self, req: &Request, response: Response) -> Result<Response, ErrorResponse> {
        self.finish(&self.validate(req), response)
    }

    #[allow(clippy::result_large_err)]
    fn finish(&self, result: &HandshakeResult, mut response: Response) -> Result<Response, ErrorResponse> {
        match result {
            HandshakeResult::Accept {
                subprotocol,
                origin,
            } => {
                let headers = response.headers_mut();
                if self.enable_cors
                    && let Some(value) = origin.as_deref().and_then(|o| HeaderValue::from_str(o).ok())
                {
                    headers.insert("Access-Control-Allow-Origin", value);
                    headers.insert(
                        "Access-Control-Allow-Credentials",
                        HeaderValue::from_static("true"),
                    );
                }
                if let Some(value) = subprotocol
                    .as_deref()
                    .and_then(|p| HeaderValue::from_str(p).ok())
                {
                    headers.insert("Sec-WebSocket-Protocol", value);
                }
                Ok(response)
            }
            HandshakeResult::Reject { status, reason } => {
                let mut error = ErrorResponse::new(Some(reason.clone()));
                *error.status_mut() =
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::FORBIDDEN);
                Err(error)
            }
        }
    }
}
