//! CAS (Central Authentication Service) client library for service
//! applications.
//!
//! This crate implements the service side of the CAS single-sign-on
//! handshake: redirecting an unauthenticated caller to the CAS login
//! endpoint, receiving the callback carrying a one-time service ticket, and
//! exchanging that ticket against the CAS validation endpoint for a verified
//! identity.
//!
//! # Features
//!
//! - **Multi-version validation**: CAS protocol 1.0 (plain text), 2.0 and
//!   3.0 (namespaced XML) ticket validators selected by configuration
//! - **CSRF protection**: a per-attempt correlation token bound into a
//!   signed state parameter and verified on callback
//! - **Injectable collaborators**: state protection ([`StateCodec`]) and the
//!   back-channel HTTP client ([`Backchannel`]) are traits with default
//!   implementations
//! - **Attribute claims**: CAS attributes become ordered identity claims,
//!   with a configurable name-identifier attribute override
//!
//! # Example
//!
//! ```rust,ignore
//! use casgate_core::{CasConfig, CasHandshake, RequestContext};
//!
//! let config = CasConfig::new("https://cas.example.edu/cas");
//! let handshake = CasHandshake::new(config, "state-signing-secret");
//!
//! // Phase 1: send the caller to the CAS login page.
//! let challenge = handshake.begin_challenge(&request, None)?;
//! // store challenge.correlation_token client-side, redirect to
//! // challenge.authorization_url
//!
//! // Phase 2: exchange the returned ticket for an identity.
//! let outcome = handshake
//!     .complete_callback(&request, &query, Some(&correlation_cookie))
//!     .await?;
//! println!("authenticated as {}", outcome.identity.username);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod handshake;
pub mod identity;
pub mod session;
pub mod state;
pub mod transport;
pub mod validation;

pub use config::{CasConfig, CasProtocolVersion};
pub use error::{CasError, CasResult};
pub use events::CasEvents;
pub use handshake::{Authenticated, CasHandshake, Challenge, RequestContext};
pub use identity::{Claim, IdentityRecord};
pub use session::AuthenticationSession;
pub use state::{generate_correlation_token, JwtStateCodec, StateCodec};
pub use transport::{Backchannel, BackchannelResponse, ReqwestBackchannel};
pub use validation::{RawValidationResult, TicketValidator};
