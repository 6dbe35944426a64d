//! Axum integration for the casgate CAS handshake.
//!
//! Exposes the two handshake phases as routable handlers: `GET /login`
//! issues the challenge redirect to the CAS server (setting the correlation
//! cookie), and `GET /callback` exchanges the returned service ticket for an
//! identity and hands it to the host's [`SessionIssuer`].
//!
//! # Example
//!
//! ```rust,ignore
//! use casgate_axum::{cas_router, CasAuthState, SessionIssuer};
//! use casgate_core::{CasConfig, CasHandshake};
//!
//! let mut config = CasConfig::new("https://cas.example.edu/cas");
//! config.callback_path = "/auth/cas/callback".to_string();
//!
//! let state = CasAuthState::new(
//!     CasHandshake::new(config, state_secret),
//!     my_session_issuer,
//!     true,
//! );
//! let app = Router::new().nest("/auth/cas", cas_router().with_state(state));
//! ```
//!
//! The path `cas_router()`'s callback route resolves to once mounted must
//! equal `CasConfig::callback_path`, since that path is embedded in the
//! `service` URL the CAS server validates against.

pub mod correlation;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;

pub use error::{CasApiError, ErrorResponse};
pub use router::{cas_router, CasAuthState, ChallengeResponder, SessionIssuer};
