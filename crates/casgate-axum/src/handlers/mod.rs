//! Handlers for the two handshake phases.

mod callback;
mod login;

pub use callback::callback;
pub use login::login;
