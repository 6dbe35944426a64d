//! Application hooks into the handshake.

use std::sync::Arc;

use crate::identity::IdentityRecord;

/// Hook invoked after ticket validation, allowed to enrich the identity
/// record before it is finalized.
pub type CreatingIdentityHook = Arc<dyn Fn(&mut IdentityRecord) + Send + Sync>;

/// Overridable callbacks that give the application control at fixed points
/// of the handshake.
///
/// Hooks are plain function values set at configuration time; the default
/// for each is a no-op (the redirect itself is issued by the hosting layer).
#[derive(Clone, Default)]
pub struct CasEvents {
    /// Invoked with the validated identity before
    /// [`crate::CasHandshake::complete_callback`] returns it.
    pub on_creating_identity: Option<CreatingIdentityHook>,
}

impl CasEvents {
    pub(crate) fn creating_identity(&self, identity: &mut IdentityRecord) {
        if let Some(hook) = &self.on_creating_identity {
            hook(identity);
        }
    }
}

impl std::fmt::Debug for CasEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CasEvents")
            .field("on_creating_identity", &self.on_creating_identity.is_some())
            .finish()
    }
}
