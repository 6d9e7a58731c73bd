//! Session capability state and the admin gate.
//!
//! The gate turns an externally verified identity into an edit capability
//! by consulting a membership store. State is a single immutable record
//! advanced by a pure reducer, so resolution races reduce to event
//! ordering: every admin resolution is tagged with the identity it was
//! computed for and discarded if that identity is no longer current.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{GroupCalError, GroupCalResult};
use crate::store::MembershipStore;

/// Resolved capability state for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<String>,
    pub is_authenticated: bool,
    pub is_admin: bool,

    /// True while no identity observation has resolved yet, or while an
    /// admin check is outstanding. Consumers must treat the capability as
    /// unknown until this clears.
    pub loading: bool,
}

impl Session {
    /// State before the first identity observation.
    pub fn initial() -> Self {
        Session {
            identity: None,
            is_authenticated: false,
            is_admin: false,
            loading: true,
        }
    }
}

/// State transitions applied to a session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// An identity was observed signing in; admin status is not yet known.
    SignedIn { identity: String },

    /// An admin check finished for `identity`.
    AdminResolved { identity: String, is_admin: bool },

    /// The identity signed out, or none was ever present.
    SignedOut,
}

/// Advance a session record by one event.
///
/// `AdminResolved` only applies while its identity is still the session's
/// current one; a resolution computed for a superseded identity (or for a
/// session that signed out while the check was outstanding) leaves the
/// state untouched.
pub fn apply(session: &Session, event: &SessionEvent) -> Session {
    match event {
        SessionEvent::SignedIn { identity } => Session {
            identity: Some(identity.clone()),
            is_authenticated: true,
            is_admin: false,
            loading: true,
        },
        SessionEvent::AdminResolved { identity, is_admin } => {
            if session.identity.as_deref() == Some(identity.as_str()) {
                Session {
                    is_admin: *is_admin,
                    loading: false,
                    ..session.clone()
                }
            } else {
                session.clone()
            }
        }
        SessionEvent::SignedOut => Session {
            identity: None,
            is_authenticated: false,
            is_admin: false,
            loading: false,
        },
    }
}

/// Gate guarding every mutation behind admin capability.
pub struct SessionGate {
    membership: Arc<dyn MembershipStore>,
    state: RwLock<Session>,
}

impl SessionGate {
    pub fn new(membership: Arc<dyn MembershipStore>) -> Self {
        SessionGate {
            membership,
            state: RwLock::new(Session::initial()),
        }
    }

    /// Handle a sign-in/sign-out observation from the authentication layer.
    ///
    /// For a sign-in, the admin check runs against the membership store and
    /// its result is applied only if the identity is still current when it
    /// lands. Store failures resolve to "not admin": sign-in itself still
    /// succeeds, with reduced capability.
    pub async fn on_identity_change(&self, identity: Option<&str>) {
        match identity {
            Some(identity) => {
                let identity = identity.to_string();
                self.transition(SessionEvent::SignedIn {
                    identity: identity.clone(),
                })
                .await;

                let is_admin = self.check_admin(&identity).await;
                self.transition(SessionEvent::AdminResolved { identity, is_admin })
                    .await;
            }
            None => self.transition(SessionEvent::SignedOut).await,
        }
    }

    /// Look up admin membership for an identity. Absent records and lookup
    /// errors both resolve to `false`.
    async fn check_admin(&self, identity: &str) -> bool {
        match self.membership.exists(identity).await {
            Ok(is_admin) => {
                debug!(identity, is_admin, "admin check resolved");
                is_admin
            }
            Err(e) => {
                warn!(identity, error = %e, "admin check failed, treating as non-admin");
                false
            }
        }
    }

    async fn transition(&self, event: SessionEvent) {
        let mut state = self.state.write().await;
        *state = apply(&state, &event);
    }

    /// Snapshot of the current capability state.
    pub async fn session(&self) -> Session {
        self.state.read().await.clone()
    }

    /// Refuse unless the session has resolved admin capability.
    ///
    /// Called by hosts before every mutation, ahead of any store call.
    pub async fn require_admin(&self) -> GroupCalResult<()> {
        let session = self.session().await;

        if session.loading {
            return Err(GroupCalError::PermissionDenied(
                "capability check still in progress".into(),
            ));
        }
        if !session.is_admin {
            return Err(GroupCalError::PermissionDenied(
                "admin capability required".into(),
            ));
        }

        Ok(())
    }
}
