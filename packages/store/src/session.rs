//! Session provider interface and a local implementation.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::AuthError;
use crate::models::Identity;

/// Source of the current identity plus the sign-in / sign-out actions.
pub trait SessionProvider {
    /// Identity-change feed. Holds `None` while signed out; dropping the
    /// receiver unsubscribes.
    fn identity(&self) -> watch::Receiver<Option<Identity>>;

    fn sign_in(&self) -> impl Future<Output = Result<(), AuthError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;
}

/// Session provider that signs in as a fixed profile.
///
/// Without a profile every sign-in is treated as cancelled, and a profile
/// with a blank id fails. Either way the session stays signed out.
#[derive(Clone, Debug)]
pub struct LocalSession {
    profile: Option<Identity>,
    state: Arc<watch::Sender<Option<Identity>>>,
}

impl LocalSession {
    pub fn new(profile: Option<Identity>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            profile,
            state: Arc::new(state),
        }
    }

    /// The identity currently signed in.
    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }
}

impl SessionProvider for LocalSession {
    fn identity(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    async fn sign_in(&self) -> Result<(), AuthError> {
        let Some(profile) = self.profile.clone() else {
            tracing::warn!("Sign-in requested but no profile is configured");
            return Err(AuthError::Cancelled);
        };
        if profile.id.trim().is_empty() {
            return Err(AuthError::Failed("profile has no id".to_string()));
        }
        tracing::info!(user = %profile.id, "signed in");
        self.state.send_replace(Some(profile));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.state.send_replace(None).is_some() {
            tracing::info!("signed out");
        }
        Ok(())
    }
}
