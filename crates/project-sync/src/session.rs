//! Identity Session Provider
//!
//! Supplies the current session and notifies listeners on sign-in and
//! sign-out. The shipped provider signs in a locally configured account.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::config::AccountConfig;
use crate::domain::{DomainError, DomainResult, Identity, Session};
use crate::repository::{Listener, ListenerRegistry, Subscription};

/// Callback receiving the new session state
pub type SessionListener = Listener<Option<Session>>;

const SESSION_TOPIC: &str = "session";

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> DomainResult<Session>;

    async fn sign_out(&self) -> DomainResult<()>;

    fn current_session(&self) -> Option<Session>;

    /// Fires immediately with the current state, then on every change
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}

/// Current session, or `Unauthorized` when signed out
pub fn require_session(provider: &dyn IdentityProvider) -> DomainResult<Session> {
    provider
        .current_session()
        .ok_or_else(|| DomainError::Unauthorized("Not signed in".to_string()))
}

/// Identity provider backed by a configured local account
pub struct LocalIdentityProvider {
    account: Option<AccountConfig>,
    current: RwLock<Option<Session>>,
    listeners: ListenerRegistry<Option<Session>>,
}

impl LocalIdentityProvider {
    pub fn new(account: Option<AccountConfig>) -> Self {
        Self {
            account,
            current: RwLock::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    fn set_current(&self, session: Option<Session>) {
        {
            let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
            *current = session.clone();
        }
        self.listeners.notify(SESSION_TOPIC, &session);
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self) -> DomainResult<Session> {
        let account = self
            .account
            .as_ref()
            .filter(|a| !a.uid.trim().is_empty())
            .ok_or_else(|| {
                DomainError::Unauthorized(format!(
                    "No account configured (set {} or add an account to {})",
                    crate::config::ENV_USER,
                    crate::config::CONFIG_FILE
                ))
            })?;

        let session = Session::new(Identity::new(account.uid.trim()), account.display_name.clone());
        log::info!("signed in as {}", session.identity);
        self.set_current(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> DomainResult<()> {
        if self.current_session().is_some() {
            log::info!("signed out");
            self.set_current(None);
        }
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        let subscription = self.listeners.add(SESSION_TOPIC, listener.clone());
        listener(&self.current_session());
        subscription
    }
}
