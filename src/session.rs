//! Authentication signal from the identity provider.
//!
//! The pipeline only needs two things from identity management: a boolean
//! "is a user signed in" signal and a way to observe it changing. Both are
//! modelled on a `tokio::sync::watch` channel. Subscribing returns an RAII
//! [`AuthSubscription`]; dropping it is the unsubscription — there is no
//! global listener registry to forget to clean up.

use tokio::sync::watch;

/// The identity provider's session signal.
///
/// Hosts call [`AuthSession::sign_in`] / [`AuthSession::sign_out`] as their
/// identity provider reports changes; pipeline owners subscribe and forward
/// sign-outs into [`crate::controller::PipelineController::handle_auth_change`].
pub struct AuthSession {
    tx: watch::Sender<bool>,
}

impl AuthSession {
    /// A new session with no user signed in.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn sign_in(&self) {
        self.tx.send_replace(true);
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_signed_in(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribe to authentication changes.
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions (observability for teardown tests).
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A scoped subscription to the authentication signal.
///
/// Dropping the subscription releases it; the session never holds a
/// reference back to the subscriber.
pub struct AuthSubscription {
    rx: watch::Receiver<bool>,
}

impl AuthSubscription {
    /// Wait for the next authentication change and return the new state.
    ///
    /// Returns `None` once the [`AuthSession`] itself has been dropped,
    /// which ends the subscription loop.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// The current authentication state without waiting.
    pub fn current(&self) -> bool {
        *self.rx.borrow()
    }
}
