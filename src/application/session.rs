use crate::domain::storage::{ACCESS_TOKEN_KEY, TokenStore};

/// The bearer token held in memory and mirrored into a [`TokenStore`].
///
/// Every sign-in and sign-out bumps the epoch, which lets callers recognise
/// work that was started under a session that no longer exists.
pub struct Session<S: TokenStore> {
    store: S,
    token: Option<String>,
    epoch: u64,
}

impl<S: TokenStore> Session<S> {
    /// Reads the persisted token once. An unreadable store starts anonymous.
    pub fn restore(store: S) -> Self {
        let token = match store.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored session");
                None
            }
        };
        if token.is_some() { tracing::info!("restored stored session"); }
        Self { store, token, epoch: 0 }
    }

    pub fn token(&self) -> Option<&str> { self.token.as_deref() }

    pub fn is_authenticated(&self) -> bool { self.token.is_some() }

    pub fn epoch(&self) -> u64 { self.epoch }

    pub fn sign_in(&mut self, token: String) {
        if let Err(e) = self.store.set(ACCESS_TOKEN_KEY, &token) {
            tracing::warn!(error = %e, "could not persist session token");
        }
        self.token = Some(token);
        self.epoch += 1;
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.store.remove(ACCESS_TOKEN_KEY) {
            tracing::warn!(error = %e, "could not remove stored session token");
        }
        self.token = None;
        self.epoch += 1;
    }
}
