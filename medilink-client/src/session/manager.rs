//! Session Manager - token lifecycle and shared authentication state
//!
//! Owns the single Session record every screen reads, keeps the token fresh
//! through a periodic maintenance loop, and converges every failure mode on
//! one logout path. All timers cancel cooperatively through a session epoch:
//! any state transition bumps the epoch and stale ticks or in-flight responses
//! from the previous session are discarded.

use super::store::TokenStore;
use super::types::{
    format_remaining, remaining_seconds, Authenticated, LogoutReason, Session, SessionEvent,
    SessionSnapshot,
};
use crate::api::ApiClient;
use crate::token::decode_claims;
use chrono::Utc;
use medilink_core::{MedilinkError, MedilinkResult, SessionSettings};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, info, warn};

/// Process-wide session manager
///
/// Cheap to clone; every clone shares the same session state. Consumers read
/// through [`SessionManager::snapshot`] and [`SessionManager::token`]; only the
/// manager itself writes.
#[derive(Clone)]
pub struct SessionManager {
    api: ApiClient,
    store: TokenStore,
    settings: SessionSettings,
    session: Arc<RwLock<Session>>,
    /// Session generation; bumped on every login/logout transition
    epoch: Arc<AtomicU64>,
    /// Epoch for which the background tasks were last spawned
    tasks_epoch: Arc<AtomicU64>,
    events: broadcast::Sender<SessionEvent>,
    countdown_tx: Arc<watch::Sender<Option<String>>>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: TokenStore, settings: SessionSettings) -> Self {
        let (events, _) = broadcast::channel(16);
        let (countdown_tx, _) = watch::channel(None);

        Self {
            api,
            store,
            settings,
            session: Arc::new(RwLock::new(Session::default())),
            epoch: Arc::new(AtomicU64::new(0)),
            tasks_epoch: Arc::new(AtomicU64::new(0)),
            events,
            countdown_tx: Arc::new(countdown_tx),
        }
    }

    /// Seed the session from durable storage at startup
    ///
    /// With no persisted token the session stays empty and no network call is
    /// made. With one, it is verified; a rejected token simply leaves the user
    /// signed out rather than failing startup.
    pub async fn initialize(&self) -> MedilinkResult<()> {
        match self.store.load()? {
            Some(token) => {
                debug!("found persisted token, verifying");
                let epoch = self.advance_epoch();
                if let Err(e) = self.verify_at(&token, epoch).await {
                    e.log();
                }
                Ok(())
            }
            None => {
                debug!("no persisted token, starting anonymous");
                Ok(())
            }
        }
    }

    /// Begin a session from a freshly issued access token
    ///
    /// Persists the token and runs a verify cycle; identity fields are
    /// populated from the verify response, not from the given token.
    pub async fn login(&self, access_token: &str) -> MedilinkResult<()> {
        let epoch = self.advance_epoch();
        self.store.save(access_token)?;
        self.verify_at(access_token, epoch).await
    }

    /// Validate the token with the server and repopulate the session
    ///
    /// Safe to invoke redundantly; each success writes the same authoritative
    /// state and any failure converges on logout.
    pub async fn verify(&self, token: &str) -> MedilinkResult<()> {
        self.verify_at(token, self.epoch.load(Ordering::SeqCst)).await
    }

    async fn verify_at(&self, token: &str, epoch: u64) -> MedilinkResult<()> {
        let response = match self.api.verify_token(token).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token verification failed");
                self.logout_at(LogoutReason::VerifyFailed, epoch).await;
                return Err(e);
            }
        };

        // Every verify response is a full token replacement
        let claims = match decode_claims(&response.access_token) {
            Ok(claims) => claims,
            Err(e) => {
                self.logout_at(LogoutReason::VerifyFailed, epoch).await;
                return Err(e);
            }
        };

        let auth = Authenticated {
            token: response.access_token.clone(),
            user_id: claims.id,
            user_name: claims.sub.clone(),
            role: claims.role,
            expires_at: claims.exp,
        };
        let snapshot = SessionSnapshot::from(&auth);

        // Epoch check, state write and persistence happen under one lock so a
        // logout can never interleave and get its cleared state resurrected
        let applied = {
            let mut session = self.session.write().await;
            if self.epoch.load(Ordering::SeqCst) != epoch {
                false
            } else {
                self.store.save(&response.access_token)?;
                session.auth = Some(auth);
                self.spawn_tasks(epoch);
                let _ = self.events.send(SessionEvent::LoggedIn(snapshot));
                true
            }
        };
        if !applied {
            debug!("discarding verify response for a superseded session");
            return Ok(());
        }

        info!(user = %claims.sub, role = %claims.role, "session established");
        Ok(())
    }

    /// Proactively exchange the current token before it expires
    ///
    /// Only the token and expiry change; identity fields stay as verified.
    pub async fn refresh(&self) -> MedilinkResult<()> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let token = {
            let session = self.session.read().await;
            match &session.auth {
                Some(auth) => auth.token.clone(),
                None => return Ok(()),
            }
        };

        let response = match self.api.refresh_token(&token).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                self.logout_at(LogoutReason::RefreshFailed, epoch).await;
                return Err(e);
            }
        };

        let claims = match decode_claims(&response.access_token) {
            Ok(claims) => claims,
            Err(e) => {
                self.logout_at(LogoutReason::RefreshFailed, epoch).await;
                return Err(e);
            }
        };

        // Same locked epoch check as verify: a logout landing while the
        // response was in flight must not get its cleared token re-persisted
        let applied = {
            let mut session = self.session.write().await;
            if self.epoch.load(Ordering::SeqCst) != epoch {
                false
            } else if let Some(auth) = session.auth.as_mut() {
                self.store.save(&response.access_token)?;
                auth.token = response.access_token.clone();
                auth.expires_at = claims.exp;
                true
            } else {
                false
            }
        };
        if !applied {
            debug!("discarding refresh response for a superseded session");
            return Ok(());
        }

        debug!(expires_at = claims.exp, "token refreshed");
        Ok(())
    }

    /// End the current session
    pub async fn logout(&self, reason: LogoutReason) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        if !self.session.read().await.is_authenticated() {
            return;
        }
        self.logout_at(reason, epoch).await;
    }

    /// Clear all session state for the given epoch
    ///
    /// Returns false when the epoch already moved on, so racing failure paths
    /// produce exactly one logout.
    async fn logout_at(&self, reason: LogoutReason, epoch: u64) -> bool {
        // The epoch bump, state wipe and notifications all happen under the
        // session lock, the same lock verify/refresh hold for their epoch
        // check and write. Neither side can interleave with the other, and a
        // response that lost the race can never re-persist a cleared token.
        let mut session = self.session.write().await;
        if self
            .epoch
            .compare_exchange(epoch, epoch + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        session.auth = None;
        if let Err(e) = self.store.clear() {
            e.log();
        }
        let _ = self.countdown_tx.send(None);
        let _ = self.events.send(SessionEvent::LoggedOut(reason));
        drop(session);

        info!(%reason, "session ended");
        true
    }

    /// React to an API failure from any caller
    ///
    /// Failures the server answers with an auth rejection end the session;
    /// everything else only concerns the failed call.
    pub async fn note_api_error(&self, error: &MedilinkError) {
        if error.invalidates_session() {
            warn!(error = %error, "server rejected the session token");
            self.logout(LogoutReason::VerifyFailed).await;
        }
    }

    /// Read-only copy of the current session, if authenticated
    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        self.session
            .read()
            .await
            .auth
            .as_ref()
            .map(SessionSnapshot::from)
    }

    /// Current bearer token, if authenticated
    pub async fn token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .auth
            .as_ref()
            .map(|auth| auth.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Receiver for the formatted `HH:MM:SS` countdown; None while anonymous
    pub fn countdown(&self) -> watch::Receiver<Option<String>> {
        self.countdown_tx.subscribe()
    }

    fn advance_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start the maintenance, countdown and store-watcher tasks once per session
    fn spawn_tasks(&self, epoch: u64) {
        if self.tasks_epoch.swap(epoch, Ordering::SeqCst) == epoch {
            // A redundant verify for the same session; timers already run
            return;
        }
        self.spawn_maintenance(epoch);
        self.spawn_countdown(epoch);
        self.spawn_store_watcher(epoch);
    }

    fn spawn_maintenance(&self, epoch: u64) {
        let mgr = self.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(mgr.settings.refresh_interval_secs));
            // Consume the immediate first tick; the session was just verified
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if mgr.epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }
                let expires_at = {
                    let session = mgr.session.read().await;
                    match &session.auth {
                        Some(auth) => auth.expires_at,
                        None => break,
                    }
                };
                let now = Utc::now().timestamp();
                if expires_at - now <= mgr.settings.refresh_margin_secs as i64 {
                    if let Err(e) = mgr.refresh().await {
                        e.log();
                        break;
                    }
                }
            }
            debug!("maintenance loop stopped");
        });
    }

    fn spawn_countdown(&self, epoch: u64) {
        let mgr = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            loop {
                ticker.tick().await;
                if mgr.epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }
                let expires_at = {
                    let session = mgr.session.read().await;
                    match &session.auth {
                        Some(auth) => auth.expires_at,
                        None => break,
                    }
                };
                let remaining = remaining_seconds(expires_at, Utc::now().timestamp());
                let _ = mgr.countdown_tx.send(Some(format_remaining(remaining)));
                if remaining == 0 {
                    // Local fallback in case the maintenance refresh never landed
                    mgr.logout_at(LogoutReason::Expired, epoch).await;
                    break;
                }
            }
            debug!("countdown stopped");
        });
    }

    fn spawn_store_watcher(&self, epoch: u64) {
        let mgr = self.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(mgr.settings.storage_poll_secs));
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if mgr.epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }
                if !mgr.session.read().await.is_authenticated() {
                    break;
                }
                if !mgr.store.exists() {
                    info!("persisted token removed by another context");
                    mgr.logout_at(LogoutReason::StorageCleared, epoch).await;
                    break;
                }
            }
            debug!("store watcher stopped");
        });
    }
}
