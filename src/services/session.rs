// SPDX-License-Identifier: MIT

//! Session/role resolver.
//!
//! Maintains a single process-wide snapshot of "who is signed in and
//! what can they do". Every observed auth transition re-enters
//! `Resolving` and re-reads the profile store; there is no role cache.
//!
//! Resolutions carry a monotonically increasing sequence number. A
//! completed resolution is applied only if its sequence is the latest
//! one begun, so a slow lookup can never overwrite the outcome of a
//! newer transition (rapid sign-out/sign-in is last-initiated-wins, not
//! last-completed-wins).

use crate::models::Role;
use crate::supabase::{AuthClient, AuthUser, SupabaseDb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

/// Resolved view of the current principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_admin_or_operator(&self) -> bool {
        self.role.is_admin_or_operator()
    }
}

/// Resolver state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing observed yet (process start).
    Unknown,
    /// A resolution is in flight.
    Resolving,
    /// No authenticated principal.
    Anonymous,
    /// Principal with a resolved role.
    Authenticated(Session),
}

impl SessionState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// Process-wide session snapshot with sequence-guarded updates.
///
/// Single writer (the auth flows), many readers. The lock is only held
/// for copies, never across an await point.
pub struct SessionResolver {
    state: RwLock<SessionState>,
    seq: AtomicU64,
}

impl Default for SessionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionResolver {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::Unknown),
            seq: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Begin a resolution: bump the sequence and enter `Resolving`.
    /// Returns the ticket that must accompany the eventual `apply`.
    pub fn begin(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = SessionState::Resolving;
        seq
    }

    /// Apply a completed resolution. Returns false (and changes nothing)
    /// when a newer resolution has been begun since `seq` was issued.
    pub fn apply(&self, seq: u64, next: SessionState) -> bool {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if seq != self.seq.load(Ordering::SeqCst) {
            return false;
        }
        *state = next;
        true
    }

    /// Build a session from the provider principal and an optional
    /// profile row. Role precedence: profile row, then provider
    /// metadata, then the `client` default.
    pub fn session_from_parts(
        user: &AuthUser,
        profile: Option<&crate::models::Profile>,
    ) -> Session {
        let role = match profile {
            Some(profile) => profile.role,
            None => user.metadata_role(),
        };
        let full_name = profile
            .and_then(|p| p.full_name.clone())
            .or_else(|| user.full_name());
        Session {
            user_id: user.id,
            email: user.email.clone(),
            full_name,
            role,
        }
    }

    /// Complete a resolution for a signed-in principal: join the profile
    /// row and apply. A failed lookup resolves to `Anonymous` for
    /// authorization purposes; the principal is not signed out.
    pub async fn complete(&self, seq: u64, db: &SupabaseDb, user: &AuthUser) -> SessionState {
        let next = match db.get_profile(user.id).await {
            Ok(profile) => {
                SessionState::Authenticated(Self::session_from_parts(user, profile.as_ref()))
            }
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Profile lookup failed during session resolution");
                SessionState::Anonymous
            }
        };
        if self.apply(seq, next.clone()) {
            next
        } else {
            tracing::debug!(seq, "Stale session resolution discarded");
            self.snapshot()
        }
    }

    /// Full resolution from an access token, as run on startup and on
    /// every observed auth-state change.
    pub async fn resolve_token(
        &self,
        auth: &AuthClient,
        db: &SupabaseDb,
        token: Option<&str>,
    ) -> SessionState {
        let seq = self.begin();
        let Some(token) = token else {
            self.apply(seq, SessionState::Anonymous);
            return self.snapshot();
        };
        match auth.get_user(token).await {
            Ok(user) => self.complete(seq, db, &user).await,
            Err(e) => {
                tracing::debug!(error = %e, "Token did not resolve to a principal");
                self.apply(seq, SessionState::Anonymous);
                self.snapshot()
            }
        }
    }

    /// Record a sign-out. Idempotent; any prior state becomes
    /// `Anonymous`.
    pub fn signed_out(&self) {
        let seq = self.begin();
        self.apply(seq, SessionState::Anonymous);
    }
}
