use mockbin_core::{User, UserId};

/// Caller context for a session-scoped request (resolved identity).
///
/// This is immutable and must be present for all owner-facing routes; the
/// session middleware inserts it after resolving the `userid` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    user: User,
}

impl CallerContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}
