//! # Session State
//!
//! Who is signed in at this register. The signed-in user's id is the
//! cashier on checkouts and the actor on refunds.
//!
//! There is no password check here; authentication belongs to whatever
//! embeds the register.

use std::sync::Mutex;

use tally_core::User;

#[derive(Debug, Default)]
pub struct SessionState {
    user: Mutex<Option<User>>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Signs `user` in, replacing whoever was signed in.
    pub fn sign_in(&self, user: User) {
        *self.user.lock().expect("Session mutex poisoned") = Some(user);
    }

    /// Signs out and returns who was signed in.
    pub fn sign_out(&self) -> Option<User> {
        self.user.lock().expect("Session mutex poisoned").take()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.lock().expect("Session mutex poisoned").clone()
    }

    /// Id of the signed-in user, if any.
    pub fn actor_id(&self) -> Option<String> {
        self.user
            .lock()
            .expect("Session mutex poisoned")
            .as_ref()
            .map(|u| u.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::UserRole;

    #[test]
    fn test_sign_in_and_out() {
        let session = SessionState::new();
        assert!(session.actor_id().is_none());

        session.sign_in(User {
            id: "2".to_string(),
            username: "cashier".to_string(),
            name: "Cashier User".to_string(),
            role: UserRole::Cashier,
        });
        assert_eq!(session.actor_id().as_deref(), Some("2"));

        let previous = session.sign_out().unwrap();
        assert_eq!(previous.username, "cashier");
        assert!(session.current_user().is_none());
    }
}
