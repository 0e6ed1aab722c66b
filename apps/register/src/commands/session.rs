//! # Session Commands
//!
//! Sign a user in or out of the register.

use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::{CartState, SessionState, StoreState};
use tally_core::User;

/// Signs in the user with `username`.
pub fn sign_in(store: &StoreState, session: &SessionState, username: &str) -> ApiResult<User> {
    let user = store
        .with_store(|s| s.user_by_username(username).cloned())
        .ok_or_else(|| ApiError::not_found("User", username))?;

    info!(user_id = %user.id, role = ?user.role, "Signed in");
    session.sign_in(user.clone());
    Ok(user)
}

/// Signs out and abandons the current sale: cart, discount and customer.
pub fn sign_out(session: &SessionState, cart: &CartState) -> Option<User> {
    cart.with_cart_mut(|c| c.clear());
    let user = session.sign_out();
    if let Some(user) = &user {
        info!(user_id = %user.id, "Signed out");
    }
    user
}
