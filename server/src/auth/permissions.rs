//! Authorization capability check
//!
//! Every mutating handler funnels through the same `can(actor, action)`
//! check instead of scattering ad-hoc role comparisons. Resource ownership
//! travels inside the action, so the rules read in one place.

use crate::auth::CurrentUser;
use crate::utils::AppError;

/// What the actor is trying to do, with the owning ids of the resource
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    /// Open a new store (vendor accounts only)
    CreateStore,
    /// Edit a store or its menu
    ManageStore { owner: &'a str },
    /// Drive an order through its lifecycle (status, payment, OTP)
    OperateOrder { store_owner: &'a str },
    /// Read an order (the customer who placed it or the store operator)
    ViewOrder {
        customer: &'a str,
        store_owner: &'a str,
    },
}

/// Capability check. Admins can do everything.
pub fn can(actor: &CurrentUser, action: Action<'_>) -> bool {
    if actor.is_admin() {
        return true;
    }

    match action {
        Action::CreateStore => actor.is_vendor(),
        Action::ManageStore { owner } => actor.is_vendor() && actor.id == owner,
        Action::OperateOrder { store_owner } => actor.is_vendor() && actor.id == store_owner,
        Action::ViewOrder {
            customer,
            store_owner,
        } => actor.id == customer || actor.id == store_owner,
    }
}

/// Capability check that raises `Forbidden` on denial.
pub fn ensure(actor: &CurrentUser, action: Action<'_>) -> Result<(), AppError> {
    if can(actor, action) {
        return Ok(());
    }

    let message = match action {
        Action::CreateStore => "Only vendor accounts can create stores",
        Action::ManageStore { .. } => "You do not own this store",
        Action::OperateOrder { .. } => "You do not operate the store for this order",
        Action::ViewOrder { .. } => "You do not have access to this order",
    };
    Err(AppError::forbidden(message))
}
