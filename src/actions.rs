//! Read-only and mutating capabilities over the store.
//!
//! Both take the store handle explicitly, so the same action runs against a
//! plain connection or inside an open transaction.

use sea_orm::ConnectionTrait;

use crate::error::AppResult;

/// Returns results with no side effects.
#[allow(async_fn_in_trait)]
pub trait Query {
    type Output;

    async fn query<C: ConnectionTrait>(&self, db: &C) -> AppResult<Self::Output>;
}

/// Enacts a change on the store.
#[allow(async_fn_in_trait)]
pub trait Command {
    type Input;
    type Output;

    async fn execute<C: ConnectionTrait>(&self, db: &C, input: Self::Input)
    -> AppResult<Self::Output>;
}
