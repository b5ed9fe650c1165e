//! Confirmation orchestration
//!
//! Entities start out as drafts and only move on once they are explicitly
//! confirmed. [`confirm`] issues the confirm action at most once, and only
//! for drafts, then optionally waits for the entity to become ready.

use crate::error::{FlowsError, Result};
use crate::poll::{Poller, Target};
use crate::status::{EntityKind, EntityStatus, Intent, Verdict, classify};
use async_trait::async_trait;

/// Read access to an entity's lifecycle status
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Kind of entity this source reports on
    fn kind(&self) -> EntityKind;

    /// Fetch the current status. A missing entity is `FlowsError::NotFound`.
    async fn fetch_status(&self, id: &str) -> Result<EntityStatus>;
}

/// A status source whose entities can be confirmed
#[async_trait]
pub trait Confirmable: StatusSource {
    /// Ask the server to confirm a draft.
    async fn trigger_confirm(&self, id: &str) -> Result<()>;
}

/// What [`confirm`] did and where the entity ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Status read before doing anything
    pub initial_status: EntityStatus,
    /// Final status: the settled one if we waited, the initial one otherwise
    pub status: EntityStatus,
    /// Whether a confirm request was sent
    pub confirm_issued: bool,
    /// Whether a poll loop ran
    pub waited: bool,
}

/// Send the confirm action, tolerating the "is not a draft" race.
///
/// Returns `false` when the server reported the entity had already left
/// draft, which means someone else got there first.
pub async fn issue_confirm<A>(api: &A, id: &str) -> Result<bool>
where
    A: Confirmable + ?Sized,
{
    match api.trigger_confirm(id).await {
        Ok(()) => Ok(true),
        Err(err) if err.is_not_a_draft() => {
            tracing::warn!(
                kind = %api.kind(),
                entity_id = id,
                error = %err,
                "Entity left draft before confirmation, ignoring"
            );
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Confirm `id` if it is a draft, then wait for it to settle when `wait` is set.
pub async fn confirm<A>(api: &A, poller: &Poller, id: &str, wait: bool) -> Result<Confirmation>
where
    A: Confirmable + ?Sized,
{
    let initial_status = api.fetch_status(id).await?;
    confirm_with_status(api, poller, id, initial_status, wait).await
}

/// [`confirm`] for callers that already fetched the current status.
pub async fn confirm_with_status<A>(
    api: &A,
    poller: &Poller,
    id: &str,
    initial_status: EntityStatus,
    wait: bool,
) -> Result<Confirmation>
where
    A: Confirmable + ?Sized,
{
    let kind = api.kind();

    let confirm_issued = if initial_status.is_draft() {
        tracing::info!(kind = %kind, entity_id = id, "Confirming entity");
        issue_confirm(api, id).await?
    } else {
        tracing::info!(
            kind = %kind,
            entity_id = id,
            status = %initial_status,
            "Entity not a draft, skipping confirmation"
        );
        false
    };

    let already_ready = !confirm_issued && classify(&initial_status) == Verdict::Ready;
    if !wait || already_ready {
        return Ok(Confirmation {
            status: initial_status.clone(),
            initial_status,
            confirm_issued,
            waited: false,
        });
    }

    let status = wait_until_ready(api, poller, id).await?;

    Ok(Confirmation {
        initial_status,
        status,
        confirm_issued,
        waited: true,
    })
}

/// Poll until `id` becomes ready, without confirming anything.
pub async fn wait_until_ready<S>(source: &S, poller: &Poller, id: &str) -> Result<EntityStatus>
where
    S: StatusSource + ?Sized,
{
    let target = Target::new(source.kind(), id);
    let outcome = poller
        .poll(&target, Intent::Confirmation, || source.fetch_status(id))
        .await;

    match outcome.into_result(&target, Intent::Confirmation)? {
        Some(status) => Ok(status),
        None => Err(FlowsError::NotFound),
    }
}
