//! Waiting for deletions to finish

use crate::confirm::StatusSource;
use crate::error::Result;
use crate::poll::{Poller, Target};
use crate::status::Intent;

/// Poll until `id` is gone (or reports `drained`).
///
/// Draining is the expected path here. Any other named status means the
/// deletion went wrong.
pub async fn wait_for_deleted<S>(source: &S, poller: &Poller, id: &str) -> Result<()>
where
    S: StatusSource + ?Sized,
{
    let target = Target::new(source.kind(), id);
    tracing::info!(kind = %target.kind, entity_id = id, "Waiting for deletion");

    poller
        .poll(&target, Intent::Deletion, || source.fetch_status(id))
        .await
        .into_result(&target, Intent::Deletion)?;

    tracing::info!(kind = %target.kind, entity_id = id, "Deleted");
    Ok(())
}
