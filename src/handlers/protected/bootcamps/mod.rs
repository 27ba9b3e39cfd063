// handlers/protected/bootcamps/mod.rs - Bootcamp management (publisher or admin)
//
// Routes here sit behind protect + authorize(PUBLISHER_ROLES). Ownership is
// checked per handler: only the owning publisher or an admin may modify.

pub mod create; // POST /api/v1/bootcamps
pub mod delete; // DELETE /api/v1/bootcamps/:id
pub mod update; // PUT /api/v1/bootcamps/:id

pub use create::bootcamp_create;
pub use delete::bootcamp_delete;
pub use update::bootcamp_update;

use uuid::Uuid;

use crate::database::models::Bootcamp;
use crate::error::ApiError;
use crate::middleware::Identity;
use crate::state::AppState;

/// Load a bootcamp the caller is allowed to `action` (owner or admin)
pub(crate) async fn owned_bootcamp(
    state: &AppState,
    identity: &Identity,
    id: Uuid,
    action: &str,
) -> Result<Bootcamp, ApiError> {
    let bootcamp = state
        .bootcamps
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Bootcamp not found with id of {}", id)))?;

    if !identity.can_modify(bootcamp.owner) {
        tracing::warn!("User {} tried to {} bootcamp {}", identity.id(), action, id);
        return Err(ApiError::forbidden(format!(
            "User {} is not authorized to {} this bootcamp",
            identity.id(),
            action
        )));
    }

    Ok(bootcamp)
}
