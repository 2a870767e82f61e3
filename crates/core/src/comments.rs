//! Comment ownership rules.

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// Only the author of a comment may edit it. Admins get no exception here.
pub fn ensure_can_edit(owner_id: DbId, requester_id: DbId) -> Result<(), CoreError> {
    if owner_id != requester_id {
        return Err(CoreError::Forbidden(
            "You can only edit your own comments".into(),
        ));
    }
    Ok(())
}

/// The author or an admin (moderation) may hide a comment.
pub fn ensure_can_hide(
    owner_id: DbId,
    requester_id: DbId,
    requester_role: &str,
) -> Result<(), CoreError> {
    if owner_id != requester_id && requester_role != ROLE_ADMIN {
        return Err(CoreError::Forbidden(
            "You can only delete your own comments".into(),
        ));
    }
    Ok(())
}
