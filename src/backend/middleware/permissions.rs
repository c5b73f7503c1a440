/**
 * Permission Checks
 *
 * Ownership and role checks applied by the post and comment services.
 * Admins bypass ownership; moderators only gain the role-gated actions.
 */
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::comments::model::CommentRecord;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::posts::model::PostRecord;
use crate::shared::user::Role;

const PERMISSION_DENIED: &str = "Permission denied";

/// Resources that record their author
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

impl Authored for PostRecord {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Authored for CommentRecord {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Check that the user authored the resource or is an admin
pub fn check_ownership<T: Authored>(user: &User, resource: &T) -> BackendResult<()> {
    if resource.author_id() == user.id || user.is_admin() {
        Ok(())
    } else {
        tracing::warn!("User {} is not allowed to modify a resource they do not own", user.id);
        Err(BackendError::forbidden(PERMISSION_DENIED))
    }
}

/// Resolve a looked-up resource for modification: 404 if missing, then 403 if not owned
pub fn ensure_owner_or_admin<T: Authored>(
    user: &User,
    resource: Option<T>,
    not_found: &str,
) -> BackendResult<T> {
    let resource = resource.ok_or_else(|| BackendError::not_found(not_found))?;
    check_ownership(user, &resource)?;
    Ok(resource)
}

/// Check that the user holds one of the given roles
pub fn ensure_role(user: &User, roles: &[Role]) -> BackendResult<()> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        tracing::warn!("User {} with role {} lacks one of {:?}", user.id, user.role, roles);
        Err(BackendError::forbidden(PERMISSION_DENIED))
    }
}
