//! Role policy: a single table mapping (resource, action) to the access
//! level it requires, checked by one guard instead of per-endpoint
//! branching.

use model::entities::user;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Department,
    Course,
    Student,
    Attendance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
}

/// Access level an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credentials needed (registration, login).
    Anonymous,
    /// Any active authenticated user.
    Authenticated,
    /// Authenticated user with the staff flag.
    Staff,
}

/// The whole authorization policy. Total over (resource, action).
pub fn required_access(resource: Resource, action: Action) -> Access {
    match (resource, action) {
        // Registration is the anonymous entry point.
        (Resource::User, Action::Create) => Access::Anonymous,
        (Resource::User, Action::List) => Access::Authenticated,

        (Resource::Department, Action::List) => Access::Authenticated,
        (Resource::Department, Action::Create) => Access::Staff,

        (Resource::Course, Action::List) => Access::Authenticated,
        (Resource::Course, Action::Create) => Access::Staff,

        (Resource::Student, _) => Access::Authenticated,
        (Resource::Attendance, _) => Access::Authenticated,
    }
}

/// Check a caller against the policy table.
///
/// `None` means the request carried no valid credentials; that only passes
/// for `Anonymous` operations.
pub fn authorize(
    caller: Option<&user::Model>,
    resource: Resource,
    action: Action,
) -> Result<(), ApiError> {
    match required_access(resource, action) {
        Access::Anonymous => Ok(()),
        Access::Authenticated => match caller {
            Some(_) => Ok(()),
            None => Err(ApiError::AuthRequired),
        },
        Access::Staff => match caller {
            Some(user) if user.is_staff => Ok(()),
            Some(_) => Err(ApiError::Forbidden),
            None => Err(ApiError::AuthRequired),
        },
    }
}
