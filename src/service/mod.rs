pub mod quote_number;
pub mod user_service;
pub mod client_service;
pub mod quote_service;
pub mod meeting_service;
pub mod document_service;
pub mod dashboard_service;

use bson::oid::ObjectId;

use crate::model::user::ROLE_ADMIN;
use crate::util::error::ServiceError;
use crate::util::jwt::Claims;

/// The authenticated user on whose behalf a service operation runs.
/// Authorization is owner-or-admin: admins see and touch everything,
/// consultants only records they created.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: ObjectId,
    pub role: String,
}

impl Actor {
    pub fn from_claims(claims: &Claims) -> Result<Self, ServiceError> {
        let user_id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::InvalidInput("Invalid user id in token".to_string()))?;
        Ok(Actor { user_id, role: claims.role.clone() })
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Owner filter for list/count queries: admins get no filter.
    pub fn scope(&self) -> Option<ObjectId> {
        if self.is_admin() {
            None
        } else {
            Some(self.user_id)
        }
    }

    /// Owner-or-admin check against the record's owning user.
    pub fn authorize(&self, owner: &ObjectId, what: &str) -> Result<(), ServiceError> {
        if self.is_admin() || owner == &self.user_id {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!("Not allowed to access this {}", what)))
        }
    }
}
