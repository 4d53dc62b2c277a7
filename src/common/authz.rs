// src/common/authz.rs
//! Single ownership-check capability shared by all controllers.
//!
//! Company and organization actors own a resource when the company or
//! organization document linked to their user id matches the resource's
//! owning-entity id. Admin bypasses every check.

use sqlx::SqlitePool;

use crate::auth::AuthedUser;
use crate::common::ApiError;

/// The entity a resource belongs to
#[derive(Debug, Clone)]
pub enum ResourceOwner {
    Candidate(String),
    Company(String),
    Organization(String),
}

impl ResourceOwner {
    /// Build from a stored `(owner_type, owner_id)` pair
    pub fn from_pair(owner_type: &str, owner_id: &str) -> Option<Self> {
        match owner_type {
            "candidate" => Some(ResourceOwner::Candidate(owner_id.to_string())),
            "company" => Some(ResourceOwner::Company(owner_id.to_string())),
            "organization" => Some(ResourceOwner::Organization(owner_id.to_string())),
            _ => None,
        }
    }
}

/// Returns true when the authenticated actor owns the resource.
pub async fn actor_owns(
    db: &SqlitePool,
    authed: &AuthedUser,
    owner: &ResourceOwner,
) -> Result<bool, ApiError> {
    if authed.is_admin {
        return Ok(true);
    }

    match owner {
        ResourceOwner::Candidate(candidate_id) => {
            Ok(authed.role == "candidate" && &authed.id == candidate_id)
        }
        ResourceOwner::Company(company_id) => {
            if authed.role != "company" {
                return Ok(false);
            }
            let owned: Option<String> =
                sqlx::query_scalar("SELECT id FROM companies WHERE user_id = ?")
                    .bind(&authed.id)
                    .fetch_optional(db)
                    .await
                    .map_err(ApiError::DatabaseError)?;
            Ok(owned.as_deref() == Some(company_id.as_str()))
        }
        ResourceOwner::Organization(organization_id) => {
            if authed.role != "organization" {
                return Ok(false);
            }
            let owned: Option<String> =
                sqlx::query_scalar("SELECT id FROM organizations WHERE user_id = ?")
                    .bind(&authed.id)
                    .fetch_optional(db)
                    .await
                    .map_err(ApiError::DatabaseError)?;
            Ok(owned.as_deref() == Some(organization_id.as_str()))
        }
    }
}

/// Convenience wrapper that turns a failed ownership check into a 403.
pub async fn require_owner(
    db: &SqlitePool,
    authed: &AuthedUser,
    owner: &ResourceOwner,
    action: &str,
) -> Result<(), ApiError> {
    if actor_owns(db, authed, owner).await? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "You are not allowed to {}",
            action
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_owner_from_pair() {
        assert!(matches!(
            ResourceOwner::from_pair("company", "C_K7NP3X"),
            Some(ResourceOwner::Company(_))
        ));
        assert!(matches!(
            ResourceOwner::from_pair("organization", "G_K7NP3X"),
            Some(ResourceOwner::Organization(_))
        ));
        assert!(ResourceOwner::from_pair("tender", "T_K7NP3X").is_none());
    }
}
