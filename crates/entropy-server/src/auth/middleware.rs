use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use entropy_shared::forum;

use crate::{error::AppError, routes::AppState};

use super::jwt::{verify_access_token, Claims};

/// Discord member behind a verified token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_management(&self) -> bool {
        forum::MANAGEMENT_ROLES.iter().any(|role| self.has_role(role))
    }

    pub fn can_manage_categories(&self) -> bool {
        forum::CATEGORY_ADMIN_ROLES.iter().any(|role| self.has_role(role))
    }

    /// Whether a category gated by `required_roles` is open to this user.
    pub fn can_access(&self, required_roles: Option<&str>) -> bool {
        forum::can_access(required_roles, &self.roles)
    }

    /// Authors may change their own content, management anyone's.
    pub fn can_modify(&self, author_id: i64) -> bool {
        author_id == self.id || self.is_management()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = verify_access_token(token, &state.config.jwt_secret)?;

    let user = AuthUser::from(claims);
    tracing::debug!(user_id = user.id, roles = ?user.roles, "Authenticated request");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
