use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// Header carrying the id of the already-authenticated caller.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's role, `SHELTER` or `VOLUNTEER`.
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Shelter,
    Volunteer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Shelter => "SHELTER",
            Role::Volunteer => "VOLUNTEER",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SHELTER" => Some(Role::Shelter),
            "VOLUNTEER" => Some(Role::Volunteer),
            _ => None,
        }
    }
}

/// The calling shelter or volunteer.
///
/// Token validation happens upstream; the gateway forwards the subject in
/// [`USER_ID_HEADER`] and its role in [`USER_ROLE_HEADER`]. A missing or malformed
/// id or role is rejected with `401 Unauthorized`. Handlers take [`LoginShelter`]
/// or [`LoginVolunteer`], which additionally answer `403 Forbidden` to the other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginUser {
    pub id: i64,
    pub role: Role,
}

impl LoginUser {
    fn require(self, role: Role) -> Result<i64, AppError> {
        if self.role != role {
            return Err(AppError::Forbidden(format!("Only a {} may do this", role.as_str().to_lowercase())));
        }
        Ok(self.id)
    }
}

impl<S> FromRequestParts<S> for LoginUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = header_value(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing caller identity".to_string()))?;
        let id = raw_id
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Unauthorized("Invalid caller identity".to_string()))?;

        let raw_role = header_value(parts, USER_ROLE_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Missing caller role".to_string()))?;
        let role = Role::parse(raw_role).ok_or_else(|| AppError::Unauthorized("Invalid caller role".to_string()))?;

        Ok(LoginUser { id, role })
    }
}

/// A present header as text; a non-UTF-8 value reads as empty.
fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).map(|v| v.to_str().unwrap_or_default())
}

/// Id of the calling shelter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginShelter(pub i64);

impl<S> FromRequestParts<S> for LoginShelter
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = LoginUser::from_request_parts(parts, state).await?;
        user.require(Role::Shelter).map(LoginShelter)
    }
}

/// Id of the calling volunteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginVolunteer(pub i64);

impl<S> FromRequestParts<S> for LoginVolunteer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = LoginUser::from_request_parts(parts, state).await?;
        user.require(Role::Volunteer).map(LoginVolunteer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(id: Option<&str>, role: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/volunteers/me");
        if let Some(v) = id {
            builder = builder.header(USER_ID_HEADER, v);
        }
        if let Some(r) = role {
            builder = builder.header(USER_ROLE_HEADER, r);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn extract(id: Option<&str>, role: Option<&str>) -> Result<LoginUser, AppError> {
        LoginUser::from_request_parts(&mut parts(id, role), &()).await
    }

    #[tokio::test]
    async fn reads_numeric_id_and_role() {
        let user = extract(Some("42"), Some("volunteer")).await.unwrap();
        assert_eq!(user, LoginUser { id: 42, role: Role::Volunteer });
        let user = extract(Some(" 7 "), Some("SHELTER")).await.unwrap();
        assert_eq!(user, LoginUser { id: 7, role: Role::Shelter });
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_ids() {
        assert!(matches!(extract(None, Some("SHELTER")).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(extract(Some("abc"), Some("SHELTER")).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(extract(Some("0"), Some("SHELTER")).await, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn rejects_missing_or_unknown_roles() {
        assert!(matches!(extract(Some("1"), None).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(extract(Some("1"), Some("ADMIN")).await, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn shelter_and_volunteer_ids_do_not_cross() {
        let mut volunteer = parts(Some("1"), Some("VOLUNTEER"));
        assert_eq!(LoginVolunteer::from_request_parts(&mut volunteer, &()).await.unwrap(), LoginVolunteer(1));
        assert!(matches!(LoginShelter::from_request_parts(&mut volunteer, &()).await, Err(AppError::Forbidden(_))));

        let mut shelter = parts(Some("1"), Some("SHELTER"));
        assert_eq!(LoginShelter::from_request_parts(&mut shelter, &()).await.unwrap(), LoginShelter(1));
        assert!(matches!(LoginVolunteer::from_request_parts(&mut shelter, &()).await, Err(AppError::Forbidden(_))));
    }
}
