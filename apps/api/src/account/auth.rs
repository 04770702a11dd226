use std::convert::Infallible;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::models::user::UserIdentity;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Source of the signed-in user for the duration of one operation.
pub trait AuthCapability: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Identity carried on the request by the upstream gateway. A missing or
/// blank `x-user-id` header means the caller is signed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestIdentity(pub Option<UserIdentity>);

impl AuthCapability for RequestIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.0.clone()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(RequestIdentity(header(USER_ID_HEADER).map(|id| UserIdentity {
            id,
            email: header(USER_EMAIL_HEADER),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> RequestIdentity {
        let (mut parts, _) = request.into_parts();
        RequestIdentity::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_headers_become_identity() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-42")
            .header(USER_EMAIL_HEADER, "jane@example.com")
            .body(())
            .unwrap();
        let identity = extract(request).await;
        assert_eq!(
            identity.current_user(),
            Some(UserIdentity {
                id: "user-42".to_string(),
                email: Some("jane@example.com".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_or_blank_header_is_signed_out() {
        let identity = extract(Request::builder().body(()).unwrap()).await;
        assert_eq!(identity.current_user(), None);

        let blank = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        assert_eq!(extract(blank).await.current_user(), None);
    }
}
