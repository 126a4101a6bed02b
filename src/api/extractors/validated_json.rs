//! JSON body extractor that runs `validator` rules before the handler.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Deserialize and validate a JSON body.
///
/// Malformed JSON becomes `BadRequest`, rule violations become `Validation`
/// with every message joined.
///
/// ```rust,ignore
/// async fn create(ValidatedJson(input): ValidatedJson<FamilyInput>) { /* already valid */ }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TokenRequest {
        #[validate(length(min = 1, message = "Username is required"))]
        username: String,
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(value) =
            ValidatedJson::<TokenRequest>::from_request(request(r#"{"username":"maria"}"#), &())
                .await
                .unwrap();
        assert_eq!(value.username, "maria");
    }

    #[tokio::test]
    async fn test_rule_violation() {
        let err = ValidatedJson::<TokenRequest>::from_request(request(r#"{"username":""}"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Username is required"));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let err = ValidatedJson::<TokenRequest>::from_request(request("{"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
