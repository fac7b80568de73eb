//! Request bodies that must pass `validator` rules before a handler runs.
//!
//! A body that is not valid JSON is answered with 400. A body that parses but
//! breaks a rule (`count` below 1, an empty `ids` list) is answered with 422
//! and lists every offending field, e.g. `count: range; ids: length`.
//!
//! `Option<ValidatedJson<T>>` accepts a request that carries no body at all
//! (no `Content-Type`), which lets `POST /tours/{slug}/reservations` fall
//! back to a single seat.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// JSON body of type `T` that has already passed `T::validate()`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct UpdateCountRequest {
///     #[validate(range(min = 1))]
///     count: i32,
/// }
///
/// async fn update(ValidatedJson(body): ValidatedJson<UpdateCountRequest>) {
///     // body.count >= 1
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum BodyRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    parts.sort();
    if parts.is_empty() {
        "Request body failed validation".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Malformed(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Request body is not valid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, BodyRejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(BodyRejection::Malformed)?;
        value.validate().map_err(BodyRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}

impl<S, T> OptionalFromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, BodyRejection> {
        if !req.headers().contains_key(header::CONTENT_TYPE) {
            return Ok(None);
        }
        <Self as FromRequest<S>>::from_request(req, state)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::Service;

    #[derive(Debug, Deserialize, Validate)]
    struct PayBody {
        #[validate(range(min = 1))]
        count: i32,
        #[validate(length(min = 1))]
        ids: Vec<i32>,
    }

    async fn required(ValidatedJson(body): ValidatedJson<PayBody>) -> String {
        body.ids.len().to_string()
    }

    async fn optional(body: Option<ValidatedJson<PayBody>>) -> String {
        match body {
            Some(ValidatedJson(body)) => body.count.to_string(),
            None => "none".to_string(),
        }
    }

    async fn call(req: Request<Body>) -> (StatusCode, String) {
        let mut svc = Router::new()
            .route("/required", post(required))
            .route("/optional", post(optional))
            .into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_a_valid_body() {
        let (status, text) = call(json("/required", r#"{"count": 2, "ids": [7, 8]}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "2");
    }

    #[tokio::test]
    async fn broken_json_is_400() {
        let (status, text) = call(json("/required", "{count")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(text.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn rule_violations_are_422_and_name_each_field() {
        let (status, text) = call(json("/required", r#"{"count": 0, "ids": []}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["success"], false);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("count"));
        assert!(message.contains("ids"));
    }

    #[tokio::test]
    async fn optional_body_may_be_absent() {
        let bare = Request::builder()
            .method("POST")
            .uri("/optional")
            .body(Body::empty())
            .unwrap();
        assert_eq!(call(bare).await, (StatusCode::OK, "none".to_string()));

        let (status, text) = call(json("/optional", r#"{"count": 3, "ids": [1]}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "3");

        let (status, _) = call(json("/optional", r#"{"count": 0, "ids": [1]}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
