use crate::booking::BookingRequest;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::{Map, Value};
use std::convert::Infallible;
use tracing::warn;

/// Booking fields taken from either a JSON or a url-encoded body.
///
/// Never rejects: a body that cannot be read yields `None`, so the handler can
/// still answer with a redirect. Field values are taken as loosely as the body
/// allows, see [`BookingRequest::from_pairs`] and [`BookingRequest::from_json`].
#[derive(Debug)]
pub struct BookingSubmission(pub Option<BookingRequest>);

fn is_json(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/json"))
}

#[async_trait]
impl<S> FromRequest<S> for BookingSubmission
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = if is_json(&request) {
            Json::<Map<String, Value>>::from_request(request, state)
                .await
                .map(|Json(object)| BookingRequest::from_json(object))
                .map_err(|e| e.body_text())
        } else {
            Form::<Vec<(String, String)>>::from_request(request, state)
                .await
                .map(|Form(pairs)| BookingRequest::from_pairs(pairs))
                .map_err(|e| e.body_text())
        };

        match parsed {
            Ok(booking) => Ok(Self(Some(booking))),
            Err(e) => {
                warn!("Unreadable booking submission: {}", e);
                Ok(Self(None))
            }
        }
    }
}
