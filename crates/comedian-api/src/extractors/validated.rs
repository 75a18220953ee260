//! Validated form extractor
//!
//! Slack posts slash commands as `application/x-www-form-urlencoded`.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Form,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Extracts a form body and validates it using the `validator` crate.
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_form(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedForm(value))
    }
}
