//! Request Extractors
//!
//! `axum::Json` and `axum::extract::Path` wrapped so their rejections go
//! through `BackendError`. A malformed body or path id then answers 400 with
//! the usual `{error, kind, status}` body instead of axum's plain-text reply.

use axum::extract::{FromRequest, FromRequestParts};

use crate::backend::error::BackendError;

/// JSON request body; rejections become `validation_error`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(BackendError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; rejections become `validation_error`
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(BackendError))]
pub struct ApiPath<T>(pub T);
