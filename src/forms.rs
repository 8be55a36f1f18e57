//! Validation of submitted posts and comments.
//!
//! Forms never turn into HTTP errors: a failed [`PostForm::clean`] or
//! [`CommentForm::clean`] hands back [`FieldErrors`] for the page to show
//! next to the fields, and nothing gets stored.

use std::{collections::BTreeMap, convert::Infallible};

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Group, Post};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("This field is required.")]
    Required,
    #[error("Select a valid choice. That choice is not one of the available choices.")]
    InvalidChoice,
    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    InvalidImage,
}

/// Error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.0.entry(field).or_default().push(error.to_string());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Text is required for posts and comments alike: surrounding whitespace is
/// stripped and nothing may be left over.
pub fn clean_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValidationError::Required);
    }
    Ok(text.to_owned())
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

/// Raw post fields, from either a urlencoded or a multipart body.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<Upload>,
    pub image_clear: bool,
}

#[derive(Deserialize)]
struct UrlencodedPost {
    #[serde(default)]
    text: String,
    #[serde(default)]
    group: Option<String>,
    #[serde(default, rename = "image-clear")]
    image_clear: Option<String>,
}

impl<S: Send + Sync> FromRequest<S> for PostSubmission {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Form(UrlencodedPost { text, group, image_clear }) = Form::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(PostSubmission {
                text,
                group,
                image: None,
                image_clear: image_clear.is_some(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut submission = PostSubmission::default();
        while let Some(field) = multipart.next_field().await.map_err(IntoResponse::into_response)? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "text" => submission.text = field.text().await.map_err(IntoResponse::into_response)?,
                "group" => submission.group = Some(field.text().await.map_err(IntoResponse::into_response)?),
                "image-clear" => submission.image_clear = true,
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let content_type = field.content_type().map(str::to_owned);
                    let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;

                    // browsers send an empty part when no file was picked
                    if !file_name.is_empty() || !bytes.is_empty() {
                        submission.image = Some(Upload { file_name, content_type, bytes });
                    }
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}

/// A validated post, ready to store.
#[derive(Debug, Clone)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<Upload>,
    pub image_clear: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostForm {
    pub text: String,
    /// The selected group id as submitted.
    pub group: Option<String>,
    #[serde(skip)]
    pub image: Option<Upload>,
    #[serde(skip)]
    pub image_clear: bool,
    pub errors: FieldErrors,
}

impl PostForm {
    pub fn bind(submission: PostSubmission) -> Self {
        Self {
            text: submission.text,
            group: submission.group.filter(|g| !g.trim().is_empty()),
            image: submission.image,
            image_clear: submission.image_clear,
            errors: FieldErrors::default(),
        }
    }

    /// Unbound form showing what the post currently holds.
    pub fn for_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group.as_ref().map(|g| g.id.to_string()),
            ..Self::default()
        }
    }

    pub fn clean(&self, groups: &[Group]) -> Result<CleanPost, FieldErrors> {
        let mut errors = FieldErrors::default();

        let text = clean_text(&self.text).map_err(|e| errors.add("text", e)).ok();

        let group_id = match self.group.as_deref().map(str::trim) {
            None => None,
            Some(raw) => match raw.parse::<i64>().ok().filter(|id| groups.iter().any(|g| g.id == *id)) {
                Some(id) => Some(id),
                None => {
                    errors.add("group", ValidationError::InvalidChoice);
                    None
                }
            },
        };

        // the bytes decide, not the content type the client sent
        if let Some(upload) = &self.image {
            if let Err(err) = image::load_from_memory(&upload.bytes) {
                debug!("rejected upload {:?}: {err}", upload.file_name);
                errors.add("image", ValidationError::InvalidImage);
            }
        }

        match text {
            Some(text) if errors.is_empty() => Ok(CleanPost {
                text,
                group_id,
                image: self.image.clone(),
                image_clear: self.image_clear,
            }),
            _ => Err(errors),
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
    #[serde(skip_deserializing)]
    pub errors: FieldErrors,
}

/// Never rejects: a body that can't be read is a comment without text, which
/// [`CommentForm::clean`] then turns down.
impl<S: Send + Sync> FromRequest<S> for CommentForm {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let form = Form::<CommentForm>::from_request(req, state).await;
            return Ok(form.map(|Form(form)| form).unwrap_or_default());
        }

        let mut form = CommentForm::default();
        let Ok(mut multipart) = Multipart::from_request(req, state).await else {
            return Ok(form);
        };
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() == Some("text") {
                form.text = field.text().await.unwrap_or_default();
            }
        }
        Ok(form)
    }
}

impl CommentForm {
    pub fn clean(&self) -> Result<String, FieldErrors> {
        clean_text(&self.text).map_err(|e| {
            let mut errors = FieldErrors::default();
            errors.add("text", e);
            errors
        })
    }
}
