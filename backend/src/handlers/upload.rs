//! HTTP handlers for the multipart upload endpoints

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::Serialize;
use shared::{
    is_blank, Attachment, Subject, MSG_DOCUMENT_MISSING, MSG_IMAGE_MISSING,
    MSG_TARGET_LANGUAGE_MISSING,
};

use crate::error::{AppError, AppResult};
use crate::services::{extract_document_text, ContextOverrides};
use crate::AppState;

/// Image type assumed when the upload does not declare one
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

const IMAGE_FIELDS: [&str; 2] = ["image", "file"];
const DOCUMENT_FIELDS: [&str; 2] = ["file", "document"];

/// One uploaded file part
struct UploadedFile {
    content_type: Option<String>,
    data: Vec<u8>,
}

/// Read the first file part named in `names` plus any plain text fields
async fn read_form(
    mut multipart: Multipart,
    file_names: &[&str],
    text_names: &[&str],
) -> AppResult<(Option<UploadedFile>, Vec<(String, String)>)> {
    let mut file = None;
    let mut texts = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if file.is_none() && file_names.contains(&name.as_str()) {
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?.to_vec();
            file = Some(UploadedFile { content_type, data });
        } else if text_names.contains(&name.as_str()) {
            texts.push((name, field.text().await?));
        }
    }

    Ok((file, texts))
}

#[derive(Debug, Serialize)]
pub struct DiagnosisResponse {
    pub diagnosis: String,
}

/// Diagnose plant diseases, pests or deficiencies from a photo
pub async fn plant_disease(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<DiagnosisResponse>> {
    let (file, _) = read_form(multipart?, &IMAGE_FIELDS, &[]).await?;
    let file = file
        .filter(|f| !f.data.is_empty())
        .ok_or_else(|| AppError::validation(MSG_IMAGE_MISSING))?;

    let mime_type = file
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
    tracing::debug!(mime_type = %mime_type, bytes = file.data.len(), "Received plant image");

    let advisory = state
        .advisory
        .advise(
            Subject::PlantImage {
                image: Attachment::new(mime_type, file.data),
            },
            ContextOverrides::default(),
        )
        .await?;

    Ok(Json(DiagnosisResponse {
        diagnosis: advisory.result.text,
    }))
}

#[derive(Debug, Serialize)]
pub struct TranslationResponse {
    pub translated_document: String,
}

/// Explain an uploaded document in the farmer's language
pub async fn translate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<TranslationResponse>> {
    let (file, texts) = read_form(multipart?, &DOCUMENT_FIELDS, &["target_language"]).await?;

    let file = file
        .filter(|f| !f.data.is_empty())
        .ok_or_else(|| AppError::validation(MSG_DOCUMENT_MISSING))?;
    let target_language = texts
        .into_iter()
        .find(|(name, value)| name == "target_language" && !is_blank(value))
        .map(|(_, value)| value.trim().to_string())
        .ok_or_else(|| AppError::validation(MSG_TARGET_LANGUAGE_MISSING))?;

    let text = extract_document_text(file.data, file.content_type.as_deref()).await?;

    let advisory = state
        .advisory
        .advise(
            Subject::Document {
                text,
                target_language,
            },
            ContextOverrides::default(),
        )
        .await?;

    Ok(Json(TranslationResponse {
        translated_document: advisory.result.text,
    }))
}
