use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Form;

use crate::api::v1::dto::ocr::{ExtractTextForm, ExtractTextRequest};
use crate::error::LectorError;
use crate::intake::ImageSource;

const IMAGE_FIELD: &str = "image";

/// The `image` field of an OCR request, whatever the body encoding.
///
/// Accepts a JSON body, a URL-encoded form, or a multipart form whose
/// `image` part is a file or base64 text. `None` means no usable image was
/// sent (absent, `null` or blank), which callers report separately from a
/// malformed one.
#[derive(Debug)]
pub struct ImagePayload(pub Option<ImageSource>);

impl<S> FromRequest<S> for ImagePayload
where
    S: Send + Sync,
{
    type Rejection = LectorError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers()) {
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| LectorError::InvalidInput(format!("Invalid multipart body: {e}")))?;
                from_multipart(multipart).await.map(Self)
            }
            BodyKind::Form => {
                let Form(form) = Form::<ExtractTextForm>::from_request(req, state)
                    .await
                    .map_err(|e| LectorError::InvalidInput(format!("Invalid form body: {e}")))?;
                Ok(Self(form.image.as_deref().and_then(base64_source)))
            }
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| LectorError::InvalidInput(format!("Failed to read body: {e}")))?;
                from_json(&bytes).map(Self)
            }
        }
    }
}

enum BodyKind {
    Multipart,
    Form,
    Json,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        BodyKind::Multipart
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        BodyKind::Form
    } else {
        BodyKind::Json
    }
}

fn base64_source(text: &str) -> Option<ImageSource> {
    if text.trim().is_empty() {
        None
    } else {
        Some(ImageSource::base64(text))
    }
}

fn from_json(bytes: &[u8]) -> Result<Option<ImageSource>, LectorError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let request: ExtractTextRequest = serde_json::from_slice(bytes)
        .map_err(|e| LectorError::InvalidInput(format!("Invalid JSON: {e}")))?;

    match request.image {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(base64_source(&text)),
        Some(_) => Err(LectorError::InvalidInput(
            "Unsupported image format".to_string(),
        )),
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<Option<ImageSource>, LectorError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| LectorError::InvalidInput(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| LectorError::InvalidInput(format!("Failed to read file: {e}")))?;
            return Ok(Some(ImageSource::upload(
                bytes.to_vec(),
                Some(file_name),
                content_type,
            )));
        }

        let text = field
            .text()
            .await
            .map_err(|e| LectorError::InvalidInput(format!("Invalid image field: {e}")))?;
        return Ok(base64_source(&text));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_with_string_image_is_base64() {
        let source = from_json(br#"{"image":"data:image/png;base64,aGVsbG8="}"#).unwrap();
        assert_eq!(
            source,
            Some(ImageSource::Base64 {
                data: "aGVsbG8=".to_string(),
                format: Some("png".to_string()),
            })
        );
    }

    #[test]
    fn json_without_image_is_none() {
        assert_eq!(from_json(b"{}").unwrap(), None);
        assert_eq!(from_json(br#"{"image":null}"#).unwrap(), None);
        assert_eq!(from_json(br#"{"image":"   "}"#).unwrap(), None);
        assert_eq!(from_json(b"").unwrap(), None);
    }

    #[test]
    fn json_with_non_string_image_is_unsupported() {
        let err = from_json(br#"{"image":{"bytes":[1,2]}}"#).unwrap_err();
        assert!(matches!(err, LectorError::InvalidInput(m) if m == "Unsupported image format"));
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        assert!(matches!(
            from_json(b"{\"image\":"),
            Err(LectorError::InvalidInput(_))
        ));
    }

    #[test]
    fn content_type_selects_body_kind() {
        let mut headers = HeaderMap::new();
        assert!(matches!(body_kind(&headers), BodyKind::Json));

        headers.insert(
            CONTENT_TYPE,
            "multipart/form-data; boundary=x".parse().unwrap(),
        );
        assert!(matches!(body_kind(&headers), BodyKind::Multipart));

        headers.insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        assert!(matches!(body_kind(&headers), BodyKind::Form));
    }
}
