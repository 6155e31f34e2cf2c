use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use std::path::Path;

use crate::error::{LectorError, Result};

/// Standard alphabet, padding optional, trailing bits tolerated.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const DATA_URI_PREFIX: &str = "data:image/";
const DATA_URI_MARKER: &str = ";base64,";

/// Default extension for base64 payloads that carry no usable type hint.
pub const DEFAULT_BASE64_EXTENSION: &str = ".png";

const MAX_EXTENSION_LEN: usize = 10;

/// An image as it arrived in the request, before it touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Base64 text with any `data:image/<format>;base64,` prefix removed.
    Base64 {
        data: String,
        format: Option<String>,
    },
    /// Raw bytes from a multipart file part.
    Upload {
        bytes: Vec<u8>,
        file_name: Option<String>,
        content_type: Option<String>,
    },
}

impl ImageSource {
    /// Build a base64 source, splitting off a data-URI prefix if present.
    pub fn base64(payload: &str) -> Self {
        let (format, data) = split_data_uri(payload);
        Self::Base64 {
            data: data.to_string(),
            format: format.map(str::to_string),
        }
    }

    pub fn upload(bytes: Vec<u8>, file_name: Option<String>, content_type: Option<String>) -> Self {
        Self::Upload {
            bytes,
            file_name,
            content_type,
        }
    }

    /// Decode into raw bytes plus the extension the temp file should use
    /// (including the leading dot, or empty for none).
    pub fn into_bytes(self) -> Result<(Vec<u8>, String)> {
        match self {
            ImageSource::Base64 { data, format } => {
                let bytes = decode_base64(&data)?;
                let extension = match format {
                    Some(format) => format!(".{format}"),
                    None => sniff_extension(&bytes)
                        .unwrap_or_else(|| DEFAULT_BASE64_EXTENSION.to_string()),
                };
                Ok((bytes, extension))
            }
            ImageSource::Upload {
                bytes,
                file_name,
                content_type,
            } => {
                if bytes.is_empty() {
                    return Err(LectorError::InvalidInput(
                        "Uploaded image file is empty".to_string(),
                    ));
                }
                let extension = file_name
                    .as_deref()
                    .and_then(file_name_extension)
                    .or_else(|| sniff_extension(&bytes))
                    .or_else(|| content_type.as_deref().and_then(content_type_extension))
                    .unwrap_or_default();
                Ok((bytes, extension))
            }
        }
    }
}

/// Split `data:image/<format>;base64,<data>` into `(Some(format), data)`.
///
/// The match is case-sensitive and `<format>` must be lowercase ASCII
/// letters; anything else is returned untouched as `(None, payload)`.
pub fn split_data_uri(payload: &str) -> (Option<&str>, &str) {
    if let Some(rest) = payload.strip_prefix(DATA_URI_PREFIX) {
        if let Some((format, data)) = rest.split_once(DATA_URI_MARKER) {
            if !format.is_empty() && format.bytes().all(|b| b.is_ascii_lowercase()) {
                return (Some(format), data);
            }
        }
    }
    (None, payload)
}

/// Decode base64 text, ignoring embedded ASCII whitespace.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(LectorError::InvalidInput(
            "Image payload is empty".to_string(),
        ));
    }

    let bytes = LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| LectorError::InvalidInput(format!("Invalid base64 image data: {e}")))?;

    if bytes.is_empty() {
        return Err(LectorError::InvalidInput(
            "Decoded image is empty".to_string(),
        ));
    }
    Ok(bytes)
}

fn file_name_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.bytes().all(|b| b.is_ascii_alphanumeric());
    valid.then(|| format!(".{ext}"))
}

fn sniff_extension(bytes: &[u8]) -> Option<String> {
    infer::get(bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| format!(".{}", kind.extension()))
}

fn content_type_extension(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim();
    mime_guess::get_mime_extensions_str(essence)?
        .first()
        .map(|ext| format!(".{ext}"))
}
