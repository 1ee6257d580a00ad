use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use finecheck::InlineImage;
use serde_json::{json, Value};
use std::sync::Arc;

/// Multipart field carrying the photographed notice.
pub const IMAGE_FIELD: &str = "image";

const DEFAULT_MIME: &str = "image/jpeg";
const GENERIC_MIME: &str = "application/octet-stream";

const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// Identify common image formats from their leading bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.len() >= 12
        && &bytes[4..8] == b"ftyp"
        && HEIF_BRANDS.iter().any(|brand| &bytes[8..12] == brand.as_slice())
    {
        return Some("image/heic");
    }
    None
}

/// MIME type sent upstream: the declared one unless it is absent or generic.
pub fn resolve_mime(declared: Option<&str>, bytes: &[u8]) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && !mime.eq_ignore_ascii_case(GENERIC_MIME) => {
            mime.to_string()
        }
        _ => sniff_image_mime(bytes).unwrap_or(DEFAULT_MIME).to_string(),
    }
}

fn multipart_error(err: MultipartError, max_upload_mb: usize) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge(max_upload_mb)
    } else {
        ServerError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Pull the first `image` field out of the form, skipping anything else.
async fn read_image(
    multipart: &mut Multipart,
    max_upload_mb: usize,
) -> ServerResult<Option<(Option<String>, Bytes)>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error(err, max_upload_mb))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let declared = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| multipart_error(err, max_upload_mb))?;
        return Ok(Some((declared, bytes)));
    }
    Ok(None)
}

/// Extract the fields of a photographed parking fine
pub async fn extract_fine(
    State(state): State<Arc<ServerState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<Value>> {
    let max_upload_mb = state.config.max_upload_mb;
    let mut multipart = multipart.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "fine extraction rejected: not multipart");
        ServerError::BadRequest(format!("Expected multipart form data: {}", rejection.body_text()))
    })?;

    let (declared, bytes) = match read_image(&mut multipart, max_upload_mb).await? {
        Some((declared, bytes)) if !bytes.is_empty() => (declared, bytes),
        _ => {
            tracing::warn!("fine extraction rejected: no image uploaded");
            return Err(ServerError::BadRequest("No image uploaded".to_string()));
        }
    };

    if bytes.len() > state.config.max_upload_bytes() {
        return Err(ServerError::PayloadTooLarge(max_upload_mb));
    }

    let mime_type = resolve_mime(declared.as_deref(), &bytes);
    tracing::debug!(
        declared = ?declared,
        mime_type = %mime_type,
        image_bytes = bytes.len(),
        "fine image received"
    );

    let image = InlineImage::new(mime_type, bytes);
    match finecheck::extract_fine(state.provider.as_ref(), image).await {
        Ok(outcome) => {
            metrics::counter!("finecheck_extractions_total", "outcome" => outcome.label())
                .increment(1);
            Ok(Json(json!({
                "success": true,
                "data": outcome.data,
            })))
        }
        Err(err) => {
            metrics::counter!("finecheck_extractions_total", "outcome" => err.kind())
                .increment(1);
            if matches!(err, finecheck::PipelineError::Provider(_)) {
                metrics::counter!("finecheck_upstream_failures_total", "route" => "extract_fine")
                    .increment(1);
            }
            Err(ServerError::from_pipeline(
                &err,
                "Failed to extract fine details",
                state.expose_error_details(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some("image/jpeg"));
        assert_eq!(
            sniff_image_mime(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            Some("image/png")
        );
        assert_eq!(sniff_image_mime(b"GIF89a...."), Some("image/gif"));
        assert_eq!(sniff_image_mime(b"RIFF\x24\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(
            sniff_image_mime(b"\x00\x00\x00\x18ftypheic\x00\x00\x00\x00"),
            Some("image/heic")
        );
    }

    #[test]
    fn unknown_and_short_inputs_are_not_sniffed() {
        assert_eq!(sniff_image_mime(b""), None);
        assert_eq!(sniff_image_mime(b"RIFF"), None);
        assert_eq!(sniff_image_mime(b"%PDF-1.7"), None);
        assert_eq!(sniff_image_mime(b"\x00\x00\x00\x18ftypisom"), None);
    }

    #[test]
    fn declared_mime_wins_unless_generic() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(resolve_mime(Some("image/png"), b"whatever"), "image/png");
        assert_eq!(resolve_mime(Some("application/octet-stream"), &png), "image/png");
        assert_eq!(resolve_mime(None, &png), "image/png");
        assert_eq!(resolve_mime(None, b"????"), "image/jpeg");
        assert_eq!(resolve_mime(Some("  "), b"????"), "image/jpeg");
    }
}
