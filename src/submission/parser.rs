use axum::http::{HeaderMap, header};
use bytes::Bytes;
use serde_json::{Map, Value};

/// Body encodings the endpoints accept. The registration page posts JSON,
/// plain HTML forms post urlencoded or multipart, and scanner firmware often
/// posts with no `Content-Type` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Multipart,
    Unlabelled,
}

impl BodyKind {
    fn of(content_type: Option<&str>) -> Self {
        let Some(ct) = content_type else {
            return BodyKind::Unlabelled;
        };
        let mime = ct.split(';').next().unwrap_or_default().trim();
        match mime.to_ascii_lowercase().as_str() {
            "application/json" => BodyKind::Json,
            "application/x-www-form-urlencoded" => BodyKind::Form,
            "multipart/form-data" => BodyKind::Multipart,
            _ => BodyKind::Unlabelled,
        }
    }
}

/// Decode a request body into a flat JSON object of its fields.
pub async fn parse_request(headers: &HeaderMap, body: Bytes) -> Result<Value, String> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    match BodyKind::of(content_type) {
        BodyKind::Json => decode_json(&body),
        BodyKind::Form => decode_form(&body),
        BodyKind::Multipart => decode_multipart(content_type.unwrap_or_default(), body).await,
        // A scanner reporting `{"qrCodeData":..}` or `qrCodeData=..` under a
        // missing or bogus header is still a scan.
        BodyKind::Unlabelled => decode_json(&body)
            .or_else(|_| decode_form(&body))
            .map_err(|e| format!("Unable to parse body: {e}")),
    }
}

fn decode_json(body: &[u8]) -> Result<Value, String> {
    match serde_json::from_slice(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("Expected a JSON object".to_string()),
        Err(e) => Err(format!("Invalid JSON: {e}")),
    }
}

fn decode_form(body: &[u8]) -> Result<Value, String> {
    std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    let fields: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Ok(Value::Object(fields))
}

async fn decode_multipart(content_type: &str, body: Bytes) -> Result<Value, String> {
    let boundary =
        multer::parse_boundary(content_type).map_err(|_| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut fields = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        // Unnamed parts cannot be addressed by the handlers
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        fields.insert(name, Value::String(value));
    }

    Ok(Value::Object(fields))
}

/// A non-empty string field. Numbers are accepted in their textual form
/// since scanners and the registration form both send numeric ids.
pub fn text_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
