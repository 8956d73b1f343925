use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer from the `CLARH_CORS_ORIGINS` setting.
///
/// - Origins: `*` (default) or a comma-separated list
/// - Methods: POST, OPTIONS
/// - Headers: Content-Type
pub fn build_cors_layer(origins: &str) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

fn allowed_origins(origins: &str) -> AllowOrigin {
    let parsed = parse_origins(origins);
    if parsed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    }
}

/// Explicit origins; empty means "any". A `*` entry anywhere also means "any".
fn parse_origins(origins: &str) -> Vec<HeaderValue> {
    let entries: Vec<&str> = origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.contains(&"*") {
        return Vec::new();
    }

    entries
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_and_empty_mean_any() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("").is_empty());
        assert!(parse_origins("https://app.example, *").is_empty());
    }

    #[test]
    fn explicit_origins_are_trimmed() {
        let origins = parse_origins(" https://app.example ,https://admin.example,, ");
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("https://app.example"),
                HeaderValue::from_static("https://admin.example"),
            ]
        );
    }
}
