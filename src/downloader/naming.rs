// file: src/downloader/naming.rs
// description: image file naming, extension resolution and url placeholders
// reference: internal naming rules for downloaded images

/// Extensions accepted straight from the url.
const URL_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Longest trailing url token still considered an extension.
const MAX_TOKEN_LEN: usize = 5;

/// Cell values that mean "no image" in an input table.
const MISSING_URL_MARKERS: [&str; 4] = ["", "none", "nan", "null"];

pub fn is_missing_url(url: Option<&str>) -> bool {
    match url {
        None => true,
        Some(url) => {
            let normalized = url.trim().to_ascii_lowercase();
            MISSING_URL_MARKERS.contains(&normalized.as_str())
        }
    }
}

/// Text after the last `.` of the url path, ignoring query and fragment,
/// when it is short enough to be an extension.
fn url_token(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let (_, token) = path.rsplit_once('.')?;

    if token.contains('/') || token.chars().count() > MAX_TOKEN_LEN {
        return None;
    }
    Some(token)
}

pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/webp" => Some(".webp"),
        "image/gif" => Some(".gif"),
        "image/bmp" => Some(".bmp"),
        "image/tiff" => Some(".tiff"),
        "image/avif" => Some(".avif"),
        "image/svg+xml" => Some(".svg"),
        _ => None,
    }
}

/// Picks the file extension for an image.
///
/// A known extension in the url wins, then the response content type when one
/// is available, then `default`. The pre-download guess passes no content type
/// and the post-download name passes the response's, so both go through the
/// same rule.
pub fn resolve_extension(url: &str, content_type: Option<&str>, default: &str) -> String {
    if let Some(token) = url_token(url) {
        let token = token.to_ascii_lowercase();
        if URL_EXTENSIONS.contains(&token.as_str()) {
            return format!(".{}", token);
        }
    }

    content_type
        .and_then(extension_for_content_type)
        .unwrap_or(default)
        .to_string()
}

/// Replaces every non alphanumeric character of `id` with `_` and appends `ext`.
pub fn sanitize_filename(id: &str, ext: &str) -> String {
    let safe_id: String = id
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    safe_id + ext
}
