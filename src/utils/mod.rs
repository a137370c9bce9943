use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

const FALLBACK_FILENAME: &str = "facebook_video.mp4";

/// Get current Unix timestamp in seconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sanitize filename to remove invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Filename offered for a single asset: the server's suggestion, else the
/// last path segment of the file URL.
pub fn suggest_filename(file_url: &str, server_filename: Option<&str>) -> String {
    let candidate = server_filename
        .map(str::to_string)
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            Url::parse(file_url).ok().and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
                    .filter(|segment| !segment.is_empty())
            })
        });

    match candidate {
        Some(name) => {
            let name = sanitize_filename(&name);
            let name = name.trim_matches(|c| c == '.' || c == ' ');
            if name.is_empty() {
                FALLBACK_FILENAME.to_string()
            } else {
                name.to_string()
            }
        }
        None => FALLBACK_FILENAME.to_string(),
    }
}

/// Filename offered for one entry of a quality list.
pub fn variant_filename(quality: &str, timestamp: u64) -> String {
    format!(
        "facebook_video_{}_{}.mp4",
        sanitize_filename(quality).replace(' ', "_"),
        timestamp
    )
}
