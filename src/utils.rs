use crate::config::{
    MAX_BOUNTY_DURATION_SEC, MAX_BOUNTY_INTERVAL_SEC, MIN_BOUNTY_DURATION_SEC,
    MIN_BOUNTY_INTERVAL_SEC,
};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Debug;

// Compiled regex for data URI headers: "data:<mime>[;param...][;base64],"
static DATA_URI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:([a-zA-Z0-9!#$&^_.+-]+/[a-zA-Z0-9!#$&^_.+-]+)?((?:;[^;,]+)*),").unwrap()
});

/// Extract the MIME type from the header of a data URI.
///
/// Returns `None` if `uri` is not a data URI at all. A data URI without an
/// explicit type defaults to `text/plain`, as browsers treat it.
///
/// # Examples
/// ```
/// use chase_overlay::utils::data_uri_mime;
/// assert_eq!(data_uri_mime("data:image/png;base64,iVBO").as_deref(), Some("image/png"));
/// assert_eq!(data_uri_mime("data:,hello").as_deref(), Some("text/plain"));
/// assert_eq!(data_uri_mime("https://example.com/a.png"), None);
/// ```
pub fn data_uri_mime(uri: &str) -> Option<String> {
    let captures = DATA_URI_REGEX.captures(uri)?;
    let mime = captures
        .get(1)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_else(|| "text/plain".to_string());
    Some(mime)
}

/// Whether a MIME type names an image, i.e. matches `image/*`.
pub fn is_image_mime(mime: &str) -> bool {
    mime.split('/').next() == Some("image")
}

/// Format a whole number of seconds the way the sliders display it ("5s").
pub fn format_seconds(secs: u32) -> String {
    format!("{}s", secs)
}

/// Report the first failure of an operation repeated every frame with
/// `warn!`, then stay quiet. Returns `true` when this call logged.
pub fn warn_once<E: Debug>(warned: &mut bool, what: &str, result: Result<(), E>) -> bool {
    match result {
        Err(err) if !*warned => {
            warn!("⚠️ {} failed: {:?}", what, err);
            *warned = true;
            true
        }
        _ => false,
    }
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate bounty display duration input (seconds)
pub fn validate_bounty_duration(input: &str) -> Result<u32, String> {
    validate_numeric_input(
        input,
        Some(MIN_BOUNTY_DURATION_SEC),
        Some(MAX_BOUNTY_DURATION_SEC),
        "Display duration",
    )
}

/// Validate bounty display interval input (seconds)
pub fn validate_bounty_interval(input: &str) -> Result<u32, String> {
    validate_numeric_input(
        input,
        Some(MIN_BOUNTY_INTERVAL_SEC),
        Some(MAX_BOUNTY_INTERVAL_SEC),
        "Display interval",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_logs_first_failure_only() {
        let mut warned = false;
        assert!(!warn_once::<String>(&mut warned, "style", Ok(())));
        assert!(!warned);
        assert!(warn_once(&mut warned, "style", Err("detached")));
        assert!(warned);
        assert!(!warn_once(&mut warned, "style", Err("detached")));
        assert!(!warn_once::<&str>(&mut warned, "style", Ok(())));
    }

    #[test]
    fn test_data_uri_mime() {
        assert_eq!(
            data_uri_mime("data:image/gif;base64,R0lGOD").as_deref(),
            Some("image/gif")
        );
        assert_eq!(
            data_uri_mime("data:image/svg+xml;charset=utf-8;base64,PHN2").as_deref(),
            Some("image/svg+xml")
        );
        assert_eq!(
            data_uri_mime("data:IMAGE/PNG;base64,iVBO").as_deref(),
            Some("image/png")
        );
        assert_eq!(data_uri_mime("data:;base64,aGk=").as_deref(), Some("text/plain"));
        assert_eq!(data_uri_mime("data:image/png;base64"), None);
        assert_eq!(data_uri_mime("/master-ball.png"), None);
    }

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/svg+xml"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("application/image"));
    }

    #[test]
    fn test_validate_bounty_duration() {
        assert_eq!(validate_bounty_duration("1"), Ok(1));
        assert_eq!(validate_bounty_duration(" 10 "), Ok(10));
        assert!(validate_bounty_duration("0").is_err());
        assert!(validate_bounty_duration("11").is_err());
        assert!(validate_bounty_duration("").is_err());
        assert!(validate_bounty_duration("five").is_err());
    }

    #[test]
    fn test_validate_bounty_interval() {
        assert_eq!(validate_bounty_interval("5"), Ok(5));
        assert_eq!(validate_bounty_interval("30"), Ok(30));
        assert_eq!(
            validate_bounty_interval("4"),
            Err("Display interval must be at least 5".to_string())
        );
        assert_eq!(
            validate_bounty_interval("31"),
            Err("Display interval cannot exceed 30".to_string())
        );
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(7), "7s");
    }
}
