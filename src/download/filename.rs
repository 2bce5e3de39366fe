//! Filename derivation for downloads.
//!
//! Two strategies, chosen by download kind:
//! - [`image_filename`] finds BOOTH's image asset path
//!   (`<hash>/i/<id>/<name>.<ext>`) in the request URL.
//! - [`binary_filename`] takes the last path segment of the resolved
//!   (post-redirect) URL, up to its query string.
//!
//! Both are pure string functions. Failure is reported as a
//! [`FilenameError`], never as an empty name.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Regex for BOOTH image asset paths.
/// Matches `<hash>/i/<id>/<name>.<ext>` where ext is png, jpg or gif (case-sensitive).
#[allow(clippy::expect_used)]
static IMAGE_ASSET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-f0-9-]*/i/[0-9]*/[a-zA-Z0-9\-_]*\.(png|jpg|gif)")
        .expect("image asset regex is valid") // Static pattern, safe to panic
});

/// Reasons a save filename cannot be derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    /// The URL contains no image asset path.
    #[error("no image asset path (<hash>/i/<id>/<name>.png|jpg|gif) in {url}")]
    NoAssetPath {
        /// The URL that was searched.
        url: String,
    },

    /// The URL contains no `/` to split a final segment from.
    #[error("no path segment in {url}")]
    NoPathSegment {
        /// The URL that was searched.
        url: String,
    },

    /// The final segment of the resolved URL is not followed by a query string.
    #[error("resolved URL has no query string after its last segment: {url}")]
    NoQueryTerminator {
        /// The resolved URL.
        url: String,
    },

    /// The extracted name is empty or has no stem.
    #[error("empty filename derived from {url}")]
    EmptyName {
        /// The URL the name was extracted from.
        url: String,
    },

    /// The extracted name would escape the target directory.
    #[error("unsafe filename '{name}' derived from {url}")]
    UnsafeName {
        /// The rejected name.
        name: String,
        /// The URL the name was extracted from.
        url: String,
    },
}

/// Derives an image filename from a request URL.
///
/// The final `/`-delimited segment of the first asset path match is the
/// filename, e.g. `https://host/abcdef-123/i/456/photo.png?x=1` → `photo.png`.
///
/// # Errors
///
/// Returns [`FilenameError::NoAssetPath`] when the URL has no asset path, or
/// [`FilenameError::EmptyName`] when the matched name has no stem.
pub fn image_filename(url: &str) -> Result<String, FilenameError> {
    let matched = IMAGE_ASSET_PATTERN
        .find(url)
        .ok_or_else(|| FilenameError::NoAssetPath {
            url: url.to_string(),
        })?;

    let name = matched.as_str().rsplit('/').next().unwrap_or_default();
    if name.starts_with('.') {
        return Err(FilenameError::EmptyName {
            url: url.to_string(),
        });
    }

    Ok(name.to_string())
}

/// Derives a purchase filename from a resolved download URL.
///
/// Takes the text between the first `?` and the last `/` before it, then
/// percent-decodes it, e.g. `https://host/dl/archive.zip?token=abc` → `archive.zip`.
///
/// # Errors
///
/// Returns a [`FilenameError`] when the URL has no `?`, when no `/` precedes
/// it, or when the extracted name is empty or unsafe.
pub fn binary_filename(resolved_url: &str) -> Result<String, FilenameError> {
    let query_start = resolved_url
        .find('?')
        .ok_or_else(|| FilenameError::NoQueryTerminator {
            url: resolved_url.to_string(),
        })?;
    // Signed storage URLs may carry unencoded '/' in the query.
    let before_query = &resolved_url[..query_start];

    let slash = before_query
        .rfind('/')
        .ok_or_else(|| FilenameError::NoPathSegment {
            url: resolved_url.to_string(),
        })?;
    let raw = &before_query[slash + 1..];

    let decoded = urlencoding::decode(raw).unwrap_or_else(|e| {
        debug!(
            segment = %raw,
            error = %e,
            "URL decoding failed, using raw segment"
        );
        raw.into()
    });

    validate_name(&decoded, resolved_url)
}

/// Rejects names that are empty or could leave the target directory.
fn validate_name(name: &str, url: &str) -> Result<String, FilenameError> {
    if name.is_empty() {
        return Err(FilenameError::EmptyName {
            url: url.to_string(),
        });
    }

    if matches!(name, "." | "..") || name.contains(['/', '\\', '\0']) {
        return Err(FilenameError::UnsafeName {
            name: name.to_string(),
            url: url.to_string(),
        });
    }

    Ok(name.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ---- image_filename ----

    #[test]
    fn test_image_filename_from_asset_path_with_query() {
        let url = "https://host/abcdef-123/i/456/photo.png?x=1";
        assert_eq!(image_filename(url).unwrap(), "photo.png");
    }

    #[test]
    fn test_image_filename_real_pximg_url() {
        let url = "https://booth.pximg.net/c/300x300_a2_g5/0a1b2c3d-4e5f-6789-abcd-ef0123456789/i/4134567/0a1b2c3d-4e5f-6789-abcd-ef0123456789_base_resized.jpg";
        assert_eq!(
            image_filename(url).unwrap(),
            "0a1b2c3d-4e5f-6789-abcd-ef0123456789_base_resized.jpg"
        );
    }

    #[test]
    fn test_image_filename_gif() {
        let url = "https://host/ff00/i/1/anim_01.gif";
        assert_eq!(image_filename(url).unwrap(), "anim_01.gif");
    }

    #[test]
    fn test_image_filename_no_match_is_error() {
        let url = "https://booth.pm/ja/items/123456";
        let err = image_filename(url).unwrap_err();
        assert_eq!(
            err,
            FilenameError::NoAssetPath {
                url: url.to_string()
            }
        );
    }

    #[test]
    fn test_image_filename_extension_is_case_sensitive() {
        let url = "https://host/abcdef/i/456/photo.PNG";
        assert!(matches!(
            image_filename(url),
            Err(FilenameError::NoAssetPath { .. })
        ));
    }

    #[test]
    fn test_image_filename_unsupported_extension_is_error() {
        let url = "https://host/abcdef/i/456/photo.webp";
        assert!(image_filename(url).is_err());
    }

    #[test]
    fn test_image_filename_without_stem_is_error() {
        let url = "https://host/abcdef/i/456/.png";
        assert!(matches!(
            image_filename(url),
            Err(FilenameError::EmptyName { .. })
        ));
    }

    // ---- binary_filename ----

    #[test]
    fn test_binary_filename_strips_query() {
        let url = "https://host/dl/archive.zip?token=abc";
        assert_eq!(binary_filename(url).unwrap(), "archive.zip");
    }

    #[test]
    fn test_binary_filename_signed_storage_url() {
        let url = "https://s2.booth.pm/b0c1/i/987654/a1b2c3d4/avatar_v2.unitypackage?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Credential=ABC%2F20240101%2Fap-northeast-1";
        assert_eq!(binary_filename(url).unwrap(), "avatar_v2.unitypackage");
    }

    #[test]
    fn test_binary_filename_query_with_unencoded_slashes() {
        let url = "https://s2.booth.pm/b/i/1/x/avatar.zip?X-Amz-Credential=AKIA/20240101/ap-northeast-1/s3/aws4_request&X-Amz-Signature=ab";
        assert_eq!(binary_filename(url).unwrap(), "avatar.zip");
    }

    #[test]
    fn test_binary_filename_percent_decodes() {
        let url = "https://host/dl/%E8%A1%A3%E8%A3%85.zip?sig=1";
        assert_eq!(binary_filename(url).unwrap(), "衣装.zip");
    }

    #[test]
    fn test_binary_filename_without_query_is_error() {
        let url = "https://host/dl/archive.zip";
        assert!(matches!(
            binary_filename(url),
            Err(FilenameError::NoQueryTerminator { .. })
        ));
    }

    #[test]
    fn test_binary_filename_without_slash_is_error() {
        assert!(matches!(
            binary_filename("archive.zip?x=1"),
            Err(FilenameError::NoPathSegment { .. })
        ));
    }

    #[test]
    fn test_binary_filename_empty_segment_is_error() {
        let url = "https://host/dl/?token=abc";
        assert!(matches!(
            binary_filename(url),
            Err(FilenameError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_binary_filename_rejects_encoded_separator() {
        let url = "https://host/dl/..%2Fescape.zip?token=abc";
        assert!(matches!(
            binary_filename(url),
            Err(FilenameError::UnsafeName { .. })
        ));
    }

    #[test]
    fn test_binary_filename_rejects_dot_dot() {
        let url = "https://host/dl/..?token=abc";
        assert!(matches!(
            binary_filename(url),
            Err(FilenameError::UnsafeName { .. })
        ));
    }
}
