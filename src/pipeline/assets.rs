//! Image download for admitted articles.

use crate::browser::Browser;
use crate::models::SkipReason;
use crate::utils::url_basename;
use std::path::Path;
use tracing::{info, instrument};

/// Download an article's image into the images directory.
///
/// The file is named after the URL's last path segment. Two images with the
/// same basename land on the same file; the later download wins.
///
/// # Arguments
///
/// * `browser` - Session used for the download
/// * `image_url` - Absolute URL of the image
/// * `images_dir` - Directory the image is saved into
///
/// # Returns
///
/// The local path as written to the report's Image Filename column.
///
/// # Errors
///
/// Returns [`SkipReason::Download`] when the URL has no file name or the
/// download fails.
#[instrument(level = "info", skip_all, fields(url = %image_url))]
pub async fn fetch_image<B: Browser>(
    browser: &mut B,
    image_url: &str,
    images_dir: &Path,
) -> Result<String, SkipReason> {
    let name = url_basename(image_url).ok_or_else(|| SkipReason::Download {
        url: image_url.to_string(),
        reason: "url has no file name".to_string(),
    })?;
    let dest = images_dir.join(name);

    info!(dest = %dest.display(), "Downloading image");
    browser
        .download(image_url, &dest)
        .await
        .map_err(|e| SkipReason::Download {
            url: image_url.to_string(),
            reason: e.to_string(),
        })?;
    Ok(dest.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBrowser;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_fetch_names_file_after_url() {
        let mut browser = FakeBrowser::default();
        let path = fetch_image(
            &mut browser,
            "https://img.example.com/a/b/tesla.jpg?w=640",
            Path::new("output/images"),
        )
        .await
        .unwrap();

        assert_eq!(path, "output/images/tesla.jpg");
        assert_eq!(
            browser.downloads,
            vec![(
                "https://img.example.com/a/b/tesla.jpg?w=640".to_string(),
                PathBuf::from("output/images/tesla.jpg")
            )]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_download_skip() {
        let mut browser = FakeBrowser {
            failing_downloads: vec!["https://img.example.com/gone.jpg".to_string()],
            ..FakeBrowser::default()
        };
        let err = fetch_image(
            &mut browser,
            "https://img.example.com/gone.jpg",
            Path::new("output/images"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SkipReason::Download { .. }));
    }

    #[tokio::test]
    async fn test_url_without_file_name() {
        let mut browser = FakeBrowser::default();
        let err = fetch_image(&mut browser, "https://img.example.com/", Path::new("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, SkipReason::Download { .. }));
        assert!(browser.downloads.is_empty());
    }
}
