// loan-document-service/src/assets/drive.rs

use url::Url;

const DRIVE_HOST: &str = "drive.google.com";

/// Rewrites a Google Drive sharing link into a direct-download link so the
/// file can be fetched without the Drive viewer page in between.
///
/// Handles `/file/d/<id>/view`, `/open?id=<id>` and `/uc?id=<id>`. Anything
/// else, including unparseable input, is returned unchanged.
pub fn direct_download_url(raw: &str) -> String {
    match drive_file_id(raw) {
        Some(id) => format!("https://{}/uc?export=download&id={}", DRIVE_HOST, id),
        None => raw.to_string(),
    }
}

fn drive_file_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if url.host_str()? != DRIVE_HOST {
        return None;
    }

    let mut segments = url.path_segments()?;
    match (segments.next(), segments.next(), segments.next()) {
        (Some("file"), Some("d"), Some(id)) if !id.is_empty() => Some(id.to_string()),
        (Some("open"), ..) | (Some("uc"), ..) => url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, id)| id.into_owned())
            .filter(|id| !id.is_empty()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_file_view_links() {
        assert_eq!(
            direct_download_url("https://drive.google.com/file/d/1AbC-xyz_9/view?usp=sharing"),
            "https://drive.google.com/uc?export=download&id=1AbC-xyz_9"
        );
    }

    #[test]
    fn rewrites_open_and_uc_links() {
        assert_eq!(
            direct_download_url("https://drive.google.com/open?id=42abc"),
            "https://drive.google.com/uc?export=download&id=42abc"
        );
        assert_eq!(
            direct_download_url("https://drive.google.com/uc?id=42abc&export=view"),
            "https://drive.google.com/uc?export=download&id=42abc"
        );
    }

    #[test]
    fn leaves_other_urls_alone() {
        let cloudinary = "https://res.cloudinary.com/demo/image/upload/photo.png";
        assert_eq!(direct_download_url(cloudinary), cloudinary);
        assert_eq!(direct_download_url("not a url"), "not a url");
        assert_eq!(direct_download_url(""), "");
        assert_eq!(
            direct_download_url("https://drive.google.com/drive/folders/xyz"),
            "https://drive.google.com/drive/folders/xyz"
        );
    }
}
