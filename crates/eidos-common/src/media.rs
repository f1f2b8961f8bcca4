use serde::{Deserialize, Serialize};

/// Kind of a selected media asset, decided by its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by declared content type: `video/*` is video, any other
    /// non-blank type is treated as an image. A blank type is the one
    /// thing the workspace refuses to adopt.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let ct = content_type.trim();
        if ct.is_empty() {
            return None;
        }
        if ct.starts_with("video/") {
            Some(Self::Video)
        } else {
            Some(Self::Image)
        }
    }

    pub fn is_video(self) -> bool {
        self == Self::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_types_classify_as_video() {
        assert_eq!(
            MediaKind::from_content_type("video/mp4"),
            Some(MediaKind::Video)
        );
        assert_eq!(
            MediaKind::from_content_type("video/webm"),
            Some(MediaKind::Video)
        );
    }

    #[test]
    fn image_types_classify_as_image() {
        assert_eq!(
            MediaKind::from_content_type("image/png"),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaKind::from_content_type("image/jpeg"),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn unknown_types_fall_back_to_image() {
        // Matches the frontend contract: only the video/ prefix is special.
        assert_eq!(
            MediaKind::from_content_type("application/octet-stream"),
            Some(MediaKind::Image)
        );
    }

    #[test]
    fn blank_type_is_unsupported() {
        assert_eq!(MediaKind::from_content_type(""), None);
        assert_eq!(MediaKind::from_content_type("   "), None);
    }

    #[test]
    fn is_video() {
        assert!(MediaKind::Video.is_video());
        assert!(!MediaKind::Image.is_video());
    }
}
