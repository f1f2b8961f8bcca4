//! The currently selected local asset and its single-owner store.

use eidos_bridge::MediaUpload;
use eidos_common::{new_display_handle, MediaKind};

use crate::WorkspaceError;

/// A locally selected media asset. The byte buffer is the "local handle"
/// of the asset; dropping the asset releases it.
#[derive(Debug)]
pub struct MediaAsset {
    pub kind: MediaKind,
    pub filename: String,
    pub content_type: String,
    /// Opaque handle a presentation layer can key off (`media://…`).
    pub display_uri: String,
    bytes: Vec<u8>,
}

impl MediaAsset {
    /// Classify and wrap a selected file. Fails without side effects when
    /// the declared content type is blank.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, WorkspaceError> {
        let content_type = content_type.into();
        let kind = MediaKind::from_content_type(&content_type)
            .ok_or_else(|| WorkspaceError::UnsupportedMediaKind(content_type.clone()))?;
        Ok(Self {
            kind,
            filename: filename.into(),
            content_type,
            display_uri: new_display_handle(),
            bytes,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Package the asset for a multipart upload.
    pub fn to_upload(&self) -> MediaUpload {
        MediaUpload {
            bytes: self.bytes.clone(),
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

/// Holds at most one live [`MediaAsset`]. Adopting a new one drops the
/// previous handle first, so two assets never coexist.
#[derive(Debug, Default)]
pub struct MediaStore {
    current: Option<MediaAsset>,
}

impl MediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a new asset, releasing any previous one. Returns whether a
    /// previous asset was displaced along with the adopted asset.
    pub fn adopt(&mut self, asset: MediaAsset) -> (bool, &MediaAsset) {
        let replaced = self.current.is_some();
        (replaced, self.current.insert(asset))
    }

    pub fn current(&self) -> Option<&MediaAsset> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
