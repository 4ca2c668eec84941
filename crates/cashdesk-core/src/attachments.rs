//! Pending file attachments of an edit session
//!
//! Files are wrapped with a preview handle when they are dropped. Handles are
//! created and released through an injected `PreviewRegistry`, so whatever
//! backs a preview (blob URL, temp file, thumbnail cache) never leaks.

use bytes::Bytes;
use cashdesk_config::AttachmentsConfig;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A raw file as yielded by the drop area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl RawFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lower-cased extension with leading dot, if any
    pub fn extension(&self) -> Option<String> {
        self.name
            .rfind('.')
            .filter(|pos| *pos > 0)
            .map(|pos| self.name[pos..].to_lowercase())
    }
}

/// Opaque handle to a locally generated preview
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(pub String);

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Creates and releases preview handles
pub trait PreviewRegistry: Send + Sync {
    fn create(&self, file: &RawFile) -> PreviewHandle;
    fn release(&self, handle: &PreviewHandle);
}

/// Registry reference type
pub type PreviewRegistryRef = Arc<dyn PreviewRegistry>;

/// Preview registry that only tracks which handles are alive
#[derive(Debug, Default)]
pub struct InMemoryPreviewRegistry {
    live: Mutex<HashSet<PreviewHandle>>,
}

impl InMemoryPreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet released
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or_default()
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.live.lock().map(|live| live.contains(handle)).unwrap_or(false)
    }
}

impl PreviewRegistry for InMemoryPreviewRegistry {
    fn create(&self, file: &RawFile) -> PreviewHandle {
        let handle = PreviewHandle(cashdesk_utils::generate_id("preview"));
        log::trace!("created preview {} for {}", handle, file.name);
        if let Ok(mut live) = self.live.lock() {
            live.insert(handle.clone());
        }
        handle
    }

    fn release(&self, handle: &PreviewHandle) {
        if let Ok(mut live) = self.live.lock() {
            live.remove(handle);
        }
    }
}

/// A pending attachment of the current edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub file: RawFile,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub preview: PreviewHandle,
}

impl AttachedFile {
    /// Human readable size for display
    pub fn readable_size(&self) -> String {
        cashdesk_utils::format_file_size(self.size)
    }
}

/// Tracks the attachment set of one edit session
pub struct FileAttachmentManager {
    registry: PreviewRegistryRef,
    files: Vec<AttachedFile>,
}

impl FileAttachmentManager {
    pub fn new(registry: PreviewRegistryRef) -> Self {
        Self {
            registry,
            files: Vec::new(),
        }
    }

    /// Replace the attachment set with the given files, in drop order
    pub fn add_files(&mut self, raw_files: Vec<RawFile>) {
        self.clear();
        self.files = raw_files
            .into_iter()
            .map(|file| {
                let preview = self.registry.create(&file);
                AttachedFile {
                    name: file.name.clone(),
                    size: file.size(),
                    content_type: file.content_type.clone(),
                    preview,
                    file,
                }
            })
            .collect();
        log::debug!("attachment set replaced with {} file(s)", self.files.len());
    }

    /// Release every preview handle and empty the set
    pub fn clear(&mut self) {
        for attached in self.files.drain(..) {
            self.registry.release(&attached.preview);
        }
    }

    pub fn files(&self) -> &[AttachedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Drop for FileAttachmentManager {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for FileAttachmentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachmentManager")
            .field("files", &self.files)
            .finish()
    }
}

/// Accept rule of the drop area
///
/// A file is accepted when its MIME type matches one of the prefixes or its
/// extension is in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropFilter {
    mime_prefixes: Vec<String>,
    extensions: Vec<String>,
}

impl DropFilter {
    pub fn new(mime_prefixes: Vec<String>, extensions: Vec<String>) -> Self {
        Self {
            mime_prefixes: mime_prefixes.into_iter().map(|p| p.to_lowercase()).collect(),
            extensions: extensions.into_iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    pub fn from_config(config: &AttachmentsConfig) -> Self {
        Self::new(
            config.accepted_mime_prefixes.clone(),
            config.accepted_extensions.clone(),
        )
    }

    pub fn accepts(&self, file: &RawFile) -> bool {
        let content_type = file.content_type.to_lowercase();
        if self.mime_prefixes.iter().any(|prefix| content_type.starts_with(prefix.as_str())) {
            return true;
        }
        file.extension()
            .map(|ext| self.extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Split files into accepted and rejected, keeping order
    pub fn partition(&self, files: Vec<RawFile>) -> (Vec<RawFile>, Vec<RawFile>) {
        files.into_iter().partition(|file| self.accepts(file))
    }
}

impl Default for DropFilter {
    fn default() -> Self {
        Self::from_config(&AttachmentsConfig::default())
    }
}
