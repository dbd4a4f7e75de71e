//! Document binding: the loaded document handle, the optional uploaded
//! template, and the export derivation.
//!
//! Exactly one document handle is live at a time. Replacing the document
//! revokes the previous handle before issuing the new one, so unreleased
//! handles cannot accumulate.

use crate::annotation::Annotation;
use crate::file::{FileError, FileInput};
use crate::template::{self, TemplateDocument};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// File name offered for the JSON export artifact.
pub const EXPORT_FILE_NAME: &str = "annotated_template.json";

/// Opaque reference to the binary document currently loaded for viewing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentUrl(String);

impl DocumentUrl {
    /// The reference as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Allocator for document handles.
///
/// Mirrors an object-URL registry: every created handle must eventually
/// be revoked, and the binding revokes the old handle on every
/// replacement or teardown.
pub trait ObjectUrls {
    /// Issue a handle for the file.
    fn create(&mut self, file: &FileInput) -> DocumentUrl;

    /// Release a handle.
    fn revoke(&mut self, url: &DocumentUrl);
}

/// In-memory handle allocator; tracks live handles so tests can assert
/// the one-live-handle discipline.
#[derive(Debug, Default)]
pub struct MemoryUrls {
    live: HashSet<DocumentUrl>,
    issued: u64,
}

impl MemoryUrls {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently live handles.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total handles ever issued.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Check whether a handle is still live.
    pub fn is_live(&self, url: &DocumentUrl) -> bool {
        self.live.contains(url)
    }
}

impl ObjectUrls for MemoryUrls {
    fn create(&mut self, file: &FileInput) -> DocumentUrl {
        let url = DocumentUrl(format!("blob:{}/{}", file.name, Uuid::new_v4()));
        self.issued += 1;
        self.live.insert(url.clone());
        url
    }

    fn revoke(&mut self, url: &DocumentUrl) {
        self.live.remove(url);
    }
}

/// The two mutually exclusive display states of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    Uploader,
    #[default]
    Viewer,
}

impl ViewState {
    /// Flip between the uploader and the viewer.
    pub fn toggle(self) -> Self {
        match self {
            ViewState::Uploader => ViewState::Viewer,
            ViewState::Viewer => ViewState::Uploader,
        }
    }
}

/// A named client-side download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// The artifact content as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Owns the loaded document handle and the optional template, and derives
/// the export payload.
#[derive(Debug)]
pub struct DocumentBinding<U: ObjectUrls> {
    urls: U,
    current: Option<DocumentUrl>,
    template: Option<TemplateDocument>,
    view: ViewState,
    /// Bumped only when a new document is loaded; the deferred
    /// processing notice carries the generation of the load that
    /// scheduled it and is dropped once a newer load supersedes it.
    document_generation: u64,
    /// Bumped on every template-read start and on every document load
    /// (a new document resets the annotations a read would seed). A
    /// deferred read result is dropped once its generation is stale.
    read_generation: u64,
}

impl DocumentBinding<MemoryUrls> {
    /// Create a binding backed by the in-memory handle allocator.
    pub fn in_memory() -> Self {
        Self::new(MemoryUrls::new())
    }
}

impl<U: ObjectUrls> DocumentBinding<U> {
    /// Create a binding with the given handle allocator.
    pub fn new(urls: U) -> Self {
        Self {
            urls,
            current: None,
            template: None,
            view: ViewState::default(),
            document_generation: 0,
            read_generation: 0,
        }
    }

    /// The handle allocator.
    pub fn urls(&self) -> &U {
        &self.urls
    }

    /// The current document handle, if a document is loaded.
    pub fn document_url(&self) -> Option<&DocumentUrl> {
        self.current.as_ref()
    }

    /// The installed template, if any.
    pub fn template(&self) -> Option<&TemplateDocument> {
        self.template.as_ref()
    }

    /// Current display state.
    pub fn view(&self) -> ViewState {
        self.view
    }

    /// Toggle the uploader/viewer display state.
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggle();
    }

    /// Generation of the currently loaded document.
    pub fn document_generation(&self) -> u64 {
        self.document_generation
    }

    /// Generation of the most recently started template read.
    pub fn read_generation(&self) -> u64 {
        self.read_generation
    }

    /// Start a deferred template read: supersedes any read still in
    /// flight and returns the generation the new read runs under.
    /// Does not touch the document generation, so a pending processing
    /// notice still fires.
    pub fn begin_read(&mut self) -> u64 {
        self.read_generation += 1;
        self.read_generation
    }

    /// Load a new document. Rejects non-PDF input; on success the
    /// previous handle is revoked, a fresh one issued, and the display
    /// forced to the viewer. The caller resets the annotation store.
    pub fn load_document(&mut self, file: &FileInput) -> Result<DocumentUrl, FileError> {
        file.expect_pdf()?;

        if let Some(old) = self.current.take() {
            self.urls.revoke(&old);
        }
        let url = self.urls.create(file);
        log::info!("document loaded: {}", file.name);

        self.current = Some(url.clone());
        self.view = ViewState::Viewer;
        self.document_generation += 1;
        self.read_generation += 1;
        Ok(url)
    }

    /// Drop the loaded document and revoke its handle.
    pub fn unload_document(&mut self) {
        if let Some(old) = self.current.take() {
            self.urls.revoke(&old);
        }
    }

    /// Install a parsed template. A failed parse never reaches this
    /// point, so prior state survives parse failures untouched.
    pub fn install_template(&mut self, template: TemplateDocument) {
        self.template = Some(template);
    }

    /// Derive the export artifact from the current annotation list.
    ///
    /// With a template present the annotations are merged into it;
    /// without one a minimal record sequence is synthesized. Always
    /// produces output, possibly an empty array.
    pub fn export_annotations(&self, annotations: &[Annotation]) -> ExportArtifact {
        let records = match &self.template {
            Some(template) => template.merge(annotations),
            None => template::synthesize(annotations),
        };
        let payload = Value::Array(records);
        let json = serde_json::to_string_pretty(&payload)
            .unwrap_or_else(|_| payload.to_string());
        ExportArtifact {
            file_name: EXPORT_FILE_NAME.to_string(),
            bytes: json.into_bytes(),
        }
    }
}

impl<U: ObjectUrls> Drop for DocumentBinding<U> {
    fn drop(&mut self) {
        self.unload_document();
    }
}
