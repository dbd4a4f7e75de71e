//! The top-level workspace: owns the two state containers and turns
//! validation failures into user notices.
//!
//! Presentation layers call the handlers here and render whatever the
//! stores expose; they never mutate state directly. All simulated
//! asynchronous work goes through the task queue and is delivered by
//! [`Workspace::pump_at`] on the single event loop.

use std::time::{Duration, Instant};
use textmark_core::annotation::{Annotation, AnnotationId, AnnotationStore};
use textmark_core::binding::{DocumentBinding, ExportArtifact, MemoryUrls, ViewState};
use textmark_core::file::FileInput;
use textmark_core::notice::{Notice, NoticeLog};
use textmark_core::task::TaskQueue;
use textmark_core::template::TemplateDocument;

/// Simulated backend conversion time after a document upload.
pub const DOCUMENT_PROCESSING_DELAY: Duration = Duration::from_secs(1);

/// File reads complete on the next pump.
const READ_COMPLETION_DELAY: Duration = Duration::ZERO;

/// Deferred work delivered through the task queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// The simulated document conversion finished.
    DocumentProcessed { generation: u64 },
    /// A template file read completed.
    TemplateRead { generation: u64, content: String },
}

/// Top-level screen state: annotation store, document binding, pending
/// notices, and the deferred-task queue.
#[derive(Debug)]
pub struct Workspace {
    store: AnnotationStore,
    binding: DocumentBinding<MemoryUrls>,
    notices: NoticeLog,
    tasks: TaskQueue<WorkspaceEvent>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self {
            store: AnnotationStore::new(),
            binding: DocumentBinding::in_memory(),
            notices: NoticeLog::new(),
            tasks: TaskQueue::new(),
        }
    }

    /// The annotation store (read-only).
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// The document binding (read-only).
    pub fn binding(&self) -> &DocumentBinding<MemoryUrls> {
        &self.binding
    }

    /// Current display state.
    pub fn view(&self) -> ViewState {
        self.binding.view()
    }

    /// Take all pending notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Display projection with a search query.
    pub fn filtered(&self, query: &str) -> Vec<&Annotation> {
        self.store.filter(query)
    }

    /// The viewer reported a raw text selection.
    pub fn select_text(&mut self, text: &str) {
        self.store.set_pending_selection(text);
    }

    /// Bind the pending selection to a label.
    pub fn add_annotation(&mut self, label: &str) -> Option<AnnotationId> {
        match self.store.add_annotation(label) {
            Ok(id) => {
                self.notices.success("Annotation added");
                Some(id)
            }
            Err(e) => {
                self.notices.error(e.to_string());
                None
            }
        }
    }

    /// Delete an annotation. Reported as a success whether or not the id
    /// existed; from the user's point of view the delete is idempotent.
    pub fn delete_annotation(&mut self, id: AnnotationId) {
        let removed = self.store.delete_annotation(id);
        if !removed {
            log::debug!("delete of missing annotation {}", id);
        }
        self.notices.success("Annotation deleted");
    }

    /// Start renaming an annotation.
    pub fn begin_edit(&mut self, id: AnnotationId) {
        if let Err(e) = self.store.begin_edit(id) {
            self.notices.error(e.to_string());
        }
    }

    /// Update the rename draft.
    pub fn set_draft(&mut self, text: &str) {
        self.store.set_draft(text);
    }

    /// Abandon the rename.
    pub fn cancel_edit(&mut self) {
        self.store.cancel_edit();
    }

    /// Commit the rename.
    pub fn commit_edit(&mut self, id: AnnotationId, new_label: &str) {
        match self.store.commit_edit(id, new_label) {
            Ok(()) => self.notices.success("Annotation updated"),
            Err(e) => self.notices.error(e.to_string()),
        }
    }

    /// Persisting annotations is a stub; there is no backend.
    pub fn save_annotations(&mut self) {
        log::info!("saving {} annotations", self.store.len());
        self.notices.success("Annotations saved");
    }

    /// Load a new document for viewing. Resets the annotation store and
    /// schedules the simulated processing notice.
    pub fn upload_pdf(&mut self, file: &FileInput) {
        match self.binding.load_document(file) {
            Ok(_) => {
                self.store.clear();
                self.notices.success("PDF uploaded successfully");
                self.tasks.schedule(
                    DOCUMENT_PROCESSING_DELAY,
                    WorkspaceEvent::DocumentProcessed {
                        generation: self.binding.document_generation(),
                    },
                );
            }
            Err(e) => self.notices.error(e.to_string()),
        }
    }

    /// Upload a template file. The read is deferred; its result carries
    /// the generation it was started under and is dropped if a newer
    /// upload or document load supersedes it before delivery.
    pub fn upload_json(&mut self, file: &FileInput) {
        if let Err(e) = file.expect_json() {
            self.notices.error(e.to_string());
            return;
        }
        let generation = self.binding.begin_read();
        self.tasks.schedule(
            READ_COMPLETION_DELAY,
            WorkspaceEvent::TemplateRead {
                generation,
                content: file.text(),
            },
        );
        self.notices.success("JSON uploaded successfully");
    }

    /// Export the current annotation set as a download artifact.
    pub fn download_json(&mut self) -> ExportArtifact {
        let artifact = self.binding.export_annotations(self.store.annotations());
        self.notices.success("JSON downloaded successfully");
        artifact
    }

    /// Flip between the uploader and the viewer.
    pub fn toggle_uploader(&mut self) {
        self.binding.toggle_view();
    }

    /// Deliver all deferred events due at `now`.
    pub fn pump_at(&mut self, now: Instant) {
        for event in self.tasks.poll_ready(now) {
            self.apply(event);
        }
    }

    /// Deliver all deferred events that are due.
    pub fn pump(&mut self) {
        self.pump_at(Instant::now());
    }

    fn apply(&mut self, event: WorkspaceEvent) {
        match event {
            WorkspaceEvent::DocumentProcessed { generation } => {
                if generation != self.binding.document_generation() {
                    log::debug!("dropping stale processing notice (gen {})", generation);
                    return;
                }
                self.notices.success("PDF processed successfully");
            }
            WorkspaceEvent::TemplateRead {
                generation,
                content,
            } => {
                if generation != self.binding.read_generation() {
                    log::debug!("dropping stale template read (gen {})", generation);
                    return;
                }
                self.apply_template_read(&content);
            }
        }
    }

    fn apply_template_read(&mut self, content: &str) {
        let template = match TemplateDocument::from_json(content) {
            Ok(Some(template)) => template,
            // Valid JSON that is not an array: nothing to install.
            Ok(None) => return,
            Err(e) => {
                self.notices.error(e.to_string());
                return;
            }
        };

        let extracted = template.extract_annotations();
        self.binding.install_template(template);
        if !extracted.is_empty() {
            let count = extracted.len();
            self.store.replace_all(extracted);
            self.notices.success(format!("Loaded {} annotations", count));
        }
    }
}
