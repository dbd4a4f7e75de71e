//! TextMark Core Library
//!
//! In-memory annotation and document-binding model for the TextMark
//! annotation tool: the annotation store, uploaded-template handling,
//! the document handle lifecycle, and the JSON export derivation.

pub mod annotation;
pub mod binding;
pub mod file;
pub mod notice;
pub mod task;
pub mod template;

pub use annotation::{Annotation, AnnotationError, AnnotationId, AnnotationStore, EditingCursor};
pub use binding::{
    DocumentBinding, DocumentUrl, ExportArtifact, MemoryUrls, ObjectUrls, ViewState,
    EXPORT_FILE_NAME,
};
pub use file::{FileError, FileInput, FileKind};
pub use notice::{Notice, NoticeLevel, NoticeLog};
pub use task::{TaskHandle, TaskId, TaskQueue};
pub use template::{TemplateDocument, TemplateError, TemplateRecord, TextRecord};
