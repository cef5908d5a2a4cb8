//! PDF-specific access: the object model, page tree editing, annotations,
//! and saving.

mod annotation;
mod document;
mod graft_map;
mod links;
mod object;
mod page;
mod write_options;

pub use annotation::{AnnotationType, Annotations, PdfAnnotation, flags as annotation_flags};
pub use document::{CjkOrdering, PdfDocument, SimpleFontEncoding};
pub use graft_map::PdfGraftMap;
pub use links::{FileSpec, PdfAction, PdfDestination, PdfLink};
pub use object::PdfObject;
pub use page::{PdfPage, RedactImageMethod, RedactOptions};
pub use write_options::{Encryption, WriteOptions};
