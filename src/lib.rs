//! Safe bindings over MuPDF.
//!
//! Every native object is held by an owned handle that releases its
//! reference exactly once. Every fallible call returns [`Result`]; native
//! exceptions never cross into Rust as unwinds. Each thread works through
//! its own clone of one shared base context, created on first use or
//! explicitly with [`Context::init`].
//!
//! Immutable objects (colorspaces, fonts, images, stroke states, recorded
//! display lists) are cheap to clone and may move between threads. Mutable
//! ones (pixmaps, buffers, paths, text) are move-only, so `&mut` access is
//! exclusive. Documents and everything loaded from them stay on the thread
//! that opened them; share one across threads with [`SharedDocument`].
//!
//! ```no_run
//! use mupdf_safe::{Colorspace, Document, Matrix};
//!
//! # fn main() -> mupdf_safe::Result<()> {
//! let doc = Document::open("report.pdf")?;
//! let page = doc.load_page(0)?;
//! let pixmap = page.to_pixmap(&Matrix::scale(2.0, 2.0), &Colorspace::device_rgb()?, false, true)?;
//! pixmap.save_as("page-1.png", mupdf_safe::ImageFormat::Png)?;
//! # Ok(())
//! # }
//! ```
//!
//! Pixmaps are not `Clone`, so two handles never alias one set of samples:
//!
//! ```compile_fail
//! fn needs_clone<T: Clone>() {}
//! needs_clone::<mupdf_safe::Pixmap>();
//! ```
//!
//! Documents cannot be moved to another thread:
//!
//! ```compile_fail
//! fn needs_send<T: Send>() {}
//! needs_send::<mupdf_safe::Document>();
//! ```
//!
//! A draw device holds its pixmap until the device is gone:
//!
//! ```compile_fail
//! use mupdf_safe::{Colorspace, Device, Matrix, Pixmap};
//!
//! fn read_while_drawing(cs: &Colorspace) -> mupdf_safe::Result<u8> {
//!     let mut pix = Pixmap::new_with_size(cs, 4, 4, false)?;
//!     let dev = Device::draw(&mut pix, &Matrix::IDENTITY)?;
//!     let first = pix.samples()[0];
//!     drop(dev);
//!     Ok(first)
//! }
//! ```

mod buffer;
mod colorspace;
mod context;
mod cookie;
mod custom_device;
mod device;
mod display_list;
mod document;
mod document_writer;
mod error;
mod font;
mod geometry;
mod handle;
mod image;
mod link;
mod lock;
mod outline;
mod page;
mod path;
pub mod pdf;
mod pixmap;
mod search;
mod separations;
mod shared_document;
mod stats;
mod stroke_state;
#[cfg(all(feature = "system-fonts", not(target_os = "android")))]
mod system_font;
mod text;
mod text_page;

#[cfg(test)]
mod testing;

pub use buffer::Buffer;
pub use colorspace::{ColorParams, Colorspace, ColorspaceType};
pub use context::{Context, ContextOptions, DEFAULT_STORE_SIZE};
pub use cookie::Cookie;
pub use custom_device::CustomDevice;
pub use device::{BlendMode, Device};
pub use display_list::DisplayList;
pub use document::{Document, metadata};
pub use document_writer::{DocumentWriter, PageDevice};
pub use error::{Error, ErrorKind, Result};
pub use font::{Font, WriteMode};
pub use geometry::{IRect, Matrix, Point, Quad, Rect};
pub use image::Image;
pub use link::{DestinationKind, Link, LinkDestination, Location};
pub use lock::LOCK_MAX;
pub use outline::Outline;
pub use page::{Page, RunMode};
pub use path::{Path, PathWalker};
pub use pixmap::{ImageFormat, Pixmap};
pub use search::{DEFAULT_HIT_MAX, SearchHits};
pub use separations::{SeparationState, Separations};
pub use shared_document::SharedDocument;
pub use stats::{HandleKind, HandleStats, handle_stats, live_handles};
pub use stroke_state::{LineCap, LineJoin, StrokeParams, StrokeState};
pub use text::Text;
pub use text_page::{TextFormat, TextPage, TextPageOptions};
