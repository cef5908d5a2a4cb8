use std::ffi::CString;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use mupdf_shim_sys as sys;
use tracing::debug;

use crate::buffer::Buffer;
use crate::context::context;
use crate::device::Device;
use crate::error::{Result, ffi_try};
use crate::geometry::Rect;
use crate::handle::{native_handle, path_to_cstring};

native_handle! {
    struct WriterHandle(sys::FzDocumentWriter): DocumentWriter,
        drop = sys::mupdf_drop_document_writer;
}

/// Writes pages drawn through a [`Device`] out as a new document.
///
/// `format` names the output: `pdf`, `cbz`, `svg`, `png`, `txt`, `html`
/// and the other writers MuPDF was built with. `options` is the writer's
/// comma-separated option string, e.g. `"compress,garbage"`.
///
/// A writer over a [`Buffer`] borrows it mutably until the writer is
/// dropped; read the output after that.
#[derive(Debug)]
pub struct DocumentWriter<'b> {
    handle: WriterHandle,
    _output: PhantomData<&'b mut Buffer>,
}

impl DocumentWriter<'static> {
    pub fn new(path: impl AsRef<Path>, format: &str, options: &str) -> Result<Self> {
        let ctx = context()?;
        let c_path = path_to_cstring(path.as_ref())?;
        let c_format = CString::new(format)?;
        let c_options = CString::new(options)?;
        let handle = unsafe {
            let raw = ffi_try!(sys::mupdf_new_document_writer(
                ctx,
                c_path.as_ptr(),
                c_format.as_ptr(),
                c_options.as_ptr()
            ))?;
            WriterHandle::from_raw(raw)?
        };
        Ok(DocumentWriter {
            handle,
            _output: PhantomData,
        })
    }
}

impl<'b> DocumentWriter<'b> {
    /// A writer appending its output to `buffer`.
    pub fn with_buffer(buffer: &'b mut Buffer, format: &str, options: &str) -> Result<Self> {
        let ctx = context()?;
        let c_format = CString::new(format)?;
        let c_options = CString::new(options)?;
        let handle = unsafe {
            let raw = ffi_try!(sys::mupdf_new_document_writer_with_buffer(
                ctx,
                buffer.as_ptr(),
                c_format.as_ptr(),
                c_options.as_ptr()
            ))?;
            WriterHandle::from_raw(raw)?
        };
        Ok(Self {
            handle,
            _output: PhantomData,
        })
    }

    fn as_ptr(&self) -> *mut sys::FzDocumentWriter {
        self.handle.as_ptr()
    }

    /// Starts a page. Draw on the returned device, then call
    /// [`PageDevice::end`].
    pub fn begin_page(&mut self, mediabox: Rect) -> Result<PageDevice<'_, 'b>> {
        let ctx = context()?;
        let device = unsafe {
            let raw = ffi_try!(sys::mupdf_document_writer_begin_page(ctx, self.as_ptr(), mediabox.into()))?;
            Device::from_raw(raw)?
        };
        debug!(?mediabox, "writer page started");
        Ok(PageDevice { device, writer: self })
    }

    /// Finishes the current page. Closes its device.
    pub fn end_page(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_document_writer_end_page(ctx, self.as_ptr())) }
    }

    /// Flushes the output. Nothing more may be written afterwards.
    pub fn close(&mut self) -> Result<()> {
        let ctx = context()?;
        unsafe { ffi_try!(sys::mupdf_close_document_writer(ctx, self.as_ptr())) }
    }
}

/// The device of a page being written. Dereferences to [`Device`].
#[derive(Debug)]
pub struct PageDevice<'w, 'b> {
    device: Device<'w>,
    writer: &'w mut DocumentWriter<'b>,
}

impl PageDevice<'_, '_> {
    /// Ends the page on the writer.
    pub fn end(self) -> Result<()> {
        let PageDevice { device, writer } = self;
        let result = writer.end_page();
        drop(device);
        result
    }
}

impl<'w> Deref for PageDevice<'w, '_> {
    type Target = Device<'w>;

    fn deref(&self) -> &Device<'w> {
        &self.device
    }
}

impl<'w> DerefMut for PageDevice<'w, '_> {
    fn deref_mut(&mut self) -> &mut Device<'w> {
        &mut self.device
    }
}
