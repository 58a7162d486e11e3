use crate::writer::{Hijacker, ResponseWriter, Vars};
use http::{HeaderMap, StatusCode};
use std::fmt;
use std::io;

/// A [`ResponseWriter`] decorator adding a [`Vars`] bag and a `written` flag.
///
/// Wrapping never creates a second bag for the same request: if the inner writer already
/// exposes one (for instance because it is itself a `WrappedWriter`), the new wrapper
/// shares it. The `written` flag is per wrapper and only flips on [`write_status`].
///
/// [`write_status`]: ResponseWriter::write_status
pub struct WrappedWriter<'w> {
    inner: &'w mut dyn ResponseWriter,
    vars: Vars,
    written: bool,
}

impl<'w> WrappedWriter<'w> {
    pub fn wrap(inner: &'w mut dyn ResponseWriter) -> Self {
        let vars = inner.vars().cloned().unwrap_or_default();
        Self { inner, vars, written: false }
    }

    /// The bag shared by every wrapper derived from the same root writer.
    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Returns true if a status has been written since creation or the last [`reset`](Self::reset).
    pub fn written(&self) -> bool {
        self.written
    }

    pub(crate) fn reset(&mut self) {
        self.written = false;
    }
}

impl io::Write for WrappedWriter<'_> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl ResponseWriter for WrappedWriter<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.written = true;
        self.inner.write_status(status);
    }

    fn vars(&self) -> Option<&Vars> {
        Some(&self.vars)
    }

    fn was_written(&self) -> Option<bool> {
        Some(self.written)
    }

    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        self.inner.hijacker()
    }
}

impl fmt::Debug for WrappedWriter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedWriter").field("vars", &self.vars).field("written", &self.written).finish_non_exhaustive()
    }
}
