//! Grabbed external processes.

use std::ptr::NonNull;

use tracing::debug;

use crate::ffi;
use crate::handle::Handle;

/// A process grabbed for instrumentation via [`Handle::proc_grab`].
///
/// The grab leaves the target stopped; call [`resume`](Self::resume) once
/// probes are in place. The process is released back to the engine when
/// this value drops. Borrowing the session keeps the release call valid:
/// the handle is guaranteed to still be open.
#[derive(Debug)]
pub struct ProcHandle<'h> {
    raw: NonNull<ffi::ps_prochandle>,
    session: &'h Handle,
}

impl<'h> ProcHandle<'h> {
    pub(crate) fn new(raw: NonNull<ffi::ps_prochandle>, session: &'h Handle) -> Self {
        Self { raw, session }
    }

    /// Let the stopped target run again.
    pub fn resume(&self) {
        unsafe { ffi::dtrace_proc_continue(self.session.as_raw(), self.raw.as_ptr()) }
    }
}

impl Drop for ProcHandle<'_> {
    fn drop(&mut self) {
        debug!("releasing grabbed process");
        unsafe { ffi::dtrace_proc_release(self.session.as_raw(), self.raw.as_ptr()) }
    }
}
