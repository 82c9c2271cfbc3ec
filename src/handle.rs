//! Session handles and the engine operations exposed through them.

use std::ffi::{CStr, CString};
use std::os::raw::{c_int, c_void};
use std::ptr::{self, NonNull};

use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::consumer::{
    probe_trampoline, rec_trampoline, ConsumeAction, ProbeData, RecordDesc, WorkClosures,
    WorkStatus,
};
use crate::error::{Error, Result};
use crate::ffi;
use crate::marshal::CStringArray;
use crate::probe::ProbeSpec;
use crate::process::ProcHandle;
use crate::program::{ProgInfo, Program};

/// An open tracing session.
///
/// A `Handle` exclusively owns the native session and releases it exactly
/// once, when dropped. Compiled programs and grabbed processes borrow the
/// handle, so using them after the session is gone is a compile error
/// rather than undefined behavior.
///
/// The type holds a raw pointer and is therefore neither `Send` nor
/// `Sync`: the engine does not document its handle as thread-safe, so all
/// access to one session stays on one thread.
#[derive(Debug)]
pub struct Handle {
    raw: NonNull<ffi::dtrace_hdl>,
}

impl Handle {
    /// Open a new tracing session.
    ///
    /// `flags` is a bitmask of the [`crate::flags`] `O_*` constants; pass
    /// `0` for the defaults. Opening typically requires elevated
    /// privileges.
    pub fn open(flags: i32) -> Result<Self> {
        let mut errno: c_int = 0;
        let raw = unsafe { ffi::dtrace_open(ffi::DTRACE_VERSION, flags, &mut errno) };
        match NonNull::new(raw) {
            Some(raw) => {
                debug!(flags, "opened dtrace session");
                Ok(Self { raw })
            }
            None => Err(Error::Open {
                errno,
                message: error_message(None, errno),
            }),
        }
    }

    /// Close the session, releasing all engine resources.
    ///
    /// Dropping the handle does the same; this form only makes the point
    /// of release explicit in calling code. Either way the native close
    /// runs exactly once, and everything borrowed from the session is
    /// already out of scope by the time it can run.
    pub fn close(self) {}

    pub(crate) fn as_raw(&self) -> *mut ffi::dtrace_hdl {
        self.raw.as_ptr()
    }

    /// Compile D source text into a program.
    ///
    /// `spec` selects how partial probe descriptions in the source are
    /// disambiguated, `cflags` is a bitmask of the [`crate::flags`] `C_*`
    /// constants, and `args` become the program's macro arguments
    /// (`$1` .. `$n`). An empty `args` slice is passed to the engine as a
    /// null vector with a zero count.
    pub fn compile(
        &self,
        source: &str,
        spec: ProbeSpec,
        cflags: u32,
        args: &[&str],
    ) -> Result<Program<'_>> {
        let csource = CString::new(source)?;
        let argv = CStringArray::new(args)?;
        let prog = unsafe {
            ffi::dtrace_program_strcompile(
                self.as_raw(),
                csource.as_ptr(),
                spec.to_native(),
                cflags,
                argv.argc(),
                argv.as_ptr(),
            )
        };
        // csource and argv must outlive the native call above.
        match NonNull::new(prog) {
            Some(prog) => {
                debug!(?spec, cflags, "compiled program");
                Ok(Program::from_raw(prog))
            }
            None => {
                let (errno, message) = self.errno_message();
                Err(Error::Compile { errno, message })
            }
        }
    }

    /// Enable all installed instrumentation and start tracing.
    pub fn go(&self) -> Result<()> {
        if unsafe { ffi::dtrace_go(self.as_raw()) } == -1 {
            let (errno, message) = self.errno_message();
            return Err(Error::Activation { errno, message });
        }
        debug!("instrumentation enabled");
        Ok(())
    }

    /// Execute a compiled program, installing its enablings in the
    /// session.
    ///
    /// Consumes the program. The returned snapshot reports how many probes
    /// the program matched.
    pub fn exec(&self, program: Program<'_>) -> Result<ProgInfo> {
        let mut info = ffi::dtrace_proginfo::default();
        let rc =
            unsafe { ffi::dtrace_program_exec(self.as_raw(), program.as_raw(), &mut info) };
        if rc == -1 {
            let (errno, message) = self.errno_message();
            return Err(Error::Execution { errno, message });
        }
        debug!(matches = info.dpi_matches, "program executed");
        Ok(ProgInfo::new(info))
    }

    /// Grab a running process for instrumentation.
    ///
    /// The target is stopped on return; call [`ProcHandle::resume`] once
    /// probes are in place.
    pub fn proc_grab(&self, pid: Pid) -> Result<ProcHandle<'_>> {
        let raw = unsafe { ffi::dtrace_proc_grab(self.as_raw(), pid.as_raw(), 0) };
        match NonNull::new(raw) {
            Some(raw) => {
                debug!(%pid, "grabbed process");
                Ok(ProcHandle::new(raw, self))
            }
            None => {
                let (errno, message) = self.errno_message();
                Err(Error::Attach {
                    pid: pid.as_raw(),
                    errno,
                    message,
                })
            }
        }
    }

    /// Current engine error code for this session.
    pub fn errno(&self) -> i32 {
        unsafe { ffi::dtrace_errno(self.as_raw()) }
    }

    /// Engine-rendered message for the session's current error code.
    pub fn last_error_message(&self) -> String {
        error_message(Some(self), self.errno())
    }

    /// Set a runtime option, e.g. `("bufsize", "16m")`.
    ///
    /// A rejected option is reported to the caller; ignore the result for
    /// fire-and-forget behavior.
    pub fn set_option(&self, key: &str, value: &str) -> Result<()> {
        let ckey = CString::new(key)?;
        let cvalue = CString::new(value)?;
        if unsafe { ffi::dtrace_setopt(self.as_raw(), ckey.as_ptr(), cvalue.as_ptr()) } != 0 {
            let (errno, message) = self.errno_message();
            return Err(Error::Option {
                key: key.to_string(),
                errno,
                message,
            });
        }
        Ok(())
    }

    /// Read a runtime option's current value.
    pub fn get_option(&self, key: &str) -> Result<i64> {
        let ckey = CString::new(key)?;
        let mut value: ffi::dtrace_optval_t = 0;
        if unsafe { ffi::dtrace_getopt(self.as_raw(), ckey.as_ptr(), &mut value) } != 0 {
            let (errno, message) = self.errno_message();
            return Err(Error::Option {
                key: key.to_string(),
                errno,
                message,
            });
        }
        Ok(value)
    }

    /// Set the principal trace buffer size, e.g. `"16m"`.
    ///
    /// Shorthand for [`set_option`](Self::set_option) with the `bufsize`
    /// key.
    pub fn set_buffer_size(&self, size: &str) -> Result<()> {
        self.set_option("bufsize", size)
    }

    /// Halt active instrumentation.
    ///
    /// Teardown is best-effort: a native failure is logged, not surfaced.
    pub fn stop(&self) {
        if unsafe { ffi::dtrace_stop(self.as_raw()) } == -1 {
            warn!(errno = self.errno(), "dtrace_stop failed");
        }
    }

    /// Block until the engine's tracing loop wants the consumer to run.
    ///
    /// Returns when trace data is available or tracing has stopped. There
    /// is no timeout; a blocked sleep is interrupted by stopping the
    /// session from a signal context.
    pub fn sleep(&self) {
        unsafe { ffi::dtrace_sleep(self.as_raw()) }
    }

    /// Run one pass of the consumer loop.
    ///
    /// `probe` is invoked once per probe firing; `rec` once per record in
    /// the firing and a final time with `None` to mark its end. Returns
    /// [`WorkStatus::Done`] once an `exit()` action has fired or tracing
    /// has stopped. A panic in either callback aborts the pass and
    /// resumes unwinding here, after the engine has returned.
    pub fn work<P, R>(&self, mut probe: P, mut rec: R) -> Result<WorkStatus>
    where
        P: FnMut(&ProbeData) -> ConsumeAction,
        R: FnMut(&ProbeData, Option<&RecordDesc>) -> ConsumeAction,
    {
        let mut state = WorkClosures {
            probe: &mut probe,
            rec: &mut rec,
            panic: None,
        };
        let rc = unsafe {
            ffi::dtrace_work(
                self.as_raw(),
                ptr::null_mut(),
                Some(probe_trampoline),
                Some(rec_trampoline),
                (&mut state as *mut WorkClosures<'_>).cast::<c_void>(),
            )
        };
        if let Some(payload) = state.panic.take() {
            std::panic::resume_unwind(payload);
        }
        match WorkStatus::from_native(rc) {
            Some(status) => Ok(status),
            None => {
                let (errno, message) = self.errno_message();
                Err(Error::Work { errno, message })
            }
        }
    }

    /// Capture the current errno and its rendered message, in that order,
    /// before any other engine call can overwrite them.
    fn errno_message(&self) -> (i32, String) {
        let errno = self.errno();
        (errno, error_message(Some(self), errno))
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        debug!("closing dtrace session");
        unsafe { ffi::dtrace_close(self.raw.as_ptr()) };
    }
}

/// Render an error code through the engine's message formatter.
///
/// Works with or without an open session: errors raised before a handle
/// exists are rendered against a null handle, matching the engine's
/// contract for open failures. The engine's buffer is only borrowed, so
/// the text is copied into owned memory immediately.
pub fn error_message(handle: Option<&Handle>, errno: i32) -> String {
    let raw = handle.map_or(ptr::null_mut(), Handle::as_raw);
    let msg = unsafe { ffi::dtrace_errmsg(raw, errno) };
    if msg.is_null() {
        return format!("unknown dtrace error {errno}");
    }
    unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
}
