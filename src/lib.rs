//! Trazar - Safe Rust bindings to the libdtrace dynamic tracing engine
//!
//! This library wraps the native handle-based C API: open a session,
//! compile D source into a program, install and enable it, then drive the
//! sleep/work consumer loop. Resource lifetimes are checked at compile
//! time - programs and grabbed processes borrow the session that created
//! them, and the session closes exactly once when dropped.
//!
//! Building requires libdtrace at link time (present on illumos, macOS,
//! and FreeBSD; set `DTRACE_LIB_DIR` for non-standard installs). Opening
//! a session requires the same privileges the `dtrace` consumer needs.
//!
//! # Example
//!
//! ```rust,ignore
//! use trazar::{flags, Handle, ProbeSpec};
//!
//! let session = Handle::open(0)?;
//! session.set_buffer_size("4m")?;
//! let program = session.compile(
//!     "syscall:::entry { @calls[probefunc] = count(); }",
//!     ProbeSpec::Name,
//!     flags::C_PSPEC,
//!     &[],
//! )?;
//! let info = session.exec(program)?;
//! println!("matched {} probes", info.matches());
//! session.go()?;
//! # Ok::<(), trazar::Error>(())
//! ```

pub mod consumer;
pub mod error;
pub mod ffi;
pub mod flags;
pub mod handle;
pub mod marshal;
pub mod probe;
pub mod process;
pub mod program;

pub use consumer::{ConsumeAction, ProbeData, RecordDesc, WorkStatus};
pub use error::{Error, Result};
pub use handle::{error_message, Handle};
pub use probe::ProbeSpec;
pub use process::ProcHandle;
pub use program::{ProgInfo, Program};
