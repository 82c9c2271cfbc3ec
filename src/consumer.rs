//! Consumer-loop plumbing for [`Handle::work`](crate::Handle::work).
//!
//! The engine drives the loop and calls back into the process once per
//! probe firing and once per record. The trampolines here translate those
//! C callbacks into Rust closures, and contain any closure panic so it
//! never unwinds across the FFI boundary; the panic is re-raised after the
//! native call returns.

use std::os::raw::{c_int, c_void};
use std::panic::{self, AssertUnwindSafe};

use crate::ffi;

/// What a consumer callback wants done with the data it was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeAction {
    /// Consume this item and keep going.
    This,
    /// Skip ahead to the next enabled probe.
    Next,
    /// Abort the consumer loop.
    Abort,
}

impl ConsumeAction {
    fn to_native(self) -> c_int {
        match self {
            ConsumeAction::This => ffi::DTRACE_CONSUME_THIS,
            ConsumeAction::Next => ffi::DTRACE_CONSUME_NEXT,
            ConsumeAction::Abort => ffi::DTRACE_CONSUME_ABORT,
        }
    }
}

/// Outcome of one pass of the consumer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// More trace data may arrive; run the loop again.
    Okay,
    /// Tracing completed: an `exit()` action fired or the session was
    /// stopped.
    Done,
}

impl WorkStatus {
    pub(crate) fn from_native(status: c_int) -> Option<Self> {
        match status {
            ffi::DTRACE_WORKSTATUS_OKAY => Some(WorkStatus::Okay),
            ffi::DTRACE_WORKSTATUS_DONE => Some(WorkStatus::Done),
            _ => None,
        }
    }
}

/// Borrowed view of the probe firing being consumed.
///
/// The engine structure behind it is not mirrored in this crate, so the
/// view is opaque. Callers that need to reach past the safe surface can
/// take the raw pointer.
#[derive(Debug)]
pub struct ProbeData {
    raw: *const ffi::dtrace_probedata,
}

impl ProbeData {
    fn new(raw: *const ffi::dtrace_probedata) -> Self {
        Self { raw }
    }

    /// Raw pointer to the engine's probe data.
    pub fn as_raw(&self) -> *const ffi::dtrace_probedata {
        self.raw
    }
}

/// Borrowed view of one record descriptor within a probe firing.
#[derive(Debug)]
pub struct RecordDesc {
    raw: *const ffi::dtrace_recdesc,
}

impl RecordDesc {
    fn new(raw: *const ffi::dtrace_recdesc) -> Self {
        Self { raw }
    }

    /// Raw pointer to the engine's record descriptor.
    pub fn as_raw(&self) -> *const ffi::dtrace_recdesc {
        self.raw
    }
}

/// Callback state threaded through the native loop as its `void *arg`.
pub(crate) struct WorkClosures<'a> {
    pub probe: &'a mut dyn FnMut(&ProbeData) -> ConsumeAction,
    pub rec: &'a mut dyn FnMut(&ProbeData, Option<&RecordDesc>) -> ConsumeAction,
    pub panic: Option<Box<dyn std::any::Any + Send>>,
}

/// # Safety
///
/// `arg` must point to the `WorkClosures` passed to `dtrace_work` and must
/// not be aliased for the duration of the call.
pub(crate) unsafe extern "C" fn probe_trampoline(
    data: *const ffi::dtrace_probedata,
    arg: *mut c_void,
) -> c_int {
    let state = unsafe { &mut *arg.cast::<WorkClosures<'_>>() };
    let probe = ProbeData::new(data);
    match panic::catch_unwind(AssertUnwindSafe(|| (state.probe)(&probe))) {
        Ok(action) => action.to_native(),
        Err(payload) => {
            state.panic = Some(payload);
            ffi::DTRACE_CONSUME_ABORT
        }
    }
}

/// # Safety
///
/// Same contract as [`probe_trampoline`].
pub(crate) unsafe extern "C" fn rec_trampoline(
    data: *const ffi::dtrace_probedata,
    rec: *const ffi::dtrace_recdesc,
    arg: *mut c_void,
) -> c_int {
    let state = unsafe { &mut *arg.cast::<WorkClosures<'_>>() };
    let probe = ProbeData::new(data);
    let record = if rec.is_null() {
        None
    } else {
        Some(RecordDesc::new(rec))
    };
    match panic::catch_unwind(AssertUnwindSafe(|| (state.rec)(&probe, record.as_ref()))) {
        Ok(action) => action.to_native(),
        Err(payload) => {
            state.panic = Some(payload);
            ffi::DTRACE_CONSUME_ABORT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    fn run_probe_trampoline(state: &mut WorkClosures<'_>) -> c_int {
        unsafe { probe_trampoline(ptr::null(), (state as *mut WorkClosures<'_>).cast()) }
    }

    #[test]
    fn test_consume_action_encoding() {
        assert_eq!(ConsumeAction::This.to_native(), 0);
        assert_eq!(ConsumeAction::Next.to_native(), 1);
        assert_eq!(ConsumeAction::Abort.to_native(), 2);
    }

    #[test]
    fn test_work_status_decoding() {
        assert_eq!(WorkStatus::from_native(0), Some(WorkStatus::Okay));
        assert_eq!(WorkStatus::from_native(1), Some(WorkStatus::Done));
        assert_eq!(WorkStatus::from_native(-1), None);
        assert_eq!(WorkStatus::from_native(99), None);
    }

    #[test]
    fn test_probe_trampoline_forwards_action() {
        let mut fired = 0;
        let mut probe = |_: &ProbeData| {
            fired += 1;
            ConsumeAction::Next
        };
        let mut rec = |_: &ProbeData, _: Option<&RecordDesc>| ConsumeAction::This;
        let mut state = WorkClosures {
            probe: &mut probe,
            rec: &mut rec,
            panic: None,
        };
        assert_eq!(run_probe_trampoline(&mut state), ffi::DTRACE_CONSUME_NEXT);
        assert!(state.panic.is_none());
        drop(state);
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_rec_trampoline_maps_null_record_to_none() {
        let mut saw_end = false;
        let mut probe = |_: &ProbeData| ConsumeAction::This;
        let mut rec = |_: &ProbeData, record: Option<&RecordDesc>| {
            saw_end = record.is_none();
            ConsumeAction::This
        };
        let mut state = WorkClosures {
            probe: &mut probe,
            rec: &mut rec,
            panic: None,
        };
        let rc = unsafe {
            rec_trampoline(
                ptr::null(),
                ptr::null(),
                (&mut state as *mut WorkClosures<'_>).cast(),
            )
        };
        assert_eq!(rc, ffi::DTRACE_CONSUME_THIS);
        drop(state);
        assert!(saw_end);
    }

    #[test]
    fn test_trampoline_contains_callback_panics() {
        let mut probe = |_: &ProbeData| -> ConsumeAction { panic!("callback exploded") };
        let mut rec = |_: &ProbeData, _: Option<&RecordDesc>| ConsumeAction::This;
        let mut state = WorkClosures {
            probe: &mut probe,
            rec: &mut rec,
            panic: None,
        };
        assert_eq!(run_probe_trampoline(&mut state), ffi::DTRACE_CONSUME_ABORT);
        assert!(state.panic.is_some());
    }
}
