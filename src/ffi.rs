//! Raw C ABI surface of libdtrace.
//!
//! Everything here mirrors the native interface one to one: opaque handle
//! types, function prototypes, consumer callback aliases, and the handful
//! of constants the safe layer maps onto. No policy lives at this level;
//! pointer validity and call ordering are the caller's responsibility,
//! which is what the safe wrappers in the rest of the crate provide.

#![allow(non_camel_case_types)]
#![allow(missing_docs)]

use std::marker::{PhantomData, PhantomPinned};
use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Library ABI version passed to `dtrace_open`.
pub const DTRACE_VERSION: c_int = 3;

/// Native encoding of the probe-specifier enumeration.
pub type dtrace_probespec_t = c_int;

/// Native runtime option values are 64-bit signed integers.
pub type dtrace_optval_t = i64;

// Consumer callback return codes understood by `dtrace_work`.
pub const DTRACE_CONSUME_ERROR: c_int = -1;
pub const DTRACE_CONSUME_THIS: c_int = 0;
pub const DTRACE_CONSUME_NEXT: c_int = 1;
pub const DTRACE_CONSUME_ABORT: c_int = 2;

// `dtrace_workstatus_t` values returned by `dtrace_work`.
pub const DTRACE_WORKSTATUS_ERROR: c_int = -1;
pub const DTRACE_WORKSTATUS_OKAY: c_int = 0;
pub const DTRACE_WORKSTATUS_DONE: c_int = 1;

/// Opaque session handle (`dtrace_hdl_t`).
#[repr(C)]
pub struct dtrace_hdl {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque compiled program (`dtrace_prog_t`).
#[repr(C)]
pub struct dtrace_prog {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque grabbed-process handle (`struct ps_prochandle`).
#[repr(C)]
pub struct ps_prochandle {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque probe-firing data passed to consumer callbacks
/// (`dtrace_probedata_t`).
#[repr(C)]
pub struct dtrace_probedata {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque record descriptor passed to consumer callbacks
/// (`dtrace_recdesc_t`).
#[repr(C)]
pub struct dtrace_recdesc {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Stability attributes of a compiled program (`dtrace_attribute_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct dtrace_attribute {
    pub dtat_name: u8,
    pub dtat_data: u8,
    pub dtat_class: u8,
}

/// Result block filled in by `dtrace_program_exec` (`dtrace_proginfo_t`).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct dtrace_proginfo {
    pub dpi_descattr: dtrace_attribute,
    pub dpi_stmtattr: dtrace_attribute,
    pub dpi_aggregates: c_uint,
    pub dpi_recgens: c_uint,
    pub dpi_matches: c_uint,
    pub dpi_speculations: c_uint,
}

/// Per-probe consumer callback (`dtrace_consume_probe_f`).
pub type dtrace_consume_probe_f =
    unsafe extern "C" fn(data: *const dtrace_probedata, arg: *mut c_void) -> c_int;

/// Per-record consumer callback (`dtrace_consume_rec_f`). The record
/// pointer is null on the final call for each probe firing.
pub type dtrace_consume_rec_f = unsafe extern "C" fn(
    data: *const dtrace_probedata,
    rec: *const dtrace_recdesc,
    arg: *mut c_void,
) -> c_int;

extern "C" {
    pub fn dtrace_open(version: c_int, flags: c_int, errp: *mut c_int) -> *mut dtrace_hdl;
    pub fn dtrace_close(dtp: *mut dtrace_hdl);

    pub fn dtrace_program_strcompile(
        dtp: *mut dtrace_hdl,
        source: *const c_char,
        spec: dtrace_probespec_t,
        cflags: c_uint,
        argc: c_int,
        argv: *const *mut c_char,
    ) -> *mut dtrace_prog;
    pub fn dtrace_program_exec(
        dtp: *mut dtrace_hdl,
        pgp: *mut dtrace_prog,
        pip: *mut dtrace_proginfo,
    ) -> c_int;

    pub fn dtrace_go(dtp: *mut dtrace_hdl) -> c_int;
    pub fn dtrace_stop(dtp: *mut dtrace_hdl) -> c_int;
    pub fn dtrace_sleep(dtp: *mut dtrace_hdl);
    pub fn dtrace_work(
        dtp: *mut dtrace_hdl,
        fp: *mut libc::FILE,
        pfunc: Option<dtrace_consume_probe_f>,
        rfunc: Option<dtrace_consume_rec_f>,
        arg: *mut c_void,
    ) -> c_int;

    pub fn dtrace_errno(dtp: *mut dtrace_hdl) -> c_int;
    pub fn dtrace_errmsg(dtp: *mut dtrace_hdl, error: c_int) -> *const c_char;

    pub fn dtrace_setopt(dtp: *mut dtrace_hdl, opt: *const c_char, val: *const c_char) -> c_int;
    pub fn dtrace_getopt(
        dtp: *mut dtrace_hdl,
        opt: *const c_char,
        val: *mut dtrace_optval_t,
    ) -> c_int;

    pub fn dtrace_proc_grab(
        dtp: *mut dtrace_hdl,
        pid: libc::pid_t,
        flags: c_int,
    ) -> *mut ps_prochandle;
    pub fn dtrace_proc_continue(dtp: *mut dtrace_hdl, pr: *mut ps_prochandle);
    pub fn dtrace_proc_release(dtp: *mut dtrace_hdl, pr: *mut ps_prochandle);
}
