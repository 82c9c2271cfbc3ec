//! Session and compiler flag constants.
//!
//! Values mirror the native bitmasks; they are defined locally so the
//! crate builds against any libdtrace without consuming its header.

/// Do not attempt to open the tracing device (`DTRACE_O_NODEV`).
pub const O_NODEV: i32 = 0x01;
/// Do not load system modules (`DTRACE_O_NOSYS`).
pub const O_NOSYS: i32 = 0x02;
/// Force the 64-bit data model (`DTRACE_O_LP64`).
pub const O_LP64: i32 = 0x04;
/// Force the 32-bit data model (`DTRACE_O_ILP32`).
pub const O_ILP32: i32 = 0x08;

/// Show DIF verbose output for each compiled statement (`DTRACE_C_DIFV`).
pub const C_DIFV: u32 = 0x0001;
/// Permit compilation of empty D source files (`DTRACE_C_EMPTY`).
pub const C_EMPTY: u32 = 0x0002;
/// Permit probe definitions that match zero probes (`DTRACE_C_ZDEFS`).
pub const C_ZDEFS: u32 = 0x0004;
/// Error out if program attributes fall below the minimum (`DTRACE_C_EATTR`).
pub const C_EATTR: u32 = 0x0008;
/// Preprocess the input with cpp before compiling (`DTRACE_C_CPP`).
pub const C_CPP: u32 = 0x0010;
/// Permit unresolved kernel symbols (`DTRACE_C_KNODEF`).
pub const C_KNODEF: u32 = 0x0020;
/// Permit unresolved user symbols (`DTRACE_C_UNODEF`).
pub const C_UNODEF: u32 = 0x0040;
/// Interpret ambiguous specifiers as probe descriptions (`DTRACE_C_PSPEC`).
pub const C_PSPEC: u32 = 0x0080;
/// Produce C symbol tags (`DTRACE_C_ETAGS`).
pub const C_ETAGS: u32 = 0x0100;
/// Do not require macro arguments to be referenced (`DTRACE_C_ARGREF`).
pub const C_ARGREF: u32 = 0x0200;
