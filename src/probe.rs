//! Probe-specifier selection for the compile call.

use crate::ffi;

/// How ambiguous parts of a partial probe description are interpreted
/// during compilation.
///
/// Mirrors the engine's probe-specifier enumeration without depending on
/// the native header; the mapping to native integer values lives in
/// [`to_native`](ProbeSpec::to_native) and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeSpec {
    /// No disambiguation hint.
    None,
    /// Interpret ambiguous specifiers as provider names.
    Provider,
    /// Interpret ambiguous specifiers as module names.
    Module,
    /// Interpret ambiguous specifiers as function names.
    Function,
    /// Interpret ambiguous specifiers as probe names.
    Name,
}

impl ProbeSpec {
    /// Map to the engine's integer encoding.
    pub(crate) fn to_native(self) -> ffi::dtrace_probespec_t {
        match self {
            ProbeSpec::None => -1,
            ProbeSpec::Provider => 0,
            ProbeSpec::Module => 1,
            ProbeSpec::Function => 2,
            ProbeSpec::Name => 3,
        }
    }
}
