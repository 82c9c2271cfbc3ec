//! Argument-vector marshaling for the compile call.

use std::ffi::{CString, NulError};
use std::os::raw::{c_char, c_int};
use std::ptr;

/// Owned `(argc, argv)` pair in the shape `dtrace_program_strcompile`
/// expects.
///
/// The native call takes a count plus an array of NUL-terminated strings,
/// and treats a null array with a zero count as "no arguments"; a
/// zero-length non-null array is not equivalent. All marshaled buffers are
/// owned by this value and freed when it drops, so they stay valid for
/// exactly as long as the native call needs them.
#[derive(Debug)]
pub struct CStringArray {
    strings: Vec<CString>,
    ptrs: Vec<*mut c_char>,
}

impl CStringArray {
    /// Marshal a slice of strings into NUL-terminated native buffers.
    ///
    /// Fails if any input contains an interior NUL byte.
    pub fn new<S: AsRef<str>>(items: &[S]) -> Result<Self, NulError> {
        let strings = items
            .iter()
            .map(|s| CString::new(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let ptrs = strings
            .iter()
            .map(|s| s.as_ptr() as *mut c_char)
            .collect();
        Ok(Self { strings, ptrs })
    }

    /// Number of marshaled arguments.
    pub fn argc(&self) -> c_int {
        self.strings.len() as c_int
    }

    /// Pointer to the argument vector; null when no arguments were
    /// marshaled.
    pub fn as_ptr(&self) -> *const *mut c_char {
        if self.ptrs.is_empty() {
            ptr::null()
        } else {
            self.ptrs.as_ptr()
        }
    }

    /// True when no arguments were marshaled.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_empty_input_marshals_to_null_vector() {
        let array = CStringArray::new::<&str>(&[]).unwrap();
        assert_eq!(array.argc(), 0);
        assert!(array.as_ptr().is_null());
        assert!(array.is_empty());
    }

    #[test]
    fn test_arguments_marshal_byte_exact() {
        let items = ["pid$target", "16m", "syscall::read:entry"];
        let array = CStringArray::new(&items).unwrap();
        assert_eq!(array.argc(), 3);
        assert!(!array.as_ptr().is_null());
        for (i, item) in items.iter().enumerate() {
            let text = unsafe { CStr::from_ptr(*array.as_ptr().add(i)) };
            assert_eq!(text.to_bytes(), item.as_bytes());
        }
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        assert!(CStringArray::new(&["good", "bad\0arg"]).is_err());
    }

    #[test]
    fn test_empty_string_argument_is_allowed() {
        let array = CStringArray::new(&[""]).unwrap();
        assert_eq!(array.argc(), 1);
        let text = unsafe { CStr::from_ptr(*array.as_ptr()) };
        assert_eq!(text.to_bytes(), b"");
    }
}
