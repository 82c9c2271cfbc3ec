//! Property tests for the argument-vector marshaler.
//!
//! The compile call hands the engine a `(count, array)` pair; these
//! properties pin the two contracts that matter at the boundary: empty
//! input becomes a null vector, and every marshaled argument round-trips
//! byte for byte with its NUL terminator.

use proptest::prelude::*;
use std::ffi::CStr;
use trazar::marshal::CStringArray;

proptest! {
    #[test]
    fn test_marshals_nul_free_strings_byte_exact(
        items in proptest::collection::vec("[^\\x00]{0,64}", 0..16)
    ) {
        let array = CStringArray::new(&items).unwrap();
        prop_assert_eq!(array.argc() as usize, items.len());
        if items.is_empty() {
            prop_assert!(array.as_ptr().is_null());
        } else {
            prop_assert!(!array.as_ptr().is_null());
            for (i, item) in items.iter().enumerate() {
                let text = unsafe { CStr::from_ptr(*array.as_ptr().add(i)) };
                prop_assert_eq!(text.to_bytes(), item.as_bytes());
            }
        }
    }

    #[test]
    fn test_rejects_interior_nul_anywhere(
        prefix in "[^\\x00]{0,8}",
        suffix in "[^\\x00]{0,8}",
        position in 0usize..4,
    ) {
        let mut items = vec![prefix.clone(); position];
        items.push(format!("{prefix}\0{suffix}"));
        prop_assert!(CStringArray::new(&items).is_err());
    }
}
