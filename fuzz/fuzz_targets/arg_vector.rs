#![no_main]

use libfuzzer_sys::fuzz_target;
use trazar::marshal::CStringArray;

fuzz_target!(|data: &[u8]| {
    // Treat each input line as one candidate argument. Marshaling must
    // never panic, whatever the bytes contain; interior NULs come back
    // as errors.
    if let Ok(input) = std::str::from_utf8(data) {
        let items: Vec<&str> = input.split('\n').collect();
        let _ = CStringArray::new(&items);
    }
});
