//! Link against the system libdtrace.

fn main() {
    // Non-standard installs (e.g. a DTrace built from source) can point
    // the linker at their lib directory.
    if let Ok(dir) = std::env::var("DTRACE_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=dylib=dtrace");
    println!("cargo:rerun-if-env-changed=DTRACE_LIB_DIR");
}
