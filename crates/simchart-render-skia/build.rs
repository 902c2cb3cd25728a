// File: crates/simchart-render-skia/build.rs
// Summary: Links the Windows system library Skia's font/ICU code resolves registry calls from.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // RegOpenKeyExW and friends.
        println!("cargo:rustc-link-lib=advapi32");
    }
}
