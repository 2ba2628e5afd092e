use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let simd = env::var_os("CARGO_FEATURE_SIMD").is_some();

    // Vector kernels are written against SSE2 (baseline on x86_64) and AVX2
    // (runtime detected), so only x86_64 gets them.
    if simd && arch == "x86_64" {
        println!("cargo:rustc-cfg=simd_x86_64");
    }
}
