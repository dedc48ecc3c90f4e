//! Build script for wgpu-native-bind.
//!
//! With the `link` feature, finds a prebuilt wgpu-native library and links
//! against it. Without the feature nothing is linked and the embedder supplies
//! the entry points at runtime.

use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-env-changed=WGPU_NATIVE_LIB_PATH");
    println!("cargo:rerun-if-env-changed=WGPU_NATIVE_DEV_DIR");
    println!("cargo:rerun-if-env-changed=WGPU_NATIVE_STATIC");

    if env::var_os("CARGO_FEATURE_LINK").is_none() {
        return;
    }

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let target = env::var("TARGET").unwrap_or_default();
    let link_static = env::var("WGPU_NATIVE_STATIC").map_or(false, |v| v == "1");

    let lib_dir = find_lib_dir(&manifest_dir, &target, link_static);
    match &lib_dir {
        Some(dir) => {
            println!("cargo:rustc-link-search=native={}", dir.display());
            println!("cargo:rerun-if-changed={}", dir.display());
        }
        None => {
            println!(
                "cargo:warning=wgpu-native library not found; set WGPU_NATIVE_LIB_PATH or \
                 WGPU_NATIVE_DEV_DIR. Falling back to the system search path."
            );
        }
    }

    if link_static {
        println!("cargo:rustc-link-lib=static=wgpu_native");
        link_system_libs(&target);
    } else {
        println!("cargo:rustc-link-lib=dylib=wgpu_native");
    }
}

/// Find the directory holding the library.
///
/// Search order: `WGPU_NATIVE_LIB_PATH`, then `WGPU_NATIVE_DEV_DIR` (and its
/// `lib/` subdirectory), then `target/wgpu-native` next to the manifest.
fn find_lib_dir(manifest_dir: &Path, target: &str, link_static: bool) -> Option<PathBuf> {
    let file_name = library_file_name(target, link_static);

    let mut candidates = Vec::new();
    if let Some(path) = env::var_os("WGPU_NATIVE_LIB_PATH") {
        candidates.push(PathBuf::from(path));
    }
    if let Some(dev_dir) = env::var_os("WGPU_NATIVE_DEV_DIR") {
        let dev_dir = PathBuf::from(dev_dir);
        candidates.push(dev_dir.join("lib"));
        candidates.push(dev_dir);
    }
    candidates.push(manifest_dir.join("target/wgpu-native/lib"));
    candidates.push(manifest_dir.join("target/wgpu-native"));

    candidates.into_iter().find(|dir| dir.join(&file_name).exists())
}

/// Platform file name of the library.
fn library_file_name(target: &str, link_static: bool) -> String {
    let msvc = target.contains("msvc");
    match (link_static, msvc) {
        (true, true) => "wgpu_native.lib".to_string(),
        (true, false) => "libwgpu_native.a".to_string(),
        (false, true) => "wgpu_native.dll.lib".to_string(),
        (false, false) if target.contains("apple") => "libwgpu_native.dylib".to_string(),
        (false, false) if target.contains("windows") => "libwgpu_native.dll.a".to_string(),
        (false, false) => "libwgpu_native.so".to_string(),
    }
}

/// System libraries the static archive depends on.
fn link_system_libs(target: &str) {
    if target.contains("apple") {
        println!("cargo:rustc-link-lib=framework=Metal");
        println!("cargo:rustc-link-lib=framework=QuartzCore");
        println!("cargo:rustc-link-lib=framework=CoreFoundation");
        println!("cargo:rustc-link-lib=framework=Foundation");
        println!("cargo:rustc-link-lib=objc");
    } else if target.contains("windows") {
        println!("cargo:rustc-link-lib=d3dcompiler");
        println!("cargo:rustc-link-lib=ws2_32");
        println!("cargo:rustc-link-lib=userenv");
        println!("cargo:rustc-link-lib=bcrypt");
        println!("cargo:rustc-link-lib=ntdll");
        println!("cargo:rustc-link-lib=opengl32");
        println!("cargo:rustc-link-lib=gdi32");
        println!("cargo:rustc-link-lib=user32");
        println!("cargo:rustc-link-lib=ole32");
        println!("cargo:rustc-link-lib=oleaut32");
    } else {
        // Linux and other unix targets
        println!("cargo:rustc-link-lib=pthread");
        println!("cargo:rustc-link-lib=dl");
        println!("cargo:rustc-link-lib=m");
    }
}
