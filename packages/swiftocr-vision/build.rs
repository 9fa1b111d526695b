use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Compiles the Vision bridge into a static library on macOS targets.
fn main() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "macos" {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("cargo did not set OUT_DIR"));
    let swift_src = PathBuf::from("src/swift/VisionOCR.swift");
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").expect("cargo did not set CARGO_CFG_TARGET_ARCH");
    let swift_arch = if target_arch == "aarch64" { "arm64" } else { target_arch.as_str() };

    println!("cargo:rerun-if-changed={}", swift_src.display());
    println!("cargo:rerun-if-changed=build.rs");

    let object_file = out_dir.join("VisionOCR.o");
    let status = Command::new("swiftc")
        .args([
            "-emit-object",
            "-O",
            "-parse-as-library",
            "-module-name",
            "SwiftOcrVision",
            "-target",
            &format!("{swift_arch}-apple-macosx11.0"),
            "-o",
        ])
        .arg(&object_file)
        .arg(&swift_src)
        .status()
        .expect("failed to run swiftc");
    assert!(status.success(), "swiftc failed");

    let lib_file = out_dir.join("libswiftocr_vision.a");
    let status = Command::new("ar")
        .args(["rcs"])
        .arg(&lib_file)
        .arg(&object_file)
        .status()
        .expect("failed to run ar");
    assert!(status.success(), "ar failed");

    println!("cargo:rustc-link-search=native={}", out_dir.display());
    println!("cargo:rustc-link-lib=static=swiftocr_vision");

    for framework in ["Vision", "Foundation", "CoreGraphics"] {
        println!("cargo:rustc-link-lib=framework={framework}");
    }

    // Swift runtime: SDK copy first, toolchain copy as fallback.
    let sdk_path = String::from_utf8(
        Command::new("xcrun")
            .args(["--sdk", "macosx", "--show-sdk-path"])
            .output()
            .expect("failed to run xcrun --show-sdk-path")
            .stdout,
    )
    .expect("xcrun --show-sdk-path printed a non UTF-8 path");
    let sdk_path = sdk_path.trim();

    let swift_bin = String::from_utf8(
        Command::new("xcrun")
            .args(["--toolchain", "default", "--find", "swift"])
            .output()
            .expect("failed to run xcrun --find swift")
            .stdout,
    )
    .expect("xcrun --find swift printed a non UTF-8 path");
    let toolchain_lib = PathBuf::from(swift_bin.trim())
        .parent()
        .and_then(|bin| bin.parent())
        .expect("xcrun --find swift did not return a <toolchain>/bin/swift path")
        .join("lib/swift/macosx");

    println!("cargo:rustc-link-search=native={sdk_path}/usr/lib/swift");
    println!("cargo:rustc-link-search=native={}", toolchain_lib.display());
    println!("cargo:rustc-link-arg=-Wl,-rpath,/usr/lib/swift");
    println!("cargo:rustc-link-lib=dylib=swiftCore");
}
