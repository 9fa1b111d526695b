//! Apple Vision backend. The Swift half lives in `src/swift/VisionOCR.swift`
//! and is linked in as a static library by `build.rs`.

mod engine;
mod ffi;

pub use engine::AppleOcrEngine;
