//! Shared helpers for integration tests

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

/// Borrow a temp path as UTF-8, as every fsport API takes `&str`
pub fn utf8(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Populate `root` with a small media-package layout
///
/// ```text
/// root/
///   ASSETMAP.xml
///   reels/
///     reel1.mxf
///     audio/
///       reel1.wav
///   empty/
/// ```
pub fn build_package(root: &Path) {
    fs::create_dir_all(root.join("reels").join("audio")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("ASSETMAP.xml"), b"<AssetMap/>").unwrap();
    fs::write(root.join("reels").join("reel1.mxf"), vec![0x06u8; 256]).unwrap();
    fs::write(root.join("reels").join("audio").join("reel1.wav"), b"RIFF").unwrap();
}

/// Permission checks are bypassed for root, so denial tests skip themselves
#[cfg(unix)]
pub fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}
