//! Materialization behavior on a real filesystem.

#![cfg(unix)]

use relopack::bundler::layout::BundleLayout;
use relopack::bundler::materialize::materialize;
use relopack::bundler::resolve::ResolvedSet;
use relopack::bundler::settings::TargetPlatform;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

fn resolved(paths: &[&Path]) -> ResolvedSet {
    ResolvedSet {
        bundled: paths.iter().map(|p| p.to_path_buf()).collect(),
        unresolved: Vec::new(),
    }
}

#[test]
fn copies_are_content_identical() {
    let temp = tempfile::tempdir().unwrap();
    let src = temp.path().join("libssl.so.3");
    fs::write(&src, b"\x7fELF fake library body").unwrap();

    let bundle = temp.path().join("bundle");
    let layout = BundleLayout::for_platform(TargetPlatform::Linux, &bundle);

    let placed = materialize(&resolved(&[&src]), &layout).unwrap();

    assert_eq!(placed, vec![bundle.join("lib/libssl.so.3")]);
    assert_eq!(fs::read(&placed[0]).unwrap(), fs::read(&src).unwrap());
}

#[test]
fn rerun_is_idempotent() {
    let temp = tempfile::tempdir().unwrap();
    let src = temp.path().join("libz.so.1");
    fs::write(&src, b"round one").unwrap();

    let bundle = temp.path().join("bundle");
    let layout = BundleLayout::for_platform(TargetPlatform::Linux, &bundle);
    let set = resolved(&[&src]);

    materialize(&set, &layout).unwrap();

    // The source changing between runs must not disturb what was shipped
    fs::write(&src, b"round two").unwrap();
    let placed = materialize(&set, &layout).unwrap();

    assert_eq!(placed.len(), 1);
    assert_eq!(fs::read(&placed[0]).unwrap(), b"round one");
}

#[test]
fn symlink_chain_is_preserved() {
    let temp = tempfile::tempdir().unwrap();

    // libfoo.so -> libfoo.so.1 -> libfoo.so.1.2 -> libfoo.so.1.2.3 (file)
    let file = temp.path().join("libfoo.so.1.2.3");
    fs::write(&file, b"library body").unwrap();
    symlink("libfoo.so.1.2.3", temp.path().join("libfoo.so.1.2")).unwrap();
    symlink("libfoo.so.1.2", temp.path().join("libfoo.so.1")).unwrap();
    symlink("libfoo.so.1", temp.path().join("libfoo.so")).unwrap();

    let bundle = temp.path().join("bundle");
    let layout = BundleLayout::for_platform(TargetPlatform::Linux, &bundle);

    let entry = temp.path().join("libfoo.so");
    let placed = materialize(&resolved(&[&entry]), &layout).unwrap();
    assert_eq!(placed.len(), 4);

    let lib_dir = bundle.join("lib");
    for (name, target) in [
        ("libfoo.so", "libfoo.so.1"),
        ("libfoo.so.1", "libfoo.so.1.2"),
        ("libfoo.so.1.2", "libfoo.so.1.2.3"),
    ] {
        let dest = lib_dir.join(name);
        assert!(dest.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&dest).unwrap(), PathBuf::from(target));
    }
    let dest_file = lib_dir.join("libfoo.so.1.2.3");
    assert!(dest_file.symlink_metadata().unwrap().file_type().is_file());
    assert_eq!(fs::read(&dest_file).unwrap(), b"library body");
}

#[test]
fn deep_chain_collapses_to_copy() {
    let temp = tempfile::tempdir().unwrap();

    let file = temp.path().join("libdeep.so.1.2.3.4");
    fs::write(&file, b"deep body").unwrap();
    symlink("libdeep.so.1.2.3.4", temp.path().join("libdeep.so.1.2.3")).unwrap();
    symlink("libdeep.so.1.2.3", temp.path().join("libdeep.so.1.2")).unwrap();
    symlink("libdeep.so.1.2", temp.path().join("libdeep.so.1")).unwrap();
    symlink("libdeep.so.1", temp.path().join("libdeep.so")).unwrap();

    let bundle = temp.path().join("bundle");
    let layout = BundleLayout::for_platform(TargetPlatform::Linux, &bundle);

    let entry = temp.path().join("libdeep.so");
    let placed = materialize(&resolved(&[&entry]), &layout).unwrap();
    assert_eq!(placed.len(), 4);

    // Three links are reproduced; the fourth hop ships the resolved file
    // under the link's own name instead of continuing the chain.
    let lib_dir = bundle.join("lib");
    let fourth = lib_dir.join("libdeep.so.1.2.3");
    assert!(fourth.symlink_metadata().unwrap().file_type().is_file());
    assert_eq!(fs::read(&fourth).unwrap(), b"deep body");
}

#[test]
fn absolute_link_text_is_rewritten_to_basename() {
    let temp = tempfile::tempdir().unwrap();
    let lib_home = temp.path().join("deps/lib");
    fs::create_dir_all(&lib_home).unwrap();
    let file = lib_home.join("libpcre2-8.0.dylib");
    fs::write(&file, b"dylib body").unwrap();
    symlink(&file, lib_home.join("libpcre2-8.dylib")).unwrap();

    let bundle = temp.path().join("bundle");
    let layout = BundleLayout::for_platform(TargetPlatform::Linux, &bundle);

    let entry = lib_home.join("libpcre2-8.dylib");
    materialize(&resolved(&[&entry]), &layout).unwrap();

    // The link resolves inside the bundle, not back into the source tree
    let dest = bundle.join("lib/libpcre2-8.dylib");
    assert_eq!(
        fs::read_link(&dest).unwrap(),
        PathBuf::from("libpcre2-8.0.dylib")
    );
    assert_eq!(
        fs::read(bundle.join("lib/libpcre2-8.0.dylib")).unwrap(),
        b"dylib body"
    );
}

#[test]
fn mac_layout_replaces_stale_links() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("libbar.2.dylib");
    fs::write(&file, b"dylib body").unwrap();
    symlink("libbar.2.dylib", temp.path().join("libbar.dylib")).unwrap();

    let app = temp.path().join("App.app");
    let layout = BundleLayout::for_platform(TargetPlatform::MacOs, &app);
    let frameworks = app.join("Contents/Frameworks");
    fs::create_dir_all(&frameworks).unwrap();

    // A previous partial run left the link pointing at an old version
    symlink("libbar.1.dylib", frameworks.join("libbar.dylib")).unwrap();

    let entry = temp.path().join("libbar.dylib");
    materialize(&resolved(&[&entry]), &layout).unwrap();

    assert_eq!(
        fs::read_link(frameworks.join("libbar.dylib")).unwrap(),
        PathBuf::from("libbar.2.dylib")
    );
    assert!(frameworks.join("libbar.2.dylib").is_file());
}

#[test]
fn posix_layout_keeps_existing_destination_links() {
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("libbaz.so.2");
    fs::write(&file, b"so body").unwrap();
    symlink("libbaz.so.2", temp.path().join("libbaz.so")).unwrap();

    let bundle = temp.path().join("bundle");
    let layout = BundleLayout::for_platform(TargetPlatform::Linux, &bundle);
    let lib_dir = bundle.join("lib");
    fs::create_dir_all(&lib_dir).unwrap();
    symlink("libbaz.so.1", lib_dir.join("libbaz.so")).unwrap();

    let entry = temp.path().join("libbaz.so");
    materialize(&resolved(&[&entry]), &layout).unwrap();

    assert_eq!(
        fs::read_link(lib_dir.join("libbaz.so")).unwrap(),
        PathBuf::from("libbaz.so.1")
    );
}
