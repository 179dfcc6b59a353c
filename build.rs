use rustc_version::{version_meta, Channel};

fn main() {
    let meta = version_meta().expect("could not query rustc version");
    assert!(meta.semver.major >= 1);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-check-cfg=cfg(rustc_nightly)");
    // #[bench] needs the unstable test crate
    if let Channel::Nightly = meta.channel {
        println!("cargo:rustc-cfg=rustc_nightly");
    }
}
