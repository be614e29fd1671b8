use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};

// Fingerprint static/ so stylesheet URLs change whenever an asset does.
fn main() {
    println!("cargo:rerun-if-changed=static/");
    println!("cargo:rerun-if-changed=templates/");

    let mut hasher = DefaultHasher::new();

    let mut assets: Vec<_> = fs::read_dir("static")
        .map(|dir| dir.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    assets.sort();

    for path in assets.iter().filter(|p| p.is_file()) {
        if let Ok(contents) = fs::read(path) {
            path.file_name().hash(&mut hasher);
            contents.hash(&mut hasher);
        }
    }

    let hash = format!("{:016x}", hasher.finish());
    println!("cargo:rustc-env=STATIC_HASH={}", &hash[..8]);
}
