use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml")).unwrap_or_default();

    // A missing header should not break the Rust build.
    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            let include = crate_dir.join("include");
            if let Err(err) = std::fs::create_dir_all(&include) {
                println!("cargo:warning=cannot create {}: {err}", include.display());
                return;
            }
            bindings.write_to_file(include.join("appart_ffi.h"));
        }
        Err(err) => println!("cargo:warning=cbindgen failed: {err}"),
    }
}
