//! Build script generating the C header for the FFI surface.

fn main() {
    let crate_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR must be set by Cargo");
    let config = cbindgen::Config::from_file("cbindgen.toml").unwrap_or_default();

    println!("cargo:rerun-if-changed=src/ffi.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            let out_path = std::path::Path::new(&out_dir).join("lss_stats.h");
            bindings.write_to_file(&out_path);

            // Checked-out copy for hosts building against the cdylib.
            let include_dir = std::path::Path::new(&crate_dir).join("include");
            if std::fs::create_dir_all(&include_dir).is_ok() {
                bindings.write_to_file(include_dir.join("lss_stats.h"));
            }
        }
        Err(e) => println!("cargo:warning=lss_stats.h not generated: {e}"),
    }
}
