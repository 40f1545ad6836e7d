fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "capi")]
    capi::generate_header();
}

#[cfg(feature = "capi")]
mod capi {
    use std::env;
    use std::path::PathBuf;

    /// Writes `include/contatore.h` from the `extern "C"` items in `src/capi.rs`.
    pub fn generate_header() {
        let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
        let crate_dir = PathBuf::from(crate_dir);
        let output_dir = crate_dir.join("include");
        std::fs::create_dir_all(&output_dir).expect("Unable to create include directory");

        let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))
            .expect("Unable to read cbindgen.toml");

        cbindgen::Builder::new()
            .with_crate(&crate_dir)
            .with_config(config)
            .generate()
            .expect("Unable to generate bindings")
            .write_to_file(output_dir.join("contatore.h"));

        println!("cargo:rerun-if-changed=src/capi.rs");
        println!("cargo:rerun-if-changed=cbindgen.toml");
    }
}
