use std::env;
use std::path::PathBuf;

const WRAPPER_SOURCES: &[&str] = &[
    "error.c",
    "context.c",
    "colorspace.c",
    "buffer.c",
    "pixmap.c",
    "font.c",
    "image.c",
    "stroke.c",
    "path.c",
    "text.c",
    "cookie.c",
    "stext.c",
    "display_list.c",
    "device.c",
    "page.c",
    "document.c",
    "writer.c",
    "pdf_document.c",
    "pdf_object.c",
    "pdf_page.c",
    "pdf_annot.c",
];

/// Where MuPDF lives and how to link it.
struct MupdfLocation {
    include_paths: Vec<PathBuf>,
    link_paths: Vec<PathBuf>,
    libs: Vec<String>,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=include/mupdf_shim.h");
    println!("cargo:rerun-if-changed=wrapper");
    println!("cargo:rerun-if-env-changed=MUPDF_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=MUPDF_LIB_DIR");
    println!("cargo:rerun-if-env-changed=MUPDF_SHIM_STATIC");

    let statik = env::var_os("MUPDF_SHIM_STATIC").is_some();
    let mupdf = locate_mupdf(statik);

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let mut build = cc::Build::new();
    build
        .include(manifest_dir.join("include"))
        .include(manifest_dir.join("wrapper"))
        .flag_if_supported("-std=c11");
    for path in &mupdf.include_paths {
        build.include(path);
    }
    for source in WRAPPER_SOURCES {
        build.file(manifest_dir.join("wrapper").join(source));
    }
    // The shim archive must precede libmupdf on the link line.
    build.compile("mupdf-shim");

    for path in &mupdf.link_paths {
        println!("cargo:rustc-link-search=native={}", path.display());
    }
    for lib in &mupdf.libs {
        // System libraries stay dynamic even in a static build.
        let kind = if statik && lib.starts_with("mupdf") { "static" } else { "dylib" };
        println!("cargo:rustc-link-lib={kind}={lib}");
    }
    println!("cargo:include={}", manifest_dir.join("include").display());
}

/// Finds MuPDF through pkg-config, falling back to `MUPDF_INCLUDE_DIR` and
/// `MUPDF_LIB_DIR`.
fn locate_mupdf(statik: bool) -> MupdfLocation {
    match pkg_config::Config::new()
        .atleast_version("1.24")
        .statik(statik)
        .cargo_metadata(false)
        .probe("mupdf")
    {
        Ok(library) => {
            return MupdfLocation {
                include_paths: library.include_paths,
                link_paths: library.link_paths,
                libs: library.libs,
            };
        }
        Err(e) => println!("cargo:warning=pkg-config could not find mupdf ({e}); falling back to MUPDF_INCLUDE_DIR/MUPDF_LIB_DIR"),
    }

    MupdfLocation {
        include_paths: env::var_os("MUPDF_INCLUDE_DIR").map(PathBuf::from).into_iter().collect(),
        link_paths: env::var_os("MUPDF_LIB_DIR").map(PathBuf::from).into_iter().collect(),
        libs: vec!["mupdf".to_owned(), "mupdf-third".to_owned()],
    }
}
