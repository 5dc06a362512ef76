use std::env;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("presets.rs");

    let mut code = String::new();
    code.push_str("/// Embedded preset files, sorted by file name\n");
    code.push_str("pub static PRESETS: &[(&str, &str)] = &[\n");

    let tabs_dir = Path::new("tabs");

    if tabs_dir.exists() {
        for entry in WalkDir::new(tabs_dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "txt"))
        {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy();

            if let Ok(content) = fs::read_to_string(path) {
                // Debug formatting yields a valid Rust string literal
                code.push_str(&format!("    ({:?}, {:?}),\n", name, content));
            }
        }
    }

    code.push_str("];\n");

    fs::write(&dest_path, code).expect("failed to write presets.rs");

    println!("cargo:rerun-if-changed=tabs");
}
