// Built-in templates are compiled in with include_str!
use walkdir::WalkDir;

fn main() {
    println!("cargo:rerun-if-changed=templates");
    let templates = WalkDir::new("templates")
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmpl"));
    for entry in templates {
        println!("cargo:rerun-if-changed={}", entry.path().display());
    }
}
