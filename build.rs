/// Expose the compilation target triple as an environment variable at build time.
///
/// The `version` command prints it next to the crate version.
fn main() {
    println!(
        "cargo:rustc-env=TARGET={}",
        std::env::var("TARGET").unwrap()
    );
    println!("cargo:rerun-if-changed=scripts/sign.sh");
    println!("cargo:rerun-if-changed=templates/default.template");
}
