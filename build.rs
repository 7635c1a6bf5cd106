use std::process::Command;

fn main() {
    // Get git commit hash (short)
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Tagged builds are releases and carry no suffix
    let is_release = Command::new("git")
        .args(["describe", "--exact-match", "--tags", "HEAD"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);

    if is_release {
        println!("cargo:rustc-env=STOREFRONT_VERSION_SUFFIX=");
    } else {
        println!("cargo:rustc-env=STOREFRONT_VERSION_SUFFIX=-dev.{}", git_hash);
    }

    println!("cargo:rustc-env=STOREFRONT_GIT_HASH={}", git_hash);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
