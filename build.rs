// PropTach - Build Script
//
// Generates the compile-time tachometer defaults before compilation.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Ring buffer capacity when PROP_TACH_BLADE_WINDOW is not set.
const DEFAULT_BLADE_WINDOW: usize = 12;

/// Staleness threshold when PROP_TACH_MAX_BLADE_TIME_US is not set.
const DEFAULT_MAX_BLADE_TIME_US: u32 = 500_000;

fn main() {
    // ESP-IDF environment setup (only meaningful when targeting ESP-IDF)
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get git version info
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=VERSION_STRING=PropTach v{}-g{}", version, git_hash);

    let window: usize = env_or("PROP_TACH_BLADE_WINDOW", DEFAULT_BLADE_WINDOW);
    if window == 0 {
        panic!("PROP_TACH_BLADE_WINDOW must be at least 1");
    }
    let max_blade_time_us: u32 = env_or("PROP_TACH_MAX_BLADE_TIME_US", DEFAULT_MAX_BLADE_TIME_US);

    let generated = format!(
        "/// Number of blade periods averaged by the tachometer.\n\
         pub const DEFAULT_BLADE_WINDOW: usize = {};\n\
         \n\
         /// Time without a blade crossing after which the shaft is stopped (µs).\n\
         pub const DEFAULT_MAX_BLADE_TIME_US: u32 = {};\n",
        window, max_blade_time_us
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("tach_defaults.rs"), generated)
        .expect("Failed to write tach_defaults.rs");

    println!("cargo:rerun-if-env-changed=PROP_TACH_BLADE_WINDOW");
    println!("cargo:rerun-if-env-changed=PROP_TACH_MAX_BLADE_TIME_US");
    for key in ["PROP_TACH_WIFI_SSID", "PROP_TACH_WIFI_PASSWORD", "PROP_TACH_MQTT_BROKER"] {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{} is not a valid number: {:?}", key, raw)),
        Err(_) => default,
    }
}
