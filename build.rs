use std::fs;
use std::path::Path;

/// `#define` name in menu_config.h, env var handed to rustc, fallback value.
const SETTINGS: &[(&str, &str)] = &[
    ("WIFI_SSID", ""),
    ("WIFI_PASSWORD", ""),
    ("MENU_SERVER_HOST", "raspberrypi.local"),
    ("MENU_SERVER_PORT", "3000"),
    ("UTC_OFFSET_HOURS", "2"),
    ("LOG_LEVEL", "info"),
];

/// Value of `#define NAME "value"` or `#define NAME value`.
fn define_value(contents: &str, name: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let mut parts = line.trim().splitn(3, char::is_whitespace);
        if parts.next()? != "#define" || parts.next()? != name {
            return None;
        }
        let raw = parts.next()?.trim();
        match raw.split('"').nth(1) {
            Some(quoted) => Some(quoted.to_string()),
            None => Some(raw.to_string()),
        }
    })
}

fn main() -> anyhow::Result<()> {
    // Necessary for ESP-IDF
    embuild::espidf::sysenv::output();

    let config_path = "menu_config.h";
    println!("cargo:rerun-if-changed={}", config_path);

    let contents = if Path::new(config_path).exists() {
        fs::read_to_string(config_path)?
    } else {
        println!(
            "cargo:warning=menu_config.h not found! Copy menu_config.h.example to menu_config.h and add your credentials."
        );
        String::new()
    };

    for (name, default) in SETTINGS {
        let value = define_value(&contents, name).unwrap_or_else(|| default.to_string());
        println!("cargo:rustc-env={}={}", name, value);
    }

    Ok(())
}
