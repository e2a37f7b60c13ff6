// app_dir.rs - Per-application configuration directory lookup

use std::path::PathBuf;

/// Directory where `app_name` should keep its configuration.
///
/// Windows uses the roaming application data directory, macOS
/// `~/Library/Application Support`, and other Unix systems
/// `$XDG_CONFIG_HOME` (falling back to `~/.config`). On those Unix systems
/// the name is lowercased with whitespace replaced by dashes. With
/// `force_posix` the result is `~/.<name>` on every platform.
pub fn app_dir(app_name: &str, force_posix: bool) -> PathBuf {
    if force_posix {
        let name = format!(".{}", posixify(app_name));
        return match dirs::home_dir() {
            Some(home) => home.join(name),
            None => PathBuf::from(name),
        };
    }

    if cfg!(any(windows, target_os = "macos")) {
        return match dirs::config_dir() {
            Some(dir) => dir.join(app_name),
            None => PathBuf::from(format!(".{}", posixify(app_name))),
        };
    }

    let name = posixify(app_name);
    match dirs::config_dir() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(format!(".{}", name)),
    }
}

/// Lowercase `name` and join its whitespace-separated words with `-`
pub fn posixify(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-").to_lowercase()
}
