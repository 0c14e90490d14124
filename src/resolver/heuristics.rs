use std::sync::LazyLock;

use regex::Regex;

use crate::config::{BUILD_COMMAND_KEY, PLATFORM_KEY};

/// A named rule for picking a shader config from a configuration value.
///
/// `pick` receives the (non-empty) value of `key` and the shader config names
/// in declaration order, and returns the index of the chosen name.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic {
    pub name: &'static str,
    pub key: &'static str,
    pub pick: fn(&str, &[&str]) -> Option<usize>,
}

/// Shader config whose name contains the configured platform.
pub const PLATFORM: Heuristic = Heuristic {
    name: "platform",
    key: PLATFORM_KEY,
    pick: pick_by_platform,
};

/// Shader config whose name contains the driver named by the build command.
pub const DRIVER: Heuristic = Heuristic {
    name: "driver",
    key: BUILD_COMMAND_KEY,
    pick: pick_by_driver,
};

/// The heuristics tried when selecting a shader config, in order.
pub fn default_heuristics() -> Vec<Heuristic> {
    vec![PLATFORM, DRIVER]
}

fn pick_by_platform(platform: &str, names: &[&str]) -> Option<usize> {
    first_containing(platform, names)
}

fn pick_by_driver(build_command: &str, names: &[&str]) -> Option<usize> {
    extract_driver(build_command).and_then(|driver| first_containing(driver, names))
}

/// Index of the first name containing `needle`, ignoring case.
pub fn first_containing(needle: &str, names: &[&str]) -> Option<usize> {
    let needle = needle.to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&needle))
}

static DRIVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\./compile(?:_game)?_shaders_(.*?)\.(?i:bat)").expect("driver pattern is valid")
});

/// Extract the driver from a shader build command.
///
/// `./compile_shaders_NVIDIA.bat` -> `NVIDIA`,
/// `./compile_game_shaders_amd.bat` -> `amd`.
pub fn extract_driver(build_command: &str) -> Option<&str> {
    DRIVER_PATTERN
        .captures(build_command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|driver| !driver.is_empty())
}
