//! Platform/Compiler Probe (component B).
//!
//! Detects the host platform from the build-time OS and the compiler from
//! `CC`/`CXX` environment overrides, falling back to `unknown` rather than
//! failing (§4.2). `cforge-types::config::{Platform, Compiler}` already own
//! the string↔enum conversion; this module only decides what strings to
//! feed them from the running environment.

use cforge_types::{Compiler, Platform};

/// Detect the host platform from the build-time OS (`cfg!(target_os)`).
#[must_use]
pub fn detect_platform() -> Platform {
    if cfg!(target_os = "windows") {
        Platform::Windows
    } else if cfg!(target_os = "macos") {
        Platform::MacOs
    } else if cfg!(target_os = "linux") {
        Platform::Linux
    } else {
        Platform::Unknown
    }
}

/// Detect the compiler from `CXX`/`CC` environment overrides, falling back
/// to a platform-conventional default when unset. An explicit
/// `CMAKE_GENERATOR`-style override is handled by the caller; this function
/// only resolves compiler identity (§4.2, §6 "Environment variables
/// consumed").
#[must_use]
pub fn detect_compiler(platform: Platform) -> Compiler {
    if let Ok(cxx) = std::env::var("CXX") {
        return Compiler::parse(&cxx);
    }
    if let Ok(cc) = std::env::var("CC") {
        return Compiler::parse(&cc);
    }
    match platform {
        Platform::Windows => Compiler::Msvc,
        Platform::MacOs => Compiler::AppleClang,
        Platform::Linux => Compiler::Gcc,
        Platform::Unknown => Compiler::Unknown,
    }
}

/// Apply an explicit `--platform`/`--compiler` CLI override, parsing
/// case-insensitively and falling through to detection when absent.
#[must_use]
pub fn resolve_platform(explicit: Option<&str>) -> Platform {
    explicit.map_or_else(detect_platform, Platform::parse)
}

#[must_use]
pub fn resolve_compiler(explicit: Option<&str>, platform: Platform) -> Compiler {
    explicit.map_or_else(|| detect_compiler(platform), Compiler::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_override_carries_through() {
        assert_eq!(Platform::parse("amiga"), Platform::Unknown);
        assert_eq!(Compiler::parse("borland"), Compiler::Unknown);
    }

    #[test]
    fn explicit_override_wins_over_detection() {
        assert_eq!(resolve_platform(Some("Linux")), Platform::Linux);
        assert_eq!(resolve_compiler(Some("Clang"), Platform::Linux), Compiler::Clang);
    }

    #[test]
    fn macos_defaults_to_apple_clang() {
        assert_eq!(detect_compiler(Platform::MacOs), Compiler::AppleClang);
    }
}
