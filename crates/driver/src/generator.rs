//! Generator selection (§4.12): prefer Ninja Multi-Config when `ninja` is
//! on `PATH`, otherwise fall back to the platform default.

use cforge_events::Generator;
use cforge_types::Platform;

/// Select the CMake generator for `platform`, probing `PATH` for `ninja`
/// unless `ninja_override` supplies a canned answer (tests inject `false`
/// to exercise the fallback branch without depending on the host's PATH).
#[must_use]
pub fn select_generator(platform: Platform, ninja_on_path: bool) -> Generator {
    if ninja_on_path {
        return Generator::NinjaMultiConfig;
    }
    match platform {
        Platform::Windows => Generator::VisualStudio,
        _ => Generator::UnixMakefiles,
    }
}

/// Probe the real `PATH` for a `ninja` executable.
#[must_use]
pub fn ninja_on_path() -> bool {
    which::which("ninja").is_ok()
}

#[must_use]
pub fn generator_cmake_name(generator: Generator) -> &'static str {
    match generator {
        Generator::NinjaMultiConfig => "Ninja Multi-Config",
        Generator::UnixMakefiles => "Unix Makefiles",
        Generator::VisualStudio => "Visual Studio 17 2022",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ninja_wins_regardless_of_platform_when_present() {
        assert_eq!(
            select_generator(Platform::Windows, true),
            Generator::NinjaMultiConfig
        );
    }

    #[test]
    fn falls_back_to_visual_studio_on_windows() {
        assert_eq!(
            select_generator(Platform::Windows, false),
            Generator::VisualStudio
        );
    }

    #[test]
    fn falls_back_to_unix_makefiles_elsewhere() {
        assert_eq!(
            select_generator(Platform::Linux, false),
            Generator::UnixMakefiles
        );
        assert_eq!(
            select_generator(Platform::MacOs, false),
            Generator::UnixMakefiles
        );
    }
}
