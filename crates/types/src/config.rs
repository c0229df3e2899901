//! Platform/compiler enums, build overlays, portable options, and the
//! effective configuration produced by overlay resolution (§3, §4.2, §4.4).

use serde::{Deserialize, Serialize};

/// Host platform (component B: Platform/Compiler Probe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    #[serde(rename = "macos")]
    MacOs,
    Unknown,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Unknown => "unknown",
        }
    }

    /// Case-insensitive parse; unrecognized values normalize to `Unknown`
    /// rather than failing (§4.2).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win64" => Self::Windows,
            "linux" => Self::Linux,
            "macos" | "darwin" | "osx" => Self::MacOs,
            _ => Self::Unknown,
        }
    }
}

/// Detected or overridden compiler (component B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compiler {
    Msvc,
    Gcc,
    Clang,
    AppleClang,
    Mingw,
    Unknown,
}

impl Compiler {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Msvc => "msvc",
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple_clang",
            Self::Mingw => "mingw",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "msvc" | "cl" | "cl.exe" => Self::Msvc,
            "gcc" | "g++" => Self::Gcc,
            "apple_clang" | "appleclang" | "apple clang" => Self::AppleClang,
            "clang" | "clang++" => Self::Clang,
            "mingw" | "mingw32" | "mingw64" => Self::Mingw,
            _ => Self::Unknown,
        }
    }

    /// Whether this compiler accepts MSVC-style (`/Flag`) syntax.
    #[must_use]
    pub fn is_msvc_style(self) -> bool {
        matches!(self, Self::Msvc)
    }
}

/// `optimize` portable option values (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizeLevel {
    None,
    Debug,
    Size,
    Speed,
    Aggressive,
}

/// `warnings` portable option values (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    None,
    Default,
    All,
    Strict,
    Pedantic,
}

/// `sanitizers` portable option values (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sanitizer {
    Address,
    Undefined,
    Thread,
    Memory,
    Leak,
}

/// `stdlib` portable option values (§4.4, Clang-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdLib {
    Default,
    #[serde(rename = "libc++")]
    LibCxx,
    #[serde(rename = "libstdc++")]
    LibStdCxx,
}

/// `hardening` portable option values (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hardening {
    None,
    Basic,
    Full,
}

/// `visibility` portable option values (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Default,
    Hidden,
}

/// Intent-level options translated by component D (§4.4). Scalar fields
/// are replaced by the highest-precedence overlay that sets them; absent
/// fields do not clear a value set by an earlier overlay. `sanitizers` is
/// the one list-shaped portable field and is merged like the other list
/// fields (append-if-absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortableOptions {
    pub optimize: Option<OptimizeLevel>,
    pub warnings: Option<WarningLevel>,
    pub warnings_as_errors: Option<bool>,
    pub debug_info: Option<bool>,
    pub lto: Option<bool>,
    pub exceptions: Option<bool>,
    pub rtti: Option<bool>,
    #[serde(default)]
    pub sanitizers: Vec<Sanitizer>,
    pub stdlib: Option<StdLib>,
    pub hardening: Option<Hardening>,
    pub visibility: Option<Visibility>,
}

impl PortableOptions {
    /// Overlay `other` on top of `self`: scalars in `other` win when
    /// present, `sanitizers` concatenates with de-dup (§4.3).
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            optimize: other.optimize.or(self.optimize),
            warnings: other.warnings.or(self.warnings),
            warnings_as_errors: other.warnings_as_errors.or(self.warnings_as_errors),
            debug_info: other.debug_info.or(self.debug_info),
            lto: other.lto.or(self.lto),
            exceptions: other.exceptions.or(self.exceptions),
            rtti: other.rtti.or(self.rtti),
            sanitizers: append_dedup(&self.sanitizers, &other.sanitizers),
            stdlib: other.stdlib.or(self.stdlib),
            hardening: other.hardening.or(self.hardening),
            visibility: other.visibility.or(self.visibility),
        }
    }
}

fn append_dedup<T: Clone + PartialEq>(base: &[T], extra: &[T]) -> Vec<T> {
    let mut out = base.to_vec();
    for item in extra {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// One overlay block: the fields that can appear at base, per-platform,
/// per-compiler, per-(platform,compiler), or per-build-config (§3, §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildOverlay {
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub cmake_args: Vec<String>,
    #[serde(default)]
    pub portable: PortableOptions,
}

impl BuildOverlay {
    /// Append-if-absent merge of `other` on top of `self`, preserving
    /// first-occurrence order, with byte-exact string equality (§4.3).
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            defines: append_dedup(&self.defines, &other.defines),
            flags: append_dedup(&self.flags, &other.flags),
            links: append_dedup(&self.links, &other.links),
            frameworks: append_dedup(&self.frameworks, &other.frameworks),
            cmake_args: append_dedup(&self.cmake_args, &other.cmake_args),
            portable: self.portable.merged_with(&other.portable),
        }
    }
}

/// The result of resolving all applicable overlays for one
/// (platform, compiler, build-config) triple (§3 Effective configuration).
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub platform: Platform,
    pub compiler: Compiler,
    pub build_config: String,
    pub defines: Vec<String>,
    pub flags: Vec<String>,
    pub links: Vec<String>,
    pub frameworks: Vec<String>,
    pub cmake_args: Vec<String>,
    pub portable: PortableOptions,
}
