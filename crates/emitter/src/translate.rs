//! Portable-Flags Translator (component D).
//!
//! Maps intent-level [`PortableOptions`] onto per-compiler compile/link
//! flag lists per the table in §4.4. Unsupported combinations (e.g. the
//! `memory` sanitizer on MSVC) are silently dropped from the flag list; the
//! caller surfaces a verbose-mode diagnostic via [`TranslatedFlags::dropped`].

use cforge_types::{Compiler, Hardening, OptimizeLevel, PortableOptions, Sanitizer, StdLib, Visibility, WarningLevel};

/// Compile- and link-time flags produced for one compiler, plus a list of
/// human-readable notes about anything silently dropped (§4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatedFlags {
    pub compile: Vec<String>,
    pub link: Vec<String>,
    pub dropped: Vec<String>,
}

impl TranslatedFlags {
    fn push_compile(&mut self, flag: impl Into<String>) {
        self.compile.push(flag.into());
    }

    fn push_link(&mut self, flag: impl Into<String>) {
        self.link.push(flag.into());
    }

    fn push_both(&mut self, flag: impl Into<String>) {
        let flag = flag.into();
        self.compile.push(flag.clone());
        self.link.push(flag);
    }
}

/// Translate `options` for `compiler`. Order matches the table in §4.4
/// top-to-bottom; duplicates are not produced.
#[must_use]
pub fn translate(options: &PortableOptions, compiler: Compiler) -> TranslatedFlags {
    let mut out = TranslatedFlags::default();

    if let Some(optimize) = options.optimize {
        translate_optimize(optimize, compiler, &mut out);
    }
    if let Some(warnings) = options.warnings {
        translate_warnings(warnings, compiler, &mut out);
    }
    if options.warnings_as_errors == Some(true) {
        translate_warnings_as_errors(compiler, &mut out);
    }
    if options.debug_info == Some(true) {
        translate_debug_info(compiler, &mut out);
    }
    if options.lto == Some(true) {
        translate_lto(compiler, &mut out);
    }
    if let Some(exceptions) = options.exceptions {
        translate_exceptions(exceptions, compiler, &mut out);
    }
    if let Some(rtti) = options.rtti {
        translate_rtti(rtti, compiler, &mut out);
    }
    if !options.sanitizers.is_empty() {
        translate_sanitizers(&options.sanitizers, compiler, &mut out);
    }
    if let Some(stdlib) = options.stdlib {
        translate_stdlib(stdlib, compiler, &mut out);
    }
    if let Some(hardening) = options.hardening {
        translate_hardening(hardening, compiler, &mut out);
    }
    if let Some(visibility) = options.visibility {
        translate_visibility(visibility, compiler, &mut out);
    }

    out
}

fn translate_optimize(level: OptimizeLevel, compiler: Compiler, out: &mut TranslatedFlags) {
    let flags: &[&str] = match (level, compiler.is_msvc_style()) {
        (OptimizeLevel::None, true) => &["/Od"],
        (OptimizeLevel::None, false) => &["-O0"],
        (OptimizeLevel::Debug, true) => &["/Od"],
        (OptimizeLevel::Debug, false) => &["-Og"],
        (OptimizeLevel::Size, true) => &["/O1", "/Os"],
        (OptimizeLevel::Size, false) => &["-Os"],
        (OptimizeLevel::Speed, true) => &["/O2"],
        (OptimizeLevel::Speed, false) => &["-O2"],
        (OptimizeLevel::Aggressive, true) => &["/Ox"],
        (OptimizeLevel::Aggressive, false) => &["-O3"],
    };
    for f in flags {
        out.push_compile(*f);
    }
}

fn translate_warnings(level: WarningLevel, compiler: Compiler, out: &mut TranslatedFlags) {
    match (level, compiler.is_msvc_style()) {
        (WarningLevel::None, true) => out.push_compile("/W0"),
        (WarningLevel::None, false) => out.push_compile("-w"),
        (WarningLevel::Default, true) => out.push_compile("/W3"),
        (WarningLevel::Default, false) => {
            // GCC/Clang have no dedicated "default" warning flag (§4.4).
        }
        (WarningLevel::All, true) => out.push_compile("/W4"),
        (WarningLevel::All, false) => {
            out.push_compile("-Wall");
            out.push_compile("-Wextra");
        }
        (WarningLevel::Strict, true) => {
            out.push_compile("/W4");
            out.push_compile("/WX");
        }
        (WarningLevel::Strict, false) => {
            out.push_compile("-Wall");
            out.push_compile("-Wextra");
            out.push_compile("-Werror");
        }
        (WarningLevel::Pedantic, true) => {
            out.push_compile("/W4");
            out.push_compile("/WX");
            out.push_compile("/permissive-");
        }
        (WarningLevel::Pedantic, false) => {
            out.push_compile("-Wall");
            out.push_compile("-Wextra");
            out.push_compile("-Wpedantic");
            out.push_compile("-Werror");
        }
    }
}

fn translate_warnings_as_errors(compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler.is_msvc_style() {
        if !out.compile.contains(&"/WX".to_string()) {
            out.push_compile("/WX");
        }
    } else if !out.compile.contains(&"-Werror".to_string()) {
        out.push_compile("-Werror");
    }
}

fn translate_debug_info(compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler.is_msvc_style() {
        out.push_compile("/Zi");
    } else {
        out.push_compile("-g");
    }
}

fn translate_lto(compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler.is_msvc_style() {
        out.push_compile("/GL");
        out.push_link("/LTCG");
    } else {
        out.push_both("-flto");
    }
}

fn translate_exceptions(enabled: bool, compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler.is_msvc_style() {
        out.push_compile(if enabled { "/EHsc" } else { "/EHs-c-" });
    } else if !enabled {
        out.push_compile("-fno-exceptions");
    }
}

fn translate_rtti(enabled: bool, compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler.is_msvc_style() {
        out.push_compile(if enabled { "/GR" } else { "/GR-" });
    } else if !enabled {
        out.push_compile("-fno-rtti");
    }
}

fn translate_sanitizers(sanitizers: &[Sanitizer], compiler: Compiler, out: &mut TranslatedFlags) {
    let supported: Vec<Sanitizer> = sanitizers
        .iter()
        .copied()
        .filter(|s| match compiler {
            Compiler::Msvc => {
                if *s != Sanitizer::Address {
                    out.dropped.push(format!("sanitizer {s:?} unsupported on MSVC"));
                    false
                } else {
                    true
                }
            }
            Compiler::Gcc => {
                if *s == Sanitizer::Memory {
                    out.dropped.push("sanitizer Memory unsupported on GCC".to_string());
                    false
                } else {
                    true
                }
            }
            _ => true,
        })
        .collect();
    if supported.is_empty() {
        return;
    }
    let names: Vec<&str> = supported
        .iter()
        .map(|s| match s {
            Sanitizer::Address => "address",
            Sanitizer::Undefined => "undefined",
            Sanitizer::Thread => "thread",
            Sanitizer::Memory => "memory",
            Sanitizer::Leak => "leak",
        })
        .collect();
    let prefix = if compiler == Compiler::Msvc { "/fsanitize=" } else { "-fsanitize=" };
    out.push_both(format!("{prefix}{}", names.join(",")));
}

fn translate_stdlib(stdlib: StdLib, compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler != Compiler::Clang {
        return;
    }
    match stdlib {
        StdLib::Default => {}
        StdLib::LibCxx => out.push_both("-stdlib=libc++"),
        StdLib::LibStdCxx => out.push_both("-stdlib=libstdc++"),
    }
}

fn translate_hardening(level: Hardening, compiler: Compiler, out: &mut TranslatedFlags) {
    match (level, compiler.is_msvc_style()) {
        (Hardening::None, _) => {}
        (Hardening::Basic, true) => {
            out.push_compile("/GS");
            out.push_compile("/sdl");
        }
        (Hardening::Basic, false) => {
            out.push_compile("-fstack-protector-strong");
            out.push_compile("-D_FORTIFY_SOURCE=2");
        }
        (Hardening::Full, true) => {
            out.push_compile("/GS");
            out.push_compile("/sdl");
            out.push_compile("/GUARD:CF");
            out.push_link("/DYNAMICBASE");
            out.push_link("/NXCOMPAT");
            out.push_link("/GUARD:CF");
        }
        (Hardening::Full, false) => {
            out.push_compile("-fstack-protector-strong");
            out.push_compile("-D_FORTIFY_SOURCE=2");
            out.push_compile("-fPIE");
            out.push_link("-pie");
        }
    }
}

fn translate_visibility(visibility: Visibility, compiler: Compiler, out: &mut TranslatedFlags) {
    if compiler.is_msvc_style() || visibility == Visibility::Default {
        return;
    }
    out.push_compile("-fvisibility=hidden");
    out.push_compile("-fvisibility-inlines-hidden");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts_with_optimize(level: OptimizeLevel) -> PortableOptions {
        PortableOptions {
            optimize: Some(level),
            ..Default::default()
        }
    }

    #[test]
    fn optimize_speed_table() {
        assert_eq!(
            translate(&opts_with_optimize(OptimizeLevel::Speed), Compiler::Msvc).compile,
            vec!["/O2"]
        );
        assert_eq!(
            translate(&opts_with_optimize(OptimizeLevel::Speed), Compiler::Gcc).compile,
            vec!["-O2"]
        );
        assert_eq!(
            translate(&opts_with_optimize(OptimizeLevel::Speed), Compiler::Clang).compile,
            vec!["-O2"]
        );
    }

    #[test]
    fn optimize_size_msvc_two_flags() {
        assert_eq!(
            translate(&opts_with_optimize(OptimizeLevel::Size), Compiler::Msvc).compile,
            vec!["/O1", "/Os"]
        );
    }

    #[test]
    fn pedantic_warnings_gcc() {
        let opts = PortableOptions {
            warnings: Some(WarningLevel::Pedantic),
            ..Default::default()
        };
        assert_eq!(
            translate(&opts, Compiler::Gcc).compile,
            vec!["-Wall", "-Wextra", "-Wpedantic", "-Werror"]
        );
    }

    #[test]
    fn memory_sanitizer_dropped_on_msvc() {
        let opts = PortableOptions {
            sanitizers: vec![Sanitizer::Address, Sanitizer::Memory],
            ..Default::default()
        };
        let translated = translate(&opts, Compiler::Msvc);
        // MSVC only supports `address`; `memory` is dropped with a note and
        // does not appear in the rendered `/fsanitize=` group.
        assert_eq!(translated.compile, vec!["/fsanitize=address".to_string()]);
        assert_eq!(translated.dropped.len(), 1);
    }

    #[test]
    fn sanitizers_propagate_to_link() {
        let opts = PortableOptions {
            sanitizers: vec![Sanitizer::Address],
            ..Default::default()
        };
        let translated = translate(&opts, Compiler::Clang);
        assert_eq!(translated.compile, translated.link);
    }

    #[test]
    fn lto_msvc_splits_compile_and_link_flags() {
        let opts = PortableOptions {
            lto: Some(true),
            ..Default::default()
        };
        let translated = translate(&opts, Compiler::Msvc);
        assert_eq!(translated.compile, vec!["/GL"]);
        assert_eq!(translated.link, vec!["/LTCG"]);
    }

    #[test]
    fn hardening_basic_msvc_is_compile_only() {
        let opts = PortableOptions {
            hardening: Some(Hardening::Basic),
            ..Default::default()
        };
        let translated = translate(&opts, Compiler::Msvc);
        assert_eq!(translated.compile, vec!["/GS", "/sdl"]);
        assert!(translated.link.is_empty());
    }

    #[test]
    fn hardening_full_msvc_still_links() {
        let opts = PortableOptions {
            hardening: Some(Hardening::Full),
            ..Default::default()
        };
        let translated = translate(&opts, Compiler::Msvc);
        assert!(translated.link.contains(&"/DYNAMICBASE".to_string()));
        assert!(translated.link.contains(&"/NXCOMPAT".to_string()));
        assert!(translated.link.contains(&"/GUARD:CF".to_string()));
    }

    #[test]
    fn hardening_full_unix() {
        let opts = PortableOptions {
            hardening: Some(Hardening::Full),
            ..Default::default()
        };
        let translated = translate(&opts, Compiler::Gcc);
        assert!(translated.compile.contains(&"-fPIE".to_string()));
        assert!(translated.link.contains(&"-pie".to_string()));
    }
}
