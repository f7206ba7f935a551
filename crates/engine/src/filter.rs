//! Folder and name filters
//!
//! Folder patterns are vault-relative folder paths with optional suffixes:
//!
//! | Pattern         | Matches                                              |
//! |-----------------|------------------------------------------------------|
//! | `docs`          | `docs` itself and everything below it                |
//! | `docs/**`       | same as `docs`                                       |
//! | `docs/*`        | files in any subfolder of `docs`, not `docs/a.md`     |
//! | `{vault}`       | files directly in the vault root                     |
//! | `{root}`        | same as `{vault}`                                    |
//!
//! `{vault}`/`{root}` inside a longer pattern (`{vault}/docs`) is replaced by
//! nothing, so it names the same folder as `docs`.

use regex::Regex;

/// Placeholders that stand for the vault root
const ROOT_PLACEHOLDERS: [&str; 2] = ["{vault}", "{root}"];

/// A parsed folder pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum FolderPattern<'a> {
    /// `base/**`: base and all descendants
    Recursive(&'a str),
    /// `base/*`: files in subfolders of base
    Children(&'a str),
    /// `base`: base and all descendants
    Folder(&'a str),
}

/// Replace root placeholders, returning `None` for a bare root pattern
fn resolve_placeholders(pattern: &str) -> Option<String> {
    if !ROOT_PLACEHOLDERS.iter().any(|p| pattern.contains(p)) {
        return Some(pattern.to_string());
    }

    let resolved = ROOT_PLACEHOLDERS
        .iter()
        .fold(pattern.to_string(), |acc, p| acc.replace(p, ""));

    if resolved.is_empty() || resolved == "/" {
        None
    } else {
        Some(resolved.trim_start_matches('/').to_string())
    }
}

impl<'a> FolderPattern<'a> {
    fn parse(resolved: &'a str) -> Self {
        if let Some(base) = resolved.strip_suffix("/**") {
            FolderPattern::Recursive(base)
        } else if let Some(base) = resolved.strip_suffix("/*") {
            FolderPattern::Children(base)
        } else {
            FolderPattern::Folder(resolved)
        }
    }
}

/// True when `path` has no parent folder
fn is_root_level(path: &str) -> bool {
    !path.contains('/')
}

/// True when `path` is `folder` or lies anywhere below it
fn is_under(path: &str, folder: &str) -> bool {
    path == folder
        || path
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Check whether `path` is inside the folder named by `folder`
///
/// `{vault}`/`{root}` alone selects files directly in the vault root.
pub fn is_in_folder(path: &str, folder: &str) -> bool {
    match resolve_placeholders(folder) {
        None => is_root_level(path),
        Some(resolved) => is_under(path, &resolved),
    }
}

/// Check whether `path` is excluded by `pattern`
///
/// - `base/**` excludes base and every descendant.
/// - `base/*` excludes files in any subfolder of base (at any depth) but
///   keeps files directly inside base.
/// - a plain folder excludes the folder and every descendant.
/// - `{vault}`/`{root}` alone excludes root-level files.
pub fn is_excluded(path: &str, pattern: &str) -> bool {
    let Some(resolved) = resolve_placeholders(pattern) else {
        return is_root_level(path);
    };

    match FolderPattern::parse(&resolved) {
        FolderPattern::Recursive(base) | FolderPattern::Folder(base) => is_under(path, base),
        FolderPattern::Children(base) => match children_of(path, base) {
            Some(rest) => rest.contains('/'),
            None => path == base,
        },
    }
}

/// Check whether `path` sits exactly one folder below a `/*` pattern's base
///
/// `docs/*` accepts `docs/sub/index.md` but neither `docs/index.md` nor
/// `docs/sub/deep/index.md`. Always false for `/**` and plain patterns.
pub fn is_direct_child_of_wildcard(path: &str, pattern: &str) -> bool {
    let Some(resolved) = resolve_placeholders(pattern) else {
        return false;
    };

    match FolderPattern::parse(&resolved) {
        FolderPattern::Children(base) => {
            children_of(path, base).is_some_and(|rest| rest.split('/').count() == 2)
        }
        _ => false,
    }
}

/// Remainder of `path` after `base/`
fn children_of<'p>(path: &'p str, base: &str) -> Option<&'p str> {
    path.strip_prefix(base)?.strip_prefix('/')
}

/// Compile `patterns`, logging and skipping the ones that are invalid
pub fn compile_regexes(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!("Invalid ignore regex '{}': {}", pattern, e);
                None
            }
        })
        .collect()
}

/// Check whether any of `patterns` matches any of `candidates`
///
/// Patterns are compiled once per call. Invalid patterns are logged and
/// skipped without affecting the others.
pub fn matches_any_regex(candidates: &[&str], patterns: &[String]) -> bool {
    let regexes = compile_regexes(patterns);
    regexes
        .iter()
        .any(|re| candidates.iter().any(|candidate| re.is_match(candidate)))
}
