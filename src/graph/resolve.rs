//! Import target resolution against the set of analyzed files
//!
//! Only path-relative (`./`, `../`) and alias-qualified (`@/`, `~/`) targets
//! are resolved. Bare package names are left as-is and become dangling edges.

use crate::models::directory_of;

/// Extensions tried when an import omits one
const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Alias prefixes and the roots they may point at
const ALIAS_ROOTS: &[(&str, &[&str])] = &[("@/", &["src/", ""]), ("~/", &["src/", ""])];

/// Resolve `target` as imported from `from` to a known path
pub fn resolve_import(from: &str, target: &str, is_known: impl Fn(&str) -> bool) -> Option<String> {
    let bases: Vec<String> = if is_relative(target) {
        let dir = directory_of(from);
        let joined = if dir.is_empty() {
            target.to_string()
        } else {
            format!("{}/{}", dir, target)
        };
        normalize_path(&joined).into_iter().collect()
    } else if let Some((prefix, roots)) = ALIAS_ROOTS.iter().find(|(p, _)| target.starts_with(p)) {
        let rest = &target[prefix.len()..];
        roots
            .iter()
            .filter_map(|root| normalize_path(&format!("{}{}", root, rest)))
            .collect()
    } else {
        return None;
    };

    bases
        .iter()
        .flat_map(|base| candidates(base))
        .find(|candidate| is_known(candidate))
}

fn is_relative(target: &str) -> bool {
    target == "." || target == ".." || target.starts_with("./") || target.starts_with("../")
}

/// Files an extensionless or `.js`-suffixed specifier may refer to
fn candidates(base: &str) -> Vec<String> {
    let mut out = vec![base.to_string()];

    // ESM TypeScript imports `./x.js` to mean `./x.ts`
    for js_ext in [".js", ".jsx", ".mjs", ".cjs"] {
        if let Some(stem) = base.strip_suffix(js_ext) {
            out.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{}.{}", stem, ext)));
        }
    }

    out.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{}.{}", base, ext)));
    let index_prefix = if base.is_empty() {
        String::from("index")
    } else {
        format!("{}/index", base)
    };
    out.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{}.{}", index_prefix, ext)));
    out
}

/// Collapse `.` and `..` segments. `None` when the path escapes the root.
pub fn normalize_path(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn known(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("src/a/../b/./c.ts"), Some("src/b/c.ts".to_string()));
        assert_eq!(normalize_path("../outside"), None);
    }

    #[test]
    fn test_resolve_relative_adds_extension() {
        let files = known(&["src/user/model.ts", "src/user/service.ts"]);
        let resolved = resolve_import("src/user/service.ts", "./model", |p| files.contains(p));
        assert_eq!(resolved, Some("src/user/model.ts".to_string()));
    }

    #[test]
    fn test_resolve_parent_directory_index() {
        let files = known(&["src/shared/index.ts", "src/user/service.ts"]);
        let resolved = resolve_import("src/user/service.ts", "../shared", |p| files.contains(p));
        assert_eq!(resolved, Some("src/shared/index.ts".to_string()));
    }

    #[test]
    fn test_resolve_js_suffix_to_ts() {
        let files = known(&["lib/a.ts", "lib/b.ts"]);
        let resolved = resolve_import("lib/b.ts", "./a.js", |p| files.contains(p));
        assert_eq!(resolved, Some("lib/a.ts".to_string()));
    }

    #[test]
    fn test_resolve_alias() {
        let files = known(&["src/payments/stripe.ts"]);
        let resolved = resolve_import("src/app.ts", "@/payments/stripe", |p| files.contains(p));
        assert_eq!(resolved, Some("src/payments/stripe.ts".to_string()));
    }

    #[test]
    fn test_bare_package_not_resolved() {
        let files = known(&["react.ts"]);
        assert_eq!(resolve_import("a.ts", "react", |p| files.contains(p)), None);
    }

    #[test]
    fn test_root_level_files() {
        let files = known(&["a.ts", "b.ts"]);
        assert_eq!(
            resolve_import("b.ts", "./a", |p| files.contains(p)),
            Some("a.ts".to_string())
        );
    }
}
