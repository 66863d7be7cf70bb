//! Keyword tables and word normalization for domain inference
//!
//! Everything here is a small lookup table or a pure string function so it can
//! be tuned per project and tested in isolation.

/// Built-in domain keywords, most specific first. Over-generic terms such as
/// "util" or "api" are deliberately absent.
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    "authentication",
    "authorization",
    "notification",
    "subscription",
    "organization",
    "transaction",
    "permission",
    "integration",
    "analytics",
    "inventory",
    "checkout",
    "shipping",
    "payment",
    "invoice",
    "billing",
    "customer",
    "account",
    "profile",
    "product",
    "catalog",
    "session",
    "message",
    "comment",
    "review",
    "report",
    "search",
    "upload",
    "document",
    "order",
    "email",
    "media",
    "cart",
    "user",
    "auth",
    "admin",
    "team",
    "role",
    "task",
];

/// Folder names that describe code layout, not business domains
pub const INFRASTRUCTURE_FOLDERS: &[&str] = &[
    "src",
    "source",
    "lib",
    "app",
    "apps",
    "package",
    "pkg",
    "internal",
    "util",
    "helper",
    "common",
    "shared",
    "core",
    "base",
    "test",
    "spec",
    "mock",
    "fixture",
    "e2e",
    "dist",
    "build",
    "out",
    "node_module",
    "vendor",
    "config",
    "type",
    "typing",
    "interface",
    "model",
    "component",
    "hook",
    "service",
    "controller",
    "handler",
    "middleware",
    "route",
    "api",
    "page",
    "view",
    "index",
    "script",
    "asset",
    "style",
    "public",
    "static",
    "constant",
    "generated",
    "bin",
    "feature",
    "module",
];

/// Plurals the suffix rules get wrong
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("indices", "index"),
    ("analyses", "analysis"),
    ("statuses", "status"),
    ("aliases", "alias"),
    ("movies", "movie"),
    ("cookies", "cookie"),
];

/// Reduce an English plural to its singular, lowercased
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(p, _)| *p == lower) {
        return singular.to_string();
    }

    if lower.len() > 4 && lower.ends_with("ies") {
        return format!("{}y", &lower[..lower.len() - 3]);
    }
    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if lower.len() > suffix.len() + 1 && lower.ends_with(suffix) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return lower;
    }
    if lower.len() > 3 && lower.ends_with('s') {
        return lower[..lower.len() - 1].to_string();
    }
    lower
}

/// Split an identifier at camelCase, PascalCase, snake_case, kebab-case and
/// digit boundaries. Tokens are lowercased.
pub fn tokenize_identifier(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for part in name.split(|c: char| !c.is_alphanumeric()) {
        let chars: Vec<char> = part.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            if i > 0 && !current.is_empty() {
                let prev = chars[i - 1];
                let next = chars.get(i + 1).copied();
                let boundary = (c.is_uppercase() && prev.is_lowercase())
                    || (c.is_uppercase()
                        && prev.is_uppercase()
                        && next.is_some_and(|n| n.is_lowercase()))
                    || (c.is_ascii_digit() != prev.is_ascii_digit());
                if boundary {
                    tokens.push(current.to_lowercase());
                    current.clear();
                }
            }
            current.push(c);
        }

        if !current.is_empty() {
            tokens.push(current.to_lowercase());
        }
    }

    tokens
}

/// Lowercase, trim punctuation (`@scope`, `(group)`, `_private`) and singularize
/// a path segment. Returns `None` for segments that carry no domain signal.
pub fn normalize_segment(segment: &str) -> Option<String> {
    let trimmed = segment.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        return None;
    }
    let singular = singularize(trimmed);
    if is_infrastructure_folder(&singular) {
        return None;
    }
    Some(singular)
}

/// Whether a singularized folder name is a layout folder
pub fn is_infrastructure_folder(singular: &str) -> bool {
    INFRASTRUCTURE_FOLDERS.contains(&singular)
}

/// Folder name turned into a project-specific keyword, if it qualifies
pub fn folder_keyword(segment: &str) -> Option<String> {
    let keyword = normalize_segment(segment)?;
    if keyword.len() < 3 || !keyword.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }
    Some(keyword)
}

/// Ordered keyword list used to recognize domains
#[derive(Debug, Clone)]
pub struct DomainVocabulary {
    keywords: Vec<String>,
}

impl Default for DomainVocabulary {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl DomainVocabulary {
    /// Built-in keywords followed by `extra` (normalized, deduplicated)
    pub fn new(extra: &[String]) -> Self {
        let mut vocabulary = Self {
            keywords: DEFAULT_DOMAIN_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        };
        for keyword in extra {
            vocabulary.push(singularize(keyword.trim()));
        }
        vocabulary
    }

    /// Append keywords taken from the directory names of `paths`
    pub fn extend_from_paths<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            let Some((dirs, _file)) = path.rsplit_once('/') else {
                continue;
            };
            for segment in dirs.split('/') {
                if let Some(keyword) = folder_keyword(segment) {
                    self.push(keyword);
                }
            }
        }
    }

    fn push(&mut self, keyword: String) {
        if !keyword.is_empty() && !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Domain named by an identifier. A whole-token match beats a substring
    /// match, and substrings are only tried when no token matches.
    pub fn match_identifier(&self, name: &str) -> Option<&str> {
        let tokens: Vec<String> = tokenize_identifier(name)
            .iter()
            .map(|t| singularize(t))
            .collect();
        if let Some(keyword) = self.keywords.iter().find(|k| tokens.contains(k)) {
            return Some(keyword);
        }

        let lower = name.to_lowercase();
        self.keywords
            .iter()
            .find(|k| k.len() >= 3 && lower.contains(k.as_str()))
            .map(|k| k.as_str())
    }

    /// Domain named by one path segment (equality first, then containment)
    pub fn match_segment(&self, segment: &str) -> Option<&str> {
        let normalized = normalize_segment(segment)?;
        if let Some(keyword) = self.keywords.iter().find(|k| **k == normalized) {
            return Some(keyword);
        }
        self.keywords
            .iter()
            .find(|k| k.len() >= 3 && normalized.contains(k.as_str()))
            .map(|k| k.as_str())
    }

    /// Domains named by the segments of an import target
    pub fn match_import_path(&self, target: &str) -> Vec<&str> {
        let mut found: Vec<&str> = Vec::new();
        for segment in target.split('/') {
            let segment = segment.trim_start_matches(['@', '~']);
            if segment.is_empty() || segment == "." || segment == ".." {
                continue;
            }
            if let Some(domain) = self.match_segment(segment) {
                if !found.contains(&domain) {
                    found.push(domain);
                }
            }
        }
        found
    }

    /// Domain named by the file's own directories, deepest folder first
    pub fn match_folder(&self, path: &str) -> Option<&str> {
        let (dirs, _file) = path.rsplit_once('/')?;
        dirs.split('/')
            .rev()
            .find_map(|segment| self.match_segment(segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("Payments"), "payment");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("analysis"), "analysis");
        assert_eq!(singularize("auth"), "auth");
        assert_eq!(singularize("bus"), "bus");
    }

    #[test]
    fn test_tokenize_identifier() {
        assert_eq!(tokenize_identifier("getUserById"), vec!["get", "user", "by", "id"]);
        assert_eq!(tokenize_identifier("HTTPServer"), vec!["http", "server"]);
        assert_eq!(tokenize_identifier("MAX_USERS"), vec!["max", "users"]);
        assert_eq!(tokenize_identifier("order-items"), vec!["order", "items"]);
        assert_eq!(tokenize_identifier("oauth2Client"), vec!["oauth", "2", "client"]);
    }

    #[test]
    fn test_infrastructure_folders_skipped() {
        assert_eq!(normalize_segment("utils"), None);
        assert_eq!(normalize_segment("__tests__"), None);
        assert_eq!(normalize_segment("components"), None);
        assert_eq!(normalize_segment("invoices"), Some("invoice".to_string()));
    }

    #[test]
    fn test_whole_token_beats_substring() {
        let vocabulary = DomainVocabulary::default();
        // "author" contains "auth" but the whole token "order" matches first
        assert_eq!(vocabulary.match_identifier("authorOrders"), Some("order"));
        assert_eq!(vocabulary.match_identifier("getUser"), Some("user"));
        assert_eq!(vocabulary.match_identifier("userprofile"), Some("profile"));
        assert_eq!(vocabulary.match_identifier("formatDate"), None);
    }

    #[test]
    fn test_match_import_path() {
        let vocabulary = DomainVocabulary::default();
        assert_eq!(vocabulary.match_import_path("../payments/stripe"), vec!["payment"]);
        assert_eq!(vocabulary.match_import_path("@acme/orders-sdk"), vec!["order"]);
        assert!(vocabulary.match_import_path("./utils/format").is_empty());
    }

    #[test]
    fn test_match_folder_prefers_deepest() {
        let vocabulary = DomainVocabulary::default();
        assert_eq!(
            vocabulary.match_folder("src/users/invoices/list.ts"),
            Some("invoice")
        );
        assert_eq!(vocabulary.match_folder("src/utils/date.ts"), None);
        assert_eq!(vocabulary.match_folder("index.ts"), None);
    }

    #[test]
    fn test_keywords_from_folder_names() {
        let mut vocabulary = DomainVocabulary::new(&["Warehouses".to_string()]);
        vocabulary.extend_from_paths(["src/telemetry/collector.ts", "src/utils/x.ts", "a/b.ts"]);
        let keywords = vocabulary.keywords();
        assert!(keywords.contains(&"warehouse".to_string()));
        assert!(keywords.contains(&"telemetry".to_string()));
        assert!(!keywords.contains(&"util".to_string()));
        // too short to be meaningful
        assert!(!keywords.contains(&"a".to_string()));
        // built-ins keep precedence
        assert_eq!(keywords[0], "authentication");
    }
}
