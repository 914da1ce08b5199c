//! Language detection and per-language source patterns.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Source language, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    TypeScript,
    JavaScript,
    Python,
    Java,
    Rust,
    C,
    Cpp,
    Ruby,
    Php,
    Unknown,
}

impl Language {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "go" => Language::Go,
            "ts" | "tsx" => Language::TypeScript,
            "js" | "jsx" | "mjs" => Language::JavaScript,
            "py" => Language::Python,
            "java" => Language::Java,
            "rs" => Language::Rust,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" => Language::Cpp,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Rust => "rust",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Unknown => "unknown",
        }
    }

    /// Import statements; every non-empty capture group is an imported name.
    pub fn import_pattern(&self) -> Option<&'static Regex> {
        match self {
            Language::Go => Some(&*GO_IMPORT),
            Language::TypeScript => Some(&*TS_IMPORT),
            Language::JavaScript => Some(&*JS_IMPORT),
            Language::Python => Some(&*PY_IMPORT),
            Language::Java => Some(&*JAVA_IMPORT),
            Language::Rust => Some(&*RUST_IMPORT),
            _ => None,
        }
    }

    /// Function definitions; groups are name, parameters and (optionally) return type.
    pub fn function_pattern(&self) -> Option<&'static Regex> {
        match self {
            Language::Go => Some(&*GO_FUNC),
            Language::TypeScript => Some(&*TS_FUNC),
            Language::JavaScript => Some(&*JS_FUNC),
            Language::Python => Some(&*PY_FUNC),
            Language::Java => Some(&*JAVA_FUNC),
            Language::Rust => Some(&*RUST_FUNC),
            _ => None,
        }
    }

    /// Type definitions (classes, structs); group 1 is the name.
    pub fn class_pattern(&self) -> Option<&'static Regex> {
        match self {
            Language::Go => Some(&*GO_CLASS),
            Language::TypeScript => Some(&*TS_CLASS),
            Language::JavaScript | Language::Python => Some(&*PLAIN_CLASS),
            Language::Java => Some(&*JAVA_CLASS),
            Language::Rust => Some(&*RUST_CLASS),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid language pattern regex")
}

// == Imports ==
static GO_IMPORT: Lazy<Regex> = Lazy::new(|| compile(r#"(?m)^import\s+(?:\(([^)]+)\)|"([^"]+)")"#));
static TS_IMPORT: Lazy<Regex> = Lazy::new(|| compile(r#"(?m)^import\s+.*?from\s+['"]([^'"]+)['"]"#));
static JS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    compile(r#"(?m)^(?:import\s+.*?from\s+['"]([^'"]+)['"]|const\s+\w+\s*=\s*require\(['"]([^'"]+)['"]\))"#)
});
static PY_IMPORT: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(?:import\s+(\S+)|from\s+(\S+)\s+import)"));
static JAVA_IMPORT: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^import\s+([\w.]+);"));
static RUST_IMPORT: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^use\s+([\w:]+)"));

// == Functions ==
static GO_FUNC: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^func\s+(?:\([^)]+\)\s+)?(\w+)\s*\(([^)]*)\)(?:\s*\(?([^){\n]*)\)?)?")
});
static TS_FUNC: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)(?:^|\s)(?:async\s+)?(?:function\s+)?(\w+)\s*(?:<[^>]+>)?\s*\(([^)]*)\)(?:\s*:\s*([^\s{]+))?")
});
static JS_FUNC: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)(?:^|\s)(?:async\s+)?(?:function\s+)?(\w+)\s*\(([^)]*)\)"));
static PY_FUNC: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^\s*def\s+(\w+)\s*\(([^)]*)\)(?:\s*->\s*([^:\s]+))?"));
static JAVA_FUNC: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)(?:public|private|protected)?\s*(?:static)?\s*(?:\w+(?:<[^>]+>)?)\s+(\w+)\s*\(([^)]*)\)")
});
static RUST_FUNC: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?fn\s+(\w+)(?:<[^>]+>)?\s*\(([^)]*)\)(?:\s*->\s*([^{\s]+))?")
});

// == Types ==
static GO_CLASS: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^type\s+(\w+)\s+struct"));
static TS_CLASS: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(?:export\s+)?class\s+(\w+)"));
static PLAIN_CLASS: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^class\s+(\w+)"));
static JAVA_CLASS: Lazy<Regex> = Lazy::new(|| compile(r"(?m)(?:public|private)?\s*class\s+(\w+)"));
static RUST_CLASS: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^(?:pub(?:\([^)]*\))?\s+)?struct\s+(\w+)"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_languages() {
        assert_eq!(Language::from_path(Path::new("a.go")), Language::Go);
        assert_eq!(Language::from_path(Path::new("a.TSX")), Language::TypeScript);
        assert_eq!(Language::from_path(Path::new("a.mjs")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("a.hpp")), Language::Cpp);
        assert_eq!(Language::from_path(Path::new("a.h")), Language::C);
        assert_eq!(Language::from_path(Path::new("README")), Language::Unknown);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Language::TypeScript).unwrap(), "typescript");
        assert_eq!(Language::Cpp.to_string(), "cpp");
    }

    #[test]
    fn test_all_patterns_compile() {
        let langs = [
            Language::Go,
            Language::TypeScript,
            Language::JavaScript,
            Language::Python,
            Language::Java,
            Language::Rust,
        ];
        for lang in langs {
            assert!(lang.import_pattern().is_some());
            assert!(lang.function_pattern().is_some());
            assert!(lang.class_pattern().is_some());
        }
        assert!(Language::Ruby.function_pattern().is_none());
    }

    #[test]
    fn test_rust_function_pattern_captures_signature() {
        let re = Language::Rust.function_pattern().unwrap();
        let caps = re.captures("pub fn parse(input: &str) -> Result<Ast> {").unwrap();
        assert_eq!(&caps[1], "parse");
        assert_eq!(&caps[2], "input: &str");
        assert_eq!(&caps[3], "Result<Ast>");
    }
}
