//! Complexity and quality metrics over source text.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::Language;

/// Files above this complexity are counted as complex in aggregates.
pub const COMPLEX_THRESHOLD: usize = 10;

/// Lines longer than this many bytes are counted as long.
pub const LONG_LINE: usize = 100;

static BRANCHES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bif\b",
        r"\belse\s+if\b",
        r"\bfor\b",
        r"\bwhile\b",
        r"\bswitch\b",
        r"\bcase\b",
        r"\bcatch\b",
        r"\?\s*[^:\n]+:",
        r"&&",
        r"\|\|",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid complexity regex"))
    .collect()
});

static COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?://|#|/\*|\*|'''|""")"#).expect("Invalid comment regex")
});

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct CodeAnalysis {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub complexity: usize,
}

/// Line statistics. Aggregate-only fields stay zero for a single file.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub total_lines: usize,
    pub non_empty_lines: usize,
    pub comment_lines: usize,
    pub duplicate_lines: usize,
    pub long_lines: usize,
    pub complex_functions: usize,
    pub avg_complexity: f64,
    pub max_complexity: usize,
    pub files_analyzed: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub path: String,
    pub language: Language,
    pub analysis: CodeAnalysis,
    pub quality_metrics: QualityMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryAnalysis {
    pub files: Vec<FileAnalysis>,
    pub aggregate_metrics: QualityMetrics,
}

/// 1 plus the number of branch constructs found.
pub fn complexity(source: &str) -> usize {
    1 + BRANCHES
        .iter()
        .map(|re| re.find_iter(source).count())
        .sum::<usize>()
}

pub fn quality(source: &str) -> QualityMetrics {
    let mut metrics = QualityMetrics::default();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for line in source.split('\n') {
        metrics.total_lines += 1;
        let trimmed = line.trim();

        if !trimmed.is_empty() {
            metrics.non_empty_lines += 1;
        }
        if COMMENT.is_match(line) {
            metrics.comment_lines += 1;
        }
        if line.len() > LONG_LINE {
            metrics.long_lines += 1;
        }
        if trimmed.len() > 10 {
            *seen.entry(trimmed).or_default() += 1;
        }
    }

    metrics.duplicate_lines = seen.values().filter(|&&n| n > 1).map(|n| n - 1).sum();
    metrics
}

/// Non-empty capture groups of every import match.
pub fn imports(language: Language, source: &str) -> Vec<String> {
    let Some(re) = language.import_pattern() else {
        return Vec::new();
    };
    re.captures_iter(source)
        .flat_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Function names followed by type names.
pub fn definitions(language: Language, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    for re in [language.function_pattern(), language.class_pattern()]
        .into_iter()
        .flatten()
    {
        names.extend(
            re.captures_iter(source)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        );
    }
    names
}

/// Analyzes one file's content.
pub fn analyze_source(path: &Path, source: &str) -> FileAnalysis {
    let language = Language::from_path(path);
    FileAnalysis {
        path: path.display().to_string(),
        language,
        analysis: CodeAnalysis {
            definitions: definitions(language, source),
            imports: imports(language, source),
            complexity: complexity(source),
        },
        quality_metrics: quality(source),
    }
}

/// Sums per-file metrics and derives the complexity aggregates.
pub fn aggregate(files: Vec<FileAnalysis>) -> DirectoryAnalysis {
    let mut total = QualityMetrics::default();
    let mut complexity_sum = 0;

    for file in &files {
        let q = &file.quality_metrics;
        let c = file.analysis.complexity;
        total.total_lines += q.total_lines;
        total.non_empty_lines += q.non_empty_lines;
        total.comment_lines += q.comment_lines;
        total.duplicate_lines += q.duplicate_lines;
        total.long_lines += q.long_lines;
        total.files_analyzed += 1;
        total.max_complexity = total.max_complexity.max(c);
        if c > COMPLEX_THRESHOLD {
            total.complex_functions += 1;
        }
        complexity_sum += c;
    }

    if total.files_analyzed > 0 {
        total.avg_complexity = complexity_sum as f64 / total.files_analyzed as f64;
    }

    DirectoryAnalysis {
        files,
        aggregate_metrics: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_baseline() {
        assert_eq!(complexity("let x = 1;"), 1);
    }

    #[test]
    fn test_complexity_counts_branches() {
        let src = "if a && b {\n} else if c || d {\n}\nfor x in y {}\nwhile z {}";
        // if, if (from else if), else if, &&, ||, for, while
        assert_eq!(complexity(src), 1 + 7);
    }

    #[test]
    fn test_complexity_ignores_identifiers_containing_keywords() {
        assert_eq!(complexity("let iffy = format(forward);"), 1);
    }

    #[test]
    fn test_quality_counts() {
        let long = "x".repeat(101);
        let src = format!(
            "// header\n\nlet value = compute();\nlet value = compute();\n{}\n# note",
            long
        );
        let q = quality(&src);
        assert_eq!(q.total_lines, 6);
        assert_eq!(q.non_empty_lines, 5);
        assert_eq!(q.comment_lines, 2);
        assert_eq!(q.long_lines, 1);
        assert_eq!(q.duplicate_lines, 1);
    }

    #[test]
    fn test_short_duplicates_ignored() {
        let q = quality("}\n}\n}\n");
        assert_eq!(q.duplicate_lines, 0);
    }

    #[test]
    fn test_rust_imports_and_definitions() {
        let src = "use std::fs;\nuse crate::x;\n\npub struct Thing;\n\nfn helper(a: u8) {}\n";
        let a = analyze_source(Path::new("lib.rs"), src);
        assert_eq!(a.language, Language::Rust);
        assert_eq!(a.analysis.imports, vec!["std::fs", "crate::x"]);
        assert_eq!(a.analysis.definitions, vec!["helper", "Thing"]);
    }

    #[test]
    fn test_python_imports() {
        let src = "import os\nfrom pathlib import Path\n";
        assert_eq!(imports(Language::Python, src), vec!["os", "pathlib"]);
    }

    #[test]
    fn test_unknown_language_has_no_definitions() {
        let a = analyze_source(Path::new("notes.txt"), "if this then that");
        assert!(a.analysis.definitions.is_empty());
        assert!(a.analysis.imports.is_empty());
        assert_eq!(a.analysis.complexity, 2);
    }

    #[test]
    fn test_aggregate() {
        let simple = analyze_source(Path::new("a.rs"), "fn a() {}");
        let branchy_src = "if a {}\n".repeat(12);
        let branchy = analyze_source(Path::new("b.rs"), &branchy_src);

        let dir = aggregate(vec![simple, branchy]);
        let m = &dir.aggregate_metrics;
        assert_eq!(m.files_analyzed, 2);
        assert_eq!(m.max_complexity, 13);
        assert_eq!(m.complex_functions, 1);
        assert!((m.avg_complexity - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_empty() {
        let dir = aggregate(Vec::new());
        assert_eq!(dir.aggregate_metrics.files_analyzed, 0);
        assert_eq!(dir.aggregate_metrics.avg_complexity, 0.0);
    }
}
