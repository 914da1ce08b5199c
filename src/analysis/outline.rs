//! Structural outline of a source file: imports, types and functions with line numbers.

use std::path::Path;

use serde::Serialize;

use crate::analysis::{metrics, Language};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOutline {
    pub name: String,
    pub line: usize,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub params: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub return_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassOutline {
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Outline {
    pub path: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassOutline>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionOutline>,
}

/// Builds an outline by matching the language patterns line by line.
pub fn outline_source(path: &Path, source: &str) -> Outline {
    let language = Language::from_path(path);
    let lines: Vec<&str> = source.split('\n').collect();

    let classes = language
        .class_pattern()
        .map(|re| {
            lines
                .iter()
                .enumerate()
                .filter_map(|(i, line)| {
                    re.captures(line).and_then(|caps| caps.get(1)).map(|m| ClassOutline {
                        name: m.as_str().to_string(),
                        line: i + 1,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let functions = language
        .function_pattern()
        .map(|re| {
            lines
                .iter()
                .enumerate()
                .filter_map(|(i, line)| {
                    let caps = re.captures(line)?;
                    let name = caps.get(1)?.as_str().to_string();
                    let group = |n| caps.get(n).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
                    Some(FunctionOutline {
                        name,
                        line: i + 1,
                        params: group(2),
                        return_type: group(3),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Outline {
        path: path.display().to_string(),
        language,
        imports: metrics::imports(language, source),
        classes,
        functions,
    }
}
