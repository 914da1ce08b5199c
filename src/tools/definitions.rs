//! Tool catalogue: names, descriptions, input schemas and annotations.

use serde_json::{json, Value};

use crate::fs::{DEFAULT_CHUNK_SIZE, MAX_FILE_SIZE};
use crate::models::{Tool, ToolAnnotations};

fn tool(name: &str, description: &str, input_schema: Value, annotations: ToolAnnotations) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
        annotations: Some(annotations),
    }
}

fn path_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn file_types_property(verb: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": format!("Only {} files with these extensions (without leading dots)", verb),
    })
}

fn recursive_property() -> Value {
    json!({
        "type": "boolean",
        "description": "Include all subdirectories when the path is a directory",
        "default": true,
    })
}

/// All tools served by `tools/call`, in the order `tools/list` reports them.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        tool(
            "list_allowed_directories",
            "Returns the allowed root directories and blocked patterns configured for this server. \
             Call this first to learn which paths are accessible.",
            json!({ "type": "object", "properties": {} }),
            ToolAnnotations::read_only("List allowed directories"),
        ),
        tool(
            "list_context_files",
            "Lists files in a directory with metadata (size, modification time, mime type). \
             Use read_context for contents and get_folder_structure for a tree view.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("Directory to list"),
                    "recursive": recursive_property(),
                    "includeHidden": {
                        "type": "boolean",
                        "description": "Include names starting with '.'",
                        "default": false,
                    },
                    "fileTypes": file_types_property("list"),
                },
                "required": ["path"],
            }),
            ToolAnnotations::read_only("List files"),
        ),
        tool(
            "read_context",
            "Reads a file, or every matching file of a directory. Files larger than maxSize are \
             returned in chunks selected with chunkNumber. Results are cached.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("File or directory to read"),
                    "maxSize": {
                        "type": "integer",
                        "description": "Files larger than this many bytes are chunked",
                        "default": MAX_FILE_SIZE,
                        "minimum": 1,
                    },
                    "recursive": recursive_property(),
                    "fileTypes": file_types_property("read"),
                    "chunkNumber": {
                        "type": "integer",
                        "description": "0-based chunk to return for a file over maxSize. See get_chunk_count.",
                        "default": 0,
                        "minimum": 0,
                    },
                },
                "required": ["path"],
            }),
            ToolAnnotations::read_only("Read files"),
        ),
        tool(
            "search_context",
            "Searches file contents for a regular expression and returns matching lines with \
             surrounding context.",
            json!({
                "type": "object",
                "properties": {
                    "pattern": { "type": "string", "description": "Regular expression to search for" },
                    "path": path_property("File or directory to search"),
                    "recursive": recursive_property(),
                    "fileTypes": file_types_property("search"),
                    "contextLines": {
                        "type": "integer",
                        "description": "Lines to include before and after each match",
                        "default": 2,
                        "minimum": 0,
                        "maximum": 50,
                    },
                    "maxResults": {
                        "type": "integer",
                        "description": "Maximum number of matches to return",
                        "default": 100,
                        "minimum": 1,
                    },
                },
                "required": ["pattern", "path"],
            }),
            ToolAnnotations::read_only("Search files"),
        ),
        tool(
            "analyze_code",
            "Reports complexity, definitions, imports and line-quality metrics for a file, or \
             per-file and aggregate metrics for a directory.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("File or directory to analyze"),
                    "recursive": recursive_property(),
                    "fileTypes": file_types_property("analyze"),
                },
                "required": ["path"],
            }),
            ToolAnnotations::read_only("Analyze code"),
        ),
        tool(
            "generate_outline",
            "Outlines a source file: imports, classes and functions with line numbers, parameters \
             and return types.",
            json!({
                "type": "object",
                "properties": { "path": path_property("File to outline") },
                "required": ["path"],
            }),
            ToolAnnotations::read_only("Generate outline"),
        ),
        tool(
            "cache_stats",
            "Returns content cache statistics: size, hits, misses, hit rate and evictions, \
             optionally with per-entry detail.",
            json!({
                "type": "object",
                "properties": {
                    "detailed": {
                        "type": "boolean",
                        "description": "Include every cached entry, most recently used first",
                        "default": false,
                    },
                },
            }),
            ToolAnnotations::read_only("Cache statistics"),
        ),
        tool(
            "get_chunk_count",
            "Returns how many chunks of chunkSize bytes a file (or all files of a directory) spans.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("File or directory"),
                    "chunkSize": {
                        "type": "integer",
                        "description": "Chunk size in bytes",
                        "default": DEFAULT_CHUNK_SIZE,
                        "minimum": 1,
                    },
                },
                "required": ["path"],
            }),
            ToolAnnotations::read_only("Chunk count"),
        ),
        tool(
            "get_files",
            "Reads several files in one call. Each requested name maps to its content or to an \
             error.",
            json!({
                "type": "object",
                "properties": {
                    "filePathList": {
                        "type": "array",
                        "description": "Files to read",
                        "items": {
                            "type": "object",
                            "properties": { "fileName": path_property("File to read") },
                            "required": ["fileName"],
                        },
                    },
                },
                "required": ["filePathList"],
            }),
            ToolAnnotations::read_only("Read several files"),
        ),
        tool(
            "get_folder_structure",
            "Renders a directory as a text tree.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("Directory to render"),
                    "maxDepth": {
                        "type": "integer",
                        "description": "Levels to descend; 0 means unlimited",
                        "default": 5,
                        "minimum": 0,
                    },
                },
                "required": ["path"],
            }),
            ToolAnnotations::read_only("Folder structure"),
        ),
        tool(
            "write_file",
            "Creates or overwrites a file, creating missing parent directories.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("File to write"),
                    "content": { "type": "string", "description": "Complete new file content" },
                },
                "required": ["path", "content"],
            }),
            ToolAnnotations::mutating("Write file", true, true),
        ),
        tool(
            "create_directory",
            "Creates a directory and any missing parents. Succeeds if it already exists.",
            json!({
                "type": "object",
                "properties": { "path": path_property("Directory to create") },
                "required": ["path"],
            }),
            ToolAnnotations::mutating("Create directory", false, true),
        ),
        tool(
            "copy_file",
            "Copies a file, or a directory recursively, to a new location.",
            json!({
                "type": "object",
                "properties": {
                    "source": path_property("File or directory to copy"),
                    "destination": path_property("Target path"),
                },
                "required": ["source", "destination"],
            }),
            ToolAnnotations::mutating("Copy", true, true),
        ),
        tool(
            "move_file",
            "Moves or renames a file or directory.",
            json!({
                "type": "object",
                "properties": {
                    "source": path_property("File or directory to move"),
                    "destination": path_property("Target path"),
                },
                "required": ["source", "destination"],
            }),
            ToolAnnotations::mutating("Move", true, false),
        ),
        tool(
            "delete_file",
            "Deletes a file or directory. Non-empty directories require recursive=true.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("File or directory to delete"),
                    "recursive": {
                        "type": "boolean",
                        "description": "Delete a directory with everything in it",
                        "default": false,
                    },
                },
                "required": ["path"],
            }),
            ToolAnnotations::mutating("Delete", true, false),
        ),
        tool(
            "modify_file",
            "Finds and replaces text in a file, literally or by regular expression.",
            json!({
                "type": "object",
                "properties": {
                    "path": path_property("File to modify"),
                    "find": { "type": "string", "description": "Text or regular expression to find" },
                    "replace": {
                        "type": "string",
                        "description": "Replacement; $1-style groups work in regex mode",
                    },
                    "all_occurrences": {
                        "type": "boolean",
                        "description": "Replace every match instead of only the first",
                        "default": true,
                    },
                    "regex": {
                        "type": "boolean",
                        "description": "Treat find as a regular expression",
                        "default": false,
                    },
                },
                "required": ["path", "find", "replace"],
            }),
            ToolAnnotations::mutating("Modify file", true, false),
        ),
    ]
}
