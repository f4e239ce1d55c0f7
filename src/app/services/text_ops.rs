use std::path::{MAIN_SEPARATOR, Path};

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Guess a filetype name from the file extension.
pub fn filetype_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let name = match ext.as_str() {
        "rs" => "Rust",
        "c" | "h" => "C",
        "cc" | "cpp" | "cxx" | "hpp" => "C++",
        "py" => "Python",
        "js" | "mjs" => "JavaScript",
        "ts" => "TypeScript",
        "go" => "Go",
        "java" => "Java",
        "sh" | "bash" => "Sh",
        "md" | "markdown" => "Markdown",
        "toml" => "TOML",
        "json" => "JSON",
        "yaml" | "yml" => "YAML",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "txt" => "None",
        _ => return None,
    };
    Some(name.to_string())
}

/// Split the whitespace separated file patterns entry into a list.
///
/// The text is trimmed and runs of spaces are collapsed before splitting on
/// single spaces, so `"*.c   *.h"` yields `["*.c", "*.h"]`.
pub fn split_file_patterns(text: &str) -> Vec<String> {
    let mut collapsed = text.trim().to_string();
    while collapsed.contains("  ") {
        collapsed = collapsed.replace("  ", " ");
    }
    if collapsed.is_empty() {
        return Vec::new();
    }
    collapsed.split(' ').map(str::to_string).collect()
}

pub fn join_file_patterns(patterns: &[String]) -> String {
    patterns.join(" ")
}

/// `dir` followed by a separator and each of `parts`, without normalisation.
pub fn join_with_separator(dir: &str, parts: &[&str]) -> String {
    let mut out = dir.to_string();
    for part in parts {
        out.push(MAIN_SEPARATOR);
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename_from_path() {
        assert_eq!(extract_filename(Path::new("/home/user/test.txt")), "test.txt");
        assert_eq!(extract_filename(Path::new("test.txt")), "test.txt");
        assert_eq!(extract_filename(Path::new("/path/with/many/levels/file.rs")), "file.rs");
    }

    #[test]
    fn test_extract_filename_edge_cases() {
        assert_eq!(extract_filename(Path::new("")), "Unknown");
        assert_eq!(extract_filename(Path::new("/")), "Unknown");
    }

    #[test]
    fn test_filetype_for_path() {
        assert_eq!(filetype_for_path(Path::new("main.RS")).as_deref(), Some("Rust"));
        assert_eq!(filetype_for_path(Path::new("lib.h")).as_deref(), Some("C"));
        assert_eq!(filetype_for_path(Path::new("Makefile")), None);
        assert_eq!(filetype_for_path(Path::new("data.xyz")), None);
    }

    #[test]
    fn test_split_patterns_collapses_spaces() {
        assert_eq!(split_file_patterns("*.c   *.h"), vec!["*.c", "*.h"]);
        assert_eq!(split_file_patterns("  *.rs *.toml  "), vec!["*.rs", "*.toml"]);
    }

    #[test]
    fn test_split_patterns_empty() {
        assert!(split_file_patterns("").is_empty());
        assert!(split_file_patterns("    ").is_empty());
    }

    #[test]
    fn test_join_patterns() {
        let patterns = vec!["*.c".to_string(), "*.h".to_string()];
        assert_eq!(join_file_patterns(&patterns), "*.c *.h");
        assert_eq!(split_file_patterns(&join_file_patterns(&patterns)), patterns);
    }

    #[test]
    fn test_join_with_separator() {
        let joined = join_with_separator("/home/me", &["demo", ""]);
        assert_eq!(joined, format!("/home/me{0}demo{0}", MAIN_SEPARATOR));
    }
}
