//! Language detection for source files.

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Languages recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Swift,
    #[serde(rename = "objectiveC")]
    ObjectiveC,
    JavaScript,
    TypeScript,
    Html,
    Css,
    Scss,
    Less,
    Python,
    Ruby,
    Go,
    Java,
    Kotlin,
    CSharp,
    FSharp,
    Php,
    Rust,
    Perl,
    Lua,
    Dart,
    Elixir,
    Erlang,
    C,
    Cpp,
    Json,
    Yaml,
    Xml,
    Toml,
    Markdown,
    Sql,
    Shell,
    PowerShell,
    Dockerfile,
    Unknown,
}

/// Extensions the scanner is willing to open at all. Anything else is
/// rejected before the file is read.
pub const KNOWN_EXTENSIONS: &[&str] = &[
    "swift", "m", "h", "c", "cpp", "hpp", "cc", "hh", "cxx", "js", "mjs", "cjs", "ts", "tsx",
    "html", "htm", "css", "scss", "sass", "less", "py", "pyw", "rb", "go", "java", "kt", "kts",
    "cs", "fs", "fsi", "php", "phtml", "rs", "pl", "pm", "lua", "dart", "ex", "exs", "erl",
    "hrl", "json", "yml", "yaml", "xml", "plist", "storyboard", "xib", "csproj", "toml", "md",
    "markdown", "sql", "sh", "bash", "zsh", "ps1", "dockerfile",
];

impl Language {
    /// Get the display name for this language.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Swift => "Swift",
            Language::ObjectiveC => "Objective-C",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Scss => "SCSS",
            Language::Less => "Less",
            Language::Python => "Python",
            Language::Ruby => "Ruby",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::Kotlin => "Kotlin",
            Language::CSharp => "C#",
            Language::FSharp => "F#",
            Language::Php => "PHP",
            Language::Rust => "Rust",
            Language::Perl => "Perl",
            Language::Lua => "Lua",
            Language::Dart => "Dart",
            Language::Elixir => "Elixir",
            Language::Erlang => "Erlang",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Json => "JSON",
            Language::Yaml => "YAML",
            Language::Xml => "XML",
            Language::Toml => "TOML",
            Language::Markdown => "Markdown",
            Language::Sql => "SQL",
            Language::Shell => "Shell",
            Language::PowerShell => "PowerShell",
            Language::Dockerfile => "Dockerfile",
            Language::Unknown => "Unknown",
        }
    }

    /// Map a lowercase file extension to a language.
    pub fn from_extension(ext: &str) -> Language {
        match ext {
            "swift" => Language::Swift,
            "m" | "h" => Language::ObjectiveC,
            "c" => Language::C,
            "cpp" | "hpp" | "cc" | "hh" | "cxx" => Language::Cpp,
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "html" | "htm" => Language::Html,
            "css" => Language::Css,
            "scss" | "sass" => Language::Scss,
            "less" => Language::Less,
            "py" | "pyw" => Language::Python,
            "rb" => Language::Ruby,
            "go" => Language::Go,
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "cs" => Language::CSharp,
            "fs" | "fsi" => Language::FSharp,
            "php" | "phtml" => Language::Php,
            "rs" => Language::Rust,
            "pl" | "pm" => Language::Perl,
            "lua" => Language::Lua,
            "dart" => Language::Dart,
            "ex" | "exs" => Language::Elixir,
            "erl" | "hrl" => Language::Erlang,
            "json" => Language::Json,
            "yml" | "yaml" => Language::Yaml,
            "xml" | "plist" | "storyboard" | "xib" | "csproj" => Language::Xml,
            "toml" => Language::Toml,
            "md" | "markdown" => Language::Markdown,
            "sql" => Language::Sql,
            "sh" | "bash" | "zsh" => Language::Shell,
            "ps1" => Language::PowerShell,
            "dockerfile" => Language::Dockerfile,
            _ => Language::Unknown,
        }
    }
}

/// Lowercased extension of a path, or the pseudo-extension `dockerfile`
/// for a bare `Dockerfile`.
pub fn extension_key(path: &Path) -> Option<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => Some(ext.to_lowercase()),
        None => {
            let name = path.file_name()?.to_str()?;
            name.eq_ignore_ascii_case("dockerfile")
                .then(|| "dockerfile".to_string())
        }
    }
}

/// Cheap allowlist check done before any content read.
pub fn is_known_file(path: &Path) -> bool {
    extension_key(path).is_some_and(|ext| KNOWN_EXTENSIONS.contains(&ext.as_str()))
}

/// Detect the language of a file based on its extension.
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = extension_key(path)?;
    match Language::from_extension(&ext) {
        Language::Unknown => None,
        lang => Some(lang),
    }
}

/// Extension to language lookups shared by all scan workers.
pub struct LanguageCache {
    entries: Mutex<LruCache<String, Language>>,
}

impl LanguageCache {
    /// Create a cache holding up to `capacity` extensions.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Resolve the language for a path, consulting the cache first.
    pub fn language_for(&self, path: &Path) -> Language {
        let Some(ext) = extension_key(path) else {
            return Language::Unknown;
        };

        let mut entries = self.entries.lock();
        if let Some(lang) = entries.get(&ext) {
            return *lang;
        }

        let lang = Language::from_extension(&ext);
        entries.put(ext, lang);
        lang
    }

    /// Number of cached extensions.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for LanguageCache {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language(Path::new("a.swift")), Some(Language::Swift));
        assert_eq!(detect_language(Path::new("b.M")), Some(Language::ObjectiveC));
        assert_eq!(detect_language(Path::new("c.tsx")), Some(Language::TypeScript));
        assert_eq!(detect_language(Path::new("Main.storyboard")), Some(Language::Xml));
        assert_eq!(detect_language(Path::new("Dockerfile")), Some(Language::Dockerfile));
        assert_eq!(detect_language(Path::new("notes.txt")), None);
        assert_eq!(detect_language(Path::new("Makefile")), None);
    }

    #[test]
    fn test_known_files() {
        assert!(is_known_file(Path::new("src/lib.rs")));
        assert!(is_known_file(Path::new("Dockerfile")));
        assert!(!is_known_file(Path::new("image.png")));
        assert!(!is_known_file(Path::new("LICENSE")));
    }

    #[test]
    fn test_language_cache() {
        let cache = LanguageCache::new(2);
        assert!(cache.is_empty());

        assert_eq!(cache.language_for(&PathBuf::from("x.py")), Language::Python);
        assert_eq!(cache.language_for(&PathBuf::from("y.py")), Language::Python);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.language_for(&PathBuf::from("z.rs")), Language::Rust);
        assert_eq!(cache.language_for(&PathBuf::from("w.go")), Language::Go);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.language_for(&PathBuf::from("README")), Language::Unknown);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Language::ObjectiveC).unwrap(),
            "\"objectiveC\""
        );
        assert_eq!(serde_json::to_string(&Language::CSharp).unwrap(), "\"csharp\"");
        assert_eq!(serde_json::to_string(&Language::Swift).unwrap(), "\"swift\"");
    }
}
