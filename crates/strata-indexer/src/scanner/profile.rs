//! Per-language extraction profiles.
//!
//! Language behaviour is plain data: each [`Language`] maps to a static
//! [`LanguageProfile`] holding its import and declaration keywords and an
//! optional signature pattern triple. Unmapped languages get the no-op
//! profile, so callers never branch on support.

use super::bytes;
use super::language::Language;

/// Regex triple describing a language's function signatures.
///
/// `function` must capture `name` and `params`. `parameter` is applied to
/// each comma-separated parameter and may capture `name` and `ty`.
/// `return_type` is applied to the text after the parameter list and must
/// capture `ret`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguagePattern {
    pub language: &'static str,
    pub function: &'static str,
    pub parameter: Option<&'static str>,
    pub return_type: Option<&'static str>,
}

/// Keyword tables and signature patterns for one language family.
#[derive(Debug, Clone, Copy)]
pub struct LanguageProfile {
    pub imports: &'static [&'static str],
    pub symbols: &'static [&'static str],
    pub pattern: Option<LanguagePattern>,
}

impl LanguageProfile {
    /// Module paths named by import-like lines.
    ///
    /// A line counts when it starts with one of the import keywords; the
    /// first keyword that matches decides. The module is the word after the
    /// keyword, or its contents when that word is quoted. A binding followed
    /// by a `from '<module>'` clause yields the clause's module.
    pub fn extract_imports(&self, data: &[u8]) -> Vec<String> {
        let mut imports = Vec::new();
        if self.imports.is_empty() {
            return imports;
        }

        for line in bytes::lines(data) {
            let line = bytes::trim(line);
            if line.is_empty() {
                continue;
            }

            for keyword in self.imports {
                let keyword = keyword.as_bytes();
                if !line.starts_with(keyword) || !bytes::keyword_at(line, keyword, 0) {
                    continue;
                }

                let token = import_token(&line[keyword.len()..]);
                if !token.is_empty() {
                    imports.push(bytes::to_string(token));
                }
                break;
            }
        }

        imports
    }

    /// Declarations found on each line, as `"<keyword> <name>"`.
    ///
    /// Keywords are tried in table order; the first one that occurs as a
    /// standalone token and is followed by a name produces the entry.
    pub fn extract_symbols(&self, data: &[u8]) -> Vec<String> {
        let mut symbols = Vec::new();
        if self.symbols.is_empty() {
            return symbols;
        }

        for line in bytes::lines(data) {
            let line = bytes::trim(line);
            if line.is_empty() {
                continue;
            }

            'keywords: for keyword in self.symbols {
                let needle = keyword.as_bytes();
                let mut from = 0;

                while let Some(at) = bytes::find_from(line, needle, from) {
                    from = at + 1;
                    if !bytes::keyword_at(line, needle, at) {
                        continue;
                    }

                    let name = bytes::identifier(&line[at + needle.len()..]);
                    if name.is_empty() {
                        continue;
                    }

                    symbols.push(format!("{} {}", keyword.trim(), bytes::to_string(name)));
                    break 'keywords;
                }
            }
        }

        symbols
    }
}

/// Module named by the text after an import keyword.
fn import_token(rest: &[u8]) -> &[u8] {
    if let Some(quoted) = bytes::leading_quoted(rest) {
        return bytes::trim(quoted);
    }
    if let Some(module) = from_clause(rest) {
        return bytes::trim(module);
    }
    bytes::trim_punctuation(bytes::first_word(rest))
}

/// Quoted module of the first `from` token, as in `import x from "y"`.
fn from_clause(rest: &[u8]) -> Option<&[u8]> {
    let mut from = 0;
    while let Some(at) = bytes::find_from(rest, b"from", from) {
        from = at + 1;
        if bytes::keyword_at(rest, b"from", at) {
            return bytes::leading_quoted(&rest[at + 4..]);
        }
    }
    None
}

const NOOP: LanguageProfile = LanguageProfile {
    imports: &[],
    symbols: &[],
    pattern: None,
};

const SWIFT: LanguageProfile = LanguageProfile {
    imports: &["import"],
    symbols: &[
        "class", "struct", "enum", "protocol", "actor", "typealias", "associatedtype", "func",
        "init", "deinit", "subscript", "operator", "var", "let", "extension",
    ],
    pattern: Some(LanguagePattern {
        language: "Swift",
        function: r"func\s+(?P<name>\w+)(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)",
        parameter: Some(r"^(?:\w+\s+)?(?P<name>\w+)\s*:\s*(?P<ty>[^=]+)"),
        return_type: Some(r"^(?:\s*async)?(?:\s*throws)?\s*->\s*(?P<ret>[^{\n]+)"),
    }),
};

const C_STYLE: LanguageProfile = LanguageProfile {
    imports: &["#import", "#include", "#define"],
    symbols: &[
        "class", "struct", "enum", "union", "typedef", "namespace", "template<", "@interface",
        "@implementation", "@protocol", "@property", "extern",
    ],
    pattern: Some(LanguagePattern {
        language: "C-Style",
        function: r"(?:[A-Za-z_][\w*]*\s+)+\**(?P<name>[A-Za-z_]\w*)\s*\((?P<params>[^)]*)\)\s*\{",
        parameter: Some(r"^(?P<ty>[A-Za-z_][\w\s*]*[\s*])(?P<name>[A-Za-z_]\w*)$"),
        return_type: None,
    }),
};

const JAVA_FAMILY: LanguageProfile = LanguageProfile {
    imports: &["import", "using"],
    symbols: &["class", "interface", "enum", "record"],
    pattern: None,
};

const KOTLIN: LanguageProfile = LanguageProfile {
    imports: &["import"],
    symbols: &[
        "class", "interface", "object", "data class", "typealias", "enum class", "fun", "val",
        "var", "init", "companion object",
    ],
    pattern: Some(LanguagePattern {
        language: "Kotlin",
        function: r"fun\s+(?:<[^>]+>\s+)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
        parameter: Some(r"^(?:va[lr]\s+)?(?P<name>\w+)\s*:\s*(?P<ty>[^=]+)"),
        return_type: Some(r"^\s*:\s*(?P<ret>[\w<>\[\]?.]+)"),
    }),
};

const JAVASCRIPT: LanguageProfile = LanguageProfile {
    imports: &["import", "require(", "export"],
    symbols: &[
        "function", "class", "const", "let", "var", "async function", "interface", "type",
        "enum", "namespace", "abstract class", "module",
    ],
    pattern: Some(LanguagePattern {
        language: "JavaScript/TypeScript",
        function: r"function\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)",
        parameter: Some(r"^(?P<name>\w+)\??(?:\s*:\s*(?P<ty>[^=]+))?"),
        return_type: Some(r"^\s*:\s*(?P<ret>[\w<>|\[\]. ]+?)\s*(?:\{|=>|;|$)"),
    }),
};

const PYTHON: LanguageProfile = LanguageProfile {
    imports: &["import", "from"],
    symbols: &["class", "def", "async def"],
    pattern: Some(LanguagePattern {
        language: "Python",
        function: r"def\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
        parameter: Some(r"^\**(?P<name>\w+)(?:\s*:\s*(?P<ty>[^=]+))?"),
        return_type: Some(r"^\s*->\s*(?P<ret>[^:]+):"),
    }),
};

const RUBY: LanguageProfile = LanguageProfile {
    imports: &["require", "load", "include"],
    symbols: &[
        "class", "module", "def", "attr_reader", "attr_writer", "attr_accessor", "alias",
        "alias_method",
    ],
    pattern: Some(LanguagePattern {
        language: "Ruby",
        function: r"def\s+(?P<name>[\w.=!?]+)\s*(?:\((?P<params>[^)]*)\))?",
        parameter: Some(r"^[*&]*(?P<name>\w+):?"),
        return_type: None,
    }),
};

const GO: LanguageProfile = LanguageProfile {
    imports: &["import"],
    symbols: &["func", "type", "const", "var"],
    pattern: None,
};

const RUST: LanguageProfile = LanguageProfile {
    imports: &["use", "extern crate"],
    symbols: &[
        "fn", "struct", "enum", "union", "trait", "impl", "mod", "type", "const", "static",
        "macro_rules!", "pub fn", "pub struct", "pub enum", "pub const", "pub static", "pub mod",
    ],
    pattern: Some(LanguagePattern {
        language: "Rust",
        function: r"fn\s+(?P<name>\w+)(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)",
        parameter: Some(r"^(?:mut\s+)?(?P<name>\w+)\s*:\s*(?P<ty>.+)"),
        return_type: Some(r"^\s*->\s*(?P<ret>[^{;]+?)\s*(?:where\b|\{|;|$)"),
    }),
};

const PHP: LanguageProfile = LanguageProfile {
    imports: &["include", "require", "use"],
    symbols: &["class", "function", "interface", "trait"],
    pattern: None,
};

const DART: LanguageProfile = LanguageProfile {
    imports: &["import", "export", "part"],
    symbols: &[
        "class", "mixin", "enum", "extension", "typedef", "const", "final", "var", "late",
        "abstract", "external",
    ],
    pattern: Some(LanguagePattern {
        language: "Dart",
        function: r"(?:[\w<>\[\]?]+\s+)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?:async\s*)?\{",
        parameter: Some(r"^(?:required\s+)?(?P<ty>[\w<>\[\]?]+)\s+(?P<name>\w+)"),
        return_type: None,
    }),
};

const LUA: LanguageProfile = LanguageProfile {
    imports: &["require"],
    symbols: &["function", "local function", "local"],
    pattern: Some(LanguagePattern {
        language: "Lua",
        function: r"function\s+(?P<name>[\w.:]+)\s*\((?P<params>[^)]*)\)",
        parameter: Some(r"^(?P<name>\w+)"),
        return_type: None,
    }),
};

const PERL: LanguageProfile = LanguageProfile {
    imports: &["use", "require", "no"],
    symbols: &["sub", "package", "my", "our", "local"],
    pattern: Some(LanguagePattern {
        language: "Perl",
        function: r"sub\s+(?P<name>[\w:]+)(?P<params>)",
        parameter: None,
        return_type: None,
    }),
};

const ELIXIR: LanguageProfile = LanguageProfile {
    imports: &["alias", "import", "require", "use"],
    symbols: &["defmodule", "def", "defp"],
    pattern: None,
};

/// Look up the profile for a language. Total: unmapped languages get a
/// profile that extracts nothing.
pub fn profile_for(language: Language) -> &'static LanguageProfile {
    match language {
        Language::Swift => &SWIFT,
        Language::ObjectiveC | Language::C | Language::Cpp => &C_STYLE,
        Language::Java | Language::CSharp => &JAVA_FAMILY,
        Language::Kotlin => &KOTLIN,
        Language::JavaScript | Language::TypeScript => &JAVASCRIPT,
        Language::Python => &PYTHON,
        Language::Ruby => &RUBY,
        Language::Go => &GO,
        Language::Rust => &RUST,
        Language::Php => &PHP,
        Language::Dart => &DART,
        Language::Lua => &LUA,
        Language::Perl => &PERL,
        Language::Elixir => &ELIXIR,
        _ => &NOOP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swift_symbols() {
        let profile = profile_for(Language::Swift);
        let src = b"import Foundation\n\nfunc foo() {}\nstruct Point {\n    let x: Int\n}\n";

        assert_eq!(profile.extract_imports(src), vec!["Foundation"]);
        assert_eq!(
            profile.extract_symbols(src),
            vec!["func foo", "struct Point", "let x"]
        );
    }

    #[test]
    fn test_first_keyword_wins_per_line() {
        let profile = profile_for(Language::Swift);
        let symbols = profile.extract_symbols(b"final class Cache { var items = [] }\n");
        assert_eq!(symbols, vec!["class Cache"]);
    }

    #[test]
    fn test_rust_profile() {
        let profile = profile_for(Language::Rust);
        let src = b"use std::collections::HashMap;\nextern crate serde;\npub fn run() {}\n\
                    impl<T> Foo<T> {}\nmacro_rules! hello {\n";

        assert_eq!(
            profile.extract_imports(src),
            vec!["std::collections::HashMap", "serde"]
        );
        assert_eq!(
            profile.extract_symbols(src),
            vec!["fn run", "macro_rules! hello"]
        );
    }

    #[test]
    fn test_javascript_imports() {
        let profile = profile_for(Language::TypeScript);
        let src = b"import React from 'react';\nimport { a } from \"./a\";\n\
                    const x = require('lodash');\nrequire('dotenv').config();\n\
                    export default App;\n";

        assert_eq!(
            profile.extract_imports(src),
            vec!["react", "./a", "dotenv", "default"]
        );
    }

    #[test]
    fn test_python_and_c_style() {
        let py = profile_for(Language::Python);
        let src = b"import os\nfrom typing import List\nimportant = 1\nasync def fetch(url):\n";
        assert_eq!(py.extract_imports(src), vec!["os", "typing"]);
        assert_eq!(py.extract_symbols(src), vec!["def fetch"]);

        let c = profile_for(Language::C);
        let src = b"#include <stdio.h>\n#include \"util.h\"\ntypedef struct node node_t;\n";
        assert_eq!(c.extract_imports(src), vec!["stdio.h", "util.h"]);
        assert_eq!(c.extract_symbols(src), vec!["struct node"]);
    }

    #[test]
    fn test_quotes_after_module_are_ignored() {
        let c = profile_for(Language::C);
        assert_eq!(
            c.extract_imports(b"#define VERSION \"1.2.3\"\n"),
            vec!["VERSION"]
        );

        let swift = profile_for(Language::Swift);
        assert_eq!(
            swift.extract_imports(b"import Foundation // see \"notes\"\n"),
            vec!["Foundation"]
        );

        let py = profile_for(Language::Python);
        assert_eq!(
            py.extract_imports(b"from os import path  # 'legacy'\n"),
            vec!["os"]
        );

        let rust = profile_for(Language::Rust);
        assert_eq!(
            rust.extract_imports(b"use crate::a; // \"b\"\n"),
            vec!["crate::a"]
        );
    }

    #[test]
    fn test_noop_profile() {
        let profile = profile_for(Language::Markdown);
        assert!(profile.extract_imports(b"import x").is_empty());
        assert!(profile.extract_symbols(b"class Y").is_empty());
        assert!(profile.pattern.is_none());
    }
}
