//! Role hints inferred from file names and directories.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    FileName,
    FileStem,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Exact,
    Contains,
    Suffix,
}

struct RoleRule {
    target: Target,
    matcher: Match,
    pattern: &'static str,
    hint: &'static str,
    score: u32,
}

const fn rule(
    target: Target,
    matcher: Match,
    pattern: &'static str,
    hint: &'static str,
    score: u32,
) -> RoleRule {
    RoleRule {
        target,
        matcher,
        pattern,
        hint,
        score,
    }
}

use Match::{Contains, Exact, Suffix};
use Target::{Directory, FileName, FileStem};

/// Ordered from most to least confident.
static RULES: &[RoleRule] = &[
    // Manifests and well-known files
    rule(FileName, Exact, "Package.swift", "package-manifest", 120),
    rule(FileName, Exact, "package.json", "package-manifest", 120),
    rule(FileName, Exact, "go.mod", "package-manifest", 120),
    rule(FileName, Exact, "Cargo.toml", "package-manifest", 120),
    rule(FileName, Exact, "pom.xml", "package-manifest", 120),
    rule(FileName, Exact, "requirements.txt", "dependency-manifest", 120),
    rule(FileName, Exact, "Podfile", "dependency-manifest", 120),
    rule(FileName, Exact, "Gemfile", "dependency-manifest", 120),
    rule(FileName, Exact, "Dockerfile", "container-definition", 120),
    rule(FileName, Exact, "docker-compose.yml", "container-orchestration", 120),
    rule(FileName, Exact, "Makefile", "build-script", 110),
    rule(FileName, Exact, ".env", "environment-config", 110),
    rule(FileName, Exact, "README.md", "documentation", 110),
    rule(FileName, Exact, "LICENSE", "license", 110),
    rule(FileName, Exact, "CONTRIBUTING.md", "documentation", 110),
    // Directories
    rule(Directory, Contains, "/services/", "service", 100),
    rule(Directory, Contains, "/viewmodels/", "viewmodel", 100),
    rule(Directory, Contains, "/controllers/", "controller", 100),
    rule(Directory, Contains, "/models/", "model", 100),
    rule(Directory, Contains, "/repositories/", "repository", 100),
    rule(Directory, Contains, "/networking/", "networking", 100),
    rule(Directory, Contains, "/tests/", "testing", 100),
    rule(Directory, Contains, "/views/", "view", 90),
    rule(Directory, Contains, "/components/", "ui-component", 90),
    rule(Directory, Contains, "/persistence/", "storage", 90),
    rule(Directory, Contains, "/database/", "storage", 90),
    rule(Directory, Contains, "/coordinators/", "navigation", 90),
    rule(Directory, Contains, "/routes/", "routing", 90),
    rule(Directory, Contains, "/middleware/", "middleware", 90),
    rule(Directory, Contains, "/utils/", "utility", 80),
    rule(Directory, Contains, "/helpers/", "utility", 80),
    rule(Directory, Contains, "/extensions/", "extension", 80),
    rule(Directory, Contains, "/config/", "configuration", 80),
    rule(Directory, Contains, "/scripts/", "script", 80),
    rule(Directory, Contains, "/assets/", "asset", 80),
    rule(Directory, Contains, "/docs/", "documentation", 80),
    // File name stems
    rule(FileStem, Suffix, "ViewModel", "viewmodel", 70),
    rule(FileStem, Suffix, "Service", "service", 70),
    rule(FileStem, Suffix, "Controller", "controller", 70),
    rule(FileStem, Suffix, "Repository", "repository", 70),
    rule(FileStem, Suffix, "Model", "model", 70),
    rule(FileStem, Suffix, "Entity", "model", 70),
    rule(FileStem, Suffix, "Tests", "testing", 70),
    rule(FileStem, Suffix, "Spec", "testing", 70),
    rule(FileStem, Suffix, "TestCase", "testing", 70),
    rule(FileStem, Suffix, "View", "view", 60),
    rule(FileStem, Suffix, "ViewController", "view", 60),
    rule(FileStem, Suffix, "Component", "ui-component", 60),
    rule(FileStem, Suffix, "Coordinator", "navigation", 60),
    rule(FileStem, Suffix, "Router", "routing", 60),
    rule(FileStem, Suffix, "Manager", "manager", 60),
    rule(FileStem, Suffix, "Factory", "factory", 60),
    rule(FileStem, Suffix, "Policy", "policy", 60),
    rule(FileStem, Suffix, "Request", "networking-model", 60),
    rule(FileStem, Suffix, "Response", "networking-model", 60),
    // File name fragments
    rule(FileName, Contains, "config", "configuration", 40),
    rule(FileName, Contains, "api", "networking", 40),
    rule(FileName, Contains, "auth", "authentication", 40),
    rule(FileName, Contains, "route", "routing", 30),
    rule(FileName, Contains, "network", "networking", 30),
    rule(FileName, Contains, "database", "storage", 30),
    rule(FileName, Contains, "cache", "caching", 30),
    rule(FileName, Contains, "job", "background-job", 30),
    rule(FileName, Contains, "worker", "background-job", 30),
];

/// Ranked role hints for a root-relative, `/`-separated path.
///
/// Each hint scores as its best matching rule; hints are returned by
/// descending score, ties broken by name. Directory and fragment rules
/// ignore case, exact and suffix rules do not.
pub fn role_hints(relative_path: &str) -> Vec<String> {
    let relative_path = relative_path.trim_start_matches('/');
    let (dir, file_name) = match relative_path.rsplit_once('/') {
        Some((dir, name)) => (dir, name),
        None => ("", relative_path),
    };
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };

    // Leading and trailing separators so that "/models/" also matches a
    // top-level models directory.
    let dir_key = format!("/{}/", dir.to_lowercase());
    let name_lower = file_name.to_lowercase();

    let mut scores: HashMap<&'static str, u32> = HashMap::new();

    for rule in RULES {
        let matched = match (rule.target, rule.matcher) {
            (FileName, Exact) => file_name == rule.pattern,
            (FileName, Contains) => name_lower.contains(rule.pattern),
            (FileName, Suffix) => file_name.ends_with(rule.pattern),
            (FileStem, Exact) => stem == rule.pattern,
            (FileStem, Contains) => stem.contains(rule.pattern),
            (FileStem, Suffix) => stem.ends_with(rule.pattern),
            (Directory, Contains) => dir_key.contains(rule.pattern),
            (Directory, Exact) => dir == rule.pattern,
            (Directory, Suffix) => dir.ends_with(rule.pattern),
        };

        if matched {
            let entry = scores.entry(rule.hint).or_insert(0);
            *entry = (*entry).max(rule.score);
        }
    }

    let mut ranked: Vec<(&'static str, u32)> =
        scores.into_iter().filter(|(_, score)| *score > 0).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().map(|(hint, _)| hint.to_string()).collect()
}
