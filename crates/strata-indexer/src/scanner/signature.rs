//! Function signature extraction from a language's pattern triple.
//!
//! Consumers compare these signatures against documentation to spot
//! drift. Extraction is regex based and line-agnostic.

use super::profile::LanguagePattern;
use crate::IndexerError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A parameter of an extracted signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub type_name: Option<String>,
    pub default_value: Option<String>,
    pub is_optional: bool,
}

/// A function signature found in source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

/// Compiled form of a [`LanguagePattern`].
#[derive(Debug, Clone)]
pub struct SignatureExtractor {
    function: Regex,
    parameter: Option<Regex>,
    return_type: Option<Regex>,
}

impl SignatureExtractor {
    /// Compile a pattern triple.
    pub fn new(pattern: &LanguagePattern) -> Result<Self, IndexerError> {
        Ok(Self {
            function: Regex::new(pattern.function)?,
            parameter: pattern.parameter.map(Regex::new).transpose()?,
            return_type: pattern.return_type.map(Regex::new).transpose()?,
        })
    }

    /// Extract every signature in `code`.
    pub fn extract(&self, code: &str) -> Vec<CodeSignature> {
        let mut signatures = Vec::new();

        for caps in self.function.captures_iter(code) {
            let Some(name) = caps.name("name") else {
                continue;
            };

            let parameters = caps
                .name("params")
                .map(|p| self.parameters(p.as_str()))
                .unwrap_or_default();

            let tail_start = caps
                .name("params")
                .map(|p| p.end())
                .unwrap_or_else(|| name.end());
            let tail = code[tail_start..].trim_start_matches(')');
            let return_type = self.return_type.as_ref().and_then(|re| {
                re.captures(tail)
                    .and_then(|c| c.name("ret"))
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty())
            });

            signatures.push(CodeSignature {
                name: name.as_str().to_string(),
                parameters,
                return_type,
            });
        }

        signatures
    }

    fn parameters(&self, list: &str) -> Vec<Parameter> {
        let Some(re) = &self.parameter else {
            return Vec::new();
        };

        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .filter_map(|raw| {
                let (decl, default_value) = match raw.split_once('=') {
                    Some((decl, value)) => (decl.trim(), Some(value.trim().to_string())),
                    None => (raw, None),
                };

                let caps = re.captures(decl)?;
                let name = caps.name("name")?.as_str().to_string();
                let type_name = caps
                    .name("ty")
                    .map(|t| t.as_str().trim().to_string())
                    .filter(|t| !t.is_empty());

                Some(Parameter {
                    name,
                    is_optional: raw.contains('?') || default_value.is_some(),
                    type_name,
                    default_value,
                })
            })
            .collect()
    }
}
