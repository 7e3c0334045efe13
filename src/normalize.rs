use crate::config::NormalizationConfig;
use regex::Regex;
use std::sync::LazyLock;

/// Site markers whose codes are never rewritten
pub const DEFAULT_PROTECTED_MARKERS: &[&str] = &["POUMON", "DELTA", "DEMENAGEMENT"];

/// Letter, letter, hyphen, digit at the start of a code. The two letters are
/// compared after matching since the regex crate has no backreferences.
static DOUBLED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])([A-Z])-\d").expect("doubled prefix pattern is valid"));

static DEFAULT_NORMALIZER: LazyLock<CodeNormalizer> = LazyLock::new(CodeNormalizer::default);

/// Canonicalizes scanned or typed codes before lookup and comparison.
///
/// Codes are trimmed and uppercased. Unless the code contains a protected
/// marker, a doubled leading letter in front of `-<digit>` is collapsed once
/// (`AA-1-23` becomes `A-1-23`), undoing a double keystroke some scanners
/// emit. The collapse can be switched off for sites whose codes legitimately
/// start with two identical letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeNormalizer {
    protected_markers: Vec<String>,
    collapse_doubled_prefix: bool,
}

impl Default for CodeNormalizer {
    fn default() -> Self {
        Self {
            protected_markers: DEFAULT_PROTECTED_MARKERS.iter().map(|m| m.to_string()).collect(),
            collapse_doubled_prefix: true,
        }
    }
}

impl CodeNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NormalizationConfig) -> Self {
        Self::new()
            .with_protected_markers(&config.protected_markers)
            .with_doubled_prefix_collapse(config.collapse_doubled_prefix)
    }

    pub fn with_protected_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.protected_markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_uppercase())
            .filter(|m| !m.is_empty())
            .collect();
        self
    }

    pub fn with_doubled_prefix_collapse(mut self, enabled: bool) -> Self {
        self.collapse_doubled_prefix = enabled;
        self
    }

    pub fn protected_markers(&self) -> &[String] {
        &self.protected_markers
    }

    pub fn collapses_doubled_prefix(&self) -> bool {
        self.collapse_doubled_prefix
    }

    /// Whether an uppercased code contains one of the protected markers
    pub fn is_protected(&self, code: &str) -> bool {
        self.protected_markers
            .iter()
            .any(|marker| code.contains(marker.as_str()))
    }

    pub fn normalize(&self, raw: &str) -> String {
        let code = raw.trim().to_uppercase();

        if !self.collapse_doubled_prefix || self.is_protected(&code) {
            return code;
        }

        match DOUBLED_PREFIX.captures(&code) {
            // Both captures are single ASCII letters, so byte 1 is a char boundary.
            Some(caps) if caps[1] == caps[2] => code[1..].to_string(),
            _ => code,
        }
    }
}

/// The normalizer with default markers and the doubled-prefix rule enabled
pub fn default_normalizer() -> &'static CodeNormalizer {
    &DEFAULT_NORMALIZER
}

/// Normalize a code with the default rules.
pub fn normalize_code(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}
