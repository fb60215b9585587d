//! rules
//!
//! Ordered substitution rules for renaming and rewriting.
//!
//! # Design
//!
//! A [`RuleSet`] is an explicit, ordered list of regex/replacement pairs.
//! Rules are applied strictly in sequence: rule *i* sees the output of rule
//! *i - 1*, and every rule replaces all of its matches anywhere in the
//! input. The production list below is deliberately overlapping; an earlier
//! rule often rewrites text a later rule would otherwise match, and that
//! shadowing is part of the observed output. The list is never reordered or
//! deduplicated.
//!
//! # Example
//!
//! ```
//! use rebrand::rules::RuleSet;
//!
//! let rules = RuleSet::branding();
//! assert_eq!(rules.apply("BioTools"), "BioAgents");
//! ```

pub mod naming;

use regex::Regex;
use thiserror::Error;

/// The production branding rules, in application order.
///
/// Order is load-bearing. `BioTools` never reaches the `BioTools` rule
/// because the `Tools` rule has already rewritten it, and the `bio\.tools`
/// rule never fires because the `tools` rule gets there first. Editing this
/// list changes published output, so entries are pinned by tests.
const BRANDING_RULES: &[(&str, &str)] = &[
    (r"tools", "agents"),
    (r"Tools", "Agents"),
    (r"tool", "agent"),
    (r"Tool", "Agent"),
    (r"biotool", "bioagent"),
    (r"biotools", "bioagents"),
    (r"BioTools", "BioAgents"),
    (r"BioTool", "BioAgent"),
    (r"elixir", "iechor"),
    (r"Elixir", "iEchor"),
    (r"ELIXIR", "IECHOR"),
    (r"bio\.tools", "hub.bioagents.tech"),
];

/// Errors from rule construction.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A substitution pattern failed to compile.
    #[error("invalid substitution pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern that failed to compile
        pattern: String,
        /// The regex compiler's message
        message: String,
    },
}

/// A single substitution rule: a compiled pattern and its replacement.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    fn new(pattern: &str, replacement: &str) -> Result<Self, RuleError> {
        let pattern = Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }
}

/// An ordered list of substitution rules.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set from pattern/replacement pairs, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if any pattern fails to
    /// compile. A malformed rule list is a configuration defect; callers
    /// should abort rather than run with a partial list.
    pub fn new<'a, I>(pairs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, replacement)| Rule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// The built-in branding rule list.
    pub fn branding() -> Self {
        Self::new(BRANDING_RULES.iter().copied()).expect("built-in rules compile")
    }

    /// A rule set holding a single pattern/replacement pair.
    pub fn single(pattern: &str, replacement: &str) -> Result<Self, RuleError> {
        Self::new([(pattern, replacement)])
    }

    /// Apply every rule to the input, in order.
    ///
    /// Each rule replaces all occurrences of its pattern, and the next rule
    /// runs against the result. The same input always produces the same
    /// output.
    pub fn apply(&self, input: &str) -> String {
        let mut text = input.to_string();
        for rule in &self.rules {
            if let std::borrow::Cow::Owned(rewritten) =
                rule.pattern.replace_all(&text, rule.replacement.as_str())
            {
                text = rewritten;
            }
        }
        text
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
