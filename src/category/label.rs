//! Decomposition of raw category strings into trie steps.
//!
//! A full category such as `QH359-425` is walked from the root one step at a
//! time: `Q`, then `H`, then the span `359-425`. Each step is parsed relative to
//! the letter prefix already matched by the enclosing node.

use std::sync::LazyLock;

use regex::Regex;

use super::range::Range;
use crate::error::{LabelError, LabelResult};

static RE_CATEGORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]+\d+(?:\.\d+)?(?:-\d+(?:\.\d+)?)?$").unwrap()
});

/// Check a category string against the LOCC grammar: uppercase letters followed
/// by a class number, optionally with a decimal part and a `-number` upper bound.
pub fn validate_category_string(category: &str) -> bool {
    RE_CATEGORY.is_match(category)
}

/// Like [`validate_category_string`], but reports the rejection as an error.
pub fn check_category_string(category: &str) -> LabelResult<()> {
    if validate_category_string(category) {
        Ok(())
    } else {
        Err(LabelError::MalformedCategory {
            category: category.to_string(),
        })
    }
}

/// The leading run of uppercase ASCII letters, e.g. `QH` for `QH1-278.5`.
pub fn letter_prefix(label: &str) -> &str {
    let end = label
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(label.len());
    &label[..end]
}

/// One step of descent through the category trie.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// A single class letter.
    Letter(char),
    /// A numeric span below the matched letters.
    Range(Range),
}

/// A raw category string together with the step it contributes below a node.
#[derive(Debug, Clone)]
pub struct CategoryLabel<'a> {
    /// The whole category string.
    pub full: &'a str,
    pub step: Step,
}

impl<'a> CategoryLabel<'a> {
    /// Parse `raw` relative to an already matched ancestor prefix.
    ///
    /// After stripping the prefix, a remainder that starts with an uppercase
    /// letter is a letter step of exactly that one character; anything else is
    /// a range step covering the whole remainder.
    pub fn parse(raw: &'a str, ancestor_prefix: Option<&str>) -> LabelResult<Self> {
        let prefix = ancestor_prefix.unwrap_or("");
        let rest = raw
            .strip_prefix(prefix)
            .ok_or_else(|| LabelError::PrefixMismatch {
                label: raw.to_string(),
                prefix: prefix.to_string(),
            })?;

        let step = match rest.chars().next() {
            None => {
                return Err(LabelError::EmptyStep {
                    label: raw.to_string(),
                    prefix: prefix.to_string(),
                });
            }
            Some(c) if c.is_ascii_uppercase() => Step::Letter(c),
            Some(_) => Step::Range(Range::parse(rest).ok_or_else(|| LabelError::RangeParse {
                text: rest.to_string(),
            })?),
        };

        Ok(Self { full: raw, step })
    }

    pub fn is_letter_step(&self) -> bool {
        matches!(self.step, Step::Letter(_))
    }

    /// The numeric span of a range step.
    pub fn range(&self) -> Option<Range> {
        match self.step {
            Step::Range(range) => Some(range),
            Step::Letter(_) => None,
        }
    }
}
