//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Canonical root question of a fresh tree.
pub const DEFAULT_QUESTION: &str = "Is your animal warm or cold blooded?";
/// Canonical item on the yes branch of a fresh tree.
pub const DEFAULT_YES_ITEM: &str = "Dog";
/// Canonical item on the no branch of a fresh tree.
pub const DEFAULT_NO_ITEM: &str = "Snake";

/// Something the game can guess, identified by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    name: String,
}

impl Item {
    /// Create an item; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> DomainResult<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::EmptyItem);
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Answer to a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Parse a prompt response.
    ///
    /// Only the exact tokens `yes` and `no` are recognized (case-sensitive).
    /// Surrounding whitespace, including the line terminator, is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "yes" => Some(Answer::Yes),
            "no" => Some(Answer::No),
            _ => None,
        }
    }

    pub fn is_yes(self) -> bool {
        matches!(self, Answer::Yes)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Yes => write!(f, "yes"),
            Answer::No => write!(f, "no"),
        }
    }
}

/// Initial two-leaf shape a tree is built from and reset to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeedTree {
    /// Question at the root
    pub question: String,
    /// Item guessed when the root question is answered `yes`
    pub yes_item: String,
    /// Item guessed when the root question is answered `no`
    pub no_item: String,
}

impl Default for SeedTree {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.into(),
            yes_item: DEFAULT_YES_ITEM.into(),
            no_item: DEFAULT_NO_ITEM.into(),
        }
    }
}

impl SeedTree {
    /// Check that every field carries text.
    pub fn validate(&self) -> DomainResult<()> {
        Seed::try_from(self).map(|_| ())
    }
}

/// Validated seed, ready to be planted as a tree root with two leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub question: String,
    pub yes: Item,
    pub no: Item,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.into(),
            yes: Item {
                name: DEFAULT_YES_ITEM.into(),
            },
            no: Item {
                name: DEFAULT_NO_ITEM.into(),
            },
        }
    }
}

impl TryFrom<&SeedTree> for Seed {
    type Error = DomainError;

    fn try_from(seed: &SeedTree) -> DomainResult<Self> {
        let question = seed.question.trim();
        if question.is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        Ok(Self {
            question: question.to_string(),
            yes: Item::new(&seed.yes_item)?,
            no: Item::new(&seed.no_item)?,
        })
    }
}

impl From<&Seed> for SeedTree {
    fn from(seed: &Seed) -> Self {
        Self {
            question: seed.question.clone(),
            yes_item: seed.yes.name().to_string(),
            no_item: seed.no.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_padded_name_when_creating_item_then_trims() {
        let item = Item::new("  Cat \n").unwrap();
        assert_eq!(item.name(), "Cat");
        assert_eq!(item.to_string(), "Cat");
    }

    #[test]
    fn given_blank_name_when_creating_item_then_rejects() {
        assert_eq!(Item::new("   "), Err(DomainError::EmptyItem));
    }

    #[test]
    fn given_exact_tokens_when_parsing_answer_then_recognizes() {
        assert_eq!(Answer::parse("yes"), Some(Answer::Yes));
        assert_eq!(Answer::parse("no\n"), Some(Answer::No));
        assert_eq!(Answer::parse("Yes"), None);
        assert_eq!(Answer::parse("y"), None);
        assert_eq!(Answer::parse("yes no"), None);
        assert_eq!(Answer::parse(""), None);
    }

    #[test]
    fn given_default_seed_when_validating_then_ok() {
        let seed = SeedTree::default();
        assert_eq!(seed.question, DEFAULT_QUESTION);
        assert!(seed.validate().is_ok());
    }

    #[test]
    fn given_default_seed_tree_when_converting_then_matches_default_seed() {
        let seed = Seed::try_from(&SeedTree::default()).unwrap();
        assert_eq!(seed, Seed::default());
        assert_eq!(SeedTree::from(&seed), SeedTree::default());
    }

    #[test]
    fn given_seed_with_blank_item_when_validating_then_fails() {
        let seed = SeedTree {
            no_item: " ".into(),
            ..SeedTree::default()
        };
        assert_eq!(seed.validate(), Err(DomainError::EmptyItem));
    }
}
