//! CSS selector subset for in-memory hosts
//!
//! Browser hosts hand selectors straight to `querySelector`. Hosts without a
//! DOM match elements with [`SelectorList`], which understands:
//!
//! - Type selectors: `div`, `section` (case-insensitive), and `*`
//! - ID selectors: `#features`
//! - Class selectors: `.card`
//! - Compound selectors: `div.card.wide#first`
//! - Selector lists: `.card, #hero`
//!
//! Combinators, attribute selectors and pseudo-classes are rejected.
//!
//! # Example
//!
//! ```rust
//! use elemation_core::SelectorList;
//!
//! let selector = SelectorList::parse("div.card, #hero").unwrap();
//!
//! assert!(selector.matches("div", None, "card wide"));
//! assert!(selector.matches("section", Some("hero"), ""));
//! assert!(!selector.matches("span", None, "card"));
//! ```

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    error::{Error as NomError, ErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
    IResult,
};

use crate::error::{ElemationError, Result};

/// Element type part of a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelector {
    /// `*` or an omitted type
    Universal,
    /// Lower-cased tag name
    Tag(String),
}

/// A sequence of simple selectors that must all match one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub type_selector: TypeSelector,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
}

impl CompoundSelector {
    pub fn matches(&self, tag: &str, id: Option<&str>, class_name: &str) -> bool {
        if let TypeSelector::Tag(expected) = &self.type_selector {
            if !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if !self.ids.iter().all(|wanted| id == Some(wanted.as_str())) {
            return false;
        }

        self.classes
            .iter()
            .all(|wanted| class_name.split_whitespace().any(|token| token == wanted))
    }
}

/// Comma-separated list of compound selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<CompoundSelector>,
}

impl SelectorList {
    /// Parse a selector string
    pub fn parse(source: &str) -> Result<Self> {
        match all_consuming(selector_list)(source.trim()) {
            Ok((_, selectors)) => Ok(Self { selectors }),
            Err(err) => {
                tracing::debug!("selector parse failed for {:?}: {}", source, err);
                Err(ElemationError::invalid_selector(
                    source,
                    "expected tag, `*`, `#id` or `.class` selectors separated by commas",
                ))
            }
        }
    }

    /// Returns true if any selector in the list matches the element
    pub fn matches(&self, tag: &str, id: Option<&str>, class_name: &str) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches(tag, id, class_name))
    }

    pub fn selectors(&self) -> &[CompoundSelector] {
        &self.selectors
    }
}

impl std::str::FromStr for SelectorList {
    type Err = ElemationError;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

// ============================================================================
// Parsers
// ============================================================================

enum SimpleSelector {
    Id(String),
    Class(String),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn type_selector(input: &str) -> IResult<&str, TypeSelector> {
    alt((
        map(char('*'), |_| TypeSelector::Universal),
        map(identifier, |tag: &str| {
            TypeSelector::Tag(tag.to_ascii_lowercase())
        }),
    ))(input)
}

fn simple_selector(input: &str) -> IResult<&str, SimpleSelector> {
    alt((
        map(preceded(char('#'), identifier), |id: &str| {
            SimpleSelector::Id(id.to_string())
        }),
        map(preceded(char('.'), identifier), |class: &str| {
            SimpleSelector::Class(class.to_string())
        }),
    ))(input)
}

fn compound_selector(input: &str) -> IResult<&str, CompoundSelector> {
    let (rest, type_selector) = match type_selector(input) {
        Ok((rest, parsed)) => (rest, Some(parsed)),
        Err(nom::Err::Error(_)) => (input, None),
        Err(err) => return Err(err),
    };
    let (rest, parts) = many0(simple_selector)(rest)?;

    if type_selector.is_none() && parts.is_empty() {
        return Err(nom::Err::Error(NomError::new(input, ErrorKind::Verify)));
    }

    let mut compound = CompoundSelector {
        type_selector: type_selector.unwrap_or(TypeSelector::Universal),
        ids: Vec::new(),
        classes: Vec::new(),
    };
    for part in parts {
        match part {
            SimpleSelector::Id(id) => compound.ids.push(id),
            SimpleSelector::Class(class) => compound.classes.push(class),
        }
    }

    Ok((rest, compound))
}

fn selector_list(input: &str) -> IResult<&str, Vec<CompoundSelector>> {
    separated_list1(
        delimited(multispace0, char(','), multispace0),
        compound_selector,
    )(input)
}
