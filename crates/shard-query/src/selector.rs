//! Selector strings compiled into [`Matcher`]s.
//!
//! The grammar is a small CSS subset:
//!
//! ```text
//! selector    := path ("," path)*
//! path        := combinator? compound (combinator? compound)*
//! compound    := (name | "#" id | "." class | "[" attr ("=" value)? "]")+
//! combinator  := whitespace | ">" | "+"
//! ```
//!
//! Unlike CSS, a path is evaluated left to right starting from the set it is
//! applied to: `#x > p` keeps the tags of the set whose id is `x` and then
//! moves to their `<p>` children. A path may start with `>` or `+`, which
//! makes it relative to the input set. `+` moves to every later sibling, not
//! only the adjacent one.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use shard_common::{Error, Result};
use strum_macros::{Display, EnumString};

use crate::matcher::Matcher;

/// Operators moving from one set of tags to a related one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Combinator {
    /// Whitespace: every tag below, at any depth.
    #[strum(serialize = " ")]
    Descendant,
    /// `>`: direct child tags.
    #[strum(serialize = ">")]
    Child,
    /// `+`: every later sibling tag.
    #[strum(serialize = "+")]
    FollowingSibling,
}

impl From<Combinator> for Matcher {
    fn from(combinator: Combinator) -> Self {
        match combinator {
            Combinator::Descendant => Self::Descendant,
            Combinator::Child => Self::Child,
            Combinator::FollowingSibling => Self::FollowingSibling,
        }
    }
}

/// A compiled selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    matcher: Matcher,
}

impl Selector {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// [`Error::Syntax`] with the byte position of the first problem: an
    /// empty alternative, a dangling or doubled combinator, an empty `#`/`.`
    /// name, an unterminated or unmatched bracket, an empty attribute name or
    /// a character outside the grammar.
    pub fn parse(source: &str) -> Result<Self> {
        let matcher = SelectorParser::new(source).parse()?;
        Ok(Self {
            source: source.to_string(),
            matcher,
        })
    }

    /// The text the selector was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled matcher.
    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Consume the selector, keeping the matcher.
    #[must_use]
    pub fn into_matcher(self) -> Matcher {
        self.matcher
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        Self::parse(source)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Check if a character can be part of a name, id, class or attribute.
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct SelectorParser<'s> {
    source: &'s str,
    chars: Peekable<CharIndices<'s>>,
}

impl<'s> SelectorParser<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn error(&self, position: usize, reason: &'static str) -> Error {
        Error::Syntax {
            selector: self.source.to_string(),
            position,
            reason,
        }
    }

    fn parse(mut self) -> Result<Matcher> {
        let mut alternatives = Vec::new();
        let mut steps: Vec<Matcher> = Vec::new();
        // Whitespace seen after a compound; becomes a descendant step if
        // another compound follows.
        let mut pending_descendant = false;
        // Position of a `>`/`+` still waiting for its compound.
        let mut dangling: Option<usize> = None;

        while let Some((position, c)) = self.chars.next() {
            match c {
                ',' => {
                    alternatives.push(self.finish_path(position, &mut steps, dangling)?);
                    pending_descendant = false;
                    dangling = None;
                }
                c if c.is_whitespace() => {
                    pending_descendant = !steps.is_empty() && dangling.is_none();
                }
                '>' | '+' => {
                    if dangling.is_some() {
                        return Err(self.error(position, "two combinators in a row"));
                    }
                    let mut buf = [0; 4];
                    let combinator = Combinator::from_str(c.encode_utf8(&mut buf))
                        .map_err(|_| self.error(position, "unknown combinator"))?;
                    steps.push(combinator.into());
                    pending_descendant = false;
                    dangling = Some(position);
                }
                ']' => return Err(self.error(position, "unmatched `]`")),
                '#' | '.' | '[' => {
                    if std::mem::take(&mut pending_descendant) {
                        steps.push(Combinator::Descendant.into());
                    }
                    dangling = None;
                    steps.push(self.compound_part(position, c)?);
                }
                c if is_ident_char(c) => {
                    if std::mem::take(&mut pending_descendant) {
                        steps.push(Combinator::Descendant.into());
                    }
                    dangling = None;
                    let mut name = String::from(c);
                    name.push_str(&self.read_ident());
                    steps.push(Matcher::ByName(name));
                }
                _ => return Err(self.error(position, "unexpected character")),
            }
        }
        alternatives.push(self.finish_path(self.source.len(), &mut steps, dangling)?);

        Ok(if alternatives.len() == 1 {
            alternatives.swap_remove(0)
        } else {
            Matcher::Or(alternatives)
        })
    }

    fn finish_path(
        &self,
        position: usize,
        steps: &mut Vec<Matcher>,
        dangling: Option<usize>,
    ) -> Result<Matcher> {
        if let Some(at) = dangling {
            return Err(self.error(at, "combinator without a following selector"));
        }
        if steps.is_empty() {
            return Err(self.error(position, "empty selector"));
        }
        Ok(Matcher::And(std::mem::take(steps)))
    }

    /// Parse what follows `#`, `.` or `[`.
    fn compound_part(&mut self, position: usize, lead: char) -> Result<Matcher> {
        match lead {
            '#' => {
                let id = self.read_ident();
                if id.is_empty() {
                    return Err(self.error(position, "empty id"));
                }
                Ok(Matcher::ById(id))
            }
            '.' => {
                let class = self.read_ident();
                if class.is_empty() {
                    return Err(self.error(position, "empty class"));
                }
                Ok(Matcher::ByClass(class))
            }
            _ => self.attribute(position),
        }
    }

    /// `[name]` or `[name=value]`, the opening bracket already consumed.
    fn attribute(&mut self, position: usize) -> Result<Matcher> {
        self.skip_whitespace();
        let name = self.read_ident();
        if name.is_empty() {
            return Err(self.error(position, "empty attribute name"));
        }
        self.skip_whitespace();

        let value = match self.chars.next() {
            Some((_, ']')) => return Ok(Matcher::Attribute { name, value: None }),
            Some((_, '=')) => self
                .attribute_value()
                .ok_or_else(|| self.error(position, "unterminated attribute selector"))?,
            _ => return Err(self.error(position, "unterminated attribute selector")),
        };

        self.skip_whitespace();
        if self.chars.next().map(|(_, c)| c) != Some(']') {
            return Err(self.error(position, "unterminated attribute selector"));
        }
        Ok(Matcher::Attribute {
            name,
            value: Some(value),
        })
    }

    /// A quoted value (quotes stripped) or the bare text up to `]`.
    fn attribute_value(&mut self) -> Option<String> {
        self.skip_whitespace();
        match self.chars.peek() {
            Some(&(_, quote @ ('"' | '\''))) => {
                let _ = self.chars.next();
                let mut value = String::new();
                for (_, c) in self.chars.by_ref() {
                    if c == quote {
                        return Some(value);
                    }
                    value.push(c);
                }
                None
            }
            Some(_) => {
                let mut value = String::new();
                while let Some(&(_, c)) = self.chars.peek() {
                    if c == ']' || c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    let _ = self.chars.next();
                }
                Some(value)
            }
            None => None,
        }
    }

    fn read_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| is_ident_char(c)) {
            ident.push(c);
        }
        ident
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }
}
