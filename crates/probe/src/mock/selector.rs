//! CSS selector subset for the in-memory DOM.
//!
//! Supported: type and universal selectors, `#id`, `.class`, attribute
//! tests (`[a]`, `[a=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`, `[a~=v]`),
//! `:nth-child(n)`, `:nth-of-type(n)`, `:first-child`, `:last-child`,
//! descendant and `>` combinators, and `,` groups.

use super::dom::{Document, NodeId};

/// A parsed selector group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    tests: Vec<Test>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Test {
    Id(String),
    Class(String),
    Attr(String, Option<(AttrOp, String)>),
    NthChild(usize),
    NthOfType(usize),
    LastChild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Prefix,
    Suffix,
    Contains,
    Word,
}

impl SelectorList {
    /// Parse a selector group
    pub fn parse(input: &str) -> Result<Self, String> {
        Parser::new(input).parse_list()
    }

    /// Whether `node` matches any selector of the group
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(doc, node))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.match_from(doc, self.compounds.len() - 1, node)
    }

    fn match_from(&self, doc: &Document, index: usize, node: NodeId) -> bool {
        if !self.compounds[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| self.match_from(doc, index - 1, p)),
            Combinator::Descendant => doc
                .ancestors(node)
                .into_iter()
                .any(|a| self.match_from(doc, index - 1, a)),
        }
    }
}

impl Compound {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.node(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.tests.iter().all(|test| match test {
            Test::Id(v) => node.attr("id") == Some(v.as_str()),
            Test::Class(v) => node.has_class(v),
            Test::Attr(name, None) => node.attr(name).is_some(),
            Test::Attr(name, Some((op, v))) => node.attr(name).is_some_and(|actual| match op {
                AttrOp::Equals => actual == v.as_str(),
                AttrOp::Prefix => actual.starts_with(v.as_str()),
                AttrOp::Suffix => actual.ends_with(v.as_str()),
                AttrOp::Contains => actual.contains(v.as_str()),
                AttrOp::Word => actual.split_whitespace().any(|w| w == v.as_str()),
            }),
            Test::NthChild(n) => doc.sibling_position(id, false) == Some(*n),
            Test::NthOfType(n) => doc.sibling_position(id, true) == Some(*n),
            Test::LastChild => doc
                .parent(id)
                .and_then(|p| doc.node(p))
                .is_some_and(|p| p.children.last() == Some(&id)),
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn error(&self, message: &str) -> String {
        format!("{message} at offset {} in {:?}", self.pos, self.input)
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }

    fn parse_list(mut self) -> Result<SelectorList, String> {
        let mut selectors = Vec::new();
        loop {
            let _ = self.skip_ws();
            selectors.push(self.parse_complex()?);
            let _ = self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.peek().is_none() {
                break;
            }
            return Err(self.error("unexpected character"));
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<Complex, String> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    let _ = self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, String> {
        let mut compound = Compound::default();
        let start = self.pos;
        if self.eat('*') {
            // universal selector, no tag constraint
        } else if let Some(tag) = self.ident() {
            compound.tag = Some(tag);
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.ident().ok_or_else(|| self.error("expected id"))?;
                    compound.tests.push(Test::Id(id));
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self.ident().ok_or_else(|| self.error("expected class"))?;
                    compound.tests.push(Test::Class(class));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.tests.push(self.parse_attr()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.tests.push(self.parse_pseudo()?);
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(self.error("expected selector"));
        }
        Ok(compound)
    }

    fn parse_attr(&mut self) -> Result<Test, String> {
        let _ = self.skip_ws();
        let name = self
            .ident()
            .ok_or_else(|| self.error("expected attribute name"))?;
        let _ = self.skip_ws();
        if self.eat(']') {
            return Ok(Test::Attr(name, None));
        }
        let op = match self.peek() {
            Some('=') => AttrOp::Equals,
            Some('^') => AttrOp::Prefix,
            Some('$') => AttrOp::Suffix,
            Some('*') => AttrOp::Contains,
            Some('~') => AttrOp::Word,
            _ => return Err(self.error("expected attribute operator")),
        };
        self.pos += 1;
        if op != AttrOp::Equals && !self.eat('=') {
            return Err(self.error("expected '='"));
        }
        let _ = self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated string"));
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                value
            }
            _ => self
                .ident()
                .ok_or_else(|| self.error("expected attribute value"))?,
        };
        let _ = self.skip_ws();
        if !self.eat(']') {
            return Err(self.error("expected ']'"));
        }
        Ok(Test::Attr(name, Some((op, value))))
    }

    fn parse_pseudo(&mut self) -> Result<Test, String> {
        let name = self
            .ident()
            .ok_or_else(|| self.error("expected pseudo-class"))?;
        match name.as_str() {
            "first-child" => Ok(Test::NthChild(1)),
            "last-child" => Ok(Test::LastChild),
            "nth-child" => Ok(Test::NthChild(self.parse_index()?)),
            "nth-of-type" => Ok(Test::NthOfType(self.parse_index()?)),
            _ => Err(self.error("unsupported pseudo-class")),
        }
    }

    fn parse_index(&mut self) -> Result<usize, String> {
        if !self.eat('(') {
            return Err(self.error("expected '('"));
        }
        let _ = self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        let index = digits
            .parse()
            .map_err(|_| self.error("expected index"))?;
        let _ = self.skip_ws();
        if !self.eat(')') {
            return Err(self.error("expected ')'"));
        }
        Ok(index)
    }
}
