//! Textual notation for terms.
//!
//! The grammar is the one [`Term`]'s `Display` prints:
//!
//! ```text
//! term  := atom+                      one atom, or operators then a noun
//! atom  := "N(" int ")" | "A(" int ")" | "FUSE(" int "," int "," int ")"
//!        | "[" term "]"
//!        | "(" term ")" | "(" term ";" term ")" | "(" term "=>" term ")"
//! ```
//!
//! Whitespace between tokens is ignored. Positions in
//! [`CalculusError::Parse`] are byte offsets into the input. Groups may nest
//! at most [`MAX_NESTING`] deep.

use std::str::FromStr;

use crate::error::{CalculusError, Result};
use crate::term::Term;

/// Deepest `[`/`(` nesting [`parse_term`] accepts.
pub const MAX_NESTING: usize = 256;

/// Parses the textual notation.
///
/// # Errors
///
/// Returns [`CalculusError::Parse`] for malformed input, including
/// arguments that are not prime.
///
/// # Examples
///
/// ```
/// use prime_calculus::{parse_term, Term};
///
/// let term = parse_term("(A(2)A(3)N(7) ; [FUSE(3,5,11)])")?;
/// assert_eq!(term, Term::seq(Term::chain_of(&[2, 3], 7)?, Term::sentence(Term::fuse(3, 5, 11)?)));
/// assert!(parse_term("N(9)").is_err());
/// # Ok::<(), prime_calculus::CalculusError>(())
/// ```
pub fn parse_term(input: &str) -> Result<Term> {
    let mut parser = Parser {
        src: input.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let term = parser.term()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(term)
}

impl FromStr for Term {
    type Err = CalculusError;

    fn from_str(s: &str) -> Result<Self> {
        parse_term(s)
    }
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn term(&mut self) -> Result<Term> {
        let mut atoms = vec![self.atom()?];
        while self.at_atom() {
            atoms.push(self.atom()?);
        }
        match atoms.pop() {
            Some(noun) => Ok(Term::chain(atoms, noun)),
            None => Err(self.error("expected a term")),
        }
    }

    fn at_atom(&mut self) -> bool {
        self.skip_ws();
        matches!(self.peek(), Some(b'N' | b'A' | b'F' | b'[' | b'('))
    }

    fn atom(&mut self) -> Result<Term> {
        self.skip_ws();
        let start = self.pos;
        if self.eat("FUSE") {
            let args = self.arguments(3)?;
            return at(start, Term::fuse(args[0], args[1], args[2]));
        }
        if self.eat("N") {
            let args = self.arguments(1)?;
            return at(start, Term::noun(args[0]));
        }
        if self.eat("A") {
            let args = self.arguments(1)?;
            return at(start, Term::adj(args[0]));
        }
        if self.eat("[") {
            self.enter(start)?;
            let body = self.term()?;
            self.expect("]")?;
            self.depth -= 1;
            return Ok(Term::sentence(body));
        }
        if self.eat("(") {
            self.enter(start)?;
            let left = self.term()?;
            self.skip_ws();
            let term = if self.eat(";") {
                Term::seq(left, self.term()?)
            } else if self.eat("=>") {
                Term::implies(left, self.term()?)
            } else {
                left
            };
            self.expect(")")?;
            self.depth -= 1;
            return Ok(term);
        }
        Err(self.error("expected a term"))
    }

    /// Opens a group whose bracket is at `start`.
    fn enter(&mut self, start: usize) -> Result<()> {
        if self.depth == MAX_NESTING {
            return Err(CalculusError::Parse {
                position: start,
                message: format!("groups nested deeper than {MAX_NESTING}"),
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// `"(" int ("," int)* ")"` with exactly `count` integers.
    fn arguments(&mut self, count: usize) -> Result<Vec<u64>> {
        self.expect("(")?;
        let mut args = Vec::with_capacity(count);
        for i in 0..count {
            if i > 0 {
                self.expect(",")?;
            }
            args.push(self.integer()?);
        }
        self.expect(")")?;
        Ok(args)
    }

    fn integer(&mut self) -> Result<u64> {
        self.skip_ws();
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        if digits.is_empty() {
            return Err(self.error("expected an integer"));
        }
        digits.parse().map_err(|_| CalculusError::Parse {
            position: start,
            message: format!("integer {digits} is out of range"),
        })
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        self.skip_ws();
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{token}'")))
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.src[self.pos..].starts_with(token.as_bytes()) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: &str) -> CalculusError {
        CalculusError::Parse {
            position: self.pos,
            message: message.to_owned(),
        }
    }
}

/// Reports a constructor failure at the start of its atom.
fn at(position: usize, built: Result<Term>) -> Result<Term> {
    built.map_err(|err| CalculusError::Parse {
        position,
        message: err.to_string(),
    })
}
