//! In-memory RDF graphs and their N-Triples form.
//!
//! Graphs are sets of triples kept in a `BTreeSet`, so iteration order and
//! therefore the serialized form are canonical for a given set of triples.
//! Entity tags are computed over that form.
//!
//! The reader accepts the line-oriented subset of Turtle that N-Triples
//! defines, plus the `a` keyword for `rdf:type` and IRIs relative to the
//! resource URI (`<>`, `<#frag>`, `<child>`). Everything written is valid
//! N-Triples and therefore valid Turtle.

use std::collections::BTreeSet;
use std::fmt;

use url::Url;

use crate::vocab;

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// The IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                f.write_str("\"")?;
                for c in value.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")
                } else {
                    match datatype.as_deref() {
                        Some(dt) if dt != vocab::XSD_STRING => write!(f, "^^<{dt}>"),
                        _ => Ok(()),
                    }
                }
            }
        }
    }
}

/// A subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A set of triples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple; returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn remove(&mut self, triple: &Triple) -> bool {
        self.triples.remove(triple)
    }

    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Triple> {
        self.triples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Objects of every triple matching `(subject, predicate, _)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate.as_iri() == Some(predicate))
            .map(|t| &t.object)
    }

    /// First object of `(subject, predicate, _)`, if any.
    #[must_use]
    pub fn object<'a>(&'a self, subject: &'a Term, predicate: &'a str) -> Option<&'a Term> {
        self.objects(subject, predicate).next()
    }

    /// Keep only the triples for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Triple) -> bool) {
        self.triples.retain(keep);
    }

    /// Serialize as N-Triples, one statement per line.
    #[must_use]
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for triple in &self.triples {
            out.push_str(&triple.to_string());
            out.push('\n');
        }
        out
    }

    /// Parse an N-Triples document, resolving relative IRIs against `base`.
    pub fn parse_ntriples(input: &str, base: &Url) -> Result<Graph, GraphError> {
        let mut graph = Graph::new();
        for (idx, line) in input.lines().enumerate() {
            let line_no = idx + 1;
            let mut parser = LineParser {
                rest: line.trim(),
                base,
                line: line_no,
            };
            if parser.rest.is_empty() || parser.rest.starts_with('#') {
                continue;
            }
            let subject = parser.subject()?;
            let predicate = parser.predicate()?;
            let object = parser.object()?;
            parser.end()?;
            graph.insert(Triple::new(subject, predicate, object));
        }
        Ok(graph)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

/// An N-Triples syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RDF syntax error on line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for GraphError {}

struct LineParser<'a> {
    rest: &'a str,
    base: &'a Url,
    line: usize,
}

impl<'a> LineParser<'a> {
    fn error(&self, message: impl Into<String>) -> GraphError {
        GraphError {
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn subject(&mut self) -> Result<Term, GraphError> {
        self.skip_ws();
        match self.rest.chars().next() {
            Some('<') => self.iri(),
            Some('_') => self.blank(),
            _ => Err(self.error("expected IRI or blank node as subject")),
        }
    }

    fn predicate(&mut self) -> Result<Term, GraphError> {
        self.skip_ws();
        if let Some(rest) = self.rest.strip_prefix('a') {
            if rest.starts_with(char::is_whitespace) {
                self.rest = rest;
                return Ok(Term::iri(vocab::RDF_TYPE));
            }
        }
        match self.rest.chars().next() {
            Some('<') => self.iri(),
            _ => Err(self.error("expected IRI as predicate")),
        }
    }

    fn object(&mut self) -> Result<Term, GraphError> {
        self.skip_ws();
        match self.rest.chars().next() {
            Some('<') => self.iri(),
            Some('_') => self.blank(),
            Some('"') => self.literal(),
            _ => Err(self.error("expected IRI, blank node or literal as object")),
        }
    }

    fn end(&mut self) -> Result<(), GraphError> {
        self.skip_ws();
        let Some(rest) = self.rest.strip_prefix('.') else {
            return Err(self.error("expected '.' at end of statement"));
        };
        let rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('#') {
            Ok(())
        } else {
            Err(self.error("unexpected content after '.'"))
        }
    }

    fn iri(&mut self) -> Result<Term, GraphError> {
        let rest: &'a str = self.rest;
        let body = &rest[1..];
        let Some(end) = body.find('>') else {
            return Err(self.error("unterminated IRI"));
        };
        let raw = &body[..end];
        self.rest = &body[end + 1..];
        let resolved = self
            .base
            .join(raw)
            .map_err(|e| self.error(format!("invalid IRI <{raw}>: {e}")))?;
        Ok(Term::Iri(resolved.into()))
    }

    fn blank(&mut self) -> Result<Term, GraphError> {
        let rest: &'a str = self.rest;
        let Some(body) = rest.strip_prefix("_:") else {
            return Err(self.error("expected '_:' blank node"));
        };
        let end = body
            .find(|c: char| c.is_whitespace() || c == '.')
            .unwrap_or(body.len());
        if end == 0 {
            return Err(self.error("empty blank node label"));
        }
        let label = body[..end].to_string();
        self.rest = &body[end..];
        Ok(Term::Blank(label))
    }

    fn literal(&mut self) -> Result<Term, GraphError> {
        let rest: &'a str = self.rest;
        let mut value = String::new();
        let mut chars = rest[1..].char_indices();
        let mut close = None;
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    close = Some(i);
                    break;
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '"')) => value.push('"'),
                    Some((_, '\\')) => value.push('\\'),
                    Some((_, 'u')) => value.push(self.unicode_escape(&mut chars, 4)?),
                    Some((_, 'U')) => value.push(self.unicode_escape(&mut chars, 8)?),
                    _ => return Err(self.error("invalid escape sequence in literal")),
                },
                other => value.push(other),
            }
        }
        let Some(close) = close else {
            return Err(self.error("unterminated literal"));
        };
        self.rest = &rest[1 + close + 1..];

        if let Some(rest) = self.rest.strip_prefix('@') {
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
                .unwrap_or(rest.len());
            if end == 0 {
                return Err(self.error("empty language tag"));
            }
            let language = rest[..end].to_ascii_lowercase();
            self.rest = &rest[end..];
            return Ok(Term::Literal {
                value,
                datatype: None,
                language: Some(language),
            });
        }

        if let Some(rest) = self.rest.strip_prefix("^^") {
            self.rest = rest;
            if !self.rest.starts_with('<') {
                return Err(self.error("expected datatype IRI after '^^'"));
            }
            let datatype = match self.iri()? {
                Term::Iri(iri) => iri,
                _ => return Err(self.error("expected datatype IRI after '^^'")),
            };
            let datatype = (datatype != vocab::XSD_STRING).then_some(datatype);
            return Ok(Term::Literal {
                value,
                datatype,
                language: None,
            });
        }

        Ok(Term::literal(value))
    }

    fn unicode_escape(
        &self,
        chars: &mut std::str::CharIndices<'_>,
        len: usize,
    ) -> Result<char, GraphError> {
        let hex: String = chars.by_ref().take(len).map(|(_, c)| c).collect();
        if hex.len() != len {
            return Err(self.error("truncated unicode escape"));
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(format!("invalid unicode escape \\u{hex}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8080/things/a").unwrap()
    }

    #[test]
    fn test_parse_simple_statement() {
        let g = Graph::parse_ntriples(
            "<http://ex/s> <http://ex/p> <http://ex/o> .\n",
            &base(),
        )
        .unwrap();
        assert_eq!(g.len(), 1);
        let t = g.iter().next().unwrap();
        assert_eq!(t.subject, Term::iri("http://ex/s"));
        assert_eq!(t.object, Term::iri("http://ex/o"));
    }

    #[test]
    fn test_relative_iris_resolve_against_base() {
        let g = Graph::parse_ntriples("<> a <#Thing> .", &base()).unwrap();
        let t = g.iter().next().unwrap();
        assert_eq!(t.subject, Term::iri("http://localhost:8080/things/a"));
        assert_eq!(t.predicate, Term::iri(vocab::RDF_TYPE));
        assert_eq!(t.object, Term::iri("http://localhost:8080/things/a#Thing"));
    }

    #[test]
    fn test_literals_with_language_and_datatype() {
        let input = concat!(
            "<http://ex/s> <http://ex/p> \"chat\"@FR .\n",
            "<http://ex/s> <http://ex/q> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
            "<http://ex/s> <http://ex/r> \"plain\"^^<http://www.w3.org/2001/XMLSchema#string> .\n",
        );
        let g = Graph::parse_ntriples(input, &base()).unwrap();
        let s = Term::iri("http://ex/s");
        assert_eq!(
            g.object(&s, "http://ex/p"),
            Some(&Term::Literal {
                value: "chat".into(),
                datatype: None,
                language: Some("fr".into()),
            })
        );
        assert_eq!(g.object(&s, "http://ex/r"), Some(&Term::literal("plain")));
    }

    #[test]
    fn test_escapes_survive_serialization() {
        let mut g = Graph::new();
        g.insert(Triple::new(
            Term::iri("http://ex/s"),
            Term::iri("http://ex/p"),
            Term::literal("line\n\"quoted\" \\ é"),
        ));
        let text = g.to_ntriples();
        assert!(text.contains(r#""line\n\"quoted\" \\ é""#));
        let back = Graph::parse_ntriples(&text, &base()).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_unicode_escape() {
        let g = Graph::parse_ntriples(r#"<http://ex/s> <http://ex/p> "\u00E9" ."#, &base()).unwrap();
        let t = g.iter().next().unwrap();
        assert_eq!(t.object, Term::literal("é"));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let input = "# header\n\n_:b0 <http://ex/p> \"x\" . # trailing\n";
        let g = Graph::parse_ntriples(input, &base()).unwrap();
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_syntax_errors_report_line() {
        let err = Graph::parse_ntriples("<http://ex/s> <http://ex/p> <http://ex/o> .\n<http://ex/s> <http://ex/p>", &base())
            .unwrap_err();
        assert_eq!(err.line, 2);

        let err = Graph::parse_ntriples("@prefix ex: <http://ex/> .", &base()).unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_serialization_is_canonical() {
        let a: Graph = [
            Triple::new(Term::iri("http://ex/b"), Term::iri("http://ex/p"), Term::literal("2")),
            Triple::new(Term::iri("http://ex/a"), Term::iri("http://ex/p"), Term::literal("1")),
        ]
        .into_iter()
        .collect();
        let b: Graph = a.iter().rev().cloned().collect();
        assert_eq!(a.to_ntriples(), b.to_ntriples());
        assert!(a.to_ntriples().starts_with("<http://ex/a>"));
    }
}
