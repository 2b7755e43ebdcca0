//! Exchange graph: the triple set submitted to a repository.
//!
//! Triples are held in a [`BTreeSet`], ordered by subject, relation, then
//! object (IRIs before literals). Iteration order is therefore a pure
//! function of the triple set, which makes serialization byte-stable.

use std::collections::BTreeSet;

use crate::error::GraphError;
use crate::model::iris::XSD_STRING;

/// A literal value. Two literals are distinct if any component differs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    text: String,
    language: Option<String>,
    datatype: Option<String>,
}

impl Literal {
    /// A plain literal without language or datatype.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged literal. Tags are stored lowercase.
    #[must_use]
    pub fn lang(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: Some(language.into().to_ascii_lowercase()),
            datatype: None,
        }
    }

    /// A typed literal. `xsd:string` is normalized to a plain literal.
    #[must_use]
    pub fn typed(text: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            text: text.into(),
            language: None,
            datatype: (datatype != XSD_STRING).then_some(datatype),
        }
    }

    /// Lexical form.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Language tag, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Datatype IRI, if the literal is typed.
    #[must_use]
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Object {
    /// An IRI reference.
    Iri(String),
    /// A literal value.
    Literal(Literal),
}

impl Object {
    /// Returns the IRI if this object is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Object::Iri(iri) => Some(iri),
            Object::Literal(_) => None,
        }
    }

    /// Returns the literal if this object is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Object::Iri(_) => None,
            Object::Literal(literal) => Some(literal),
        }
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Object::Literal(literal)
    }
}

/// One `(subject, relation, object)` statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    /// Subject IRI.
    pub subject: String,
    /// Relation IRI.
    pub relation: String,
    /// Object term.
    pub object: Object,
}

/// An unordered set of triples with a stable iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeGraph {
    triples: BTreeSet<Triple>,
}

impl ExchangeGraph {
    /// An empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns false if it was already present.
    pub fn insert(
        &mut self,
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: Object,
    ) -> bool {
        self.triples.insert(Triple {
            subject: subject.into(),
            relation: relation.into(),
            object,
        })
    }

    /// Adds an already-built triple.
    pub fn insert_triple(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Merges every triple of `other` into this graph.
    pub fn merge(&mut self, other: ExchangeGraph) {
        self.triples.extend(other.triples);
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates triples in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Returns true if the exact triple is present.
    #[must_use]
    pub fn contains(&self, subject: &str, relation: &str, object: &Object) -> bool {
        self.triples.iter().any(|t| {
            t.subject == subject && t.relation == relation && &t.object == object
        })
    }

    /// Distinct subjects in canonical order.
    #[must_use]
    pub fn subjects(&self) -> BTreeSet<&str> {
        self.triples.iter().map(|t| t.subject.as_str()).collect()
    }

    /// Triples describing `subject`.
    pub fn describe<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| t.subject == subject)
    }

    /// Objects of `(subject, relation, _)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        relation: &'a str,
    ) -> impl Iterator<Item = &'a Object> + 'a {
        self.describe(subject)
            .filter(move |t| t.relation == relation)
            .map(|t| &t.object)
    }
}

impl<'a> IntoIterator for &'a ExchangeGraph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

impl FromIterator<Triple> for ExchangeGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

/// Returns true if `value` is an absolute IRI.
#[must_use]
pub fn is_absolute_iri(value: &str) -> bool {
    sophia_iri::Iri::new(value).is_ok()
}

/// Returns true if `tag` is a language tag Turtle and N-Triples can carry:
/// an alphabetic primary subtag, then alphanumeric subtags joined by `-`.
#[must_use]
pub fn is_language_tag(tag: &str) -> bool {
    let primary = tag.split('-').next().unwrap_or_default();
    primary.chars().all(|c| c.is_ascii_alphabetic())
        && sophia_api::term::LanguageTag::new(tag).is_ok()
}

/// Checks that `subject` is usable as a record subject.
///
/// # Errors
///
/// Returns [`GraphError::InvalidSubject`] if it is not an absolute IRI.
pub fn check_subject(subject: &str) -> Result<(), GraphError> {
    if is_absolute_iri(subject) {
        Ok(())
    } else {
        Err(GraphError::InvalidSubject(subject.to_owned()))
    }
}
