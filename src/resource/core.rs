use sha2::{Digest, Sha256};

use super::ResourceKind;
use crate::dispatcher::Body;
use crate::graph::{Graph, Term, Triple};
use crate::vocab;

/// What a resource holds, by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Baseline resources carry nothing
    None,
    /// RDF sources and containers carry a graph
    Graph(Graph),
    /// Non-RDF sources carry opaque bytes and their media type
    Binary { bytes: Vec<u8>, content_type: String },
}

/// An LDP resource instance: a URI, an immutable kind, and its content.
///
/// Instances handed out by a repository are snapshots; changes are written
/// back through the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    uri: String,
    kind: ResourceKind,
    content: Content,
    exists: bool,
}

impl Resource {
    /// A new, not yet stored resource with empty content of the right shape.
    pub fn new(uri: impl Into<String>, kind: ResourceKind) -> Self {
        let content = if kind.is_rdf_source() {
            Content::Graph(Graph::new())
        } else if kind.is_non_rdf_source() {
            Content::Binary {
                bytes: Vec::new(),
                content_type: vocab::OCTET_STREAM.to_string(),
            }
        } else {
            Content::None
        };
        Self {
            uri: uri.into(),
            kind,
            content,
            exists: false,
        }
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// False until the resource has been stored.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub(crate) fn mark_stored(&mut self) {
        self.exists = true;
    }

    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    #[must_use]
    pub fn is_rdf_source(&self) -> bool {
        self.kind.is_rdf_source()
    }

    #[must_use]
    pub fn is_non_rdf_source(&self) -> bool {
        self.kind.is_non_rdf_source()
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The graph of an RDF-bearing resource.
    #[must_use]
    pub fn graph(&self) -> Option<&Graph> {
        match &self.content {
            Content::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn graph_mut(&mut self) -> Option<&mut Graph> {
        match &mut self.content {
            Content::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    /// Replace the graph. Ignored unless the kind is RDF-bearing.
    pub fn set_graph(&mut self, graph: Graph) {
        if self.kind.is_rdf_source() {
            self.content = Content::Graph(graph);
        }
    }

    /// Replace the binary payload. Ignored unless the kind is NonRDFSource.
    pub fn set_binary(&mut self, bytes: Vec<u8>, content_type: impl Into<String>) {
        if self.kind.is_non_rdf_source() {
            self.content = Content::Binary {
                bytes,
                content_type: content_type.into(),
            };
        }
    }

    /// Media type of a NonRDFSource payload.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        match &self.content {
            Content::Binary { content_type, .. } => Some(content_type),
            _ => None,
        }
    }

    /// URIs this container lists through `ldp:contains`.
    #[must_use]
    pub fn contained(&self) -> Vec<String> {
        let subject = Term::iri(self.uri.as_str());
        self.graph()
            .map(|g| {
                g.objects(&subject, vocab::CONTAINS)
                    .filter_map(Term::as_iri)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The `<self> ldp:contains <child>` statement.
    #[must_use]
    pub fn containment_triple(&self, child: &str) -> Triple {
        Triple::new(
            Term::iri(self.uri.as_str()),
            Term::iri(vocab::CONTAINS),
            Term::iri(child),
        )
    }

    /// Entity tag: weak over the canonical N-Triples of a graph, strong over
    /// the bytes of a binary payload.
    #[must_use]
    pub fn etag(&self) -> String {
        match &self.content {
            Content::Graph(graph) => format!("W/\"{}\"", sha256_hex(graph.to_ntriples().as_bytes())),
            Content::Binary { bytes, .. } => format!("\"{}\"", sha256_hex(bytes)),
            Content::None => format!("W/\"{}\"", sha256_hex(self.uri.as_bytes())),
        }
    }

    /// Consume the instance and produce what goes on the wire: the graph for
    /// RDF-bearing kinds, the bytes for NonRDFSource, nothing otherwise.
    #[must_use]
    pub fn to_response_body(self) -> Body {
        match self.content {
            Content::Graph(graph) => Body::Graph(graph),
            Content::Binary { bytes, .. } => Body::Bytes(bytes),
            Content::None => Body::Empty,
        }
    }
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_content_matches_kind() {
        let r = Resource::new("http://h/r", ResourceKind::RdfSource);
        assert!(r.graph().is_some());
        assert!(!r.exists());

        let b = Resource::new("http://h/b", ResourceKind::NonRdfSource);
        assert_eq!(b.content_type(), Some(vocab::OCTET_STREAM));
        assert!(b.graph().is_none());

        let base = Resource::new("http://h/x", ResourceKind::Resource);
        assert_eq!(base.content(), &Content::None);
    }

    #[test]
    fn test_set_graph_ignored_for_binary() {
        let mut b = Resource::new("http://h/b", ResourceKind::NonRdfSource);
        b.set_graph(Graph::new());
        assert!(b.graph().is_none());
    }

    #[test]
    fn test_etag_tracks_content() {
        let mut r = Resource::new("http://h/r", ResourceKind::RdfSource);
        let before = r.etag();
        assert!(before.starts_with("W/\""));
        r.graph_mut().unwrap().insert(Triple::new(
            Term::iri("http://h/r"),
            Term::iri("http://ex/p"),
            Term::literal("v"),
        ));
        assert_ne!(before, r.etag());

        let mut b = Resource::new("http://h/b", ResourceKind::NonRdfSource);
        b.set_binary(b"hello".to_vec(), "text/plain");
        assert!(b.etag().starts_with('"'));
    }

    #[test]
    fn test_response_body_by_kind() {
        let r = Resource::new("http://h/r", ResourceKind::Container);
        assert!(matches!(r.to_response_body(), Body::Graph(_)));

        let mut b = Resource::new("http://h/b", ResourceKind::NonRdfSource);
        b.set_binary(b"abc".to_vec(), "text/plain");
        assert_eq!(b.to_response_body(), Body::Bytes(b"abc".to_vec()));

        let base = Resource::new("http://h/x", ResourceKind::Resource);
        assert_eq!(base.to_response_body(), Body::Empty);
    }

    #[test]
    fn test_contained() {
        let mut c = Resource::new("http://h/c", ResourceKind::Container);
        let t = c.containment_triple("http://h/c/1");
        c.graph_mut().unwrap().insert(t);
        assert_eq!(c.contained(), vec!["http://h/c/1".to_string()]);
    }
}
