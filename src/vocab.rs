//! IRIs of the LDP and RDF vocabularies used by the server.

/// LDP namespace IRI prefix.
pub const LDP_NS: &str = "http://www.w3.org/ns/ldp#";

// Interaction models
pub const RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
pub const RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";
pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
pub const DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
pub const INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";
pub const NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";

// Containment and membership
pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
pub const MEMBERSHIP_RESOURCE: &str = "http://www.w3.org/ns/ldp#membershipResource";
pub const HAS_MEMBER_RELATION: &str = "http://www.w3.org/ns/ldp#hasMemberRelation";
pub const INSERTED_CONTENT_RELATION: &str = "http://www.w3.org/ns/ldp#insertedContentRelation";
pub const MEMBER_SUBJECT: &str = "http://www.w3.org/ns/ldp#MemberSubject";
pub const MEMBER: &str = "http://www.w3.org/ns/ldp#member";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

// Media types
pub const TEXT_TURTLE: &str = "text/turtle";
pub const N_TRIPLES: &str = "application/n-triples";
pub const TEXT_PLAIN: &str = "text/plain";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// RDF media types the server can serialize a graph to, default first.
/// `text/plain` is the legacy N-Triples type and is only ever written.
pub const RDF_MEDIA_TYPES: [&str; 3] = [TEXT_TURTLE, N_TRIPLES, TEXT_PLAIN];

/// Returns true if `media_type` (without parameters) names an RDF syntax the
/// server accepts in request bodies.
pub fn is_rdf_media_type(media_type: &str) -> bool {
    media_type.eq_ignore_ascii_case(TEXT_TURTLE) || media_type.eq_ignore_ascii_case(N_TRIPLES)
}
