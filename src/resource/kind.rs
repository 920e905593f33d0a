use std::fmt;

use serde::Serialize;

use crate::vocab;

/// The LDP interaction model a resource was created with.
///
/// A resource's kind is fixed at creation. Everything the server decides
/// per kind (capability flags, advertised `rel="type"` links, the handler
/// table) is derived from this value; nothing is stored alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ResourceKind {
    /// Baseline LDP resource with no RDF or binary capability
    Resource,
    #[serde(rename = "RDFSource")]
    RdfSource,
    /// Basic container
    Container,
    DirectContainer,
    IndirectContainer,
    #[serde(rename = "NonRDFSource")]
    NonRdfSource,
}

/// Capability flags reported by a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub container: bool,
    pub rdf_source: bool,
    pub non_rdf_source: bool,
}

impl ResourceKind {
    /// Every kind, baseline first.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Resource,
        ResourceKind::RdfSource,
        ResourceKind::Container,
        ResourceKind::DirectContainer,
        ResourceKind::IndirectContainer,
        ResourceKind::NonRdfSource,
    ];

    /// The capability table. New kinds are added here and nowhere else.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            ResourceKind::Resource => Capabilities {
                container: false,
                rdf_source: false,
                non_rdf_source: false,
            },
            ResourceKind::RdfSource => Capabilities {
                container: false,
                rdf_source: true,
                non_rdf_source: false,
            },
            ResourceKind::Container
            | ResourceKind::DirectContainer
            | ResourceKind::IndirectContainer => Capabilities {
                container: true,
                rdf_source: true,
                non_rdf_source: false,
            },
            ResourceKind::NonRdfSource => Capabilities {
                container: false,
                rdf_source: false,
                non_rdf_source: true,
            },
        }
    }

    /// Every kind is an LDP resource.
    #[must_use]
    pub const fn is_ldp_resource(self) -> bool {
        true
    }

    #[must_use]
    pub const fn is_container(self) -> bool {
        self.capabilities().container
    }

    #[must_use]
    pub const fn is_rdf_source(self) -> bool {
        self.capabilities().rdf_source
    }

    #[must_use]
    pub const fn is_non_rdf_source(self) -> bool {
        self.capabilities().non_rdf_source
    }

    /// The most specific interaction model URI for this kind.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            ResourceKind::Resource => vocab::RESOURCE,
            ResourceKind::RdfSource => vocab::RDF_SOURCE,
            ResourceKind::Container => vocab::BASIC_CONTAINER,
            ResourceKind::DirectContainer => vocab::DIRECT_CONTAINER,
            ResourceKind::IndirectContainer => vocab::INDIRECT_CONTAINER,
            ResourceKind::NonRdfSource => vocab::NON_RDF_SOURCE,
        }
    }

    /// Interaction model URIs advertised as `rel="type"` links, general to
    /// specific.
    #[must_use]
    pub const fn type_links(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Resource => &[vocab::RESOURCE],
            ResourceKind::RdfSource => &[vocab::RESOURCE, vocab::RDF_SOURCE],
            ResourceKind::Container => &[
                vocab::RESOURCE,
                vocab::RDF_SOURCE,
                vocab::CONTAINER,
                vocab::BASIC_CONTAINER,
            ],
            ResourceKind::DirectContainer => &[
                vocab::RESOURCE,
                vocab::RDF_SOURCE,
                vocab::CONTAINER,
                vocab::DIRECT_CONTAINER,
            ],
            ResourceKind::IndirectContainer => &[
                vocab::RESOURCE,
                vocab::RDF_SOURCE,
                vocab::CONTAINER,
                vocab::INDIRECT_CONTAINER,
            ],
            ResourceKind::NonRdfSource => &[vocab::RESOURCE, vocab::NON_RDF_SOURCE],
        }
    }

    /// Short name as used in the LDP vocabulary.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Resource => "Resource",
            ResourceKind::RdfSource => "RDFSource",
            ResourceKind::Container => "Container",
            ResourceKind::DirectContainer => "DirectContainer",
            ResourceKind::IndirectContainer => "IndirectContainer",
            ResourceKind::NonRdfSource => "NonRDFSource",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
