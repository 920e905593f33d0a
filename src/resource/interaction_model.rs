//! Interaction model resolution.
//!
//! A creation request names the kind it wants through `Link: <uri>;
//! rel="type"` entries. Resolution looks only at the set of requested URIs:
//! it is a pure function with no access to server state.

use std::collections::HashSet;

use tracing::debug;

use super::ResourceKind;
use crate::error::RequestError;
use crate::link_header::LinkEntry;
use crate::vocab;

/// Interaction model URIs in ascending preference order. When a request
/// names several, the one appearing last here wins.
pub static INTERACTION_MODELS: [(&str, ResourceKind); 7] = [
    (vocab::RESOURCE, ResourceKind::RdfSource),
    (vocab::RDF_SOURCE, ResourceKind::RdfSource),
    (vocab::CONTAINER, ResourceKind::Container),
    (vocab::BASIC_CONTAINER, ResourceKind::Container),
    (vocab::DIRECT_CONTAINER, ResourceKind::DirectContainer),
    (vocab::INDIRECT_CONTAINER, ResourceKind::IndirectContainer),
    (vocab::NON_RDF_SOURCE, ResourceKind::NonRdfSource),
];

/// URIs that declare RDF content and cannot be combined with NonRDFSource.
static RDF_BEARING: [&str; 5] = [
    vocab::RDF_SOURCE,
    vocab::CONTAINER,
    vocab::BASIC_CONTAINER,
    vocab::DIRECT_CONTAINER,
    vocab::INDIRECT_CONTAINER,
];

/// Kind used when a request names no recognized interaction model.
pub const DEFAULT_KIND: ResourceKind = ResourceKind::RdfSource;

/// Resolve the kind requested by a request's parsed `Link` entries.
///
/// Only entries with `rel="type"` are considered.
///
/// # Errors
///
/// `NotAcceptable` when NonRDFSource is requested together with an
/// RDF-bearing interaction model.
pub fn resolve<'a, I>(links: I) -> Result<ResourceKind, RequestError>
where
    I: IntoIterator<Item = &'a LinkEntry>,
{
    let requested: HashSet<&str> = links
        .into_iter()
        .filter(|link| link.rel_is("type"))
        .map(|link| link.target.as_str())
        .collect();
    resolve_types(&requested)
}

/// Resolve the kind for a set of requested type URIs.
///
/// URIs are compared exactly; unknown URIs are ignored.
///
/// # Errors
///
/// `NotAcceptable` on a NonRDFSource / RDF-bearing conflict.
pub fn resolve_types(requested: &HashSet<&str>) -> Result<ResourceKind, RequestError> {
    let Some((uri, kind)) = INTERACTION_MODELS
        .iter()
        .rev()
        .find(|(uri, _)| requested.contains(uri))
    else {
        return Ok(DEFAULT_KIND);
    };

    if *kind == ResourceKind::NonRdfSource {
        if let Some(conflict) = RDF_BEARING.iter().find(|u| requested.contains(*u)) {
            debug!(conflict = %conflict, "NonRDFSource requested with RDF interaction model");
            return Err(RequestError::NotAcceptable(format!(
                "{} cannot be combined with {conflict}: a resource is either RDF or binary",
                vocab::NON_RDF_SOURCE
            )));
        }
    }

    debug!(interaction_model = %uri, kind = %kind, "resolved interaction model");
    Ok(*kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<'a>(uris: &[&'a str]) -> HashSet<&'a str> {
        uris.iter().copied().collect()
    }

    #[test]
    fn test_empty_defaults_to_rdf_source() {
        assert_eq!(resolve_types(&HashSet::new()), Ok(ResourceKind::RdfSource));
    }

    #[test]
    fn test_each_uri_maps_to_its_kind() {
        for (uri, kind) in INTERACTION_MODELS {
            assert_eq!(resolve_types(&set(&[uri])), Ok(kind), "{uri}");
        }
    }

    #[test]
    fn test_specific_wins() {
        assert_eq!(
            resolve_types(&set(&[vocab::RESOURCE, vocab::BASIC_CONTAINER])),
            Ok(ResourceKind::Container)
        );
        assert_eq!(
            resolve_types(&set(&[vocab::CONTAINER, vocab::DIRECT_CONTAINER])),
            Ok(ResourceKind::DirectContainer)
        );
    }

    #[test]
    fn test_non_rdf_with_generic_resource_is_allowed() {
        assert_eq!(
            resolve_types(&set(&[vocab::RESOURCE, vocab::NON_RDF_SOURCE])),
            Ok(ResourceKind::NonRdfSource)
        );
    }

    #[test]
    fn test_non_rdf_conflicts() {
        for rdf in RDF_BEARING {
            let err = resolve_types(&set(&[vocab::NON_RDF_SOURCE, rdf])).unwrap_err();
            assert_eq!(err.status(), 406, "{rdf}");
        }
    }

    #[test]
    fn test_unknown_and_miscased_uris_are_ignored() {
        assert_eq!(
            resolve_types(&set(&["http://example.org/Other", vocab::BASIC_CONTAINER])),
            Ok(ResourceKind::Container)
        );
        assert_eq!(
            resolve_types(&set(&["http://www.w3.org/ns/ldp#basiccontainer"])),
            Ok(DEFAULT_KIND)
        );
    }

    #[test]
    fn test_only_type_links_count() {
        let links = vec![
            LinkEntry::new(vocab::BASIC_CONTAINER, "describedby"),
            LinkEntry::new(vocab::DIRECT_CONTAINER, "TYPE"),
        ];
        assert_eq!(resolve(&links), Ok(ResourceKind::DirectContainer));
    }
}
