//! Per-kind method handlers.
//!
//! Every kind answers `GET`, `HEAD` and `OPTIONS`. RDF and non-RDF sources
//! add `PUT` and `DELETE`; containers add `POST`. No kind registers `PATCH`.

use std::collections::HashMap;

use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};
use url::Url;

use super::core::{set_header, Body, Dispatcher, HeaderVec, LdpRequest, LdpResponse};
use crate::error::RequestError;
use crate::graph::{Graph, Term, Triple};
use crate::resource::{interaction_model, Resource, ResourceKind};
use crate::vocab;

/// Signature shared by every method handler.
pub type Handler = fn(
    &Dispatcher,
    Resource,
    u16,
    HeaderVec,
    &LdpRequest,
) -> Result<LdpResponse, RequestError>;

static HANDLERS: Lazy<HashMap<ResourceKind, Vec<(Method, Handler)>>> = Lazy::new(|| {
    ResourceKind::ALL
        .iter()
        .map(|&kind| (kind, handler_table(kind)))
        .collect()
});

static SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]{0,127}$").expect("slug regex should be valid")
});

fn entry(method: Method, handler: Handler) -> (Method, Handler) {
    (method, handler)
}

fn handler_table(kind: ResourceKind) -> Vec<(Method, Handler)> {
    let mut table = vec![
        entry(Method::GET, get),
        entry(Method::HEAD, head),
        entry(Method::OPTIONS, options),
    ];
    if kind.is_rdf_source() || kind.is_non_rdf_source() {
        table.push(entry(Method::PUT, put));
        table.push(entry(Method::DELETE, delete));
    }
    if kind.is_container() {
        table.push(entry(Method::POST, post));
    }
    table
}

/// The handler `kind` registers for `method`, if any.
#[must_use]
pub fn lookup(kind: ResourceKind, method: &Method) -> Option<Handler> {
    HANDLERS
        .get(&kind)?
        .iter()
        .find(|(m, _)| m == method)
        .map(|(_, handler)| *handler)
}

/// Methods `kind` handles, in registration order. Used for `Allow`.
#[must_use]
pub fn allowed_methods(kind: ResourceKind) -> Vec<&'static str> {
    HANDLERS
        .get(&kind)
        .map(|table| table.iter().map(|(m, _)| m.as_str()).collect())
        .unwrap_or_default()
}

/// Kind a creation request asks for.
///
/// Without any `rel="type"` link, a body whose media type is not RDF makes
/// a NonRDFSource; everything else goes through the interaction model
/// resolver.
///
/// # Errors
///
/// `NotAcceptable` for conflicting interaction models.
pub fn creation_kind(req: &LdpRequest) -> Result<ResourceKind, RequestError> {
    if !req.has_type_links() {
        if let Some(ct) = req.content_type() {
            if !vocab::is_rdf_media_type(&ct) {
                return Ok(ResourceKind::NonRdfSource);
            }
        }
    }
    interaction_model::resolve(&req.links)
}

/// Set the headers every response about `resource` carries: type links,
/// `Allow`, `ETag`, and per-kind extras.
pub fn apply_protocol_headers(
    dispatcher: &Dispatcher,
    resource: &Resource,
    headers: &mut HeaderVec,
) {
    let kind = resource.kind();
    let links = kind
        .type_links()
        .iter()
        .map(|uri| format!("<{uri}>; rel=\"type\""))
        .collect::<Vec<_>>()
        .join(", ");
    set_header(headers, "Link", links);
    set_header(headers, "Allow", dispatcher.allowed_methods(resource).join(", "));
    if resource.exists() {
        set_header(headers, "ETag", resource.etag());
    }
    if kind.is_container() {
        set_header(
            headers,
            "Accept-Post",
            format!("{}, {}, */*", vocab::TEXT_TURTLE, vocab::N_TRIPLES),
        );
    }
    if kind.is_rdf_source() {
        set_header(headers, "Vary", "Accept".to_string());
    }
    if let Some(ct) = resource.content_type() {
        set_header(headers, "Content-Type", ct.to_string());
    }
}

fn get(
    _: &Dispatcher,
    resource: Resource,
    status: u16,
    headers: HeaderVec,
    _: &LdpRequest,
) -> Result<LdpResponse, RequestError> {
    Ok(LdpResponse::new(status, headers, Body::Resource(resource)))
}

fn head(
    _: &Dispatcher,
    _: Resource,
    status: u16,
    headers: HeaderVec,
    _: &LdpRequest,
) -> Result<LdpResponse, RequestError> {
    Ok(LdpResponse::new(status, headers, Body::Empty))
}

fn options(
    _: &Dispatcher,
    _: Resource,
    status: u16,
    headers: HeaderVec,
    _: &LdpRequest,
) -> Result<LdpResponse, RequestError> {
    Ok(LdpResponse::new(status, headers, Body::Empty))
}

fn put(
    dispatcher: &Dispatcher,
    mut resource: Resource,
    status: u16,
    mut headers: HeaderVec,
    req: &LdpRequest,
) -> Result<LdpResponse, RequestError> {
    let repo = dispatcher.repository();

    if !resource.exists() {
        load_content(&mut resource, req)?;
        let created = repo.create(resource)?;
        add_to_parent(dispatcher, &created)?;
        info!(uri = %created.uri(), kind = %created.kind(), "created by PUT");
        apply_protocol_headers(dispatcher, &created, &mut headers);
        set_header(&mut headers, "Location", created.uri().to_string());
        return Ok(LdpResponse::new(status, headers, Body::Empty));
    }

    check_precondition(&resource, req)?;
    if req.has_type_links() {
        let requested = interaction_model::resolve(&req.links)?;
        if requested != resource.kind() {
            return Err(RequestError::Conflict(format!(
                "cannot change interaction model of {} from {} to {requested}",
                resource.uri(),
                resource.kind()
            )));
        }
    }

    let containment: Vec<Triple> = resource
        .contained()
        .iter()
        .map(|child| resource.containment_triple(child))
        .collect();
    load_content(&mut resource, req)?;
    if let Some(graph) = resource.graph_mut() {
        graph.extend(containment);
    }

    let stored = repo.replace(resource)?;
    apply_protocol_headers(dispatcher, &stored, &mut headers);
    Ok(LdpResponse::new(status, headers, Body::Empty))
}

fn post(
    dispatcher: &Dispatcher,
    container: Resource,
    _: u16,
    _: HeaderVec,
    req: &LdpRequest,
) -> Result<LdpResponse, RequestError> {
    let repo = dispatcher.repository();
    let kind = creation_kind(req)?;
    let (uri, from_slug) = child_uri(dispatcher, &container, req);
    let child = match new_member(uri, kind, req).and_then(|child| repo.create(child)) {
        // another request took the slug after it was checked
        Err(RequestError::Conflict(_)) if from_slug => {
            debug!(container = %container.uri(), "slug taken concurrently");
            repo.create(new_member(generated_uri(&container), kind, req)?)?
        }
        created => created?,
    };

    let containment = container.containment_triple(child.uri());
    let (local, remote) = split_membership(&container, membership_triples(&container, &child));

    repo.update(container.uri(), &mut |c| {
        if let Some(graph) = c.graph_mut() {
            graph.insert(containment.clone());
            graph.extend(local.iter().cloned());
        }
    })?;
    update_remote_membership(dispatcher, remote, true)?;

    info!(container = %container.uri(), uri = %child.uri(), kind = %kind, "created by POST");
    let mut headers = HeaderVec::new();
    apply_protocol_headers(dispatcher, &child, &mut headers);
    set_header(&mut headers, "Location", child.uri().to_string());
    Ok(LdpResponse::new(201, headers, Body::Empty))
}

fn delete(
    dispatcher: &Dispatcher,
    resource: Resource,
    _: u16,
    _: HeaderVec,
    req: &LdpRequest,
) -> Result<LdpResponse, RequestError> {
    check_precondition(&resource, req)?;
    let repo = dispatcher.repository();
    let removed = repo.delete(resource.uri())?;

    if let Some(parent) = parent_container(dispatcher, removed.uri()) {
        let containment = parent.containment_triple(removed.uri());
        let (local, remote) = split_membership(&parent, membership_triples(&parent, &removed));
        repo.update(parent.uri(), &mut |p| {
            if let Some(graph) = p.graph_mut() {
                graph.remove(&containment);
                for triple in &local {
                    graph.remove(triple);
                }
            }
        })?;
        update_remote_membership(dispatcher, remote, false)?;
    }

    info!(uri = %removed.uri(), "deleted");
    Ok(LdpResponse::new(204, HeaderVec::new(), Body::Empty))
}

/// `If-Match` check. `*` matches any stored resource; tags are compared
/// weakly.
fn check_precondition(resource: &Resource, req: &LdpRequest) -> Result<(), RequestError> {
    let Some(if_match) = req.get_header("if-match") else {
        return Ok(());
    };
    let current = resource.etag();
    let matches = if_match.split(',').map(str::trim).any(|tag| {
        tag == "*" || strip_weak(tag) == strip_weak(&current)
    });
    if matches {
        Ok(())
    } else {
        info!(uri = %resource.uri(), if_match = %if_match, "precondition failed");
        Err(RequestError::PreconditionFailed(format!(
            "If-Match does not match the current entity tag of {}",
            resource.uri()
        )))
    }
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Fill `resource` with the request body as its kind requires.
fn load_content(resource: &mut Resource, req: &LdpRequest) -> Result<(), RequestError> {
    if resource.is_non_rdf_source() {
        let ct = req
            .get_header("content-type")
            .unwrap_or(vocab::OCTET_STREAM)
            .to_string();
        resource.set_binary(req.body.clone(), ct);
        return Ok(());
    }
    if !resource.is_rdf_source() {
        return Ok(());
    }

    let ct = req.content_type();
    if req.body.iter().all(u8::is_ascii_whitespace) && ct.is_none() {
        resource.set_graph(Graph::new());
        return Ok(());
    }
    match ct.as_deref() {
        Some(mt) if vocab::is_rdf_media_type(mt) => {}
        other => {
            return Err(RequestError::UnsupportedMediaType(format!(
                "{} requires an RDF body ({} or {}), got {}",
                resource.kind(),
                vocab::TEXT_TURTLE,
                vocab::N_TRIPLES,
                other.unwrap_or("no content type")
            )))
        }
    }

    let text = std::str::from_utf8(&req.body)
        .map_err(|e| RequestError::BadRequest(format!("RDF body is not UTF-8: {e}")))?;
    let base = Url::parse(resource.uri())
        .map_err(|e| RequestError::BadRequest(format!("invalid resource URI: {e}")))?;
    let mut graph = Graph::parse_ntriples(text, &base).map_err(|e| {
        debug!(error = %e, "unparsable RDF body");
        RequestError::BadRequest(e.to_string())
    })?;
    // containment is server-managed
    graph.retain(|t| t.predicate.as_iri() != Some(vocab::CONTAINS));
    resource.set_graph(graph);
    Ok(())
}

/// A new, unsaved member at `uri` holding the request body.
fn new_member(uri: String, kind: ResourceKind, req: &LdpRequest) -> Result<Resource, RequestError> {
    let mut child = Resource::new(uri, kind);
    load_content(&mut child, req)?;
    Ok(child)
}

fn member_prefix(container: &Resource) -> String {
    let mut prefix = container.uri().to_string();
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

fn generated_uri(container: &Resource) -> String {
    format!(
        "{}{}",
        member_prefix(container),
        ulid::Ulid::new().to_string().to_ascii_lowercase()
    )
}

/// URI for a new member of `container`, and whether it came from the
/// `Slug`. The slug is used when it is a safe path segment that is neither
/// reserved nor in use; otherwise the member gets a fresh ULID.
fn child_uri(dispatcher: &Dispatcher, container: &Resource, req: &LdpRequest) -> (String, bool) {
    if let Some(slug) = req.get_header("slug").map(str::trim) {
        if SLUG.is_match(slug) {
            let candidate = format!("{}{slug}", member_prefix(container));
            // deleted URIs are not reused
            if !dispatcher.is_reserved(&candidate)
                && matches!(
                    dispatcher.repository().find(&candidate),
                    Err(RequestError::NotFound(_))
                )
            {
                return (candidate, true);
            }
            debug!(slug = %slug, "slug already taken");
        }
    }
    (generated_uri(container), false)
}

/// Membership triples a Direct or Indirect container asserts for `child`.
fn membership_triples(container: &Resource, child: &Resource) -> Vec<Triple> {
    let Some(graph) = container.graph() else {
        return Vec::new();
    };
    let subject = Term::iri(container.uri());
    let membership_resource = graph
        .object(&subject, vocab::MEMBERSHIP_RESOURCE)
        .cloned()
        .unwrap_or_else(|| subject.clone());
    let relation = graph
        .object(&subject, vocab::HAS_MEMBER_RELATION)
        .cloned()
        .unwrap_or_else(|| Term::iri(vocab::MEMBER));

    let members: Vec<Term> = match container.kind() {
        ResourceKind::DirectContainer => vec![Term::iri(child.uri())],
        ResourceKind::IndirectContainer => {
            let inserted = graph
                .object(&subject, vocab::INSERTED_CONTENT_RELATION)
                .and_then(Term::as_iri)
                .unwrap_or(vocab::MEMBER_SUBJECT);
            if inserted == vocab::MEMBER_SUBJECT {
                vec![Term::iri(child.uri())]
            } else {
                let child_subject = Term::iri(child.uri());
                child
                    .graph()
                    .map(|g| g.objects(&child_subject, inserted).cloned().collect())
                    .unwrap_or_default()
            }
        }
        _ => Vec::new(),
    };

    members
        .into_iter()
        .map(|m| Triple::new(membership_resource.clone(), relation.clone(), m))
        .collect()
}

/// Split membership triples into those the container asserts about itself
/// and those that belong to another membership resource.
fn split_membership(container: &Resource, triples: Vec<Triple>) -> (Vec<Triple>, Vec<Triple>) {
    triples
        .into_iter()
        .partition(|t| t.subject.as_iri() == Some(container.uri()))
}

/// Add (`insert`) or remove membership triples whose subject is some
/// resource other than the container. Membership resources that are not
/// stored are skipped.
fn update_remote_membership(
    dispatcher: &Dispatcher,
    triples: Vec<Triple>,
    insert: bool,
) -> Result<(), RequestError> {
    let repo = dispatcher.repository();
    for triple in triples {
        let Some(target) = triple.subject.as_iri().map(str::to_string) else {
            continue;
        };
        if !repo.contains(&target) {
            debug!(membership_resource = %target, "membership resource not stored");
            continue;
        }
        repo.update(&target, &mut |r| {
            if let Some(graph) = r.graph_mut() {
                if insert {
                    graph.insert(triple.clone());
                } else {
                    graph.remove(&triple);
                }
            }
        })?;
    }
    Ok(())
}

/// Record a resource created by `PUT` in its parent container, if the
/// parent is a stored container.
fn add_to_parent(dispatcher: &Dispatcher, child: &Resource) -> Result<(), RequestError> {
    let Some(parent) = parent_container(dispatcher, child.uri()) else {
        return Ok(());
    };
    let child_uri = child.uri().to_string();
    dispatcher.repository().update(parent.uri(), &mut |c| {
        let triple = c.containment_triple(&child_uri);
        if let Some(graph) = c.graph_mut() {
            graph.insert(triple);
        }
    })?;
    Ok(())
}

/// The stored container whose path encloses `uri`. Containers created by
/// `POST` have no trailing slash, so both spellings are tried.
fn parent_container(dispatcher: &Dispatcher, uri: &str) -> Option<Resource> {
    let parent = parent_uri(uri)?;
    let bare = parent.trim_end_matches('/').to_string();
    [parent, bare].into_iter().find_map(|candidate| {
        dispatcher
            .repository()
            .find(&candidate)
            .ok()
            .filter(Resource::is_container)
    })
}

/// URI of the containing path: everything up to and including the last `/`
/// before the final segment.
fn parent_uri(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let trimmed = uri.trim_end_matches('/');
    let cut = trimmed.rfind('/')?;
    let parent = &trimmed[..=cut];
    // never climb above the authority
    if parent.len() <= url.origin().ascii_serialization().len() + 1 {
        let root = format!("{}/", url.origin().ascii_serialization());
        return (root != uri).then_some(root);
    }
    Some(parent.to_string())
}
