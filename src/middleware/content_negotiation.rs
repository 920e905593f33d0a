use tracing::debug;

use super::{Middleware, Next};
use crate::dispatcher::{Body, LdpRequest, LdpResponse};
use crate::error::RequestError;
use crate::vocab;

/// Serializes graph bodies into the media type the client accepts.
///
/// The served default, used for a missing `Accept` or `*/*`, is
/// `text/turtle` unless configured otherwise. Graphs that cannot be served
/// in any accepted type become `406`. Other bodies pass through.
pub struct ContentNegotiationMiddleware {
    /// RDF media types in preference order, default first
    offered: Vec<&'static str>,
}

impl Default for ContentNegotiationMiddleware {
    fn default() -> Self {
        Self::new(vocab::TEXT_TURTLE)
    }
}

impl ContentNegotiationMiddleware {
    /// `default` must be one of the RDF media types; anything else keeps
    /// `text/turtle` as the default.
    #[must_use]
    pub fn new(default: &str) -> Self {
        let mut offered = vocab::RDF_MEDIA_TYPES.to_vec();
        if let Some(pos) = offered
            .iter()
            .position(|mt| mt.eq_ignore_ascii_case(default))
        {
            let preferred = offered.remove(pos);
            offered.insert(0, preferred);
        }
        Self { offered }
    }

    #[must_use]
    pub fn default_type(&self) -> &'static str {
        self.offered.first().copied().unwrap_or(vocab::TEXT_TURTLE)
    }
}

impl Middleware for ContentNegotiationMiddleware {
    fn call(&self, req: &LdpRequest, next: Next<'_>) -> Result<LdpResponse, RequestError> {
        let mut res = next.run(req)?;
        let accept = req.get_header("accept");

        match res.body {
            Body::Graph(_) => {
                let Some(media_type) = negotiate(accept, &self.offered) else {
                    debug!(accept = ?accept, "no acceptable RDF media type");
                    return Ok(RequestError::NotAcceptable(format!(
                        "cannot serve {} as any of: {}",
                        req.path,
                        accept.unwrap_or_default()
                    ))
                    .into_response());
                };
                res.set_header("Content-Type", media_type.to_string());
                let body = std::mem::replace(&mut res.body, Body::Empty);
                res.body = Body::Bytes(body.into_bytes());
            }
            // HEAD on an RDF source still reports the type GET would serve
            Body::Empty
                if res.status < 300
                    && res.get_header("content-type").is_none()
                    && res.get_header("vary").is_some() =>
            {
                if let Some(media_type) = negotiate(accept, &self.offered) {
                    res.set_header("Content-Type", media_type.to_string());
                }
            }
            Body::Bytes(_) if res.status >= 400 && res.get_header("content-type").is_none() => {
                res.set_header("Content-Type", "text/plain; charset=utf-8".to_string());
            }
            _ => {}
        }
        Ok(res)
    }
}

/// Pick the offered media type the `Accept` header ranks highest.
///
/// Each offered type takes the `q` of the most specific matching range
/// (`type/subtype` over `type/*` over `*/*`). Ties go to the earlier
/// offered type. A missing or empty header accepts the first offer.
#[must_use]
pub fn negotiate(accept: Option<&str>, offered: &[&'static str]) -> Option<&'static str> {
    let ranges = match accept.map(str::trim) {
        None | Some("") => return offered.first().copied(),
        Some(value) => parse_accept(value),
    };

    let mut best: Option<(&'static str, f32)> = None;
    for &mt in offered {
        let Some(q) = quality(&ranges, mt) else {
            continue;
        };
        if q <= 0.0 {
            continue;
        }
        if best.map_or(true, |(_, best_q)| q > best_q) {
            best = Some((mt, q));
        }
    }
    best.map(|(mt, _)| mt)
}

struct MediaRange {
    kind: String,
    subtype: String,
    q: f32,
}

fn parse_accept(value: &str) -> Vec<MediaRange> {
    value
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';').map(str::trim);
            let range = params.next()?.to_ascii_lowercase();
            let (kind, subtype) = range.split_once('/')?;
            let q = params
                .filter_map(|p| p.split_once('='))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("q"))
                .and_then(|(_, v)| v.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange {
                kind: kind.to_string(),
                subtype: subtype.to_string(),
                q,
            })
        })
        .collect()
}

fn quality(ranges: &[MediaRange], media_type: &str) -> Option<f32> {
    let (kind, subtype) = media_type.split_once('/')?;
    ranges
        .iter()
        .filter_map(|r| {
            let specificity = match (r.kind.as_str(), r.subtype.as_str()) {
                (k, s) if k == kind && s == subtype => 2,
                (k, "*") if k == kind => 1,
                ("*", "*") => 0,
                _ => return None,
            };
            Some((specificity, r.q))
        })
        .max_by_key(|(specificity, _)| *specificity)
        .map(|(_, q)| q)
}
