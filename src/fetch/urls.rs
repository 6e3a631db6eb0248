// src/fetch/urls.rs
use chrono::{DateTime, Utc};
use url::Url;

/// Query parameter carrying the cache-busting timestamp.
pub const CACHE_BUST_PARAM: &str = "v";

/// `endpoint` with `v=<unix seconds>.<micros>` appended. Any earlier `v`
/// is dropped; other query parameters are kept in order.
pub fn with_cache_buster(endpoint: &Url, now: DateTime<Utc>) -> Url {
    let kept: Vec<(String, String)> = endpoint
        .query_pairs()
        .filter(|(k, _)| k != CACHE_BUST_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let stamp = format!("{}.{:06}", now.timestamp(), now.timestamp_subsec_micros());

    let mut url = endpoint.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in &kept {
            query.append_pair(k, v);
        }
        query.append_pair(CACHE_BUST_PARAM, &stamp);
    }
    url
}
