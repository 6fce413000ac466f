// src/matcher/scope.rs
// =============================================================================
// Decides whether a host belongs to the domain being crawled.
//
// A host is in scope when it is the main domain itself or any subdomain of
// it. A leading "www." is ignored on both sides, so www.example.com,
// example.com and blog.example.com are all in scope for example.com.
// =============================================================================

use url::Url;

/// Lower-cases a host and strips one leading "www."
fn normalize_host(host: &str) -> String {
    let host = host.trim().to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

// Returns true if `candidate_host` is `main_domain` or one of its subdomains
//
// Examples (main_domain = "example.com"):
//   "example.com"      -> true
//   "WWW.Example.com"  -> true
//   "blog.example.com" -> true
//   "notexample.com"   -> false
pub fn in_scope(candidate_host: &str, main_domain: &str) -> bool {
    let candidate = normalize_host(candidate_host);
    let domain = normalize_host(main_domain);

    candidate == domain || candidate.ends_with(&format!(".{}", domain))
}

/// Same check for a full URL; URLs without a host are never in scope
pub fn url_in_scope(url: &Url, main_domain: &str) -> bool {
    url.host_str()
        .map(|host| in_scope(host, main_domain))
        .unwrap_or(false)
}
