//! The `link` rule: URL well-formedness plus the host blocklist.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use bookmarks_core::LINK_MAX_LEN;
use serde_json::Value;
use url::{Host, Url};

use crate::rules::{Failure, Rule};

pub const DEFAULT_BLOCKED_HOSTS: [&str; 2] = ["yahoo.com", "socket.io"];

const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// A missing link is an invalid link (create).
    Required,
    /// A missing link is accepted and left unchanged (update).
    AllowEmpty,
}

/// Returns the normalized host if `raw` is a well-formed absolute link.
pub fn well_formed_host(raw: &str) -> Option<String> {
    if raw.chars().count() > LINK_MAX_LEN || raw.chars().any(char::is_whitespace) {
        return None;
    }
    let (scheme, _) = raw.split_once("://")?;
    if !ALLOWED_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return None;
    }
    let url = Url::parse(raw).ok()?;
    let public = match url.host()? {
        Host::Domain(domain) => is_public_domain(domain),
        Host::Ipv4(ip) => is_public_ipv4(ip),
        Host::Ipv6(ip) => is_public_ipv6(ip),
    };
    if !public {
        return None;
    }
    url.host_str().map(str::to_string)
}

fn is_public_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return false;
    }
    labels.last().is_some_and(|tld| {
        // punycode TLDs ("xn--p1ai") are allowed alongside plain letters
        tld.len() >= 2
            && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
    })
}

fn is_public_ipv4(ip: Ipv4Addr) -> bool {
    !(ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        || ip.is_documentation()
        || ip.is_multicast())
}

fn is_public_ipv6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let unique_local = (first & 0xfe00) == 0xfc00;
    let link_local = (first & 0xffc0) == 0xfe80;
    !(ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() || unique_local || link_local)
}

/// Only absent, `null` and `""` count as no link; blank text is a bad link.
fn is_empty_link(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Builds the `link` rule. Host comparison against `blocked` is exact.
pub fn link(mode: LinkMode, blocked: Arc<[String]>) -> Rule {
    Rule::new("link", move |input| {
        if is_empty_link(input.value) {
            return match mode {
                LinkMode::Required => Some(Failure::InvalidLink),
                LinkMode::AllowEmpty => None,
            };
        }
        let Some(raw) = input.value.and_then(Value::as_str) else {
            return Some(Failure::InvalidLink);
        };
        let Some(host) = well_formed_host(raw) else {
            return Some(Failure::InvalidLink);
        };
        blocked
            .iter()
            .any(|b| *b == host)
            .then_some(Failure::BlockedDomain { host })
    })
}

pub fn default_blocklist() -> Arc<[String]> {
    DEFAULT_BLOCKED_HOSTS.iter().map(|h| h.to_string()).collect()
}
