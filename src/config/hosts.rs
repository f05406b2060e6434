//
//  bbs-prebuilds
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Host normalization and comparison helpers.

/// Normalizes a hostname for storage and comparison.
///
/// Strips a leading `http://`/`https://`, a trailing slash and surrounding
/// whitespace, then lowercases the result. Ports are kept.
///
/// # Example
///
/// ```rust
/// use bbs_prebuilds::config::normalize_host;
///
/// assert_eq!(normalize_host("https://Bitbucket.Example.com/"), "bitbucket.example.com");
/// assert_eq!(normalize_host("bb.example.com:7990"), "bb.example.com:7990");
/// ```
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.strip_suffix('/').unwrap_or(host);
    host.to_lowercase()
}

/// Returns the hostname part of a `host[:port]` authority.
pub fn hostname(authority: &str) -> &str {
    match authority.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => authority,
    }
}

/// Case-insensitive comparison of two authorities.
///
/// With `ignore_port` only the hostnames are compared, which is what ssh
/// clone URLs need: Bitbucket Server serves ssh on its own port.
pub fn hosts_match(configured: &str, candidate: &str, ignore_port: bool) -> bool {
    let configured = normalize_host(configured);
    let candidate = normalize_host(candidate);
    if ignore_port {
        hostname(&configured) == hostname(&candidate)
    } else {
        configured == candidate
    }
}
