use std::net::IpAddr;

use url::Url;

const MAX_URL_LEN: usize = 2048;

/// Validate a caller-supplied URL before the service fetches it on their
/// behalf: parse, enforce http(s), enforce max length, reject private and
/// loopback targets.
pub fn validate_external_url(raw: &str) -> Result<Url, &'static str> {
    let raw = raw.trim();
    if raw.len() > MAX_URL_LEN {
        return Err("URL too long (max 2048 characters)");
    }
    let parsed = Url::parse(raw).map_err(|_| "Invalid URL")?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err("URL must use http or https scheme");
    }
    if let Some(host) = parsed.host_str() {
        if let Ok(ip) = host.parse::<IpAddr>() {
            if ip.is_loopback() || is_private_ip(ip) {
                return Err("URLs pointing to private/loopback addresses are not allowed");
            }
        }
        let lower = host.to_lowercase();
        if lower == "localhost" || lower.ends_with(".local") || lower.ends_with(".internal") {
            return Err("URLs pointing to internal hosts are not allowed");
        }
    }
    Ok(parsed)
}

/// Check if an IP address is in a private range (RFC 1918 / RFC 4193).
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_link_local()
                || v4.octets()[0] == 10
                || (v4.octets()[0] == 172 && (16..=31).contains(&v4.octets()[1]))
                || (v4.octets()[0] == 192 && v4.octets()[1] == 168)
                || (v4.octets()[0] == 169 && v4.octets()[1] == 254) // metadata endpoint
        }
        IpAddr::V6(v6) => v6.is_loopback() || (v6.segments()[0] & 0xfe00) == 0xfc00,
    }
}
