//! IPv4 and CIDR primitives.
//!
//! Everything here operates on unsigned 32-bit integers with big-endian
//! octet encoding. Containment checks never fail: malformed input yields
//! `false`, since these functions sit on the hot path of request
//! enrichment where a bad record must not abort the whole pass.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Shape-only check: four 1-3 digit groups, optional 1-2 digit prefix.
    static ref IPV4_OR_CIDR_SHAPE: Regex = compile(r"^(\d{1,3}\.){3}\d{1,3}(?:/\d{1,2})?$");
    /// First dotted-quad substring embedded in free text.
    static ref DOTTED_QUAD: Regex = compile(r"\b\d{1,3}(?:\.\d{1,3}){3}\b");
}

// Patterns are compile-time literals.
#[allow(clippy::unwrap_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Parse a dotted-quad IPv4 address into its 32-bit integer form.
///
/// Accepts exactly four dot-separated decimal groups, each in 0-255,
/// with surrounding whitespace trimmed. Leading zeros within a group are
/// read as decimal (`"010"` is 10). Anything else, including IPv6 and
/// hostnames, returns `None`.
pub fn parse_ipv4(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let mut octets = [0u32; 4];
    let mut count = 0;
    for part in trimmed.split('.') {
        if count == 4 {
            return None;
        }
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = part.parse().ok()?;
        if value > 255 {
            return None;
        }
        octets[count] = value;
        count += 1;
    }
    if count != 4 {
        return None;
    }
    Some((octets[0] << 24) | (octets[1] << 16) | (octets[2] << 8) | octets[3])
}

/// Render a 32-bit address back to dotted-quad form.
pub fn ipv4_to_string(addr: u32) -> String {
    format!(
        "{}.{}.{}.{}",
        (addr >> 24) & 0xff,
        (addr >> 16) & 0xff,
        (addr >> 8) & 0xff,
        addr & 0xff
    )
}

/// Test whether `ip` falls inside `network`.
///
/// `network` is either a bare address (exact match) or
/// `address/prefix_length` with the prefix in 0-32. A `/0` network
/// contains every valid address. Malformed input on either side returns
/// `false` rather than an error.
pub fn cidr_contains(ip: &str, network: &str) -> bool {
    let ip_num = match parse_ipv4(ip) {
        Some(n) => n,
        None => return false,
    };
    let mut parts = network.trim().split('/');
    let base = match parts.next().and_then(parse_ipv4) {
        Some(n) => n,
        None => return false,
    };
    let len = match parts.next() {
        None => return ip_num == base,
        Some(t) => t,
    };
    if parts.next().is_some() {
        return false;
    }
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let len: u32 = match len.parse() {
        Ok(n) if n <= 32 => n,
        _ => return false,
    };
    // len == 0 must short-circuit: shifting a u32 by 32 is not defined.
    let mask = if len == 0 { 0 } else { u32::MAX << (32 - len) };
    (ip_num & mask) == (base & mask)
}

/// Shape-only validity check used before persisting a record.
///
/// Deliberately weaker than [`parse_ipv4`]: `"999.1.1.1"` passes here.
/// Store writes must also pass [`validate_cidr`] for numeric range.
pub fn looks_like_ipv4_or_cidr(text: &str) -> bool {
    IPV4_OR_CIDR_SHAPE.is_match(text.trim())
}

/// Full validation for a stored CIDR value: shape plus numeric range.
///
/// Returns a human-readable reason on failure, suitable for an
/// invalid-input response body.
pub fn validate_cidr(text: &str) -> Result<(), &'static str> {
    let trimmed = text.trim();
    if !looks_like_ipv4_or_cidr(trimmed) {
        return Err("cidr must be IPv4 or IPv4/prefix");
    }
    let mut parts = trimmed.split('/');
    let address = parts.next().unwrap_or_default();
    if parse_ipv4(address).is_none() {
        return Err("address octets must be in 0-255");
    }
    if let Some(prefix) = parts.next() {
        match prefix.parse::<u32>() {
            Ok(n) if n <= 32 => {}
            _ => return Err("prefix length must be in 0-32"),
        }
    }
    Ok(())
}

/// Find the first dotted-quad substring in free text, e.g. device notes.
///
/// Shape-matched only; the caller decides whether out-of-range octets
/// matter for its purpose.
pub fn find_ipv4_in(text: &str) -> Option<&str> {
    DOTTED_QUAD.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_round_trip() {
        for text in ["0.0.0.0", "255.255.255.255", "10.0.0.5", "192.168.1.1", "1.2.3.4"] {
            let num = parse_ipv4(text).unwrap();
            assert_eq!(ipv4_to_string(num), text);
        }
    }

    #[test]
    fn test_parse_ipv4_big_endian_order() {
        assert_eq!(parse_ipv4("1.2.3.4"), Some(0x0102_0304));
        assert_eq!(parse_ipv4("255.0.0.0"), Some(0xff00_0000));
        assert_eq!(parse_ipv4("0.0.0.1"), Some(1));
    }

    #[test]
    fn test_parse_ipv4_trims_and_reads_leading_zeros() {
        assert_eq!(parse_ipv4("  10.0.0.5  "), Some(0x0a00_0005));
        assert_eq!(parse_ipv4("010.001.000.200"), parse_ipv4("10.1.0.200"));
    }

    #[test]
    fn test_parse_ipv4_rejects_bad_shapes() {
        for text in [
            "", "1.2.3", "1.2.3.4.5", "a.b.c.d", "256.1.1.1", "1.2.3.300", "::1",
            "1.2.3.4 junk", "1..3.4", "-1.2.3.4", "1.2.3.4/24",
        ] {
            assert_eq!(parse_ipv4(text), None, "{text:?} should be invalid");
        }
    }

    #[test]
    fn test_contains_prefix_zero_matches_everything() {
        for ip in ["0.0.0.0", "9.9.9.9", "255.255.255.255", "172.16.33.1"] {
            assert!(cidr_contains(ip, "0.0.0.0/0"));
            assert!(cidr_contains(ip, "1.2.3.4/0"));
        }
    }

    #[test]
    fn test_contains_prefix_32_is_exact() {
        assert!(cidr_contains("10.0.0.5", "10.0.0.5/32"));
        assert!(!cidr_contains("10.0.0.5", "10.0.0.6/32"));
    }

    #[test]
    fn test_contains_bare_address_is_exact() {
        assert!(cidr_contains("10.0.0.5", "10.0.0.5"));
        assert!(!cidr_contains("10.0.0.5", "10.0.0.6"));
    }

    #[test]
    fn test_contains_range_boundaries() {
        assert!(cidr_contains("10.0.0.0", "10.0.0.0/24"));
        assert!(cidr_contains("10.0.0.255", "10.0.0.0/24"));
        assert!(!cidr_contains("10.0.1.0", "10.0.0.0/24"));
        assert!(cidr_contains("192.168.130.7", "192.168.128.0/22"));
        assert!(!cidr_contains("192.168.132.7", "192.168.128.0/22"));
    }

    #[test]
    fn test_contains_rejects_malformed_input() {
        assert!(!cidr_contains("not-an-ip", "10.0.0.0/24"));
        assert!(!cidr_contains("10.0.0.5", "999.0.0.0/24"));
        assert!(!cidr_contains("10.0.0.5", "10.0.0.0/33"));
        assert!(!cidr_contains("10.0.0.5", "10.0.0.0/"));
        assert!(!cidr_contains("10.0.0.5", "10.0.0.0/24/8"));
        assert!(!cidr_contains("10.0.0.5", ""));
    }

    #[test]
    fn test_shape_check_is_weaker_than_parse() {
        assert!(looks_like_ipv4_or_cidr("10.0.0.0/24"));
        assert!(looks_like_ipv4_or_cidr("1.2.3.4"));
        assert!(looks_like_ipv4_or_cidr("999.1.1.1"));
        assert!(!looks_like_ipv4_or_cidr("1.2.3.4/123"));
        assert!(!looks_like_ipv4_or_cidr("1.2.3"));
        assert!(!looks_like_ipv4_or_cidr("host.example.com"));
    }

    #[test]
    fn test_validate_cidr() {
        assert!(validate_cidr("10.0.0.0/24").is_ok());
        assert!(validate_cidr(" 1.2.3.4 ").is_ok());
        assert!(validate_cidr("0.0.0.0/0").is_ok());
        assert!(validate_cidr("999.1.1.1").is_err());
        assert!(validate_cidr("10.0.0.0/33").is_err());
        assert!(validate_cidr("10.0.0").is_err());
        assert!(validate_cidr("").is_err());
    }

    #[test]
    fn test_find_ipv4_in_free_text() {
        assert_eq!(find_ipv4_in("IP: 10.0.0.17 • Status: permit"), Some("10.0.0.17"));
        assert_eq!(find_ipv4_in("no address here"), None);
        assert_eq!(find_ipv4_in("edge 192.168.1.1."), Some("192.168.1.1"));
        assert_eq!(find_ipv4_in(""), None);
    }
}
