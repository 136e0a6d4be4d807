use std::net::IpAddr;

/// Returns the address if `candidate` is a well-formed IPv4 or IPv6 address.
pub fn parse_ip(candidate: &str) -> Option<IpAddr> {
    candidate.parse().ok()
}

/// Picks the address a request is asking about, without validating it.
///
/// An explicit, non-empty `ip` query parameter wins. Otherwise the first entry of
/// `X-Forwarded-For` is used unless it's blank, then the peer address. When none of them is
/// available the result is empty, which the validator rejects.
pub fn resolve_client_ip(
    query_ip: Option<&str>,
    forwarded_for: Option<&str>,
    peer: Option<IpAddr>,
) -> String {
    if let Some(ip) = query_ip.filter(|ip| !ip.is_empty()) {
        return ip.to_owned();
    }

    let first_forwarded = forwarded_for
        .and_then(|forwarded_for| forwarded_for.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = first_forwarded {
        return ip.to_owned();
    }

    peer.map(|ip| ip.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn accepts_ipv4_and_ipv6() {
        for ip in [
            "8.8.8.8",
            "0.0.0.0",
            "255.255.255.255",
            "::1",
            "::",
            "2001:db8::8a2e:370:7334",
            "::ffff:192.0.2.1",
        ] {
            assert!(parse_ip(ip).is_some(), "{ip} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for ip in [
            "",
            "not-an-ip",
            "256.1.1.1",
            "1.2.3",
            "1.2.3.4.5",
            " 8.8.8.8",
            "8.8.8.8:80",
            "10.0.0.0/8",
            "2001:db8::g",
            "1:2:3:4:5:6:7:8:9",
            "example.com",
        ] {
            assert_eq!(parse_ip(ip), None, "{ip:?} should be invalid");
        }
    }

    #[test]
    fn query_parameter_takes_precedence() {
        let ip = resolve_client_ip(
            Some("8.8.8.8"),
            Some("203.0.113.1"),
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        );
        assert_eq!(ip, "8.8.8.8");
    }

    #[test]
    fn empty_query_parameter_is_ignored() {
        let ip = resolve_client_ip(Some(""), Some("203.0.113.1"), None);
        assert_eq!(ip, "203.0.113.1");
    }

    #[test]
    fn uses_first_forwarded_address() {
        let ip = resolve_client_ip(
            None,
            Some(" 203.0.113.1 , 198.51.100.2"),
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        );
        assert_eq!(ip, "203.0.113.1");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let ip = resolve_client_ip(None, None, Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))));
        assert_eq!(ip, "192.0.2.1");
    }

    #[test]
    fn blank_forwarded_entry_falls_back_to_peer_address() {
        let peer = Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));

        for forwarded_for in ["", "   ", " , 8.8.8.8"] {
            assert_eq!(
                resolve_client_ip(None, Some(forwarded_for), peer),
                "192.0.2.1",
                "X-Forwarded-For: {forwarded_for:?}"
            );
        }
    }

    #[test]
    fn nothing_to_resolve_yields_empty_string() {
        let ip = resolve_client_ip(None, None, None);
        assert_eq!(ip, "");
        assert_eq!(parse_ip(&ip), None);
    }
}
