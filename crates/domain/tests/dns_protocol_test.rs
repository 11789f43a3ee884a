use dns_relay_domain::UpstreamAddr;

#[test]
fn test_parse_ipv4() {
    let addr: UpstreamAddr = "8.8.8.8:53".parse().unwrap();
    assert_eq!(addr, UpstreamAddr::Resolved("8.8.8.8:53".parse().unwrap()));
    assert_eq!(addr.to_string(), "8.8.8.8:53");
    assert!(!addr.is_unresolved());
}

#[test]
fn test_parse_udp_scheme_is_accepted() {
    let addr: UpstreamAddr = "udp://1.1.1.1:5353".parse().unwrap();
    assert_eq!(addr.socket_addr(), Some("1.1.1.1:5353".parse().unwrap()));
}

#[test]
fn test_parse_ipv6_bracketed() {
    let addr: UpstreamAddr = "[2001:4860:4860::8888]:53".parse().unwrap();
    assert!(addr.socket_addr().unwrap().is_ipv6());
    assert_eq!(addr.to_string(), "[2001:4860:4860::8888]:53");
}

#[test]
fn test_parse_hostname() {
    let addr: UpstreamAddr = "dns.google:53".parse().unwrap();
    assert!(addr.is_unresolved());
    assert_eq!(addr.unresolved_parts(), Some(("dns.google", 53)));
    assert_eq!(addr.socket_addr(), None);
    assert_eq!(addr.to_string(), "dns.google:53");
}

#[test]
fn test_parse_rejects_invalid() {
    for input in ["", "8.8.8.8", ":53", "dns.google:notaport", "::1:53", "host:70000"] {
        assert!(
            input.parse::<UpstreamAddr>().is_err(),
            "'{}' should be rejected",
            input
        );
    }
}
