use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket},
    thread,
    time::Duration,
};

use trust_dns_resolver::{
    Name,
    error::{ResolveError, ResolveErrorKind},
    proto::{
        op::{Query, ResponseCode},
        rr::RecordType,
    },
};

use super::{
    LookupTxt, ResolverSettings, SpfError, SpfResolver, check_domain_spf_with, normalize_domain,
    resolve_spf_with, resolver::select_spf_record, validate_domain_spf_with,
};
use crate::record::{SpfCheckOptions, SpfIssue};

type LookupResult = Result<Vec<String>, SpfError>;
type LookupFn = dyn Fn(&str) -> LookupResult;

struct StubResolver {
    on_lookup: Box<LookupFn>,
}

impl StubResolver {
    fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> LookupResult + 'static,
    {
        Self {
            on_lookup: Box::new(f),
        }
    }

    fn serving(name: &'static str, records: &'static [&'static str]) -> Self {
        Self::new(move |domain| {
            assert_eq!(domain, name);
            Ok(records.iter().map(|r| r.to_string()).collect())
        })
    }
}

impl LookupTxt for StubResolver {
    fn lookup_txt(&self, name: &str) -> LookupResult {
        (self.on_lookup)(name)
    }
}

fn no_records_error(code: ResponseCode) -> ResolveError {
    let query = Query::query(
        Name::from_ascii("example.com.").expect("valid name"),
        RecordType::TXT,
    );
    ResolveErrorKind::NoRecordsFound {
        query: Box::new(query),
        soa: None,
        negative_ttl: None,
        response_code: code,
        trusted: true,
    }
    .into()
}

#[test]
fn url_and_bare_domain_normalize_alike() {
    let from_url = normalize_domain("https://www.example.com/path").expect("url normalizes");
    let bare = normalize_domain("example.com").expect("domain normalizes");
    assert_eq!(from_url, "example.com");
    assert_eq!(from_url, bare);
}

#[test]
fn normalization_drops_port_query_and_case() {
    let out = normalize_domain("http://WWW.Example.COM:8080/a?b=c#d").expect("url normalizes");
    assert_eq!(out, "example.com");
}

#[test]
fn www_only_stripped_as_prefix() {
    assert_eq!(normalize_domain("www.example.com").unwrap(), "example.com");
    assert_eq!(normalize_domain("mail.www.example.com").unwrap(), "mail.www.example.com");
    assert_eq!(normalize_domain("wwwexample.com").unwrap(), "wwwexample.com");
}

#[test]
fn idna_domains_converted_to_ascii() {
    assert_eq!(normalize_domain("exämple.com").unwrap(), "xn--exmple-cua.com");
}

#[test]
fn empty_domain_rejected() {
    let err = normalize_domain("   ").expect_err("empty domain should fail");
    assert!(matches!(err, SpfError::EmptyDomain));
}

#[test]
fn url_without_host_rejected() {
    let err = normalize_domain("file:///etc/hosts").expect_err("no host");
    assert!(matches!(err, SpfError::MissingHost { .. }));
}

#[test]
fn resolve_queries_normalized_host() {
    let stub = StubResolver::serving("example.com", &["v=spf1 -all"]);
    assert_eq!(
        resolve_spf_with(&stub, "https://www.example.com/path").unwrap(),
        "v=spf1 -all"
    );
    assert_eq!(resolve_spf_with(&stub, "example.com").unwrap(), "v=spf1 -all");
}

#[test]
fn first_spf_like_record_selected() {
    let records = vec![
        "google-site-verification=abc123".to_string(),
        "v=spf1 include:_spf.example.net ~all".to_string(),
        "v=spf1 -all".to_string(),
    ];
    assert_eq!(
        select_spf_record(records).as_deref(),
        Some("v=spf1 include:_spf.example.net ~all")
    );
}

#[test]
fn record_with_only_all_is_selected() {
    let records = vec!["ip4:192.0.2.1 -all".to_string()];
    assert_eq!(select_spf_record(records).as_deref(), Some("ip4:192.0.2.1 -all"));
}

#[test]
fn unrelated_records_yield_empty_string() {
    let stub = StubResolver::serving("example.com", &["some other txt record"]);
    assert_eq!(resolve_spf_with(&stub, "example.com").unwrap(), "");
}

#[test]
fn missing_record_reported_as_single_issue() {
    let stub = StubResolver::serving("example.com", &[]);
    let issues = validate_domain_spf_with(&stub, "example.com").expect("lookup succeeds");
    assert_eq!(
        issues,
        vec!["This domain does not have an SPF record.".to_string()]
    );
}

#[test]
fn record_issues_returned_unmodified() {
    let stub = StubResolver::serving("example.com", &["v=spf1 +all"]);
    let issues = validate_domain_spf_with(&stub, "www.example.com").expect("lookup succeeds");
    assert_eq!(issues, vec![SpfIssue::PermissiveCatchall.to_string()]);
}

#[test]
fn report_carries_domain_and_record() {
    let stub = StubResolver::serving("example.com", &["v=spf1 mx -all"]);
    let report = check_domain_spf_with(&stub, "https://example.com", &SpfCheckOptions::default())
        .expect("lookup succeeds");
    assert_eq!(report.domain, "example.com");
    assert_eq!(report.record.as_deref(), Some("v=spf1 mx -all"));
    assert!(report.is_valid());
}

#[test]
fn lookup_fault_propagates() {
    let stub = StubResolver::new(|name| {
        Err(SpfError::txt_lookup(
            name,
            ResolveError::from(ResolveErrorKind::Timeout),
        ))
    });
    let err = validate_domain_spf_with(&stub, "example.com").expect_err("timeout must surface");
    match err {
        SpfError::TxtLookup { ref name, .. } => assert_eq!(name, "example.com"),
        other => panic!("expected TXT lookup error, got {:?}", other),
    }
}

#[test]
fn invalid_utf8_propagates() {
    let stub = StubResolver::new(|name| {
        let bytes = vec![0x76, 0x3d, 0xff];
        let source = std::str::from_utf8(&bytes).expect_err("invalid utf-8");
        Err(SpfError::txt_data_utf8(name, source))
    });
    let err = validate_domain_spf_with(&stub, "example.com").expect_err("decode fault");
    assert!(matches!(err, SpfError::TxtDataUtf8 { .. }));
}

#[test]
fn no_answer_is_empty_but_nxdomain_is_fault() {
    assert!(super::resolver::should_treat_as_empty(&no_records_error(
        ResponseCode::NoError
    )));
    assert!(!super::resolver::should_treat_as_empty(&no_records_error(
        ResponseCode::NXDomain
    )));
    assert!(!super::resolver::should_treat_as_empty(&ResolveError::from(
        ResolveErrorKind::Timeout
    )));
}

#[test]
fn server_failures_are_faults_not_missing_records() {
    for code in [
        ResponseCode::ServFail,
        ResponseCode::Refused,
        ResponseCode::FormErr,
        ResponseCode::NotImp,
    ] {
        assert!(
            !super::resolver::should_treat_as_empty(&no_records_error(code)),
            "{code:?} must not read as an empty TXT set"
        );
    }
}

/// Serveur UDP local qui répond à chaque requête par un en-tête portant
/// `rcode`, sans aucune réponse.
fn spawn_rcode_server(rcode: u8) -> SocketAddr {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind udp");
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("read timeout");
    let addr = socket.local_addr().expect("local addr");
    thread::spawn(move || {
        let mut buf = [0u8; 1024];
        while let Ok((len, peer)) = socket.recv_from(&mut buf) {
            if len < 12 {
                continue;
            }
            let mut reply = buf[..len].to_vec();
            reply[2] |= 0x80; // QR
            reply[3] = 0x80 | (rcode & 0x0f); // RA + RCODE
            let _ = socket.send_to(&reply, peer);
        }
    });
    addr
}

fn local_resolver(addr: SocketAddr) -> SpfResolver {
    let settings = ResolverSettings::new()
        .with_nameserver(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .with_port(addr.port())
        .with_timeout_ms(1_000)
        .with_attempts(1);
    SpfResolver::new(&settings).expect("resolver builds")
}

#[test]
fn servfail_from_nameserver_surfaces_as_lookup_error() {
    let resolver = local_resolver(spawn_rcode_server(2));
    let err = validate_domain_spf_with(&resolver, "example.com.")
        .expect_err("SERVFAIL is a DNS fault");
    assert!(matches!(err, SpfError::TxtLookup { .. }), "got {err:?}");
}

#[test]
fn refused_from_nameserver_surfaces_as_lookup_error() {
    let resolver = local_resolver(spawn_rcode_server(5));
    let err = resolver
        .lookup_txt("example.com.")
        .expect_err("REFUSED is a DNS fault");
    assert!(matches!(err, SpfError::TxtLookup { .. }), "got {err:?}");
}

#[test]
fn nodata_from_nameserver_means_no_record() {
    let resolver = local_resolver(spawn_rcode_server(0));
    let issues = validate_domain_spf_with(&resolver, "example.com.").expect("NODATA is not a fault");
    assert_eq!(issues, vec![SpfIssue::NoRecord.to_string()]);
}
