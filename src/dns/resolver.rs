use trust_dns_resolver::{
    Resolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::{op::ResponseCode, rr::rdata::TXT},
    system_conf::read_system_conf,
};
use url::Url;

use super::{ResolverSettings, SpfError};

/// Réduit un domaine ou une URL à l'hôte ASCII interrogé en DNS.
///
/// `https://www.example.com/path` et `example.com` donnent tous deux
/// `example.com`.
pub fn normalize_domain(domain: &str) -> Result<String, SpfError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(SpfError::EmptyDomain);
    }

    let host = if trimmed.contains("://") {
        let url = Url::parse(trimmed).map_err(|err| SpfError::invalid_url(trimmed, err))?;
        match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(SpfError::missing_host(trimmed)),
        }
    } else {
        trimmed.to_string()
    };

    let host = host.strip_prefix("www.").unwrap_or(&host);
    let ascii = idna::domain_to_ascii(host).map_err(SpfError::idna)?;
    if ascii.is_empty() {
        return Err(SpfError::EmptyDomain);
    }
    tracing::debug!(input = domain, normalized = %ascii, "domain normalized");
    Ok(ascii)
}

/// Source of TXT records. `Ok(vec![])` means the name has no TXT record;
/// every other failure is an `Err`.
pub trait LookupTxt {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, SpfError>;
}

impl LookupTxt for Resolver {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, SpfError> {
        match Resolver::txt_lookup(self, name) {
            Ok(lookup) => lookup
                .iter()
                .map(|txt| join_character_strings(name, txt))
                .collect(),
            Err(err) if should_treat_as_empty(&err) => {
                tracing::debug!(name, "no TXT records");
                Ok(Vec::new())
            }
            Err(err) => {
                tracing::warn!(name, error = %err, "TXT lookup failed");
                Err(SpfError::txt_lookup(name, err))
            }
        }
    }
}

/// Synchronous resolver built from explicit [`ResolverSettings`].
pub struct SpfResolver {
    inner: Resolver,
}

impl SpfResolver {
    pub fn new(settings: &ResolverSettings) -> Result<Self, SpfError> {
        let (config, mut opts) = base_config(settings)?;
        if let Some(timeout) = settings.timeout() {
            opts.timeout = timeout;
        }
        opts.attempts = settings.attempts.max(1);
        let inner = Resolver::new(config, opts).map_err(SpfError::resolver_init)?;
        Ok(Self { inner })
    }

    /// Premier enregistrement TXT ressemblant à du SPF, chaîne vide sinon.
    pub fn resolve_spf(&self, domain: &str) -> Result<String, SpfError> {
        super::resolve_spf_with(self, domain)
    }
}

impl LookupTxt for SpfResolver {
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, SpfError> {
        self.inner.lookup_txt(name)
    }
}

pub(crate) fn find_spf_record<R>(resolver: &R, ascii_domain: &str) -> Result<Option<String>, SpfError>
where
    R: LookupTxt + ?Sized,
{
    let records = resolver.lookup_txt(ascii_domain)?;
    tracing::debug!(domain = ascii_domain, count = records.len(), "TXT records fetched");
    let selected = select_spf_record(records);
    if selected.is_none() {
        tracing::debug!(domain = ascii_domain, "no SPF-like TXT record");
    }
    Ok(selected)
}

pub(crate) fn select_spf_record(records: Vec<String>) -> Option<String> {
    records.into_iter().find(|record| {
        tracing::trace!(record = record.as_str(), "inspecting TXT record");
        record.contains("v=spf") || record.contains("all")
    })
}

fn base_config(settings: &ResolverSettings) -> Result<(ResolverConfig, ResolverOpts), SpfError> {
    if settings.uses_system_nameservers() {
        return read_system_conf().map_err(|err| SpfError::resolver_init(err.into()));
    }
    let group = NameServerConfigGroup::from_ips_clear(&settings.nameservers, settings.port, true);
    Ok((
        ResolverConfig::from_parts(None, Vec::new(), group),
        ResolverOpts::default(),
    ))
}

/// Un enregistrement TXT peut être découpé en plusieurs chaînes de 255
/// octets : on les recolle avant toute analyse.
fn join_character_strings(name: &str, txt: &TXT) -> Result<String, SpfError> {
    txt.txt_data()
        .iter()
        .map(|piece| std::str::from_utf8(piece).map_err(|err| SpfError::txt_data_utf8(name, err)))
        .collect()
}

/// Seule une réponse NOERROR sans données (NODATA) vaut absence de TXT.
/// trust-dns range aussi SERVFAIL, REFUSED, NXDOMAIN... sous
/// `NoRecordsFound` : ce sont des pannes, pas un constat.
pub(crate) fn should_treat_as_empty(err: &ResolveError) -> bool {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            *response_code == ResponseCode::NoError
        }
        _ => false,
    }
}
