//! Récupération DNS de l'enregistrement SPF (feature `with-dns`, active par
//! défaut).
//!
//! [`validate_domain_spf`] enchaîne normalisation du domaine, lecture des
//! enregistrements TXT et [`validate_spf_string`](crate::validate_spf_string).
//! Une absence d'enregistrement est un constat ; une panne DNS est une
//! [`SpfError`].

mod error;
mod options;
mod resolver;
mod types;

pub use error::SpfError;
pub use options::ResolverSettings;
pub use resolver::{LookupTxt, SpfResolver, normalize_domain};
pub use types::DomainSpfReport;

use crate::record::{SpfCheckOptions, SpfIssue, check_spf_string_with_options};
use resolver::find_spf_record;

/// Resolve `domain` with the system resolver and return its SPF record, or
/// an empty string when the domain publishes none.
pub fn resolve_spf(domain: &str) -> Result<String, SpfError> {
    SpfResolver::new(&ResolverSettings::default())?.resolve_spf(domain)
}

pub fn resolve_spf_with<R>(resolver: &R, domain: &str) -> Result<String, SpfError>
where
    R: LookupTxt + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    Ok(find_spf_record(resolver, &ascii)?.unwrap_or_default())
}

pub fn validate_domain_spf(domain: &str) -> Result<Vec<String>, SpfError> {
    let resolver = SpfResolver::new(&ResolverSettings::default())?;
    validate_domain_spf_with(&resolver, domain)
}

pub fn validate_domain_spf_with<R>(resolver: &R, domain: &str) -> Result<Vec<String>, SpfError>
where
    R: LookupTxt + ?Sized,
{
    let report = check_domain_spf_with(resolver, domain, &SpfCheckOptions::default())?;
    Ok(report.messages())
}

pub fn check_domain_spf(
    domain: &str,
    settings: &ResolverSettings,
    options: &SpfCheckOptions,
) -> Result<DomainSpfReport, SpfError> {
    let resolver = SpfResolver::new(settings)?;
    check_domain_spf_with(&resolver, domain, options)
}

pub fn check_domain_spf_with<R>(
    resolver: &R,
    domain: &str,
    options: &SpfCheckOptions,
) -> Result<DomainSpfReport, SpfError>
where
    R: LookupTxt + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let record = find_spf_record(resolver, &ascii)?;

    let issues = match record.as_deref() {
        None | Some("") => vec![SpfIssue::NoRecord],
        Some(spf) => check_spf_string_with_options(spf, options),
    };

    tracing::debug!(domain = %ascii, issues = issues.len(), "domain SPF checked");
    Ok(DomainSpfReport::new(ascii, record, issues))
}

#[cfg(test)]
mod tests;
