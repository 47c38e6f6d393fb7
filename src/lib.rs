#![forbid(unsafe_code)]
//! spfcheck_lib — contrôle syntaxique des enregistrements SPF

pub mod record;
pub use record::{
    PatternMatch, SpfCheckOptions, SpfIssue, check_spf_string, check_spf_string_with_options,
    validate_spf_string,
};

#[cfg(feature = "with-dns")]
pub mod dns;
#[cfg(feature = "with-dns")]
pub use dns::{
    DomainSpfReport, LookupTxt, ResolverSettings, SpfError, SpfResolver, check_domain_spf,
    check_domain_spf_with, normalize_domain, resolve_spf, resolve_spf_with, validate_domain_spf,
    validate_domain_spf_with,
};
