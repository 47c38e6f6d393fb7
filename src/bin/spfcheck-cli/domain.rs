use anyhow::Result;
use spfcheck_lib::SpfCheckOptions;

use crate::args::Cli;
use crate::output::OutputRow;

/// Une ligne par domaine ; une panne DNS est rapportée dans la ligne sans
/// interrompre le lot.
#[cfg(feature = "with-dns")]
pub fn check_domains(
    domains: &[String],
    cli: &Cli,
    options: &SpfCheckOptions,
) -> Result<Vec<OutputRow>> {
    use anyhow::Context;
    use spfcheck_lib::{SpfResolver, check_domain_spf_with};

    let resolver =
        SpfResolver::new(&cli.resolver_settings()).context("DNS resolver initialization")?;

    let rows = domains
        .iter()
        .map(
            |domain| match check_domain_spf_with(&resolver, domain, options) {
                Ok(report) => OutputRow::from_report(domain, report),
                Err(err) => {
                    tracing::warn!(domain = domain.as_str(), error = %err, "SPF check failed");
                    OutputRow::from_error(domain, &err)
                }
            },
        )
        .collect();
    Ok(rows)
}

#[cfg(not(feature = "with-dns"))]
pub fn check_domains(_: &[String], _: &Cli, _: &SpfCheckOptions) -> Result<Vec<OutputRow>> {
    anyhow::bail!("la résolution DNS nécessite la feature 'with-dns'")
}
