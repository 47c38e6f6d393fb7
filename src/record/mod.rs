//! Contrôles syntaxiques d'une chaîne SPF.
//!
//! [`validate_spf_string`] renvoie la liste ordonnée des messages ; une liste
//! vide signifie que la chaîne est bien formée. [`check_spf_string`] expose
//! les mêmes résultats sous forme de [`SpfIssue`].

mod pattern;
mod types;

pub use pattern::{PatternMatch, catchalls, version_tags};
pub use types::{SpfCheckOptions, SpfIssue};

pub fn validate_spf_string(spf: &str) -> Vec<String> {
    check_spf_string(spf)
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub fn check_spf_string(spf: &str) -> Vec<SpfIssue> {
    check_spf_string_with_options(spf, &SpfCheckOptions::default())
}

pub fn check_spf_string_with_options(spf: &str, options: &SpfCheckOptions) -> Vec<SpfIssue> {
    if spf.is_empty() {
        return vec![SpfIssue::EmptyRecord];
    }

    let mut issues = Vec::new();
    check_version(spf, &mut issues);
    check_catchall(spf, options, &mut issues);
    tracing::trace!(record = spf, count = issues.len(), "SPF string checked");
    issues
}

/// Présence, unicité et position du jeton `v=`.
fn check_version(spf: &str, issues: &mut Vec<SpfIssue>) {
    let found = version_tags(spf);

    if found.is_empty() {
        issues.push(SpfIssue::MissingVersion);
    }
    if found.len() > 1 {
        issues.push(SpfIssue::MultipleVersions);
    }
    if let Some(first) = found.first() {
        if !first.starts_record() {
            issues.push(SpfIssue::VersionNotFirst);
        }
    }
}

/// Présence, unicité, position et qualificatif du mécanisme `all`.
fn check_catchall(spf: &str, options: &SpfCheckOptions, issues: &mut Vec<SpfIssue>) {
    let found = catchalls(spf);

    if found.is_empty() {
        issues.push(SpfIssue::MissingCatchall);
    }
    if found.len() > 1 {
        issues.push(SpfIssue::MultipleCatchalls);
    }

    let Some(first) = found.first() else {
        return;
    };
    if !first.ends_record(spf) {
        issues.push(SpfIssue::CatchallNotLast);
    }
    if first
        .leading_char()
        .is_some_and(|c| options.is_permissive_qualifier(c))
    {
        issues.push(SpfIssue::PermissiveCatchall);
    }
}
