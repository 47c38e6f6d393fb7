use crate::record::SpfIssue;

/// Outcome of checking one domain: the normalized host, the selected TXT
/// record (if any) and the issues found in it.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainSpfReport {
    pub domain: String,
    pub record: Option<String>,
    pub issues: Vec<SpfIssue>,
}

impl DomainSpfReport {
    pub(crate) fn new(domain: String, record: Option<String>, issues: Vec<SpfIssue>) -> Self {
        Self {
            domain,
            record,
            issues,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}
