use std::fmt;

/// A rule violation found in an SPF record. `Display` yields the message
/// reported to users.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpfIssue {
    NoRecord,
    EmptyRecord,
    MissingVersion,
    MultipleVersions,
    VersionNotFirst,
    MissingCatchall,
    MultipleCatchalls,
    CatchallNotLast,
    PermissiveCatchall,
}

impl SpfIssue {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoRecord => "This domain does not have an SPF record.",
            Self::EmptyRecord => "Empty SPF string.",
            Self::MissingVersion => {
                "The SPF record is missing the SPF version. This should be at the beginning of the record and look like v=spf1"
            }
            Self::MultipleVersions => {
                "There are more than one instance of the SPF version in this SPF record."
            }
            Self::VersionNotFirst => "The SPF version is not at the beginning of the SPF record.",
            Self::MissingCatchall => {
                "There is not a catchall in this SPF record. There should be an 'all' at the end of the record."
            }
            Self::MultipleCatchalls => "There is more than one catchall in this SPF record.",
            Self::CatchallNotLast => "The catchall is not at the end of the SPF record.",
            Self::PermissiveCatchall => {
                "The catchall is prefixed with + qualifier. This means that the SPF record will always pass. This is not recommended."
            }
        }
    }

    /// Identifiant court, stable (sorties CSV).
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoRecord => "no_record",
            Self::EmptyRecord => "empty_record",
            Self::MissingVersion => "missing_version",
            Self::MultipleVersions => "multiple_versions",
            Self::VersionNotFirst => "version_not_first",
            Self::MissingCatchall => "missing_catchall",
            Self::MultipleCatchalls => "multiple_catchalls",
            Self::CatchallNotLast => "catchall_not_last",
            Self::PermissiveCatchall => "permissive_catchall",
        }
    }
}

impl fmt::Display for SpfIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfCheckOptions {
    flag_bare_all: bool,
}

impl SpfCheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Un `all` sans qualificatif est signalé comme `+all` (comportement
    /// historique). `false` ne signale que le `+` explicite.
    pub fn flag_bare_all(mut self, value: bool) -> Self {
        self.flag_bare_all = value;
        self
    }

    pub fn flags_bare_all(&self) -> bool {
        self.flag_bare_all
    }

    pub(crate) fn is_permissive_qualifier(&self, leading: char) -> bool {
        leading == '+' || (self.flag_bare_all && leading == 'a')
    }
}

impl Default for SpfCheckOptions {
    fn default() -> Self {
        Self {
            flag_bare_all: true,
        }
    }
}
