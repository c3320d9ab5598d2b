//! Subject filter for delete-before-import.

use kbsync_shared::RecordKind;

/// Selects which existing remote records a deletion pass removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectFilter {
    /// `*`: every record of the kind.
    All,
    /// Intents named `/{subject}/...` or entities named `{subject}-...`.
    Subject(String),
}

impl SubjectFilter {
    /// Parse a CLI subject argument. The literal `*` means everything.
    pub fn parse(subject: &str) -> Self {
        match subject {
            "*" => Self::All,
            other => Self::Subject(other.to_string()),
        }
    }

    /// Whether a remote record called `name` falls under this filter.
    pub fn matches(&self, kind: RecordKind, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Subject(subject) => match kind {
                RecordKind::Intents => name.starts_with(&format!("/{subject}/")),
                RecordKind::Entities => name.starts_with(&format!("{subject}-")),
            },
        }
    }
}

impl std::fmt::Display for SubjectFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Subject(s) => f.write_str(s),
        }
    }
}
