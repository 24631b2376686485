use std::fmt;
use std::str::FromStr;

/// Body positions an operator can assign to a frame range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Dd,
    Dld,
    Dle,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Unknown label code: {0}")]
pub struct UnknownLabel(pub String);

impl LabelKind {
    pub const ALL: [LabelKind; 3] = [LabelKind::Dd, LabelKind::Dld, LabelKind::Dle];

    /// Short code stored in the label document
    pub fn code(&self) -> &'static str {
        match self {
            LabelKind::Dd => "DD",
            LabelKind::Dld => "DLD",
            LabelKind::Dle => "DLE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LabelKind::Dd => "Decúbito Dorsal",
            LabelKind::Dld => "Decúbito Lateral Direito",
            LabelKind::Dle => "Decúbito Lateral Esquerdo",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_name(), self.code())
    }
}

impl FromStr for LabelKind {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelKind::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
