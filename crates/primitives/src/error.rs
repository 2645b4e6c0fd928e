use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Failure kinds the node reports to its clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No proposal with the requested id is known.
    ProposalNotFound,
    /// The submitted content belongs to a proposal that was never created on-chain.
    ProposalNotCreated,
    /// The submitted content is inconsistent with its id or attachment.
    ProposalInvalid,
    /// No award with the requested token id is known.
    TokenNotFound,
    /// The node failed to serve the request.
    Internal,
}

impl ErrorKind {
    /// All kinds.
    pub const ALL: [Self; 5] = [
        Self::ProposalNotFound,
        Self::ProposalNotCreated,
        Self::ProposalInvalid,
        Self::TokenNotFound,
        Self::Internal,
    ];

    /// Returns the name used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProposalNotFound => "ProposalNotFound",
            Self::ProposalNotCreated => "ProposalNotCreated",
            Self::ProposalInvalid => "ProposalInvalid",
            Self::TokenNotFound => "TokenNotFound",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ErrorKind>(), Ok(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
        assert!("Teapot".parse::<ErrorKind>().is_err());
    }
}
