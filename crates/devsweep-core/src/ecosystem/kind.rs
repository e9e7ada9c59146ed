/// The closed set of tool ecosystems devsweep knows how to scan.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcosystemKind {
    Rust,
    Node,
    Go,
    Python,
    Jvm,
    Dart,
    Xcode,
}

impl EcosystemKind {
    /// Every kind, in scan-launch order. Equal-size results keep this order.
    pub const ALL: [EcosystemKind; 7] = [
        EcosystemKind::Rust,
        EcosystemKind::Node,
        EcosystemKind::Go,
        EcosystemKind::Python,
        EcosystemKind::Jvm,
        EcosystemKind::Dart,
        EcosystemKind::Xcode,
    ];

    /// Stable lowercase identifier used in config files and reports.
    pub fn id(self) -> &'static str {
        match self {
            EcosystemKind::Rust => "rust",
            EcosystemKind::Node => "node",
            EcosystemKind::Go => "go",
            EcosystemKind::Python => "python",
            EcosystemKind::Jvm => "jvm",
            EcosystemKind::Dart => "dart",
            EcosystemKind::Xcode => "xcode",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EcosystemKind::Rust => "Rust",
            EcosystemKind::Node => "Node.js",
            EcosystemKind::Go => "Go",
            EcosystemKind::Python => "Python",
            EcosystemKind::Jvm => "JVM (Gradle/Maven)",
            EcosystemKind::Dart => "Dart/Flutter",
            EcosystemKind::Xcode => "Xcode",
        }
    }
}

impl fmt::Display for EcosystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ecosystem: {0:?}")]
pub struct UnknownEcosystem(pub String);

impl FromStr for EcosystemKind {
    type Err = UnknownEcosystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EcosystemKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEcosystem(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_back() {
        for kind in EcosystemKind::ALL {
            assert_eq!(kind.id().parse::<EcosystemKind>().unwrap(), kind);
        }
        assert_eq!(" RUST ".parse::<EcosystemKind>().unwrap(), EcosystemKind::Rust);
    }

    #[test]
    fn typo_is_rejected() {
        assert_eq!(
            "rsut".parse::<EcosystemKind>(),
            Err(UnknownEcosystem("rsut".into()))
        );
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        assert_eq!(serde_json::to_string(&EcosystemKind::Jvm).unwrap(), "\"jvm\"");
        let kind: EcosystemKind = serde_json::from_str("\"dart\"").unwrap();
        assert_eq!(kind, EcosystemKind::Dart);
    }
}
