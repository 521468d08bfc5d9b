//! Fact and Gap records produced by the extraction collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six analytical domains every analysis run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Infrastructure,
    Applications,
    Organization,
    Cybersecurity,
    Network,
    IdentityAccess,
}

impl Domain {
    /// All domains in fixed processing order.
    pub const ALL: [Domain; 6] = [
        Domain::Infrastructure,
        Domain::Applications,
        Domain::Organization,
        Domain::Cybersecurity,
        Domain::Network,
        Domain::IdentityAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Infrastructure => "infrastructure",
            Domain::Applications => "applications",
            Domain::Organization => "organization",
            Domain::Cybersecurity => "cybersecurity",
            Domain::Network => "network",
            Domain::IdentityAccess => "identity_access",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "infrastructure" => Ok(Domain::Infrastructure),
            "applications" => Ok(Domain::Applications),
            "organization" => Ok(Domain::Organization),
            "cybersecurity" => Ok(Domain::Cybersecurity),
            "network" => Ok(Domain::Network),
            "identity_access" | "identity-access" | "identity" => Ok(Domain::IdentityAccess),
            other => Err(format!(
                "unknown domain: {} (expected one of infrastructure, applications, \
                 organization, cybersecurity, network, identity_access)",
                other
            )),
        }
    }
}

/// Which side of the deal a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Target,
    Buyer,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Target => "target",
            Entity::Buyer => "buyer",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Globally unique fact identifier, e.g. `target-applications-0007`.
///
/// The entity and domain are encoded in the identifier so that exported
/// citations stay meaningful without a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub String);

impl FactId {
    pub fn new(entity: Entity, domain: Domain, seq: u32) -> Self {
        FactId(format!("{}-{}-{:04}", entity, domain, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gap identifier, e.g. `gap-target-network-0002`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GapId(pub String);

impl GapId {
    pub fn new(entity: Entity, domain: Domain, seq: u32) -> Self {
        GapId(format!("gap-{}-{}-{:04}", entity, domain, seq))
    }
}

impl fmt::Display for GapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Criticality of the system or process a fact describes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

/// Structured attributes extracted from a fact's claim text.
///
/// All fields are optional; which ones are populated depends on the domain
/// (an applications fact usually carries vendor and user count, an
/// organization fact rarely carries either).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Annual cost in the deal currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<Criticality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u32>,
}

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Identifier of the source document the claim was extracted from.
    pub source_doc: String,
    /// Location hint inside the document (page, section, sheet name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Set when this record supersedes an earlier extraction of the same claim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supersedes: Option<FactId>,
}

impl Provenance {
    pub fn new(source_doc: impl Into<String>) -> Self {
        Self {
            source_doc: source_doc.into(),
            location: None,
            supersedes: None,
        }
    }
}

/// An atomic claim about one entity's IT estate.
///
/// Facts are append-only: re-extraction produces a new `Fact` whose
/// provenance carries a `supersedes` back-reference, the old record is
/// retained as audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,
    pub domain: Domain,
    pub entity: Entity,
    /// Free-text claim as extracted from the source document.
    pub claim: String,
    #[serde(default)]
    pub attributes: FactAttributes,
    pub provenance: Provenance,
    /// Extraction confidence in [0.0, 1.0].
    pub confidence: f32,
}

impl Fact {
    /// Produces the replacement record for a re-extracted claim.
    pub fn superseded_by(&self, seq: u32, claim: impl Into<String>, confidence: f32) -> Fact {
        Fact {
            id: FactId::new(self.entity, self.domain, seq),
            domain: self.domain,
            entity: self.entity,
            claim: claim.into(),
            attributes: self.attributes.clone(),
            provenance: Provenance {
                source_doc: self.provenance.source_doc.clone(),
                location: self.provenance.location.clone(),
                supersedes: Some(self.id.clone()),
            },
            confidence,
        }
    }
}

/// An information absence flagged for a domain/entity.
///
/// Gaps feed the Reasoning Orchestrator ("open question" findings) and are
/// never consumed by the Overlap Engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub id: GapId,
    pub domain: Domain,
    pub entity: Entity,
    pub description: String,
    pub provenance: Provenance,
}
