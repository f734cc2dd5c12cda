use serde::{Deserialize, Serialize};

/// Business sector inferred from an entity's naming convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sector {
    Advantis,
    Fiber,
    Agro,
    Fabric,
    Amaya,
    Alumex,
    #[serde(rename = "DPL")]
    Dpl,
    Haycarb,
    /// No prefix matched. Never surfaced in sector reports.
    Other,
}

// Checked in order; first match wins.
const PREFIXES: &[(&str, Sector)] = &[
    ("ADV-", Sector::Advantis),
    ("ADV_", Sector::Advantis),
    ("FIBER-", Sector::Fiber),
    ("FIBER_", Sector::Fiber),
    ("AGRO-", Sector::Agro),
    ("AGRO_", Sector::Agro),
    ("FABRIC", Sector::Fabric),
    ("AMAYA", Sector::Amaya),
    ("ALUMEX", Sector::Alumex),
    ("DPL-", Sector::Dpl),
    ("DPL_", Sector::Dpl),
    ("HAYCARB-", Sector::Haycarb),
    ("HAYCARB_", Sector::Haycarb),
];

impl Sector {
    pub const REPORTED: [Sector; 8] = [
        Sector::Advantis,
        Sector::Fiber,
        Sector::Agro,
        Sector::Fabric,
        Sector::Amaya,
        Sector::Alumex,
        Sector::Dpl,
        Sector::Haycarb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sector::Advantis => "Advantis",
            Sector::Fiber => "Fiber",
            Sector::Agro => "Agro",
            Sector::Fabric => "Fabric",
            Sector::Amaya => "Amaya",
            Sector::Alumex => "Alumex",
            Sector::Dpl => "DPL",
            Sector::Haycarb => "Haycarb",
            Sector::Other => "Other",
        }
    }
}

/// Case-insensitive prefix classification of an entity id.
pub fn classify_sector(entity_id: &str) -> Sector {
    let upper = entity_id.trim().to_uppercase();
    PREFIXES
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, sector)| *sector)
        .unwrap_or(Sector::Other)
}
