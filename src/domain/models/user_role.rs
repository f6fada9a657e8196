#[cfg(test)]
#[path = "user_role_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// Who is asking. The backend tailors answers per role, and expects the long
/// English names on the wire regardless of how they're shown.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    EnumVariantNames,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[strum(serialize_all = "kebab-case")]
pub enum UserRole {
    #[serde(rename = "Construction Worker")]
    ConstructionWorker,
    #[serde(rename = "Supplier / Subcontractor")]
    Supplier,
    #[serde(rename = "Project Manager / Admin")]
    ProjectManager,
}

impl UserRole {
    pub fn parse(text: &str) -> Option<UserRole> {
        return UserRole::iter().find(|role| return role.to_string() == text);
    }

    pub fn backend_value(&self) -> &'static str {
        match self {
            UserRole::ConstructionWorker => return "Construction Worker",
            UserRole::Supplier => return "Supplier / Subcontractor",
            UserRole::ProjectManager => return "Project Manager / Admin",
        }
    }
}
