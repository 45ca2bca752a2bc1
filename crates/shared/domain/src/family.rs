//! Family domain entity.

use serde::{Deserialize, Serialize};

use crate::constants::{clip, FAMILY_NAME_MAX_CHARS};

/// A family: one main user plus the sub users registered as members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Family {
    pub id: String,
    pub main_user: String,
    pub family_name: Option<String>,
}

impl Family {
    pub fn new(id: String, main_user: String, family_name: Option<String>) -> Self {
        Self {
            id,
            main_user,
            family_name: clip(family_name, FAMILY_NAME_MAX_CHARS),
        }
    }

    /// Replace the display name if one is given.
    pub fn rename(&mut self, family_name: Option<String>) {
        if let Some(name) = clip(family_name, FAMILY_NAME_MAX_CHARS) {
            self.family_name = Some(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_keeps_previous_name_when_absent() {
        let mut family = Family::new("F1".into(), "U1".into(), Some("Kim".into()));
        family.rename(None);
        assert_eq!(family.family_name.as_deref(), Some("Kim"));

        family.rename(Some("Park".into()));
        assert_eq!(family.family_name.as_deref(), Some("Park"));
    }

    #[test]
    fn test_family_name_is_clipped() {
        let family = Family::new("F1".into(), "U1".into(), Some("a".repeat(50)));
        assert_eq!(family.family_name.unwrap().len(), FAMILY_NAME_MAX_CHARS);
    }
}
