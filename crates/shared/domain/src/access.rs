//! Family-scoped access rule.

use crate::account::Role;

/// Who may read and write a family's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyAccess {
    pub main_user: String,
    pub member_user_ids: Vec<String>,
}

impl FamilyAccess {
    pub fn new(main_user: impl Into<String>, member_user_ids: Vec<String>) -> Self {
        Self {
            main_user: main_user.into(),
            member_user_ids,
        }
    }

    /// SYSTEM always passes; otherwise the requester must be the family's
    /// main user or one of its member users.
    pub fn permits(&self, requester_id: &str, requester_role: Role) -> bool {
        requester_role.is_system()
            || self.main_user == requester_id
            || self.member_user_ids.iter().any(|id| id == requester_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access() -> FamilyAccess {
        FamilyAccess::new("U_MAIN", vec!["U_SUB1".into(), "U_SUB2".into()])
    }

    #[test]
    fn test_main_user_and_members_are_permitted() {
        assert!(access().permits("U_MAIN", Role::Main));
        assert!(access().permits("U_SUB2", Role::Sub));
    }

    #[test]
    fn test_outsider_is_rejected() {
        assert!(!access().permits("U_OTHER", Role::Sub));
        assert!(!access().permits("U_OTHER", Role::Main));
    }

    #[test]
    fn test_system_reads_any_family() {
        assert!(access().permits("U_ADMIN", Role::System));
    }
}
