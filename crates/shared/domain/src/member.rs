//! Member relation between a family and a sub user.

use serde::{Deserialize, Serialize};

use crate::constants::{clip, NICKNAME_MAX_CHARS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Member {
    pub id: String,
    pub family_id: String,
    pub user_id: String,
    pub nickname: Option<String>,
}

impl Member {
    pub fn new(id: String, family_id: String, user_id: String, nickname: Option<String>) -> Self {
        Self {
            id,
            family_id,
            user_id,
            nickname: clip(nickname, NICKNAME_MAX_CHARS),
        }
    }

    pub fn rename(&mut self, nickname: Option<String>) {
        if let Some(nickname) = clip(nickname, NICKNAME_MAX_CHARS) {
            self.nickname = Some(nickname);
        }
    }
}

/// Optional filters for member listing. Both present means AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub family_id: Option<String>,
    pub user_id: Option<String>,
}

impl MemberFilter {
    pub fn matches(&self, member: &Member) -> bool {
        self.family_id
            .as_deref()
            .map_or(true, |id| member.family_id == id)
            && self
                .user_id
                .as_deref()
                .map_or(true, |id| member.user_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_combines_with_and() {
        let member = Member::new("M1".into(), "F1".into(), "U1".into(), None);

        assert!(MemberFilter::default().matches(&member));
        assert!(MemberFilter {
            family_id: Some("F1".into()),
            user_id: Some("U1".into()),
        }
        .matches(&member));
        assert!(!MemberFilter {
            family_id: Some("F1".into()),
            user_id: Some("U2".into()),
        }
        .matches(&member));
    }
}
