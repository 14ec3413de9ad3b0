//! Family membership: which parents may act on which children.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyRole {
    Parent,
    Child,
}

impl FamilyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyRole::Parent => "PARENT",
            FamilyRole::Child => "CHILD",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "PARENT" => Ok(FamilyRole::Parent),
            "CHILD" => Ok(FamilyRole::Child),
            _ => Err(format!("Invalid family role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMember {
    pub user_id: String,
    pub role: FamilyRole,
}

/// A family with its members, parents first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub family_id: String,
    pub members: Vec<FamilyMember>,
}

impl Family {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|member| member.user_id == user_id)
    }
}
