use crate::domain::models::{Family, FamilyRole as DomainRole};
use shared::{Family as SharedFamily, FamilyMember as SharedMember, FamilyRole as SharedRole};

pub struct FamilyMapper;

impl FamilyMapper {
    pub fn to_dto(domain: &Family) -> SharedFamily {
        SharedFamily {
            family_id: domain.family_id.clone(),
            members: domain
                .members
                .iter()
                .map(|member| SharedMember {
                    user_id: member.user_id.clone(),
                    role: Self::to_dto_role(member.role),
                })
                .collect(),
        }
    }

    fn to_dto_role(role: DomainRole) -> SharedRole {
        match role {
            DomainRole::Parent => SharedRole::Parent,
            DomainRole::Child => SharedRole::Child,
        }
    }
}
