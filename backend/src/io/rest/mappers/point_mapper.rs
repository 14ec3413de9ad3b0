use crate::domain::models::{
    PointEntry, PointRequestDecision as DomainDecision, PointRequestType as DomainRequestType,
    PointStatus as DomainStatus, PointSummary as DomainPointSummary,
    UserPointsSummary as DomainUserPointsSummary,
};
use shared::{
    Point as SharedPoint, PointRequest as SharedPointRequest,
    PointRequestDecision as SharedDecision, PointRequestType as SharedRequestType,
    PointStatus as SharedStatus, PointSummary as SharedPointSummary,
    UserPointsSummary as SharedUserPointsSummary,
};

pub struct PointMapper;

impl PointMapper {
    pub fn to_dto(domain: &PointEntry) -> SharedPoint {
        let settlement = domain.settlement();
        SharedPoint {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            status: Self::to_dto_status(domain.status()),
            points: domain.points,
            balance: domain.balance(),
            created_on: domain.created_on,
            updated_on: domain.updated_on,
            request: SharedPointRequest {
                request_type: Self::to_dto_type(domain.request_type),
                reason: domain.reason.clone(),
                decision: domain.decision().map(Self::to_dto_decision),
                decided_by_user_id: settlement.map(|s| s.decided_by_user_id.clone()),
                decided_on: settlement.map(|s| s.decided_on),
                parent_notes: settlement.and_then(|s| s.parent_notes.clone()),
            },
        }
    }

    fn to_dto_status(status: DomainStatus) -> SharedStatus {
        match status {
            DomainStatus::Waiting => SharedStatus::Waiting,
            DomainStatus::Settled => SharedStatus::Settled,
        }
    }

    fn to_dto_type(request_type: DomainRequestType) -> SharedRequestType {
        match request_type {
            DomainRequestType::Add => SharedRequestType::Add,
            DomainRequestType::Subtract => SharedRequestType::Subtract,
            DomainRequestType::Cashout => SharedRequestType::Cashout,
        }
    }

    fn to_dto_decision(decision: DomainDecision) -> SharedDecision {
        match decision {
            DomainDecision::Approve => SharedDecision::Approve,
            DomainDecision::Deny => SharedDecision::Deny,
        }
    }
}

pub struct SummaryMapper;

impl SummaryMapper {
    pub fn to_dto(domain: &DomainPointSummary) -> SharedPointSummary {
        SharedPointSummary {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            points: domain.points,
            reason: domain.reason.clone(),
            request_type: PointMapper::to_dto_type(domain.request_type),
            status: PointMapper::to_dto_status(domain.status),
            parent_notes: domain.parent_notes.clone(),
            decided_by_user_id: domain.decided_by_user_id.clone(),
            decision: domain.decision.map(PointMapper::to_dto_decision),
            updated_on: domain.updated_on,
        }
    }

    pub fn to_user_summary_dto(domain: DomainUserPointsSummary) -> SharedUserPointsSummary {
        SharedUserPointsSummary {
            balance: domain.balance,
            points_last_7_days: domain.points_last_7_days,
            points_lost_last_7_days: domain.points_lost_last_7_days,
            recent_points: domain.recent_points.iter().map(Self::to_dto).collect(),
            recent_requests: domain.recent_requests.iter().map(Self::to_dto).collect(),
            recent_cashouts: domain.recent_cashouts.iter().map(Self::to_dto).collect(),
        }
    }
}
