pub mod family_mapper;
pub mod point_mapper;

pub use family_mapper::FamilyMapper;
pub use point_mapper::{PointMapper, SummaryMapper};
