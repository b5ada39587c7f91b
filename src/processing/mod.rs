//! Subnet hierarchy logic.
//!
//! - [`ordering`] - Creation order of a subnet batch
//! - [`parent`] - Parent discovery against the target
//! - [`hierarchy`] - Containment forest of the batch itself
//! - [`index`] - VLAN number and subnet CIDR lookups

pub mod hierarchy;
mod index;
mod ordering;
mod parent;

// Re-export public functions
pub use hierarchy::{local_parents, order_hazards, plan, PlanRow};
pub use index::{subnet_id_for_cidr, vlan_id_for_number};
pub use ordering::{duplicate_cidrs, order_subnets, OrderStrategy};
pub use parent::{ParentResolver, MIN_PARENT_MASK};
