//! Containment forest of a subnet batch, computed locally.
//!
//! The migration itself asks the target for parents. This module answers
//! the same question from the batch alone, for dry-run plans and to warn
//! about subnets whose parent is ordered after them.

use super::parent::MIN_PARENT_MASK;
use crate::models::{Ipv4, Subnet};
use std::collections::HashMap;

/// One line of a dry-run plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    /// Position in creation order, from 1.
    pub position: usize,
    pub cidr: Ipv4,
    /// Narrowest containing block in the batch.
    pub parent: Option<Ipv4>,
    /// The parent is created after this subnet, so the target will not
    /// know it yet.
    pub parent_late: bool,
    pub vlan_number: Option<u32>,
    pub description: String,
}

/// Index of each subnet's narrowest ancestor within `subnets`.
///
/// Uses the same widening search as the target side resolver, against a
/// map of the batch. Duplicate blocks resolve to the first occurrence.
pub fn local_parents(subnets: &[Subnet]) -> Vec<Option<usize>> {
    let mut by_block: HashMap<Ipv4, usize> = HashMap::new();
    for (i, subnet) in subnets.iter().enumerate() {
        by_block.entry(network(subnet)).or_insert(i);
    }

    subnets
        .iter()
        .map(|subnet| {
            let block = network(subnet);
            (MIN_PARENT_MASK..block.mask)
                .rev()
                .filter_map(|n| block.supernet(n).ok())
                .find_map(|candidate| by_block.get(&candidate).copied())
                .filter(|&p| network(&subnets[p]).contains(&block))
        })
        .collect()
}

/// `(child, parent)` index pairs where the parent comes later.
pub fn order_hazards(ordered: &[Subnet]) -> Vec<(usize, usize)> {
    local_parents(ordered)
        .into_iter()
        .enumerate()
        .filter_map(|(child, parent)| parent.filter(|&p| p > child).map(|p| (child, p)))
        .collect()
}

/// Dry-run plan for subnets already in creation order.
pub fn plan(ordered: &[Subnet]) -> Vec<PlanRow> {
    local_parents(ordered)
        .into_iter()
        .enumerate()
        .map(|(i, parent)| PlanRow {
            position: i + 1,
            cidr: ordered[i].cidr(),
            parent: parent.map(|p| ordered[p].cidr()),
            parent_late: parent.is_some_and(|p| p > i),
            vlan_number: ordered[i].vlan_number,
            description: ordered[i].description.clone(),
        })
        .collect()
}

fn network(subnet: &Subnet) -> Ipv4 {
    subnet.cidr().supernet(subnet.mask).unwrap_or(subnet.cidr())
}
