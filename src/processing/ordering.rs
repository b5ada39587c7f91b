//! Order in which subnets are created.
//!
//! A subnet can only find its parent in the target if the parent was
//! created first. [`OrderStrategy::Lexicographic`] sorts on the
//! `"address/mask"` text and gets this right for most real address plans,
//! but compares octets as text: `10.10.0.0/16` sorts ahead of
//! `10.8.0.0/13` although the latter contains it.
//! [`OrderStrategy::Containment`] sorts numerically and always puts a
//! block ahead of the blocks inside it.

use crate::models::Subnet;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OrderStrategy {
    /// Byte-wise order of `"address/mask"`
    #[default]
    Lexicographic,
    /// Numeric network address, then mask
    Containment,
}

/// Sort subnets for insertion. Both strategies are stable.
pub fn order_subnets(mut subnets: Vec<Subnet>, strategy: OrderStrategy) -> Vec<Subnet> {
    match strategy {
        OrderStrategy::Lexicographic => subnets.sort_by_cached_key(|s| s.cidr_string()),
        OrderStrategy::Containment => subnets.sort_by_key(|s| (s.cidr().lo(), s.mask)),
    }
    subnets
}

/// CIDRs that appear more than once in the batch.
pub fn duplicate_cidrs(subnets: &[Subnet]) -> Vec<String> {
    subnets
        .iter()
        .map(|s| s.cidr().supernet(s.mask).unwrap_or(s.cidr()))
        .duplicates()
        .map(|cidr| cidr.to_string())
        .collect()
}
