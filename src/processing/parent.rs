//! Master subnet discovery against the target.

use crate::error::{MigrateError, Result};
use crate::ipam::Inventory;
use crate::models::{IpamId, Ipv4};
use std::net::Ipv4Addr;

/// Widest block tried as a parent, a class A.
pub const MIN_PARENT_MASK: u8 = 8;

/// Finds the narrowest block already registered in the target that
/// contains a subnet. It only trusts what the target reports.
pub struct ParentResolver<'a, I: Inventory> {
    inventory: &'a I,
}

impl<'a, I: Inventory> ParentResolver<'a, I> {
    pub fn new(inventory: &'a I) -> Self {
        Self { inventory }
    }

    /// Look up `address/n` for `n = mask - 1` down to [`MIN_PARENT_MASK`].
    ///
    /// The search starts one bit wider than the subnet so the subnet itself
    /// is never matched. Widening a bit at a time makes the first hit the
    /// narrowest ancestor. Returns `None` when nothing down to /8 exists,
    /// and makes no calls at all for a mask of 8 or less.
    pub async fn resolve_parent(&self, address: Ipv4Addr, mask: u8) -> Result<Option<IpamId>> {
        log::debug!("Looking for parent subnet for CIDR {address}/{mask}");
        let subnet = Ipv4::from_parts(address, mask)?;

        for n in (MIN_PARENT_MASK..mask).rev() {
            let candidate = subnet.supernet(n)?;
            log::debug!("Looking for subnet CIDR {candidate} in target");

            match self.inventory.subnet_by_cidr(&candidate).await? {
                Some(found) => {
                    let id = found.id.ok_or_else(|| MigrateError::Decode {
                        path: "id".to_string(),
                        message: format!("subnet {candidate} returned without an id"),
                    })?;
                    log::debug!("Parent found: subnet ID {id} for CIDR {candidate}");
                    return Ok(Some(id));
                }
                None => log::debug!("Subnet {candidate} not found in target"),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::models::{Address, Subnet, Vlan};
    use std::sync::Mutex;

    /// Target holding a fixed set of subnets, recording every lookup.
    struct Blocks {
        subnets: Vec<(Ipv4, IpamId)>,
        lookups: Mutex<Vec<String>>,
        fail_on: Option<Ipv4>,
    }

    impl Blocks {
        fn new(subnets: &[(&str, IpamId)]) -> Self {
            Self {
                subnets: subnets
                    .iter()
                    .map(|(c, id)| (Ipv4::new(c).unwrap(), *id))
                    .collect(),
                lookups: Mutex::new(vec![]),
                fail_on: None,
            }
        }

        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait(?Send)]
    impl Inventory for Blocks {
        async fn create_vlan(&self, _vlan: &Vlan) -> Result<IpamId> {
            unreachable!()
        }
        async fn create_subnet(&self, _subnet: &Subnet) -> Result<IpamId> {
            unreachable!()
        }
        async fn create_address(&self, _address: &Address) -> Result<IpamId> {
            unreachable!()
        }
        async fn vlan_by_number(&self, _number: u32) -> Result<Option<Vlan>> {
            unreachable!()
        }

        async fn subnet_by_cidr(&self, cidr: &Ipv4) -> Result<Option<Subnet>> {
            self.lookups.lock().unwrap().push(cidr.to_string());
            if self.fail_on == Some(*cidr) {
                return Err(MigrateError::Api {
                    code: 500,
                    message: "database error".into(),
                });
            }
            Ok(self
                .subnets
                .iter()
                .find(|(c, _)| c == cidr)
                .map(|(c, id)| {
                    let mut s = Subnet::new(c.addr, c.mask, "", 1);
                    s.id = Some(*id);
                    s
                }))
        }
    }

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_finds_narrowest_parent() {
        let target = Blocks::new(&[("10.0.0.0/8", 1), ("10.10.0.0/16", 2)]);
        let resolver = ParentResolver::new(&target);
        let parent = resolver.resolve_parent(ip("10.10.2.0"), 24).await.unwrap();
        assert_eq!(parent, Some(2));
        assert_eq!(
            target.lookups(),
            vec![
                "10.10.2.0/23",
                "10.10.0.0/22",
                "10.10.0.0/21",
                "10.10.0.0/20",
                "10.10.0.0/19",
                "10.10.0.0/18",
                "10.10.0.0/17",
                "10.10.0.0/16",
            ]
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_class_a() {
        let target = Blocks::new(&[("10.0.0.0/8", 1)]);
        let parent = ParentResolver::new(&target)
            .resolve_parent(ip("10.10.2.0"), 24)
            .await
            .unwrap();
        assert_eq!(parent, Some(1));
        assert_eq!(target.lookups().len(), 16);
        assert_eq!(target.lookups().last().unwrap(), "10.0.0.0/8");
    }

    #[tokio::test]
    async fn test_no_parent() {
        let target = Blocks::new(&[("172.16.0.0/12", 5)]);
        let parent = ParentResolver::new(&target)
            .resolve_parent(ip("10.10.2.0"), 24)
            .await
            .unwrap();
        assert_eq!(parent, None);
        // /23 down to /8, never wider
        let lookups = target.lookups();
        assert_eq!(lookups.len(), 16);
        assert!(lookups
            .iter()
            .all(|p| Ipv4::new(p).unwrap().mask >= MIN_PARENT_MASK));
    }

    #[tokio::test]
    async fn test_does_not_match_itself() {
        let target = Blocks::new(&[("10.10.2.0/24", 9)]);
        let parent = ParentResolver::new(&target)
            .resolve_parent(ip("10.10.2.0"), 24)
            .await
            .unwrap();
        assert_eq!(parent, None);
        assert!(!target.lookups().contains(&"10.10.2.0/24".to_string()));
    }

    #[tokio::test]
    async fn test_mask_at_or_below_floor_makes_no_calls() {
        let target = Blocks::new(&[("10.0.0.0/8", 1)]);
        let resolver = ParentResolver::new(&target);
        for mask in [0, 1, 7, 8] {
            assert_eq!(resolver.resolve_parent(ip("10.0.0.0"), mask).await.unwrap(), None);
        }
        assert!(target.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_mask_nine_looks_up_only_eight() {
        let target = Blocks::new(&[("10.0.0.0/8", 1)]);
        let parent = ParentResolver::new(&target)
            .resolve_parent(ip("10.128.0.0"), 9)
            .await
            .unwrap();
        assert_eq!(parent, Some(1));
        assert_eq!(target.lookups(), vec!["10.0.0.0/8"]);
    }

    #[tokio::test]
    async fn test_other_failures_are_fatal() {
        let mut target = Blocks::new(&[("10.0.0.0/8", 1)]);
        target.fail_on = Some(Ipv4::new("10.10.0.0/16").unwrap());
        let err = ParentResolver::new(&target)
            .resolve_parent(ip("10.10.2.0"), 24)
            .await
            .unwrap_err();
        assert!(matches!(err, MigrateError::Api { code: 500, .. }));
        // stopped at the failing lookup
        assert_eq!(target.lookups().last().unwrap(), "10.10.0.0/16");
    }

    #[tokio::test]
    async fn test_invalid_mask_is_rejected() {
        let target = Blocks::new(&[]);
        let err = ParentResolver::new(&target)
            .resolve_parent(ip("10.0.0.0"), 33)
            .await
            .unwrap_err();
        assert!(matches!(err, MigrateError::InvalidMask { .. }));
        assert!(target.lookups().is_empty());
    }
}
