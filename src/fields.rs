//! Values derived from source objects and fed into the templates.

use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use kube::ResourceExt;

use crate::error::{Error, Result};
use crate::store::ObjectStore;
use crate::types::{AzureCluster, Release};

/// Offset of the control-plane master inside the VNET.
const MASTER_IP_OFFSET: u8 = 4;

/// An IP network: host bits of `network` are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cidr {
    network: IpAddr,
    prefix_len: u8,
}

impl Cidr {
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }
}

impl FromStr for Cidr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let fail = |reason| Error::ParseCidrFailed {
            cidr: s.to_string(),
            reason,
        };

        let (addr, prefix) = s.split_once('/').ok_or_else(|| fail("missing prefix length"))?;
        let addr: IpAddr = addr.parse().map_err(|_| fail("invalid IP address"))?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("invalid prefix length"));
        }
        let prefix_len: u8 = prefix.parse().map_err(|_| fail("invalid prefix length"))?;

        let network = match addr {
            IpAddr::V4(v4) => {
                if prefix_len > 32 {
                    return Err(fail("prefix length out of range"));
                }
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                if prefix_len > 128 {
                    return Err(fail("prefix length out of range"));
                }
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix_len)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };

        Ok(Cidr {
            network,
            prefix_len,
        })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// The first VNET CIDR block of `cluster`.
pub fn vnet_cidr(cluster: &AzureCluster) -> Result<Cidr> {
    let first = cluster
        .spec
        .network_spec
        .vnet
        .cidr_blocks
        .first()
        .ok_or_else(|| Error::VnetCidrMissing {
            cluster: cluster.name(),
        })?;
    first.parse()
}

/// Address `.4` of the VNET, reserved for the control-plane master.
///
/// IPv4-mapped IPv6 networks (`::ffff:a.b.c.d`) are treated as IPv4.
pub fn master_ip(vnet: &Cidr) -> Result<Ipv4Addr> {
    let network = match vnet.network {
        IpAddr::V4(network) => network,
        IpAddr::V6(network) => {
            network
                .to_ipv4_mapped()
                .ok_or_else(|| Error::Ipv6Unsupported {
                    cidr: vnet.to_string(),
                })?
        }
    };
    let [a, b, c, d] = network.octets();
    let d = d
        .checked_add(MASTER_IP_OFFSET)
        .ok_or_else(|| Error::MasterIpOutOfRange {
            cidr: vnet.to_string(),
        })?;
    Ok(Ipv4Addr::new(a, b, c, d))
}

/// Everything after the `k8s` label of an API endpoint host.
///
/// `api.abc123.k8s.example.installation.com` yields `example.installation.com`.
pub fn base_domain(host: &str) -> Result<String> {
    let labels: Vec<&str> = host.split('.').collect();
    labels
        .iter()
        .position(|label| *label == "k8s")
        .map(|i| labels[i + 1..].join("."))
        .ok_or_else(|| Error::BaseDomainNotFound {
            host: host.to_string(),
        })
}

/// Component name to version for the release `version` (a leading `v` is ignored).
pub async fn release_components<S: ObjectStore>(
    store: &S,
    version: &str,
) -> Result<BTreeMap<String, String>> {
    let name = version.strip_prefix('v').unwrap_or(version);
    let release: Release = store.get(None, name).await?;

    Ok(release
        .spec
        .components
        .into_iter()
        .map(|component| (component.name, component.version))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::capz::AzureClusterSpec;
    use crate::types::giantswarm::{ReleaseComponent, ReleaseSpec};

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    #[test]
    fn master_ip_is_fourth_address() {
        assert_eq!(
            master_ip(&cidr("10.0.0.0/16")).unwrap(),
            Ipv4Addr::new(10, 0, 0, 4)
        );
        assert_eq!(
            master_ip(&cidr("172.16.8.0/24")).unwrap(),
            Ipv4Addr::new(172, 16, 8, 4)
        );
    }

    #[test]
    fn master_ip_uses_network_address() {
        let vnet = cidr("10.1.2.77/24");
        assert_eq!(vnet.to_string(), "10.1.2.0/24");
        assert_eq!(master_ip(&vnet).unwrap(), Ipv4Addr::new(10, 1, 2, 4));
        // Pure: repeated calls agree.
        assert_eq!(master_ip(&vnet).unwrap(), master_ip(&vnet).unwrap());
    }

    #[test]
    fn master_ip_rejects_ipv6() {
        let err = master_ip(&cidr("fd00::/64")).unwrap_err();
        assert!(matches!(err, Error::Ipv6Unsupported { .. }), "{:?}", err);
    }

    #[test]
    fn master_ip_accepts_ipv4_mapped_networks() {
        assert_eq!(
            master_ip(&cidr("::ffff:10.0.0.0/104")).unwrap(),
            Ipv4Addr::new(10, 0, 0, 4)
        );
        // Masking away the ffff marker leaves a plain IPv6 network.
        let err = master_ip(&cidr("::ffff:10.0.0.0/64")).unwrap_err();
        assert!(matches!(err, Error::Ipv6Unsupported { .. }), "{:?}", err);
    }

    #[test]
    fn master_ip_rejects_last_octet_overflow() {
        let err = master_ip(&cidr("10.0.0.252/30")).unwrap_err();
        assert!(matches!(err, Error::MasterIpOutOfRange { .. }), "{:?}", err);
    }

    #[test]
    fn cidr_parsing_rejects_garbage() {
        let bad_inputs = [
            "10.0.0.0",
            "10.0.0.0/33",
            "10.0.0/16",
            "10.0.0.0/",
            "10.0.0.0/+8",
            "::/129",
        ];
        for bad in bad_inputs {
            let err = bad.parse::<Cidr>().unwrap_err();
            assert!(matches!(err, Error::ParseCidrFailed { .. }), "{}: {:?}", bad, err);
        }
        assert_eq!(cidr("0.0.0.0/0").prefix_len(), 0);
    }

    #[test]
    fn base_domain_follows_k8s_label() {
        assert_eq!(
            base_domain("api.abc123.k8s.example.installation.com").unwrap(),
            "example.installation.com"
        );
        assert_eq!(base_domain("k8s.a.b").unwrap(), "a.b");
        assert_eq!(base_domain("api.x.k8s").unwrap(), "");
    }

    #[test]
    fn base_domain_requires_k8s_label() {
        for host in ["api.abc123.example.com", "k8sapi.example.com", ""] {
            let err = base_domain(host).unwrap_err();
            assert!(matches!(err, Error::BaseDomainNotFound { .. }), "{}", host);
        }
    }

    #[test]
    fn vnet_cidr_takes_first_block() {
        let mut spec = AzureClusterSpec::default();
        spec.network_spec.vnet.cidr_blocks =
            vec!["10.4.0.0/16".to_string(), "10.5.0.0/16".to_string()];
        let cluster = AzureCluster::new("abc123", spec);

        assert_eq!(vnet_cidr(&cluster).unwrap(), cidr("10.4.0.0/16"));
    }

    #[test]
    fn vnet_cidr_requires_a_block() {
        let cluster = AzureCluster::new("abc123", AzureClusterSpec::default());
        let err = vnet_cidr(&cluster).unwrap_err();
        assert!(matches!(err, Error::VnetCidrMissing { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn release_components_strip_leading_v() {
        let store = MemoryStore::new();
        store.insert(Release::new(
            "14.1.0",
            ReleaseSpec {
                components: vec![
                    ReleaseComponent {
                        name: "kubernetes".to_string(),
                        version: "1.19.9".to_string(),
                    },
                    ReleaseComponent {
                        name: "etcd".to_string(),
                        version: "3.4.14".to_string(),
                    },
                ],
            },
        ));

        let components = release_components(&store, "v14.1.0").await.unwrap();
        assert_eq!(components.get("kubernetes").map(String::as_str), Some("1.19.9"));
        assert_eq!(components.get("etcd").map(String::as_str), Some("3.4.14"));

        let err = release_components(&store, "v15.0.0").await.unwrap_err();
        assert!(err.is_not_found(), "{:?}", err);
    }
}
