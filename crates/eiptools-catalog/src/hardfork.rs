//! Hard-fork groups: a meta EIP and the EIPs it schedules.

use eiptools_content::status_color;
use eiptools_core::{Error, Result};
use serde::Serialize;

use crate::catalog::Catalogs;

/// Named hard forks and their meta EIPs.
pub const KNOWN_HARD_FORKS: [(&str, u32); 2] = [("Pectra", 7600), ("Glamsterdam", 7773)];

/// One EIP in a hard-fork group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardForkMember {
    pub eip_no: u32,
    pub title: String,
    pub status: String,
    pub color: &'static str,
    #[serde(rename = "isERC")]
    pub is_erc: bool,
}

/// A meta EIP followed by the EIPs it requires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardForkGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub meta: HardForkMember,
    pub eips: Vec<HardForkMember>,
}

/// Meta EIP number for a hard-fork name (case-insensitive) or number.
pub fn resolve_hard_fork(name_or_number: &str) -> Option<u32> {
    let trimmed = name_or_number.trim();
    KNOWN_HARD_FORKS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, n)| *n)
        .or_else(|| trimmed.parse().ok())
}

/// Group for meta EIP `meta_eip`, taken from the EIP catalog.
///
/// Required EIPs missing from the catalog are listed as `EIP-{n}` with
/// status `Unknown`.
pub fn hard_fork(catalogs: &Catalogs, meta_eip: u32) -> Result<HardForkGroup> {
    let entry = catalogs
        .eip
        .get(meta_eip)
        .ok_or_else(|| Error::not_found("meta EIP", meta_eip.to_string()))?;

    let member = |number: u32| {
        let entry = catalogs.eip.get(number);
        let status = entry
            .and_then(|e| e.status.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        HardForkMember {
            eip_no: number,
            title: entry.map_or_else(|| format!("EIP-{number}"), |e| e.title.clone()),
            color: status_color(&status),
            status,
            is_erc: entry.is_some_and(|e| e.is_erc()),
        }
    };

    Ok(HardForkGroup {
        name: KNOWN_HARD_FORKS
            .iter()
            .find(|(_, n)| *n == meta_eip)
            .map(|(name, _)| *name),
        meta: member(meta_eip),
        eips: entry.requires.iter().copied().map(member).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{entry, sample_catalogs};
    use eiptools_core::DocKind;

    #[test]
    fn test_group_lists_requires() {
        let mut catalogs = sample_catalogs();
        catalogs
            .eip
            .insert(7600, entry(DocKind::Eip, 7600, "Hardfork Meta - Pectra", &[2718, 9999]));

        let group = hard_fork(&catalogs, 7600).unwrap();
        assert_eq!(group.name, Some("Pectra"));
        assert_eq!(group.meta.title, "Hardfork Meta - Pectra");
        assert_eq!(group.eips.len(), 2);
        assert_eq!(group.eips[0].title, "Typed Transaction Envelope");
        assert_eq!(group.eips[0].color, "#2ECC71");
        assert_eq!(group.eips[1].title, "EIP-9999");
        assert_eq!(group.eips[1].status, "Unknown");
        assert_eq!(group.eips[1].color, "#D69E2E");
    }

    #[test]
    fn test_unknown_meta_is_not_found() {
        let err = hard_fork(&sample_catalogs(), 7600).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_resolve_hard_fork() {
        assert_eq!(resolve_hard_fork("pectra"), Some(7600));
        assert_eq!(resolve_hard_fork("7773"), Some(7773));
        assert_eq!(resolve_hard_fork("osaka"), None);
    }
}
