//! Difference between the local and remote inventories.

use crate::inventory::LocalAsset;
use crate::remote::RemoteInventory;

/// Returns the local assets whose key is not in `remote`, in input order.
///
/// Each lookup is a hash set lookup on the lower-cased remote names, so the
/// result is the same as comparing every pair case-insensitively.
pub fn missing_assets<'a>(local: &'a [LocalAsset], remote: &RemoteInventory) -> Vec<&'a LocalAsset> {
    local
        .iter()
        .filter(|asset| !remote.contains(&asset.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::vcs::TreeEntry;

    fn asset(path: &str) -> LocalAsset {
        LocalAsset::from_entry(TreeEntry {
            path: path.to_string(),
            blob_id: path.to_string(),
        })
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let local = vec![asset("content/post_images/Cat.PNG")];
        let remote: RemoteInventory = ["cat.png"].into_iter().collect();

        assert!(missing_assets(&local, &remote).is_empty());
    }

    #[test]
    fn test_unmatched_asset_is_missing() {
        let local = vec![asset("content/post_images/Cat.PNG")];
        let remote: RemoteInventory = ["dog.png"].into_iter().collect();

        let missing = missing_assets(&local, &remote);
        assert_eq!(missing, vec![&local[0]]);
    }

    #[test]
    fn test_preserves_order_and_subset() {
        let local = vec![
            asset("a_images/one.png"),
            asset("a_images/two.png"),
            asset("b_images/three.png"),
            asset("b_images/Two.PNG"),
        ];
        let remote: RemoteInventory = ["TWO.png"].into_iter().collect();

        let missing: Vec<&str> = missing_assets(&local, &remote)
            .into_iter()
            .map(|a| a.path.as_str())
            .collect();

        assert_eq!(missing, vec!["a_images/one.png", "b_images/three.png"]);
    }

    #[test]
    fn test_spaces_match_underscored_remote_name() {
        let local = vec![asset("post_images/pic 1.png")];
        let remote: RemoteInventory = ["pic_1.png"].into_iter().collect();

        assert!(missing_assets(&local, &remote).is_empty());
    }

    #[test]
    fn test_empty_remote_keeps_everything() {
        let local = vec![asset("a_images/x.png"), asset("a_images/y.png")];
        assert_eq!(missing_assets(&local, &RemoteInventory::new()).len(), 2);
    }
}
