//! Property-based tests using proptest
//!
//! Tests that verify properties hold for arbitrary inputs.

use proptest::prelude::*;
use tnmanage::commands::list::format_bytes;
use tnmanage::truenas::client::{filter_pool, quota_bytes};
use tnmanage::truenas::Dataset;

fn dataset(id: &str, pool: &str) -> Dataset {
    Dataset {
        id: id.to_string(),
        pool: pool.to_string(),
        kind: "FILESYSTEM".to_string(),
        ..Dataset::default()
    }
}

proptest! {
    #[test]
    fn test_quota_is_gib_in_bytes(gb in 1i64..=8_589_934_591i64) {
        // Given: Any positive size that fits in u64 bytes
        // When: Converting to a quota
        let quota = quota_bytes(gb).unwrap();

        // Then: It is exactly gb * 1024^3
        prop_assert_eq!(quota, Some(gb as u64 * 1024 * 1024 * 1024));
    }

    #[test]
    fn test_non_positive_quota_is_omitted(gb in i64::MIN..=0i64) {
        prop_assert_eq!(quota_bytes(gb).unwrap(), None);
    }

    #[test]
    fn test_pool_filter_keeps_only_pool_members(
        pool in "[a-z]{1,8}",
        children in prop::collection::vec("[a-z]{1,8}", 0..5),
        suffix in "[a-z0-9]{1,4}"
    ) {
        // Given: The pool root, its children, and a look-alike pool
        let mut all = vec![dataset(&pool, &pool)];
        all.extend(children.iter().map(|c| dataset(&format!("{}/{}", pool, c), "")));
        let lookalike = format!("{}{}", pool, suffix);
        all.push(dataset(&format!("{}/x", lookalike), &lookalike));

        // When: Filtering by pool
        let kept = filter_pool(all, &pool);

        // Then: Root and children survive, in order; the look-alike does not
        prop_assert_eq!(kept.len(), children.len() + 1);
        prop_assert_eq!(&kept[0].id, &pool);
        for (ds, child) in kept[1..].iter().zip(&children) {
            prop_assert_eq!(&ds.id, &format!("{}/{}", pool, child));
        }
    }

    #[test]
    fn test_small_sizes_print_in_bytes(bytes in 0u64..1024) {
        prop_assert_eq!(format_bytes(bytes), format!("{} B", bytes));
    }

    #[test]
    fn test_large_sizes_use_binary_prefix(bytes in 1024u64..) {
        // Given: Any size of at least 1 KiB
        let formatted = format_bytes(bytes);

        // When: Splitting number and unit
        let (number, unit) = formatted.split_once(' ').unwrap();

        // Then: One decimal place and a binary unit
        prop_assert!(["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"].contains(&unit));
        let decimals = number.split_once('.').map(|(_, d)| d.len());
        prop_assert_eq!(decimals, Some(1));
        let value: f64 = number.parse().unwrap();
        prop_assert!((1.0..=1024.0).contains(&value));
    }
}

#[test]
fn test_format_bytes_examples() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1536), "1.5 KiB");
    assert_eq!(format_bytes(1_073_741_824), "1.0 GiB");
    assert_eq!(format_bytes(u64::MAX), "16.0 EiB");
}

#[test]
fn test_quota_overflow_is_rejected() {
    assert!(quota_bytes(i64::MAX).is_err());
}
