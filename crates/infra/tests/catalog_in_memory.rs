//! Catalog behaviour against the in-memory store.

mod common;

use proptest::prelude::*;

use storefront_catalog::{CatalogStorage, CatalogTx, NewFamily};
use storefront_infra::InMemoryCatalogStore;

fn store() -> InMemoryCatalogStore {
    InMemoryCatalogStore::new()
}

#[tokio::test]
async fn create_and_read_back() {
    common::create_and_read_back(store()).await;
}

#[tokio::test]
async fn failed_attribute_leaves_no_family() {
    common::failed_attribute_leaves_no_family(store()).await;
}

#[tokio::test]
async fn oversized_attribute_rolls_back() {
    common::oversized_attribute_rolls_back(store()).await;
}

#[tokio::test]
async fn oversized_variant_rolls_back_create() {
    common::oversized_variant_rolls_back_create(store()).await;
}

#[tokio::test]
async fn oversized_variant_rolls_back_batch() {
    common::oversized_variant_rolls_back_batch(store()).await;
}

#[tokio::test]
async fn missing_variant_is_not_found() {
    common::missing_variant_is_not_found(store()).await;
}

#[tokio::test]
async fn variant_lookup_matches_family_and_spec() {
    common::variant_lookup_matches_family_and_spec(store()).await;
}

#[tokio::test]
async fn duplicate_variant_specs_resolve_to_oldest() {
    common::duplicate_variant_specs_resolve_to_oldest(store()).await;
}

#[tokio::test]
async fn add_variants_to_missing_family_is_not_found() {
    common::add_variants_to_missing_family_is_not_found(store()).await;
}

#[tokio::test]
async fn active_flag_drives_listings() {
    common::active_flag_drives_listings(store()).await;
}

#[tokio::test]
async fn set_active_on_missing_family_is_not_found() {
    common::set_active_on_missing_family_is_not_found(store()).await;
}

#[tokio::test]
async fn orphaned_category_lists_with_empty_name() {
    common::orphaned_category_lists_with_empty_name(store()).await;
}

#[tokio::test]
async fn detail_reads_are_repeatable() {
    common::detail_reads_are_repeatable(store()).await;
}

#[tokio::test]
async fn duplicate_attribute_kinds_are_kept() {
    common::duplicate_attribute_kinds_are_kept(store()).await;
}

#[tokio::test]
async fn metadata_blobs_survive_storage() {
    common::metadata_blobs_survive_storage(store()).await;
}

#[tokio::test]
async fn categories_are_unique_and_listed() {
    common::categories_are_unique_and_listed(store()).await;
}

#[tokio::test]
async fn uncommitted_writes_are_invisible_and_dropped() {
    let store = store();

    let mut tx = store.begin().await.unwrap();
    let id = tx.insert_family(&NewFamily::titled("Draft")).await.unwrap();
    tx.insert_attribute(id, "k", "v").await.unwrap();
    // Visible inside the transaction only.
    assert_eq!(tx.list_attributes(id).await.unwrap().len(), 1);
    let mut reader = store.begin().await.unwrap();
    assert!(reader.get_family(id).await.unwrap_err().is_not_found());
    drop(tx);

    let mut after = store.begin().await.unwrap();
    assert!(after.get_family(id).await.unwrap_err().is_not_found());
    assert!(after.list_attributes(id).await.unwrap().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn attribute_order_is_preserved(
        pairs in proptest::collection::vec(("[a-z]{1,12}", "[a-zA-Z0-9 ]{0,40}"), 0..16)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            common::attribute_order_is_preserved(store(), &pairs).await;
        });
    }
}
