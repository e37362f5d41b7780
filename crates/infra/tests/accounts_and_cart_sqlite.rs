//! Account and cart stores against an in-memory SQLite database.

use sqlx::SqlitePool;

use storefront_auth::{AccountError, AccountStore, Gender, Profile};
use storefront_cart::{CartStore, NewCartLine};
use storefront_core::{FamilyId, UserId, VariantId};
use storefront_infra::db::{self, SqliteAccountStore, SqliteCartStore};

async fn pool() -> SqlitePool {
    db::connect_and_bootstrap("sqlite::memory:").await.unwrap()
}

#[tokio::test]
async fn account_lifecycle() {
    let accounts = SqliteAccountStore::new(pool().await);

    assert!(accounts.find_by_open_id("o-1").await.unwrap().is_none());
    let id = accounts.create("o-1", "sk-1").await.unwrap();

    let found = accounts.find_by_open_id("o-1").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.session_key, "sk-1");
    assert!(found.active);
    assert!(!found.admin);
    assert_eq!(found.profile, Profile::default());

    accounts.update_session_key(id, "sk-2").await.unwrap();
    assert_eq!(accounts.get(id).await.unwrap().session_key, "sk-2");

    let profile = Profile {
        nick_name: "li".into(),
        avatar: "https://img/a.png".into(),
        gender: Gender::Male,
    };
    accounts.update_profile(id, &profile).await.unwrap();
    assert_eq!(accounts.get(id).await.unwrap().profile, profile);

    accounts.set_admin(id, true).await.unwrap();
    assert!(accounts.get(id).await.unwrap().admin);
}

#[tokio::test]
async fn open_ids_are_unique() {
    let accounts = SqliteAccountStore::new(pool().await);
    accounts.create("o-1", "a").await.unwrap();
    assert!(matches!(
        accounts.create("o-1", "b").await,
        Err(AccountError::Storage(_))
    ));
}

#[tokio::test]
async fn active_check_fails_closed() {
    let accounts = SqliteAccountStore::new(pool().await);
    let id = accounts.create("o-1", "sk").await.unwrap();

    assert!(accounts.is_active(id).await.unwrap());
    accounts.set_active(id, false).await.unwrap();
    assert!(!accounts.is_active(id).await.unwrap());
    accounts.set_active(id, true).await.unwrap();
    assert!(accounts.is_active(id).await.unwrap());

    assert!(!accounts.is_active(UserId::new(9999)).await.unwrap());
}

#[tokio::test]
async fn updates_on_unknown_user_are_not_found() {
    let accounts = SqliteAccountStore::new(pool().await);
    let ghost = UserId::new(5);
    assert!(matches!(
        accounts.set_active(ghost, false).await,
        Err(AccountError::NotFound(_))
    ));
    assert!(matches!(
        accounts.update_profile(ghost, &Profile::default()).await,
        Err(AccountError::NotFound(_))
    ));
    assert!(matches!(accounts.get(ghost).await, Err(AccountError::NotFound(_))));
}

#[tokio::test]
async fn cart_lines_are_per_user_and_ordered() {
    let carts = SqliteCartStore::new(pool().await);
    let alice = UserId::new(1);
    let bob = UserId::new(2);

    let first = carts
        .add_line(alice, &NewCartLine::new(VariantId::new(10), FamilyId::new(1), 2))
        .await
        .unwrap();
    let second = carts
        .add_line(alice, &NewCartLine::new(VariantId::new(11), FamilyId::new(1), 1))
        .await
        .unwrap();
    carts
        .add_line(bob, &NewCartLine::new(VariantId::new(10), FamilyId::new(1), 5))
        .await
        .unwrap();

    let lines = carts.list_lines(alice).await.unwrap();
    let ids: Vec<_> = lines.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(lines[0].count, 2);
    assert_eq!(lines[0].variant_id, VariantId::new(10));
    assert!(lines.iter().all(|l| l.user_id == alice && l.active));

    assert_eq!(carts.list_lines(bob).await.unwrap().len(), 1);
    assert!(carts.list_lines(UserId::new(3)).await.unwrap().is_empty());
}
