//! Service wiring: one SQLite pool shared by every store.

use std::sync::Arc;

use sqlx::SqlitePool;

use storefront_auth::{AccountStore, Hs256TokenService, IdentityProvider, JwtValidator, SessionService};
use storefront_cart::CartStore;
use storefront_catalog::CatalogService;
use storefront_infra::db::{self, SqliteAccountStore, SqliteCartStore, SqliteCatalogStore};
use storefront_infra::external::WeChatIdentityProvider;
use storefront_infra::AppConfig;

pub type Catalog = CatalogService<SqliteCatalogStore>;

#[derive(Clone)]
pub struct AppServices {
    pub catalog: Catalog,
    pub carts: Arc<dyn CartStore>,
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: SessionService,
}

impl AppServices {
    pub fn new(
        pool: SqlitePool,
        identity: Arc<dyn IdentityProvider>,
        tokens: Hs256TokenService,
        admin_open_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        let accounts: Arc<dyn AccountStore> = Arc::new(SqliteAccountStore::new(pool.clone()));
        let sessions =
            SessionService::new(accounts.clone(), identity, tokens).with_admins(admin_open_ids);

        Self {
            catalog: CatalogService::new(SqliteCatalogStore::new(pool.clone())),
            carts: Arc::new(SqliteCartStore::new(pool)),
            accounts,
            sessions,
        }
    }

    /// Connect, bootstrap the schema and wire the WeChat identity provider.
    pub async fn from_config(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let pool = db::connect_and_bootstrap(&config.database_url).await?;
        let identity = Arc::new(WeChatIdentityProvider::new(config.wx.clone()));
        let tokens = Hs256TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl());

        Ok(Self::new(pool, identity, tokens, config.admin_open_ids.clone()))
    }

    pub fn jwt_validator(&self) -> Arc<dyn JwtValidator> {
        Arc::new(self.sessions.tokens().clone())
    }
}
