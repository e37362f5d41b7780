//! Table definitions, applied with `CREATE ... IF NOT EXISTS` at startup.
//!
//! Length checks mirror the column widths of the storefront schema: attribute
//! kind/value and category names up to 100 characters, variant specs up to 512.

use sqlx::sqlite::SqlitePool;
use tracing::info;

const CREATE_CATEGORIES: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL UNIQUE CHECK (length(name) <= 100),
    created_at  TEXT    NOT NULL
)
"#;

const CREATE_FAMILIES: &str = r#"
CREATE TABLE IF NOT EXISTS families (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id      INTEGER,
    title            TEXT    NOT NULL,
    production_code  TEXT    NOT NULL DEFAULT '',
    standard_code    TEXT    NOT NULL DEFAULT '',
    inventory        INTEGER NOT NULL DEFAULT 0,
    price            REAL    NOT NULL DEFAULT 9999.99,
    shelf_life       TEXT    NOT NULL,
    images           TEXT    NOT NULL,
    detail_images    TEXT    NOT NULL,
    recommend        INTEGER NOT NULL DEFAULT 0,
    active           INTEGER NOT NULL DEFAULT 1,
    created_at       TEXT    NOT NULL
)
"#;

const INDEX_FAMILIES_CATEGORY: &str =
    "CREATE INDEX IF NOT EXISTS idx_families_category ON families (category_id, active)";

const CREATE_ATTRIBUTES: &str = r#"
CREATE TABLE IF NOT EXISTS attributes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    family_id  INTEGER NOT NULL,
    kind       TEXT    NOT NULL CHECK (length(kind) <= 100),
    value      TEXT    NOT NULL CHECK (length(value) <= 100)
)
"#;

const INDEX_ATTRIBUTES_FAMILY: &str =
    "CREATE INDEX IF NOT EXISTS idx_attributes_family ON attributes (family_id)";

const CREATE_VARIANTS: &str = r#"
CREATE TABLE IF NOT EXISTS variants (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    family_id   INTEGER NOT NULL,
    spec        TEXT    NOT NULL CHECK (length(spec) <= 512),
    price       REAL    NOT NULL DEFAULT 9999.99,
    stock       INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL
)
"#;

const INDEX_VARIANTS_LOOKUP: &str =
    "CREATE INDEX IF NOT EXISTS idx_variants_lookup ON variants (family_id, spec)";

const CREATE_CART_LINES: &str = r#"
CREATE TABLE IF NOT EXISTS cart_lines (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL,
    sku_id      INTEGER NOT NULL,
    spu_id      INTEGER NOT NULL,
    count       INTEGER NOT NULL DEFAULT 1 CHECK (count > 0),
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT    NOT NULL
)
"#;

const INDEX_CART_USER: &str =
    "CREATE INDEX IF NOT EXISTS idx_cart_lines_user ON cart_lines (user_id, active)";

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    open_id      TEXT    NOT NULL UNIQUE,
    session_key  TEXT    NOT NULL,
    nick_name    TEXT    NOT NULL DEFAULT '',
    avatar       TEXT    NOT NULL DEFAULT '',
    gender       INTEGER NOT NULL DEFAULT 0,
    admin        INTEGER NOT NULL DEFAULT 0,
    active       INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT    NOT NULL
)
"#;

const STATEMENTS: &[&str] = &[
    CREATE_CATEGORIES,
    CREATE_FAMILIES,
    INDEX_FAMILIES_CATEGORY,
    CREATE_ATTRIBUTES,
    INDEX_ATTRIBUTES_FAMILY,
    CREATE_VARIANTS,
    INDEX_VARIANTS_LOOKUP,
    CREATE_CART_LINES,
    INDEX_CART_USER,
    CREATE_USERS,
];

/// Create every table and index that does not exist yet.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(tables = 6, "schema ready");
    Ok(())
}
