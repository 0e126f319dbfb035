use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::DocumentFilter;
use crate::application::CatalogRepository;
use crate::domain::{DomainError, FilterSpec, Product};

/// Products persisted as JSON documents in DuckDB.
///
/// Filters are evaluated with [`DocumentFilter`] over the decoded documents,
/// so this store and the in-memory one agree on what a filter matches.
pub struct DuckdbCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbCatalogRepository {
    pub fn new(db_path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::storage(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::storage(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Returns a clone of the shared connection Arc.
    /// DuckDB only allows one write connection per file, so the user store
    /// reuses this one.
    pub fn shared_connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                updated_at BIGINT NOT NULL
            );
            "#,
        )
        .map_err(|e| DomainError::storage(format!("Failed to initialize schema: {}", e)))?;

        debug!("DuckDB product schema initialized");
        Ok(())
    }

    fn encode(product: &Product) -> Result<String, DomainError> {
        serde_json::to_string(product)
            .map_err(|e| DomainError::storage(format!("Failed to encode product: {}", e)))
    }

    fn decode(id: &str, document: &str) -> Option<Product> {
        match serde_json::from_str(document) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!("Skipping undecodable product {}: {}", id, e);
                None
            }
        }
    }

    async fn load_all(&self) -> Result<Vec<Product>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT id, document FROM products ORDER BY created_at, id")
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| DomainError::storage(format!("Failed to query products: {}", e)))?;

        let mut products = Vec::new();
        for row in rows {
            let (id, document) =
                row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?;
            if let Some(product) = Self::decode(&id, &document) {
                products.push(product);
            }
        }
        Ok(products)
    }
}

#[async_trait]
impl CatalogRepository for DuckdbCatalogRepository {
    async fn find(&self, filter: &FilterSpec) -> Result<Vec<Product>, DomainError> {
        let compiled = DocumentFilter::compile(filter)?;
        let products = self.load_all().await?;
        let total = products.len();

        let matched: Vec<Product> = products
            .into_iter()
            .filter(|product| compiled.matches(&product.to_document()))
            .collect();

        debug!("Filter matched {} of {} products", matched.len(), total);
        Ok(matched)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT document FROM products WHERE id = ?1")
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![id], |row| row.get::<_, String>(0)) {
            Ok(document) => Ok(Self::decode(id, &document)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to query product: {}",
                e
            ))),
        }
    }

    async fn insert(&self, product: &Product) -> Result<(), DomainError> {
        let document = Self::encode(product)?;
        let conn = self.conn.lock().await;

        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM products WHERE id = ?1",
                params![product.id],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::storage(format!("Failed to query product: {}", e)))?;
        if exists > 0 {
            return Err(DomainError::already_exists(format!(
                "Product already exists: {}",
                product.id
            )));
        }

        conn.execute(
            "INSERT INTO products (id, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                product.id,
                document,
                product.created_at.timestamp_micros(),
                product.updated_at.timestamp_micros(),
            ],
        )
        .map_err(|e| DomainError::storage(format!("Failed to save product: {}", e)))?;

        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, DomainError> {
        let document = Self::encode(product)?;
        let conn = self.conn.lock().await;

        let changed = conn
            .execute(
                "UPDATE products SET document = ?1, updated_at = ?2 WHERE id = ?3",
                params![document, product.updated_at.timestamp_micros(), product.id],
            )
            .map_err(|e| DomainError::storage(format!("Failed to update product: {}", e)))?;

        Ok(changed > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(|e| DomainError::storage(format!("Failed to delete product: {}", e)))?;
        Ok(changed > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .map_err(|e| DomainError::storage(format!("Failed to count products: {}", e)))?;
        Ok(count as u64)
    }
}
