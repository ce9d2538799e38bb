use std::cell::RefCell;

use diesel::Connection;
use diesel::sqlite::SqliteConnection;

use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};

pub mod errors;
pub mod product;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
///
/// Every call made directly on the repository checks out its own connection
/// and commits on its own. Use [`DieselRepository::transaction`] to run a
/// whole workflow against a single connection.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Run `work` inside a database transaction.
    ///
    /// The scope handed to `work` implements the same reader/writer traits as
    /// the repository. The transaction commits when `work` returns `Ok` and
    /// rolls back on `Err`.
    pub fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&DieselTransaction<'_>) -> Result<T, E>,
        E: From<diesel::result::Error> + From<RepositoryError>,
    {
        let mut conn = self.conn()?;
        conn.transaction(|conn| work(&DieselTransaction::new(conn)))
    }
}

/// Repository bound to one connection with an open transaction.
pub struct DieselTransaction<'c> {
    conn: RefCell<&'c mut SqliteConnection>,
}

impl<'c> DieselTransaction<'c> {
    fn new(conn: &'c mut SqliteConnection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

/// Source of a SQLite connection for a single repository call.
pub trait ConnectionScope {
    fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>;
}

impl ConnectionScope for DieselRepository {
    fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    {
        let mut conn = self.conn()?;
        f(&mut conn)
    }
}

impl ConnectionScope for DieselTransaction<'_> {
    fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    {
        let mut conn = self.conn.borrow_mut();
        f(&mut conn)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;
    fn get_product_by_code(&self, code: &str) -> RepositoryResult<Option<Product>>;
    fn product_exists(&self, id: i64) -> RepositoryResult<bool>;
    fn product_code_exists(&self, code: &str) -> RepositoryResult<bool>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i64, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i64) -> RepositoryResult<()>;
}
