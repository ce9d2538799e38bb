use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
    UpdateProduct as DomainUpdateProduct,
};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ConnectionScope, ProductReader, ProductWriter};

diesel::define_sql_function!(fn fold_case(x: Text) -> Text);

/// Registers the SQL functions product queries rely on.
///
/// SQLite's built-in `lower()` only folds ASCII, so name search uses
/// `fold_case()` backed by Rust's Unicode lowercasing instead.
pub fn register_sql_functions(conn: &mut SqliteConnection) -> QueryResult<()> {
    fold_case_utils::register_impl(conn, |text: String| text.to_lowercase())
}

impl<S: ConnectionScope> ProductReader for S {
    fn get_product_by_id(&self, id: i64) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let product = products::table
                .filter(products::id.eq(id))
                .select(DbProduct::as_select())
                .first::<DbProduct>(conn)
                .optional()?;
            Ok(product.map(DomainProduct::from))
        })
    }

    fn get_product_by_code(&self, code: &str) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let product = products::table
                .filter(products::code.eq(code))
                .select(DbProduct::as_select())
                .first::<DbProduct>(conn)
                .optional()?;
            Ok(product.map(DomainProduct::from))
        })
    }

    fn product_exists(&self, id: i64) -> RepositoryResult<bool> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let exists = diesel::select(diesel::dsl::exists(
                products::table.filter(products::id.eq(id)),
            ))
            .get_result::<bool>(conn)?;
            Ok(exists)
        })
    }

    fn product_code_exists(&self, code: &str) -> RepositoryResult<bool> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let exists = diesel::select(diesel::dsl::exists(
                products::table.filter(products::code.eq(code)),
            ))
            .get_result::<bool>(conn)?;
            Ok(exists)
        })
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let mut items = products::table
                .select(DbProduct::as_select())
                .into_boxed::<diesel::sqlite::Sqlite>();

            if !query.include_inactive {
                items = items.filter(products::active.eq(true));
            }

            if let Some(fragment) = query.name_contains.as_ref() {
                let pattern = format!("%{}%", escape_like(fragment));
                items = items.filter(
                    fold_case(products::name)
                        .like(fold_case(pattern))
                        .escape('\\'),
                );
            }

            let db_products = items.order(products::id.asc()).load::<DbProduct>(conn)?;

            Ok(db_products.into_iter().map(DomainProduct::from).collect())
        })
    }
}

impl<S: ConnectionScope> ProductWriter for S {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let db_new = DbNewProduct::from(new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(conn)?;

            Ok(created.into())
        })
    }

    fn update_product(
        &self,
        product_id: i64,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let db_updates = DbUpdateProduct::from(updates);

            let target = products::table.filter(products::id.eq(product_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(conn)?;

            Ok(updated.into())
        })
    }

    fn delete_product(&self, product_id: i64) -> RepositoryResult<()> {
        use crate::schema::products;

        self.with_conn(|conn| {
            let target = products::table.filter(products::id.eq(product_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

/// Escape LIKE wildcards so the fragment is matched literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
