use mockall::mock;

use super::{ProductReader, ProductWriter};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;
        fn get_product_by_code(&self, code: &str) -> RepositoryResult<Option<Product>>;
        fn product_exists(&self, id: i64) -> RepositoryResult<bool>;
        fn product_code_exists(&self, code: &str) -> RepositoryResult<bool>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i64, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i64) -> RepositoryResult<()>;
    }
}
