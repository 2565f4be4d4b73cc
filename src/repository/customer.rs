//! Repository implementation for customers.

use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        customer::{Customer, NewCustomer, UpdateCustomer},
        types::{CustomerId, UserId},
    },
    models::customer::{
        Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
    },
    repository::{
        CustomerListQuery, CustomerReader, CustomerWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

fn into_domain(rows: Vec<DbCustomer>) -> RepositoryResult<Vec<Customer>> {
    rows.into_iter()
        .map(|row| Customer::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl CustomerReader for DieselRepository {
    fn get_customer(&self, id: CustomerId, user_id: UserId) -> RepositoryResult<Option<Customer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::id.eq(id.get()))
            .filter(customers::user_id.eq(user_id.to_string()))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Customer::try_from).transpose()?)
    }

    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let pattern = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(|term| format!("%{term}%"));

        let query_builder = || {
            let mut items = customers::table
                .filter(customers::user_id.eq(query.user_id.to_string()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(pattern) = &pattern {
                items = items.filter(
                    customers::name
                        .like(pattern.clone())
                        .or(customers::phone.like(pattern.clone()))
                        .or(customers::email.like(pattern.clone()))
                        .or(customers::memo.like(pattern.clone())),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(customers::name.asc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let rows = items.load::<DbCustomer>(&mut conn)?;
        Ok((total, into_domain(rows)?))
    }

    fn get_customers_by_ids(
        &self,
        user_id: UserId,
        ids: &[CustomerId],
    ) -> RepositoryResult<Vec<Customer>> {
        use crate::schema::customers;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let rows = customers::table
            .filter(customers::user_id.eq(user_id.to_string()))
            .filter(customers::id.eq_any(raw_ids))
            .order(customers::id.asc())
            .load::<DbCustomer>(&mut conn)?;

        into_domain(rows)
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let insertable = DbNewCustomer::from_domain(new_customer, Utc::now().naive_utc());

        let row = diesel::insert_into(customers::table)
            .values(&insertable)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(row)?)
    }

    fn update_customer(
        &self,
        id: CustomerId,
        user_id: UserId,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let changes = DbUpdateCustomer::from_domain(updates, Utc::now().naive_utc());

        let row = diesel::update(
            customers::table
                .filter(customers::id.eq(id.get()))
                .filter(customers::user_id.eq(user_id.to_string())),
        )
        .set(&changes)
        .get_result::<DbCustomer>(&mut conn)?;

        Ok(Customer::try_from(row)?)
    }

    fn delete_customer(&self, id: CustomerId, user_id: UserId) -> RepositoryResult<()> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            customers::table
                .filter(customers::id.eq(id.get()))
                .filter(customers::user_id.eq(user_id.to_string())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
