use crate::SERVICE_ACCESS_ROLE;
use crate::domain::customer::Customer;
use crate::domain::types::CustomerId;
use crate::dto::customers::CustomersQuery;
use crate::forms::customers::{CustomerForm, CustomerPayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Paginated, Pagination};
use crate::repository::errors::RepositoryError;
use crate::repository::{CustomerListQuery, CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role};

fn duplicate_phone() -> ServiceError {
    ServiceError::Form("이미 등록된 전화번호입니다.".to_string())
}

/// Lists the caller's customers, optionally filtered by a search term.
pub fn list_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomersQuery,
) -> ServiceResult<Paginated<Customer>>
where
    R: CustomerReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let pagination = Pagination::new(query.page, query.per_page);
    let mut list_query = CustomerListQuery::new(user_id).paginate(pagination);

    if let Some(term) = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        list_query = list_query.search(term);
    }

    let (total, customers) = repo.list_customers(list_query).map_err(|err| {
        log::error!("Failed to list customers: {err}");
        err
    })?;

    Ok(Paginated::new(customers, pagination, total))
}

pub fn get_customer<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = CustomerId::new(id).map_err(|_| ServiceError::NotFound)?;

    repo.get_customer(id, user_id)?
        .ok_or(ServiceError::NotFound)
}

/// Validates the form and stores a new customer for the caller.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let payload = CustomerPayload::try_from(form).map_err(|err| {
        log::warn!("Rejected customer form: {err}");
        ServiceError::from(err)
    })?;

    repo.create_customer(&payload.into_new_customer(user_id))
        .map_err(|err| match err {
            RepositoryError::Duplicate(_) => duplicate_phone(),
            err => {
                log::error!("Failed to create customer: {err}");
                ServiceError::from(err)
            }
        })
}

pub fn update_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: i32,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = CustomerId::new(id).map_err(|_| ServiceError::NotFound)?;

    let payload = CustomerPayload::try_from(form).map_err(|err| {
        log::warn!("Rejected customer form: {err}");
        ServiceError::from(err)
    })?;

    repo.update_customer(id, user_id, &payload.into_update())
        .map_err(|err| match err {
            RepositoryError::Duplicate(_) => duplicate_phone(),
            RepositoryError::NotFound => ServiceError::NotFound,
            err => {
                log::error!("Failed to update customer {id}: {err}");
                ServiceError::from(err)
            }
        })
}

pub fn delete_customer<R>(repo: &R, user: &AuthenticatedUser, id: i32) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    let user_id = ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let id = CustomerId::new(id).map_err(|_| ServiceError::NotFound)?;

    repo.delete_customer(id, user_id).map_err(ServiceError::from)
}
