//! Customer (contact) aggregate owned by a single salesperson.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CustomerEmail, CustomerId, CustomerName, Memo, PhoneNumber, TypeConstraintError, UserId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub user_id: UserId,
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub email: Option<CustomerEmail>,
    pub memo: Option<Memo>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    /// Builds a customer from raw storage values, validating every field.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        id: i32,
        user_id: &str,
        name: String,
        phone: String,
        email: Option<String>,
        memo: Option<String>,
        created_at: NaiveDateTime,
        updated_at: NaiveDateTime,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            id: CustomerId::new(id)?,
            user_id: user_id.parse()?,
            name: CustomerName::new(name)?,
            phone: PhoneNumber::new(phone)?,
            email: email.map(CustomerEmail::new).transpose()?,
            memo: memo.filter(|m| !m.trim().is_empty()).map(Memo::new).transpose()?,
            created_at,
            updated_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NewCustomer {
    pub user_id: UserId,
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub email: Option<CustomerEmail>,
    pub memo: Option<Memo>,
}

impl NewCustomer {
    #[must_use]
    pub fn new(
        user_id: UserId,
        name: CustomerName,
        phone: PhoneNumber,
        email: Option<CustomerEmail>,
        memo: Option<Memo>,
    ) -> Self {
        Self {
            user_id,
            name,
            phone,
            email,
            memo,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateCustomer {
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub email: Option<CustomerEmail>,
    pub memo: Option<Memo>,
}

impl UpdateCustomer {
    #[must_use]
    pub fn new(
        name: CustomerName,
        phone: PhoneNumber,
        email: Option<CustomerEmail>,
        memo: Option<Memo>,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            memo,
        }
    }
}
