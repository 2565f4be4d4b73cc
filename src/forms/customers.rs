use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::{NewCustomer, UpdateCustomer};
use crate::domain::types::{CustomerEmail, CustomerName, Memo, PhoneNumber, UserId};
use crate::forms::FormError;

/// Body of the create and update customer endpoints.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub memo: Option<String>,
}

/// Validated customer fields shared by create and update.
pub struct CustomerPayload {
    pub name: CustomerName,
    pub phone: PhoneNumber,
    pub email: Option<CustomerEmail>,
    pub memo: Option<Memo>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<CustomerForm> for CustomerPayload {
    type Error = FormError;

    fn try_from(form: CustomerForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: CustomerName::new(form.name)?,
            phone: PhoneNumber::new(form.phone)?,
            email: blank_to_none(form.email)
                .map(CustomerEmail::new)
                .transpose()?,
            memo: blank_to_none(form.memo).map(Memo::new).transpose()?,
        })
    }
}

impl CustomerPayload {
    pub fn into_new_customer(self, user_id: UserId) -> NewCustomer {
        NewCustomer::new(user_id, self.name, self.phone, self.email, self.memo)
    }

    pub fn into_update(self) -> UpdateCustomer {
        UpdateCustomer::new(self.name, self.phone, self.email, self.memo)
    }
}
