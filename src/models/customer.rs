use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
/// Diesel model for [`crate::domain::customer::Customer`].
pub struct Customer {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub memo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
/// Insertable form of [`Customer`].
pub struct NewCustomer<'a> {
    pub user_id: String,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub memo: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Customer`] record.
pub struct UpdateCustomer<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub memo: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Customer> for DomainCustomer {
    type Error = TypeConstraintError;

    fn try_from(customer: Customer) -> Result<Self, Self::Error> {
        DomainCustomer::try_new(
            customer.id,
            &customer.user_id,
            customer.name,
            customer.phone,
            customer.email,
            customer.memo,
            customer.created_at,
            customer.updated_at,
        )
    }
}

impl<'a> NewCustomer<'a> {
    pub fn from_domain(customer: &'a DomainNewCustomer, now: NaiveDateTime) -> Self {
        Self {
            user_id: customer.user_id.to_string(),
            name: customer.name.as_str(),
            phone: customer.phone.as_str(),
            email: customer.email.as_ref().map(|e| e.as_str()),
            memo: customer.memo.as_ref().map(|m| m.as_str()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateCustomer<'a> {
    pub fn from_domain(customer: &'a DomainUpdateCustomer, now: NaiveDateTime) -> Self {
        Self {
            name: customer.name.as_str(),
            phone: customer.phone.as_str(),
            email: customer.email.as_ref().map(|e| e.as_str()),
            memo: customer.memo.as_ref().map(|m| m.as_str()),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{CustomerEmail, CustomerName, PhoneNumber};

    #[test]
    fn from_domain_new_creates_insertable() {
        let now = Utc::now().naive_utc();
        let domain = DomainNewCustomer::new(
            "6f9619ff-8b86-d011-b42d-00cf4fc964ff".parse().unwrap(),
            CustomerName::new("김철수").unwrap(),
            PhoneNumber::new("010-1111-2222").unwrap(),
            Some(CustomerEmail::new("kim@example.com").unwrap()),
            None,
        );
        let new = NewCustomer::from_domain(&domain, now);
        assert_eq!(new.user_id, "6f9619ff-8b86-d011-b42d-00cf4fc964ff");
        assert_eq!(new.name, "김철수");
        assert_eq!(new.phone, "+821011112222");
        assert_eq!(new.email, Some("kim@example.com"));
        assert_eq!(new.memo, None);
    }

    #[test]
    fn db_row_into_domain() {
        let now = Utc::now().naive_utc();
        let row = Customer {
            id: 3,
            user_id: "6f9619ff-8b86-d011-b42d-00cf4fc964ff".to_string(),
            name: "Lee".to_string(),
            phone: "+821099998888".to_string(),
            email: None,
            memo: Some("   ".to_string()),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainCustomer::try_from(row).expect("valid customer");
        assert_eq!(domain.id.get(), 3);
        assert_eq!(domain.memo, None);
    }

    #[test]
    fn corrupt_row_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = Customer {
            id: 0,
            user_id: "not-a-uuid".to_string(),
            name: "Lee".to_string(),
            phone: "+821099998888".to_string(),
            email: None,
            memo: None,
            created_at: now,
            updated_at: now,
        };
        assert!(DomainCustomer::try_from(row).is_err());
    }
}
