use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        template::{MessageTemplate, NewMessageTemplate, UpdateMessageTemplate},
        types::{TemplateId, UserId},
    },
    models::template::{
        MessageTemplate as DbMessageTemplate, NewMessageTemplate as DbNewMessageTemplate,
        UpdateMessageTemplate as DbUpdateMessageTemplate,
    },
    repository::{
        DieselRepository, TemplateReader, TemplateWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl TemplateReader for DieselRepository {
    fn get_template(
        &self,
        id: TemplateId,
        user_id: UserId,
    ) -> RepositoryResult<Option<MessageTemplate>> {
        use crate::schema::message_templates;

        let mut conn = self.conn()?;
        let row = message_templates::table
            .filter(message_templates::id.eq(id.get()))
            .filter(message_templates::user_id.eq(user_id.to_string()))
            .first::<DbMessageTemplate>(&mut conn)
            .optional()?;

        Ok(row.map(MessageTemplate::try_from).transpose()?)
    }

    fn list_templates(&self, user_id: UserId) -> RepositoryResult<Vec<MessageTemplate>> {
        use crate::schema::message_templates;

        let mut conn = self.conn()?;
        message_templates::table
            .filter(message_templates::user_id.eq(user_id.to_string()))
            .order(message_templates::updated_at.desc())
            .load::<DbMessageTemplate>(&mut conn)?
            .into_iter()
            .map(|row| MessageTemplate::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl TemplateWriter for DieselRepository {
    fn create_template(&self, template: &NewMessageTemplate) -> RepositoryResult<MessageTemplate> {
        use crate::schema::message_templates;

        let mut conn = self.conn()?;
        let insertable = DbNewMessageTemplate::from_domain(template, Utc::now().naive_utc());
        let row = diesel::insert_into(message_templates::table)
            .values(&insertable)
            .get_result::<DbMessageTemplate>(&mut conn)?;

        Ok(MessageTemplate::try_from(row)?)
    }

    fn update_template(
        &self,
        id: TemplateId,
        user_id: UserId,
        updates: &UpdateMessageTemplate,
    ) -> RepositoryResult<MessageTemplate> {
        use crate::schema::message_templates;

        let mut conn = self.conn()?;
        let changes = DbUpdateMessageTemplate::from_domain(updates, Utc::now().naive_utc());
        let row = diesel::update(
            message_templates::table
                .filter(message_templates::id.eq(id.get()))
                .filter(message_templates::user_id.eq(user_id.to_string())),
        )
        .set(&changes)
        .get_result::<DbMessageTemplate>(&mut conn)?;

        Ok(MessageTemplate::try_from(row)?)
    }

    fn delete_template(&self, id: TemplateId, user_id: UserId) -> RepositoryResult<()> {
        use crate::schema::message_templates;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            message_templates::table
                .filter(message_templates::id.eq(id.get()))
                .filter(message_templates::user_id.eq(user_id.to_string())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
