use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        image::{NewUserImage, UserImage},
        types::{ImageId, UserId},
    },
    models::image::{NewUserImage as DbNewUserImage, UserImage as DbUserImage},
    repository::{
        DieselRepository, ImageReader, ImageWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ImageReader for DieselRepository {
    fn get_image(&self, id: ImageId) -> RepositoryResult<Option<UserImage>> {
        use crate::schema::user_images;

        let mut conn = self.conn()?;
        let row = user_images::table
            .filter(user_images::id.eq(id.as_bytes().as_slice()))
            .first::<DbUserImage>(&mut conn)
            .optional()?;

        Ok(row.map(UserImage::try_from).transpose()?)
    }

    fn list_images(&self, user_id: UserId) -> RepositoryResult<Vec<UserImage>> {
        use crate::schema::user_images;

        let mut conn = self.conn()?;
        user_images::table
            .filter(user_images::user_id.eq(user_id.to_string()))
            .order(user_images::created_at.desc())
            .load::<DbUserImage>(&mut conn)?
            .into_iter()
            .map(|row| UserImage::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl ImageWriter for DieselRepository {
    fn create_image(&self, image: &NewUserImage) -> RepositoryResult<UserImage> {
        use crate::schema::user_images;

        let mut conn = self.conn()?;
        let insertable = DbNewUserImage::from_domain(image, Utc::now().naive_utc());
        let row = diesel::insert_into(user_images::table)
            .values(&insertable)
            .get_result::<DbUserImage>(&mut conn)?;

        Ok(UserImage::try_from(row)?)
    }

    fn delete_image(&self, id: ImageId, user_id: UserId) -> RepositoryResult<()> {
        use crate::schema::user_images;

        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            user_images::table
                .filter(user_images::id.eq(id.as_bytes().as_slice()))
                .filter(user_images::user_id.eq(user_id.to_string())),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
