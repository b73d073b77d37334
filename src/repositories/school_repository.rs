use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{is_duplicate_key, Database},
    errors::{AppError, AppResult},
    models::domain::{Classroom, School},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SchoolRepository: Send + Sync {
    async fn insert(&self, school: School) -> AppResult<School>;
    async fn find_by_director(&self, director_id: &str) -> AppResult<Option<School>>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClassroomRepository: Send + Sync {
    async fn insert(&self, classroom: Classroom) -> AppResult<Classroom>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Classroom>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSchoolRepository {
    collection: Collection<School>,
}

impl MongoSchoolRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("schools");
        Self { collection }
    }
}

#[async_trait]
impl SchoolRepository for MongoSchoolRepository {
    async fn insert(&self, school: School) -> AppResult<School> {
        match self.collection.insert_one(&school).await {
            Ok(_) => Ok(school),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(
                "Director already owns a school".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_director(&self, director_id: &str) -> AppResult<Option<School>> {
        let school = self
            .collection
            .find_one(doc! { "director_id": director_id })
            .await?;
        Ok(school)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("School '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "director_id": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Created unique index on schools.director_id");

        Ok(())
    }
}

pub struct MongoClassroomRepository {
    collection: Collection<Classroom>,
}

impl MongoClassroomRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("classrooms");
        Self { collection }
    }
}

#[async_trait]
impl ClassroomRepository for MongoClassroomRepository {
    async fn insert(&self, classroom: Classroom) -> AppResult<Classroom> {
        self.collection.insert_one(&classroom).await?;
        Ok(classroom)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Classroom>> {
        let classroom = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(classroom)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder().keys(doc! { "school_id": 1 }).build();

        self.collection.create_index(model).await?;
        log::info!("Created index on classrooms.school_id");

        Ok(())
    }
}
