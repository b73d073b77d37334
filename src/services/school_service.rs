use std::sync::Arc;

use futures::FutureExt;
use validator::Validate;

use crate::{
    auth::{require_school, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{ClaimSet, Classroom, School, UserRole},
        dto::request::{CreateClassroomRequest, CreateSchoolRequest},
    },
    repositories::{ClassroomRepository, ProfileRepository, SchoolRepository},
    services::{credential_store::CredentialStore, saga::Saga},
};

pub struct SchoolService {
    schools: Arc<dyn SchoolRepository>,
    classrooms: Arc<dyn ClassroomRepository>,
    profiles: Arc<dyn ProfileRepository>,
    credentials: Arc<dyn CredentialStore>,
}

impl SchoolService {
    pub fn new(
        schools: Arc<dyn SchoolRepository>,
        classrooms: Arc<dyn ClassroomRepository>,
        profiles: Arc<dyn ProfileRepository>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            schools,
            classrooms,
            profiles,
            credentials,
        }
    }

    /// Creates the director's school and stamps its id onto their claims and
    /// profile. The caller must sign in again to receive a token carrying it.
    pub async fn create_school(&self, claims: &Claims, request: CreateSchoolRequest) -> AppResult<School> {
        request.validate()?;

        if claims.school_id.is_some() {
            return Err(AppError::AlreadyExists(
                "Your account already belongs to a school".to_string(),
            ));
        }
        if let Some(existing) = self.schools.find_by_director(&claims.user_id).await? {
            return Err(AppError::AlreadyExists(format!(
                "You already direct school '{}'",
                existing.name
            )));
        }

        let mut saga = Saga::new("create_school");

        let schools = Arc::clone(&self.schools);
        let school = saga
            .run_compensated(
                "insert_school",
                self.schools.insert(School::new(&request.name, &claims.user_id)),
                move |school: &School| {
                    let id = school.id.clone();
                    async move { schools.delete(&id).await }.boxed()
                },
            )
            .await?;

        let director_claims = ClaimSet::new(UserRole::Director, Some(school.id.clone()), None);
        let credentials = Arc::clone(&self.credentials);
        let director_id = claims.user_id.clone();
        saga.run_compensated(
            "set_claims",
            async {
                self.credentials
                    .set_claims(&claims.user_id, &director_claims)
                    .await
                    .map_err(|err| AppError::ClaimAssignmentFailed(err.to_string()))
            },
            move |_: &()| {
                async move {
                    let schoolless = ClaimSet::new(UserRole::Director, None, None);
                    credentials.set_claims(&director_id, &schoolless).await
                }
                .boxed()
            },
        )
        .await?;

        saga.run("assign_profile_school", async {
            self.profiles
                .assign_school(&claims.user_id, &school.id)
                .await
                .map_err(|err| AppError::ProfilePersistenceFailed(err.to_string()))
        })
        .await?;

        saga.complete();
        log::info!("Director {} created school {}", claims.user_id, school.id);

        Ok(school)
    }

    pub async fn create_classroom(&self, claims: &Claims, request: CreateClassroomRequest) -> AppResult<Classroom> {
        request.validate()?;

        let school_id = claims.school_id.as_deref().ok_or_else(|| {
            AppError::Forbidden("Create a school before adding classrooms".to_string())
        })?;

        let classroom = self
            .classrooms
            .insert(Classroom::new(school_id, &request.name, request.grade_level))
            .await?;
        log::info!("Classroom {} created in school {}", classroom.id, school_id);

        Ok(classroom)
    }

    /// Returns the classroom if the caller's school owns it.
    pub async fn find_classroom(&self, claims: &Claims, classroom_id: &str) -> AppResult<Classroom> {
        let classroom = self
            .classrooms
            .find_by_id(classroom_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Classroom '{}' not found", classroom_id)))?;

        require_school(claims, &classroom.school_id)?;
        Ok(classroom)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{
        repositories::{
            profile_repository::MockProfileRepository,
            school_repository::{MockClassroomRepository, MockSchoolRepository},
        },
        services::credential_store::MockCredentialStore,
    };

    fn director() -> Claims {
        Claims::test_claims(UserRole::Director, None, None)
    }

    #[tokio::test]
    async fn create_school_stamps_claims_and_profile() {
        let mut schools = MockSchoolRepository::new();
        schools.expect_find_by_director().returning(|_| Ok(None));
        schools.expect_insert().returning(Ok);
        schools.expect_delete().never();

        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_set_claims()
            .withf(|id, claims| id == "director-user" && claims.school_id.is_some())
            .returning(|_, _| Ok(()));

        let mut profiles = MockProfileRepository::new();
        profiles.expect_assign_school().returning(|_, _| Ok(()));

        let service = SchoolService::new(
            Arc::new(schools),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(profiles),
            Arc::new(credentials),
        );

        let school = service
            .create_school(&director(), CreateSchoolRequest { name: " Oak Hill ".to_string() })
            .await
            .unwrap();
        assert_eq!(school.name, "Oak Hill");
        assert_eq!(school.director_id, "director-user");
    }

    #[tokio::test]
    async fn failed_claim_update_removes_school() {
        let mut schools = MockSchoolRepository::new();
        schools.expect_find_by_director().returning(|_| Ok(None));
        schools.expect_insert().returning(Ok);
        schools.expect_delete().times(1).returning(|_| Ok(()));

        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_set_claims()
            .returning(|_, _| Err(AppError::DatabaseError("unavailable".into())));

        let service = SchoolService::new(
            Arc::new(schools),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(MockProfileRepository::new()),
            Arc::new(credentials),
        );

        let result = service
            .create_school(&director(), CreateSchoolRequest { name: "Oak Hill".to_string() })
            .await;
        assert!(matches!(result, Err(AppError::ClaimAssignmentFailed(_))));
    }

    #[tokio::test]
    async fn failed_profile_update_resets_claims_and_removes_school() {
        let mut schools = MockSchoolRepository::new();
        schools.expect_find_by_director().returning(|_| Ok(None));
        schools.expect_insert().returning(Ok);
        schools.expect_delete().times(1).returning(|_| Ok(()));

        let written = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&written);
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_set_claims()
            .times(2)
            .returning(move |_, claims| {
                recorded.lock().unwrap().push(claims.clone());
                Ok(())
            });

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_assign_school()
            .returning(|_, _| Err(AppError::DatabaseError("unavailable".into())));

        let service = SchoolService::new(
            Arc::new(schools),
            Arc::new(MockClassroomRepository::new()),
            Arc::new(profiles),
            Arc::new(credentials),
        );

        let result = service
            .create_school(&director(), CreateSchoolRequest { name: "Oak Hill".to_string() })
            .await;
        assert!(matches!(result, Err(AppError::ProfilePersistenceFailed(_))));

        let written = written.lock().unwrap();
        assert!(written[0].school_id.is_some());
        let last = written.last().unwrap();
        assert_eq!(last.role, UserRole::Director);
        assert!(last.school_id.is_none());
    }

    #[tokio::test]
    async fn classroom_requires_school() {
        let mut classrooms = MockClassroomRepository::new();
        classrooms.expect_insert().never();

        let service = SchoolService::new(
            Arc::new(MockSchoolRepository::new()),
            Arc::new(classrooms),
            Arc::new(MockProfileRepository::new()),
            Arc::new(MockCredentialStore::new()),
        );

        let request = CreateClassroomRequest {
            name: "4B".to_string(),
            grade_level: Some("4".to_string()),
        };
        let result = service.create_classroom(&director(), request).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn find_classroom_is_school_scoped() {
        let mut classrooms = MockClassroomRepository::new();
        classrooms
            .expect_find_by_id()
            .returning(|_| Ok(Some(Classroom::new("school-2", "5A", None))));

        let service = SchoolService::new(
            Arc::new(MockSchoolRepository::new()),
            Arc::new(classrooms),
            Arc::new(MockProfileRepository::new()),
            Arc::new(MockCredentialStore::new()),
        );

        let claims = Claims::test_claims(UserRole::Director, Some("school-1"), None);
        let result = service.find_classroom(&claims, "class-1").await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
