//! In-memory implementation of PersonRepository.
//!
//! Follows the same statement sequence as the PostgreSQL adapter, staged on
//! a scratch copy of the tables, so a failing step discards every earlier
//! step of the same operation.

use async_trait::async_trait;

use super::store::{InMemoryDatabase, PersonRecord, Tables};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, PersonId};
use crate::domain::person::{Person, PersonDetails};
use crate::ports::PersonRepository;

/// In-memory person repository backed by an [`InMemoryDatabase`].
#[derive(Debug, Clone)]
pub struct InMemoryPersonRepository {
    db: InMemoryDatabase,
}

impl InMemoryPersonRepository {
    pub fn new(db: InMemoryDatabase) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn list(&self) -> Result<Vec<Person>, DomainError> {
        let tables = self.db.read().await;
        Ok(tables
            .persons
            .keys()
            .map(|id| hydrate(&tables, *id))
            .collect())
    }

    async fn get_by_name(&self, last_name: &str) -> Result<Person, DomainError> {
        let tables = self.db.read().await;
        tables
            .persons_named(last_name)
            .first()
            .map(|id| hydrate(&tables, *id))
            .ok_or_else(|| person_not_found(last_name))
    }

    async fn create(&self, details: PersonDetails) -> Result<Person, DomainError> {
        const OPERATION: &str = "person.create";

        self.db
            .transaction(|tables| {
                let id = tables.insert_person(record_from(&details));
                enroll_all(tables, OPERATION, id, &details.courses)?;
                Ok(hydrate(tables, id))
            })
            .await
    }

    async fn update(
        &self,
        last_name: &str,
        details: PersonDetails,
    ) -> Result<Person, DomainError> {
        const OPERATION: &str = "person.update";

        self.db
            .transaction(|tables| {
                let id = tables
                    .persons_named(last_name)
                    .first()
                    .copied()
                    .ok_or_else(|| person_not_found(last_name))?;
                tables.persons.insert(id, record_from(&details));

                // Empty input keeps the current enrollments.
                if !details.courses.is_empty() {
                    tables.unenroll_all(id);
                    enroll_all(tables, OPERATION, id, &details.courses)?;
                }

                Ok(hydrate(tables, id))
            })
            .await
    }

    async fn delete(&self, last_name: &str) -> Result<(), DomainError> {
        self.db
            .transaction(|tables| {
                let matched = tables.persons_named(last_name);
                for id in &matched {
                    tables.unenroll_all(*id);
                    tables.persons.remove(id);
                }
                if matched.is_empty() {
                    return Err(person_not_found(last_name));
                }
                Ok(())
            })
            .await
    }
}

fn record_from(details: &PersonDetails) -> PersonRecord {
    PersonRecord {
        first_name: details.first_name.clone(),
        last_name: details.last_name.clone(),
        person_type: details.person_type,
        age: details.age,
    }
}

fn enroll_all(
    tables: &mut Tables,
    operation: &str,
    person_id: PersonId,
    courses: &[CourseId],
) -> Result<(), DomainError> {
    for course_id in courses {
        tables
            .enroll(person_id, *course_id)
            .map_err(|e| DomainError::storage(operation, "insert_courses", e))?;
    }
    Ok(())
}

fn hydrate(tables: &Tables, id: PersonId) -> Person {
    let record = &tables.persons[&id];
    Person {
        id,
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        person_type: record.person_type,
        age: record.age,
        courses: tables.course_ids_of(id),
    }
}

fn person_not_found(last_name: &str) -> DomainError {
    DomainError::new(
        ErrorCode::PersonNotFound,
        format!("No person found with last name: {}", last_name),
    )
    .with_detail("last_name", last_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCourseRepository;
    use crate::domain::person::PersonType;
    use crate::ports::CourseRepository;

    struct Fixture {
        db: InMemoryDatabase,
        courses: InMemoryCourseRepository,
        persons: InMemoryPersonRepository,
    }

    async fn fixture_with_courses(names: &[&str]) -> Fixture {
        let db = InMemoryDatabase::new();
        let courses = InMemoryCourseRepository::new(db.clone());
        for name in names {
            courses.create(name).await.unwrap();
        }
        let persons = InMemoryPersonRepository::new(db.clone());
        Fixture {
            db,
            courses,
            persons,
        }
    }

    fn john_doe(courses: &[i32]) -> PersonDetails {
        PersonDetails {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            person_type: PersonType::Student,
            age: 25,
            courses: courses.iter().copied().map(CourseId::new).collect(),
        }
    }

    fn ids(raw: &[i32]) -> Vec<CourseId> {
        raw.iter().copied().map(CourseId::new).collect()
    }

    #[tokio::test]
    async fn create_returns_persisted_courses() {
        let f = fixture_with_courses(&["Databases", "Compilers"]).await;

        let person = f.persons.create(john_doe(&[1, 2])).await.unwrap();

        assert_eq!(person.id, PersonId::new(1));
        assert_eq!(person.first_name, "John");
        assert_eq!(person.person_type, PersonType::Student);
        assert_eq!(person.courses, ids(&[1, 2]));
    }

    #[tokio::test]
    async fn person_without_courses_has_empty_list_everywhere() {
        let f = fixture_with_courses(&[]).await;
        f.persons.create(john_doe(&[])).await.unwrap();

        let listed = f.persons.list().await.unwrap();
        let found = f.persons.get_by_name("Doe").await.unwrap();

        assert!(listed[0].courses.is_empty());
        assert!(found.courses.is_empty());
    }

    #[tokio::test]
    async fn failed_course_insert_rolls_back_person_row() {
        let f = fixture_with_courses(&["Databases"]).await;

        let err = f.persons.create(john_doe(&[1, 99])).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(err.detail("stage"), Some("insert_courses"));
        assert_eq!(f.db.person_count().await, 0);
        assert_eq!(f.db.enrollment_count().await, 0);
    }

    #[tokio::test]
    async fn update_replaces_course_set() {
        let f = fixture_with_courses(&["Databases", "Compilers", "Networks"]).await;
        f.persons.create(john_doe(&[1, 2])).await.unwrap();

        let updated = f.persons.update("doe", john_doe(&[3])).await.unwrap();

        assert_eq!(updated.courses, ids(&[3]));
        assert_eq!(f.persons.get_by_name("DOE").await.unwrap().courses, ids(&[3]));
    }

    #[tokio::test]
    async fn update_with_empty_courses_keeps_enrollments() {
        let f = fixture_with_courses(&["Databases", "Compilers"]).await;
        f.persons.create(john_doe(&[1, 2])).await.unwrap();

        let mut details = john_doe(&[]);
        details.age = 26;
        let updated = f.persons.update("Doe", details).await.unwrap();

        assert_eq!(updated.age, 26);
        assert_eq!(updated.courses, ids(&[1, 2]));
    }

    #[tokio::test]
    async fn failed_update_leaves_old_state() {
        let f = fixture_with_courses(&["Databases", "Compilers"]).await;
        f.persons.create(john_doe(&[1, 2])).await.unwrap();

        let mut details = john_doe(&[7]);
        details.first_name = "Johnny".to_string();
        let err = f.persons.update("Doe", details).await.unwrap_err();

        assert_eq!(err.detail("stage"), Some("insert_courses"));
        let person = f.persons.get_by_name("Doe").await.unwrap();
        assert_eq!(person.first_name, "John");
        assert_eq!(person.courses, ids(&[1, 2]));
    }

    #[tokio::test]
    async fn update_unknown_name_is_not_found() {
        let f = fixture_with_courses(&[]).await;
        let err = f.persons.update("Nobody", john_doe(&[])).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PersonNotFound);
    }

    #[tokio::test]
    async fn delete_is_case_insensitive_and_removes_enrollments() {
        let f = fixture_with_courses(&["Databases"]).await;
        f.persons.create(john_doe(&[1])).await.unwrap();

        f.persons.delete("doe").await.unwrap();

        assert_eq!(f.db.person_count().await, 0);
        assert_eq!(f.db.enrollment_count().await, 0);
        // The course itself is untouched and can now be deleted.
        f.courses.delete(CourseId::new(1)).await.unwrap();
    }

    #[tokio::test]
    async fn delete_unknown_name_is_not_found() {
        let f = fixture_with_courses(&[]).await;
        let err = f.persons.delete("doe").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PersonNotFound);
    }

    #[tokio::test]
    async fn enrolled_course_cannot_be_deleted() {
        let f = fixture_with_courses(&["Databases"]).await;
        f.persons.create(john_doe(&[1])).await.unwrap();

        let err = f.courses.delete(CourseId::new(1)).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::DatabaseError);
        assert_eq!(f.db.course_count().await, 1);
    }
}
