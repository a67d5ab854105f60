//! PostgreSQL implementation of PersonRepository.
//!
//! Persists persons to `person` and their enrollments to `person_course`.
//! Every write runs in one transaction that is either committed in full or
//! rolled back by [`finish`]. A transaction dropped mid-flight (for example
//! because the caller's future was cancelled) is rolled back by sqlx.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, PersonId};
use crate::domain::person::{collapse_course_ids, Person, PersonDetails, PersonType};
use crate::ports::PersonRepository;

/// Person columns joined with their aggregated course ids.
///
/// `array_agg` over the left join yields `{NULL}` for persons without
/// enrollments; [`collapse_course_ids`] drops that placeholder.
const SELECT_PERSON_WITH_COURSES: &str = r#"
    SELECT p.id, p.first_name, p.last_name, p.type, p.age,
           COALESCE(array_agg(pc.course_id ORDER BY pc.course_id), '{}') AS course_ids
    FROM person p
    LEFT JOIN person_course pc ON pc.person_id = p.id
"#;

const GROUP_BY_PERSON: &str = "GROUP BY p.id, p.first_name, p.last_name, p.type, p.age";

/// PostgreSQL implementation of PersonRepository.
#[derive(Clone)]
pub struct PostgresPersonRepository {
    pool: PgPool,
}

impl PostgresPersonRepository {
    /// Creates a new PostgresPersonRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self, operation: &str) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::transaction(operation, "begin", e))
    }
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    async fn list(&self) -> Result<Vec<Person>, DomainError> {
        let sql = format!(
            "{} {} ORDER BY p.id ASC",
            SELECT_PERSON_WITH_COURSES, GROUP_BY_PERSON
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage("person.list", "select", e))?;

        rows.into_iter()
            .map(|row| row_to_person("person.list", row))
            .collect()
    }

    async fn get_by_name(&self, last_name: &str) -> Result<Person, DomainError> {
        let sql = format!(
            "{} WHERE LOWER(p.last_name) = LOWER($1) {} ORDER BY p.id ASC LIMIT 1",
            SELECT_PERSON_WITH_COURSES, GROUP_BY_PERSON
        );

        let row = sqlx::query(&sql)
            .bind(last_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage("person.get_by_name", "select", e))?;

        match row {
            Some(row) => row_to_person("person.get_by_name", row),
            None => Err(person_not_found(last_name)),
        }
    }

    async fn create(&self, details: PersonDetails) -> Result<Person, DomainError> {
        const OPERATION: &str = "person.create";

        let mut tx = self.begin(OPERATION).await?;
        let result = create_person(&mut *tx, details).await;
        let person = finish(tx, OPERATION, result).await?;

        tracing::debug!(
            person_id = %person.id,
            courses = person.courses.len(),
            "person created"
        );
        Ok(person)
    }

    async fn update(
        &self,
        last_name: &str,
        details: PersonDetails,
    ) -> Result<Person, DomainError> {
        const OPERATION: &str = "person.update";

        let mut tx = self.begin(OPERATION).await?;
        let result = update_person(&mut *tx, last_name, details).await;
        let person = finish(tx, OPERATION, result).await?;

        tracing::debug!(
            person_id = %person.id,
            courses = person.courses.len(),
            "person updated"
        );
        Ok(person)
    }

    async fn delete(&self, last_name: &str) -> Result<(), DomainError> {
        const OPERATION: &str = "person.delete";

        let mut tx = self.begin(OPERATION).await?;
        let result = delete_person(&mut *tx, last_name).await;
        let deleted = finish(tx, OPERATION, result).await?;

        tracing::debug!(last_name, deleted, "person deleted");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transaction steps
// ════════════════════════════════════════════════════════════════════════════

async fn create_person(
    conn: &mut PgConnection,
    details: PersonDetails,
) -> Result<Person, DomainError> {
    const OPERATION: &str = "person.create";

    let row = sqlx::query(
        r#"
        INSERT INTO person (first_name, last_name, type, age)
        VALUES ($1, $2, $3, $4)
        RETURNING id, first_name, last_name, type, age
        "#,
    )
    .bind(&details.first_name)
    .bind(&details.last_name)
    .bind(details.person_type.as_str())
    .bind(details.age)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| DomainError::storage(OPERATION, "insert_person", e))?;

    let stored = PersonRow::decode(OPERATION, &row)?;

    if !details.courses.is_empty() {
        insert_courses(conn, OPERATION, stored.id, &details.courses).await?;
    }

    let courses = read_course_ids(conn, OPERATION, stored.id).await?;
    Ok(stored.into_person(courses))
}

async fn update_person(
    conn: &mut PgConnection,
    last_name: &str,
    details: PersonDetails,
) -> Result<Person, DomainError> {
    const OPERATION: &str = "person.update";

    let row = sqlx::query(
        r#"
        UPDATE person SET
            first_name = $1,
            last_name = $2,
            type = $3,
            age = $4
        WHERE id = (
            SELECT id FROM person
            WHERE LOWER(last_name) = LOWER($5)
            ORDER BY id ASC
            LIMIT 1
        )
        RETURNING id, first_name, last_name, type, age
        "#,
    )
    .bind(&details.first_name)
    .bind(&details.last_name)
    .bind(details.person_type.as_str())
    .bind(details.age)
    .bind(last_name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| DomainError::storage(OPERATION, "update_person", e))?;

    let Some(row) = row else {
        return Err(person_not_found(last_name));
    };
    let stored = PersonRow::decode(OPERATION, &row)?;

    // Empty input keeps the current enrollments.
    if !details.courses.is_empty() {
        sqlx::query("DELETE FROM person_course WHERE person_id = $1")
            .bind(stored.id.as_i32())
            .execute(&mut *conn)
            .await
            .map_err(|e| DomainError::storage(OPERATION, "delete_courses", e))?;

        insert_courses(conn, OPERATION, stored.id, &details.courses).await?;
    }

    let courses = read_course_ids(conn, OPERATION, stored.id).await?;
    Ok(stored.into_person(courses))
}

/// Returns the number of person rows removed.
async fn delete_person(conn: &mut PgConnection, last_name: &str) -> Result<u64, DomainError> {
    const OPERATION: &str = "person.delete";

    sqlx::query(
        r#"
        DELETE FROM person_course WHERE person_id IN (
            SELECT id FROM person WHERE LOWER(last_name) = LOWER($1)
        )
        "#,
    )
    .bind(last_name)
    .execute(&mut *conn)
    .await
    .map_err(|e| DomainError::storage(OPERATION, "delete_courses", e))?;

    let result = sqlx::query("DELETE FROM person WHERE LOWER(last_name) = LOWER($1)")
        .bind(last_name)
        .execute(&mut *conn)
        .await
        .map_err(|e| DomainError::storage(OPERATION, "delete_person", e))?;

    if result.rows_affected() == 0 {
        return Err(person_not_found(last_name));
    }

    Ok(result.rows_affected())
}

/// Inserts one `person_course` row per id in a single statement.
async fn insert_courses(
    conn: &mut PgConnection,
    operation: &str,
    person_id: PersonId,
    courses: &[CourseId],
) -> Result<(), DomainError> {
    let course_ids: Vec<i32> = courses.iter().map(CourseId::as_i32).collect();

    sqlx::query(
        r#"
        INSERT INTO person_course (person_id, course_id)
        SELECT $1, UNNEST($2::INTEGER[])
        "#,
    )
    .bind(person_id.as_i32())
    .bind(course_ids)
    .execute(&mut *conn)
    .await
    .map_err(|e| DomainError::storage(operation, "insert_courses", e))?;

    Ok(())
}

async fn read_course_ids(
    conn: &mut PgConnection,
    operation: &str,
    person_id: PersonId,
) -> Result<Vec<CourseId>, DomainError> {
    let rows = sqlx::query(
        "SELECT course_id FROM person_course WHERE person_id = $1 ORDER BY course_id ASC",
    )
    .bind(person_id.as_i32())
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| DomainError::storage(operation, "read_back", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<i32, _>("course_id")
                .map(CourseId::new)
                .map_err(|e| DomainError::storage(operation, "read_back", e))
        })
        .collect()
}

/// Commits on success, rolls back on failure.
///
/// A failed rollback does not mask the original error; it is logged and
/// attached as a detail.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    operation: &str,
    result: Result<T, DomainError>,
) -> Result<T, DomainError> {
    match result {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| DomainError::transaction(operation, "commit", e))?;
            Ok(value)
        }
        Err(err) => match tx.rollback().await {
            Ok(()) => Err(err),
            Err(rollback_err) => {
                tracing::warn!(operation, error = %rollback_err, "transaction rollback failed");
                Err(err.with_detail("rollback_error", rollback_err.to_string()))
            }
        },
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// Scalar columns of a `person` row.
struct PersonRow {
    id: PersonId,
    first_name: String,
    last_name: String,
    person_type: PersonType,
    age: i32,
}

impl PersonRow {
    fn decode(operation: &str, row: &PgRow) -> Result<Self, DomainError> {
        let id: i32 = row
            .try_get("id")
            .map_err(|e| DomainError::storage(operation, "decode id", e))?;

        let first_name: String = row
            .try_get("first_name")
            .map_err(|e| DomainError::storage(operation, "decode first_name", e))?;

        let last_name: String = row
            .try_get("last_name")
            .map_err(|e| DomainError::storage(operation, "decode last_name", e))?;

        let type_str: String = row
            .try_get("type")
            .map_err(|e| DomainError::storage(operation, "decode type", e))?;
        let person_type = str_to_person_type(operation, &type_str)?;

        let age: i32 = row
            .try_get("age")
            .map_err(|e| DomainError::storage(operation, "decode age", e))?;

        Ok(Self {
            id: PersonId::new(id),
            first_name,
            last_name,
            person_type,
            age,
        })
    }

    fn into_person(self, courses: Vec<CourseId>) -> Person {
        Person {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            person_type: self.person_type,
            age: self.age,
            courses,
        }
    }
}

fn row_to_person(operation: &str, row: PgRow) -> Result<Person, DomainError> {
    let stored = PersonRow::decode(operation, &row)?;

    let raw_course_ids: Vec<Option<i32>> = row
        .try_get("course_ids")
        .map_err(|e| DomainError::storage(operation, "decode course_ids", e))?;

    Ok(stored.into_person(collapse_course_ids(raw_course_ids)))
}

fn str_to_person_type(operation: &str, s: &str) -> Result<PersonType, DomainError> {
    s.parse().map_err(|_| {
        DomainError::storage(operation, "decode type", format!("invalid person type: {}", s))
    })
}

fn person_not_found(last_name: &str) -> DomainError {
    DomainError::new(
        ErrorCode::PersonNotFound,
        format!("No person found with last name: {}", last_name),
    )
    .with_detail("last_name", last_name)
}
