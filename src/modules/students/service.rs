use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::modules::documents::service::DocumentService;
use crate::modules::notes::service::NoteService;
use crate::utils::errors::{AppError, is_unique_violation};
use crate::utils::pagination::PaginationParams;
use crate::utils::password::hash_password;

use super::model::{
    BulkStatusUpdateRequest, CreateStudentDto, QuickInfoResponse, Student, StudentDetailResponse,
    StudentFilterParams, StudentSearchRequest, StudentStatsResponse, StudentStatus,
    UpdateStudentDto, age_bucket, age_on,
};

/// Human-readable identifier prefix: `STU<year><4-digit sequence>`.
const STUDENT_ID_PREFIX: &str = "STU";

/// Computes the next identifier in a year's sequence from the current
/// maximum. The sequence restarts at 0001 each year.
pub(crate) fn next_student_id(year: i32, last_id: Option<&str>) -> String {
    let next = last_id
        .and_then(|id| id.get(id.len().saturating_sub(4)..))
        .and_then(|digits| digits.parse::<u32>().ok())
        .map(|n| n + 1)
        .unwrap_or(1);
    format!("{}{}{:04}", STUDENT_ID_PREFIX, year, next)
}

/// Maps a requested ordering onto a whitelisted ORDER BY clause; anything
/// unrecognized falls back to the default name ordering.
pub(crate) fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering.unwrap_or("first_name") {
        "first_name" => "first_name ASC, last_name ASC",
        "-first_name" => "first_name DESC",
        "last_name" => "last_name ASC",
        "-last_name" => "last_name DESC",
        "student_id" => "student_id ASC",
        "-student_id" => "student_id DESC",
        "admission_date" => "admission_date ASC",
        "-admission_date" => "admission_date DESC",
        "created_at" => "created_at ASC",
        "-created_at" => "created_at DESC",
        _ => "first_name ASC, last_name ASC",
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn validate_date_of_birth(date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date_of_birth > today {
        return Err(AppError::field_error(
            "date_of_birth",
            "Date of birth cannot be in the future.",
        ));
    }
    if today.year() - date_of_birth.year() < 3 {
        return Err(AppError::field_error(
            "date_of_birth",
            "Student must be at least 3 years old.",
        ));
    }
    Ok(())
}

const LIST_FILTER_WHERE: &str = "($1::text IS NULL OR status = $1) \
     AND ($2::text IS NULL OR current_class = $2) \
     AND ($3::text IS NULL OR section = $3) \
     AND ($4::text IS NULL OR gender = $4) \
     AND ($5::boolean IS NULL OR enrollment_status = $5) \
     AND ($6::text IS NULL \
          OR first_name ILIKE '%' || $6 || '%' \
          OR last_name ILIKE '%' || $6 || '%' \
          OR student_id ILIKE '%' || $6 || '%' \
          OR email ILIKE '%' || $6 || '%' \
          OR phone_number ILIKE '%' || $6 || '%')";

const SEARCH_FILTER_WHERE: &str = "($1::text IS NULL \
          OR first_name ILIKE '%' || $1 || '%' \
          OR last_name ILIKE '%' || $1 || '%' \
          OR middle_name ILIKE '%' || $1 || '%' \
          OR student_id ILIKE '%' || $1 || '%' \
          OR email ILIKE '%' || $1 || '%' \
          OR phone_number ILIKE '%' || $1 || '%') \
     AND ($2::text IS NULL OR status = $2) \
     AND ($3::text IS NULL OR current_class ILIKE '%' || $3 || '%') \
     AND ($4::text IS NULL OR section ILIKE '%' || $4 || '%') \
     AND ($5::text IS NULL OR gender = $5) \
     AND ($6::date IS NULL OR admission_date >= $6) \
     AND ($7::date IS NULL OR admission_date <= $7) \
     AND ($8::int IS NULL OR EXTRACT(YEAR FROM date_of_birth)::int <= $8) \
     AND ($9::int IS NULL OR EXTRACT(YEAR FROM date_of_birth)::int >= $9)";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &PgPool,
        dto: CreateStudentDto,
        created_by: Option<Uuid>,
    ) -> Result<Student, AppError> {
        let today = Utc::now().date_naive();
        validate_date_of_birth(dto.date_of_birth, today)?;

        if let Some(email) = non_empty(&dto.email) {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM students WHERE email = $1)",
            )
            .bind(email)
            .fetch_one(db)
            .await?;
            if exists {
                return Err(AppError::field_error(
                    "email",
                    "A student with this email already exists.",
                ));
            }
        }

        let student_id = match non_empty(&dto.student_id) {
            Some(provided) => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = $1)",
                )
                .bind(provided)
                .fetch_one(db)
                .await?;
                if exists {
                    return Err(AppError::field_error(
                        "student_id",
                        "A student with this ID already exists.",
                    ));
                }
                provided.to_string()
            }
            None => Self::generate_student_id(db, today.year()).await?,
        };

        let admission_date = dto.admission_date.unwrap_or(today);

        let mut student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (\
                student_id, first_name, last_name, middle_name, date_of_birth, gender, \
                blood_group, nationality, religion, email, phone_number, \
                emergency_contact_name, emergency_contact_phone, emergency_contact_relationship, \
                address_line_1, address_line_2, city, county, postal_code, country, \
                admission_date, current_class, academic_year, roll_number, section, \
                father_name, father_phone, father_email, father_occupation, \
                mother_name, mother_phone, mother_email, mother_occupation, \
                guardian_name, guardian_phone, guardian_email, guardian_relationship, \
                medical_conditions, medications, doctor_name, doctor_phone, \
                profile_picture, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, \
                $32, $33, $34, $35, $36, $37, $38, $39, $40, $41, $42, $43, $44) \
             RETURNING *",
        )
        .bind(&student_id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.middle_name)
        .bind(dto.date_of_birth)
        .bind(dto.gender)
        .bind(&dto.blood_group)
        .bind(&dto.nationality)
        .bind(&dto.religion)
        .bind(&dto.email)
        .bind(&dto.phone_number)
        .bind(&dto.emergency_contact_name)
        .bind(&dto.emergency_contact_phone)
        .bind(&dto.emergency_contact_relationship)
        .bind(&dto.address_line_1)
        .bind(&dto.address_line_2)
        .bind(&dto.city)
        .bind(&dto.county)
        .bind(&dto.postal_code)
        .bind(&dto.country)
        .bind(admission_date)
        .bind(&dto.current_class)
        .bind(&dto.academic_year)
        .bind(&dto.roll_number)
        .bind(&dto.section)
        .bind(&dto.father_name)
        .bind(&dto.father_phone)
        .bind(&dto.father_email)
        .bind(&dto.father_occupation)
        .bind(&dto.mother_name)
        .bind(&dto.mother_phone)
        .bind(&dto.mother_email)
        .bind(&dto.mother_occupation)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(&dto.guardian_email)
        .bind(&dto.guardian_relationship)
        .bind(&dto.medical_conditions)
        .bind(&dto.medications)
        .bind(&dto.doctor_name)
        .bind(&dto.doctor_phone)
        .bind(&dto.profile_picture)
        .bind(&dto.notes)
        .bind(created_by)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::bad_request("A student with this ID or email already exists.")
            } else {
                e.into()
            }
        })?;

        Self::create_linked_user(db, &mut student).await?;

        Ok(student)
    }

    /// Scans the year's existing identifiers and increments the maximum.
    async fn generate_student_id(db: &PgPool, year: i32) -> Result<String, AppError> {
        let prefix = format!("{}{}%", STUDENT_ID_PREFIX, year);
        let last = sqlx::query_scalar::<_, String>(
            "SELECT student_id FROM students WHERE student_id LIKE $1 \
             ORDER BY student_id DESC LIMIT 1",
        )
        .bind(&prefix)
        .fetch_optional(db)
        .await?;

        Ok(next_student_id(year, last.as_deref()))
    }

    /// Creates an active student-role user account for a student with an
    /// email and no linked user, then links it.
    async fn create_linked_user(db: &PgPool, student: &mut Student) -> Result<(), AppError> {
        let Some(email) = student.email.clone() else {
            return Ok(());
        };
        if student.user_id.is_some() {
            return Ok(());
        }

        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(&email)
        .fetch_one(db)
        .await?;
        if taken {
            warn!(email = %email, "User email already taken, skipping account link");
            return Ok(());
        }

        let password_hash = hash_password(&generate_password())?;
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, password, first_name, last_name, role, is_active) \
             VALUES ($1, $2, $3, $4, 'student', TRUE) RETURNING id",
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .fetch_one(db)
        .await?;

        sqlx::query("UPDATE students SET user_id = $1 WHERE id = $2")
            .bind(user_id)
            .bind(student.id)
            .execute(db)
            .await?;
        student.user_id = Some(user_id);

        Ok(())
    }

    #[instrument(skip(db, params))]
    pub async fn list_students(
        db: &PgPool,
        params: &StudentFilterParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let status = params.status.map(|s| s.as_str());
        let gender = params.gender.map(|g| g.as_str());
        let current_class = non_empty(&params.current_class);
        let section = non_empty(&params.section);
        let search = non_empty(&params.search);

        let count_sql = format!(
            "SELECT COUNT(*) FROM students WHERE {}",
            LIST_FILTER_WHERE
        );
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(status)
            .bind(current_class)
            .bind(section)
            .bind(gender)
            .bind(params.enrollment_status)
            .bind(search)
            .fetch_one(db)
            .await?;

        let list_sql = format!(
            "SELECT * FROM students WHERE {} ORDER BY {} LIMIT $7 OFFSET $8",
            LIST_FILTER_WHERE,
            order_clause(params.ordering.as_deref())
        );
        let students = sqlx::query_as::<_, Student>(&list_sql)
            .bind(status)
            .bind(current_class)
            .bind(section)
            .bind(gender)
            .bind(params.enrollment_status)
            .bind(search)
            .bind(params.pagination.limit())
            .bind(params.pagination.offset())
            .fetch_all(db)
            .await?;

        Ok((students, total))
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found".to_string()))?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_student_detail(
        db: &PgPool,
        id: Uuid,
    ) -> Result<StudentDetailResponse, AppError> {
        let student = Self::get_student(db, id).await?;
        let today = Utc::now().date_naive();

        let documents = DocumentService::list_for_student(db, student.id).await?;
        let student_notes = NoteService::list_for_student(db, student.id).await?;

        let (user_email, user_is_active) = match student.user_id {
            Some(user_id) => {
                let row = sqlx::query_as::<_, (String, bool)>(
                    "SELECT email, is_active FROM users WHERE id = $1",
                )
                .bind(user_id)
                .fetch_optional(db)
                .await?;
                match row {
                    Some((email, is_active)) => (Some(email), Some(is_active)),
                    None => (None, None),
                }
            }
            None => (None, None),
        };

        let created_by_name = Self::user_full_name(db, student.created_by).await?;
        let updated_by_name = Self::user_full_name(db, student.updated_by).await?;

        Ok(StudentDetailResponse {
            full_name: student.full_name(),
            age: student.age(today),
            is_active: student.is_active(),
            formatted_address: student.formatted_address(),
            primary_contact: student.primary_contact(),
            documents,
            student_notes,
            user_email,
            user_is_active,
            created_by_name,
            updated_by_name,
            student,
        })
    }

    async fn user_full_name(db: &PgPool, id: Option<Uuid>) -> Result<Option<String>, AppError> {
        match id {
            Some(id) => Ok(sqlx::query_scalar::<_, String>(
                "SELECT TRIM(first_name || ' ' || last_name) FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(db)
            .await?),
            None => Ok(None),
        }
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
        updated_by: Uuid,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;

        if let Some(date_of_birth) = dto.date_of_birth {
            validate_date_of_birth(date_of_birth, Utc::now().date_naive())?;
        }

        if let Some(email) = non_empty(&dto.email) {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM students WHERE email = $1 AND id <> $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(db)
            .await?;
            if taken {
                return Err(AppError::field_error(
                    "email",
                    "A student with this email already exists.",
                ));
            }
        }

        let student = sqlx::query_as::<_, Student>(
            "UPDATE students SET \
                first_name = COALESCE($1, first_name), \
                last_name = COALESCE($2, last_name), \
                middle_name = COALESCE($3, middle_name), \
                date_of_birth = COALESCE($4, date_of_birth), \
                gender = COALESCE($5, gender), \
                blood_group = COALESCE($6, blood_group), \
                nationality = COALESCE($7, nationality), \
                religion = COALESCE($8, religion), \
                email = COALESCE($9, email), \
                phone_number = COALESCE($10, phone_number), \
                emergency_contact_name = COALESCE($11, emergency_contact_name), \
                emergency_contact_phone = COALESCE($12, emergency_contact_phone), \
                emergency_contact_relationship = COALESCE($13, emergency_contact_relationship), \
                address_line_1 = COALESCE($14, address_line_1), \
                address_line_2 = COALESCE($15, address_line_2), \
                city = COALESCE($16, city), \
                county = COALESCE($17, county), \
                postal_code = COALESCE($18, postal_code), \
                country = COALESCE($19, country), \
                current_class = COALESCE($20, current_class), \
                academic_year = COALESCE($21, academic_year), \
                roll_number = COALESCE($22, roll_number), \
                section = COALESCE($23, section), \
                status = COALESCE($24, status), \
                enrollment_status = COALESCE($25, enrollment_status), \
                graduation_date = COALESCE($26, graduation_date), \
                father_name = COALESCE($27, father_name), \
                father_phone = COALESCE($28, father_phone), \
                father_email = COALESCE($29, father_email), \
                father_occupation = COALESCE($30, father_occupation), \
                mother_name = COALESCE($31, mother_name), \
                mother_phone = COALESCE($32, mother_phone), \
                mother_email = COALESCE($33, mother_email), \
                mother_occupation = COALESCE($34, mother_occupation), \
                guardian_name = COALESCE($35, guardian_name), \
                guardian_phone = COALESCE($36, guardian_phone), \
                guardian_email = COALESCE($37, guardian_email), \
                guardian_relationship = COALESCE($38, guardian_relationship), \
                medical_conditions = COALESCE($39, medical_conditions), \
                medications = COALESCE($40, medications), \
                doctor_name = COALESCE($41, doctor_name), \
                doctor_phone = COALESCE($42, doctor_phone), \
                profile_picture = COALESCE($43, profile_picture), \
                notes = COALESCE($44, notes), \
                updated_by = $45, \
                updated_at = NOW() \
             WHERE id = $46 \
             RETURNING *",
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.middle_name)
        .bind(dto.date_of_birth)
        .bind(dto.gender)
        .bind(&dto.blood_group)
        .bind(&dto.nationality)
        .bind(&dto.religion)
        .bind(&dto.email)
        .bind(&dto.phone_number)
        .bind(&dto.emergency_contact_name)
        .bind(&dto.emergency_contact_phone)
        .bind(&dto.emergency_contact_relationship)
        .bind(&dto.address_line_1)
        .bind(&dto.address_line_2)
        .bind(&dto.city)
        .bind(&dto.county)
        .bind(&dto.postal_code)
        .bind(&dto.country)
        .bind(&dto.current_class)
        .bind(&dto.academic_year)
        .bind(&dto.roll_number)
        .bind(&dto.section)
        .bind(dto.status)
        .bind(dto.enrollment_status)
        .bind(dto.graduation_date)
        .bind(&dto.father_name)
        .bind(&dto.father_phone)
        .bind(&dto.father_email)
        .bind(&dto.father_occupation)
        .bind(&dto.mother_name)
        .bind(&dto.mother_phone)
        .bind(&dto.mother_email)
        .bind(&dto.mother_occupation)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(&dto.guardian_email)
        .bind(&dto.guardian_relationship)
        .bind(&dto.medical_conditions)
        .bind(&dto.medications)
        .bind(&dto.doctor_name)
        .bind(&dto.doctor_phone)
        .bind(&dto.profile_picture)
        .bind(&dto.notes)
        .bind(updated_by)
        .bind(existing.id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::field_error("email", "A student with this email already exists.")
            } else {
                e.into()
            }
        })?;

        Self::sync_linked_user(db, &student).await?;

        Ok(student)
    }

    /// Propagates name, email and active-status to the linked user account.
    async fn sync_linked_user(db: &PgPool, student: &Student) -> Result<(), AppError> {
        let Some(user_id) = student.user_id else {
            return Ok(());
        };

        sqlx::query(
            "UPDATE users SET first_name = $1, last_name = $2, \
             email = COALESCE($3, email), is_active = $4, updated_at = NOW() \
             WHERE id = $5",
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(student.is_active())
        .bind(user_id)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Deletes the student; a linked user account is deactivated, not deleted.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let student = Self::get_student(db, id).await?;

        if let Some(user_id) = student.user_id {
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(db)
                .await?;
        }

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool) -> Result<StudentStatsResponse, AppError> {
        let total_students =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
                .fetch_one(db)
                .await?;

        let active_students = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE status = 'active' AND enrollment_status",
        )
        .fetch_one(db)
        .await?;

        let inactive_students = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE status = 'inactive'",
        )
        .fetch_one(db)
        .await?;

        let graduated_students = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE status = 'graduated'",
        )
        .fetch_one(db)
        .await?;

        let today = Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        let new_admissions_this_month = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE admission_date >= $1",
        )
        .bind(month_start)
        .fetch_one(db)
        .await?;

        let students_by_class = Self::grouped_counts(db, "current_class").await?;
        let students_by_status = Self::grouped_counts(db, "status").await?;
        let gender_distribution = Self::grouped_counts(db, "gender").await?;

        // Ages are bucketed in memory from each student's date of birth.
        let birth_dates =
            sqlx::query_scalar::<_, NaiveDate>("SELECT date_of_birth FROM students")
                .fetch_all(db)
                .await?;

        let mut age_distribution: HashMap<String, i64> =
            ["3-5", "6-8", "9-11", "12-14", "15-17", "18+"]
                .iter()
                .map(|range| (range.to_string(), 0))
                .collect();
        for date_of_birth in birth_dates {
            let bucket = age_bucket(age_on(date_of_birth, today));
            *age_distribution.entry(bucket.to_string()).or_insert(0) += 1;
        }

        Ok(StudentStatsResponse {
            total_students,
            active_students,
            inactive_students,
            graduated_students,
            new_admissions_this_month,
            students_by_class,
            students_by_status,
            gender_distribution,
            age_distribution,
        })
    }

    async fn grouped_counts(db: &PgPool, column: &str) -> Result<HashMap<String, i64>, AppError> {
        // `column` is always a compile-time constant from `stats`.
        let sql = format!(
            "SELECT {}, COUNT(*) FROM students GROUP BY {}",
            column, column
        );
        let rows = sqlx::query_as::<_, (String, i64)>(&sql).fetch_all(db).await?;
        Ok(rows.into_iter().collect())
    }

    #[instrument(skip(db, req))]
    pub async fn search(
        db: &PgPool,
        req: &StudentSearchRequest,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let current_year = Utc::now().date_naive().year();
        let max_birth_year = req.age_from.map(|age| current_year - age);
        let min_birth_year = req.age_to.map(|age| current_year - age);

        let query = non_empty(&req.query);
        let status = req.status.map(|s| s.as_str());
        let gender = req.gender.map(|g| g.as_str());
        let current_class = non_empty(&req.current_class);
        let section = non_empty(&req.section);

        let count_sql = format!(
            "SELECT COUNT(*) FROM students WHERE {}",
            SEARCH_FILTER_WHERE
        );
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(query)
            .bind(status)
            .bind(current_class)
            .bind(section)
            .bind(gender)
            .bind(req.admission_date_from)
            .bind(req.admission_date_to)
            .bind(max_birth_year)
            .bind(min_birth_year)
            .fetch_one(db)
            .await?;

        let pagination = req.pagination();
        let list_sql = format!(
            "SELECT * FROM students WHERE {} ORDER BY {} LIMIT $10 OFFSET $11",
            SEARCH_FILTER_WHERE,
            order_clause(req.ordering.as_deref())
        );
        let students = sqlx::query_as::<_, Student>(&list_sql)
            .bind(query)
            .bind(status)
            .bind(current_class)
            .bind(section)
            .bind(gender)
            .bind(req.admission_date_from)
            .bind(req.admission_date_to)
            .bind(max_birth_year)
            .bind(min_birth_year)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(db)
            .await?;

        Ok((students, total))
    }

    #[instrument(skip(db, pagination))]
    pub async fn by_status(
        db: &PgPool,
        status: StudentStatus,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE status = $1",
        )
        .bind(status)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE status = $1 \
             ORDER BY first_name ASC, last_name ASC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok((students, total))
    }

    #[instrument(skip(db, pagination))]
    pub async fn by_class(
        db: &PgPool,
        class_name: &str,
        pagination: &PaginationParams,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE current_class ILIKE $1",
        )
        .bind(class_name)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE current_class ILIKE $1 \
             ORDER BY first_name ASC, last_name ASC LIMIT $2 OFFSET $3",
        )
        .bind(class_name)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok((students, total))
    }

    /// Students admitted within the last 30 days, newest first.
    #[instrument(skip(db))]
    pub async fn recent_admissions(db: &PgPool) -> Result<Vec<Student>, AppError> {
        let cutoff = Utc::now().date_naive() - chrono::Duration::days(30);
        let students = sqlx::query_as::<_, Student>(
            "SELECT * FROM students WHERE admission_date >= $1 ORDER BY admission_date DESC",
        )
        .bind(cutoff)
        .fetch_all(db)
        .await?;

        Ok(students)
    }

    #[instrument(skip(db, req))]
    pub async fn bulk_update_status(
        db: &PgPool,
        req: &BulkStatusUpdateRequest,
        updated_by: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE students SET status = $1, updated_by = $2, updated_at = NOW() \
             WHERE id = ANY($3)",
        )
        .bind(req.status)
        .bind(updated_by)
        .bind(&req.student_ids)
        .execute(db)
        .await?;

        Ok(result.rows_affected())
    }

    /// Lookup by the human-readable identifier rather than the row UUID.
    #[instrument(skip(db))]
    pub async fn quick_info(db: &PgPool, student_id: &str) -> Result<QuickInfoResponse, AppError> {
        let student =
            sqlx::query_as::<_, Student>("SELECT * FROM students WHERE student_id = $1")
                .bind(student_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found("Student not found".to_string()))?;

        Ok(QuickInfoResponse {
            id: student.id,
            student_id: student.student_id.clone(),
            full_name: student.full_name(),
            current_class: student.current_class.clone(),
            section: student.section.clone(),
            status: student.status,
            phone_number: student.phone_number.clone(),
            email: student.email.clone(),
            emergency_contact: student.primary_contact(),
            profile_picture: student.profile_picture.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_student_id_first_of_year() {
        assert_eq!(next_student_id(2024, None), "STU20240001");
    }

    #[test]
    fn test_next_student_id_increments() {
        assert_eq!(
            next_student_id(2024, Some("STU20240001")),
            "STU20240002"
        );
        assert_eq!(
            next_student_id(2024, Some("STU20240099")),
            "STU20240100"
        );
        assert_eq!(
            next_student_id(2025, Some("STU20259999")),
            "STU202510000"
        );
    }

    #[test]
    fn test_next_student_id_unparseable_restarts() {
        assert_eq!(next_student_id(2024, Some("bad")), "STU20240001");
    }

    #[test]
    fn test_order_clause_whitelist() {
        assert_eq!(order_clause(None), "first_name ASC, last_name ASC");
        assert_eq!(order_clause(Some("last_name")), "last_name ASC");
        assert_eq!(order_clause(Some("-admission_date")), "admission_date DESC");
        assert_eq!(order_clause(Some("created_at")), "created_at ASC");
    }

    #[test]
    fn test_order_clause_rejects_unknown_columns() {
        assert_eq!(
            order_clause(Some("password; DROP TABLE students")),
            "first_name ASC, last_name ASC"
        );
        assert_eq!(order_clause(Some("")), "first_name ASC, last_name ASC");
    }

    #[test]
    fn test_validate_date_of_birth() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let future = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        assert!(validate_date_of_birth(future, today).is_err());

        let too_young = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert!(validate_date_of_birth(too_young, today).is_err());

        let fine = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        assert!(validate_date_of_birth(fine, today).is_ok());
    }

    #[test]
    fn test_generate_password_length() {
        let password = generate_password();
        assert_eq!(password.len(), 32);
        assert_ne!(password, generate_password());
    }
}
