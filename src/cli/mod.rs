//! Administrative CLI commands: admin bootstrap and database seeding.

use chrono::{Datelike, NaiveDate, Utc};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;

use crate::modules::students::model::{CreateStudentDto, Gender};
use crate::modules::students::service::StudentService;
use crate::utils::errors::AppError;
use crate::utils::password::hash_password;

/// Creates an active, verified admin account. Admins cannot be created
/// through the API.
pub async fn create_admin(
    pool: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    if exists {
        return Err(AppError::bad_request(format!(
            "A user with email {} already exists",
            email
        )));
    }

    let password_hash = hash_password(password)?;
    sqlx::query(
        "INSERT INTO users (email, password, first_name, last_name, role, is_active, is_verified) \
         VALUES ($1, $2, $3, $4, 'admin', TRUE, TRUE)",
    )
    .bind(email)
    .bind(&password_hash)
    .bind(first_name)
    .bind(last_name)
    .execute(pool)
    .await?;

    Ok(())
}

const CLASSES: &[&str] = &[
    "Reception", "Year 1", "Year 2", "Year 3", "Year 4", "Year 5", "Year 6", "Year 7", "Year 8",
    "Year 9", "Year 10", "Year 11",
];

const SECTIONS: &[&str] = &["A", "B", "C"];

fn sanitize_for_email(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

fn fake_student(index: usize, today: NaiveDate) -> CreateStudentDto {
    let mut rng = rand::thread_rng();

    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let guardian_first: String = FirstName().fake();

    let age: i32 = rng.gen_range(4..=17);
    let date_of_birth = NaiveDate::from_ymd_opt(
        today.year() - age,
        rng.gen_range(1..=12),
        rng.gen_range(1..=28),
    )
    .unwrap_or(today - chrono::Duration::days(i64::from(age) * 365));

    let gender = *[Gender::Male, Gender::Female, Gender::Other]
        .choose(&mut rng)
        .unwrap_or(&Gender::Other);

    let current_class = CLASSES.choose(&mut rng).unwrap_or(&"Year 1").to_string();
    let section = SECTIONS.choose(&mut rng).unwrap_or(&"A").to_string();

    let email = format!(
        "{}.{}.{}@students.slate-school.io",
        sanitize_for_email(&first_name),
        sanitize_for_email(&last_name),
        index
    );

    CreateStudentDto {
        student_id: None,
        first_name,
        last_name: last_name.clone(),
        middle_name: None,
        date_of_birth,
        gender,
        blood_group: None,
        nationality: "British".to_string(),
        religion: None,
        email: Some(email),
        phone_number: None,
        emergency_contact_name: format!("{} {}", guardian_first, last_name),
        emergency_contact_phone: format!("+4477009{:05}", rng.gen_range(0..100000)),
        emergency_contact_relationship: "Parent".to_string(),
        address_line_1: format!("{} High Street", rng.gen_range(1..200)),
        address_line_2: None,
        city: "London".to_string(),
        county: "Greater London".to_string(),
        postal_code: format!("N{} {}AA", rng.gen_range(1..20), rng.gen_range(1..10)),
        country: "United Kingdom".to_string(),
        admission_date: None,
        current_class,
        academic_year: format!("{}-{}", today.year(), today.year() + 1),
        roll_number: None,
        section: Some(section),
        father_name: None,
        father_phone: None,
        father_email: None,
        father_occupation: None,
        mother_name: None,
        mother_phone: None,
        mother_email: None,
        mother_occupation: None,
        guardian_name: Some(format!("{} {}", guardian_first, last_name)),
        guardian_phone: None,
        guardian_email: None,
        guardian_relationship: Some("Parent".to_string()),
        medical_conditions: None,
        medications: None,
        doctor_name: None,
        doctor_phone: None,
        profile_picture: None,
        notes: None,
    }
}

/// Inserts `count` fake students through the regular creation flow so
/// identifiers, linked users and audit fields behave as in production.
pub async fn seed_students(pool: &PgPool, count: usize) -> Result<usize, AppError> {
    let today = Utc::now().date_naive();
    let mut created = 0;

    for index in 0..count {
        let dto = fake_student(index, today);
        match StudentService::create_student(pool, dto, None).await {
            Ok(student) => {
                created += 1;
                println!("  created {} ({})", student.student_id, student.full_name());
            }
            Err(e) => {
                eprintln!("  skipped student {}: {}", index, e);
            }
        }
    }

    Ok(created)
}
