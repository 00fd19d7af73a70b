use clap::{Parser, Subcommand};
use dialoguer::Password;
use dotenvy::dotenv;

use slate::cli::{create_admin, seed_students};

#[derive(Parser)]
#[command(name = "slate-cli")]
#[command(about = "Slate CLI - Administrative tools for the Slate API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: String,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: String,

        /// Email address
        #[arg(short = 'e', long)]
        email: String,

        /// Password (prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake students
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "50")]
        students: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()
                    .expect("Failed to read password"),
            };

            match create_admin(&pool, &first_name, &last_name, &email, &password).await {
                Ok(()) => {
                    println!("✅ Admin created successfully!");
                    println!("   Email: {}", email);
                    println!("   Name: {} {}", first_name, last_name);
                }
                Err(e) => {
                    eprintln!("❌ Error creating admin: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Seed { students } => {
            println!("Seeding {} students...", students);
            match seed_students(&pool, students).await {
                Ok(created) => println!("✅ Seeded {} students", created),
                Err(e) => {
                    eprintln!("❌ Seeding failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
