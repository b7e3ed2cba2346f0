use clap::{Parser, Subcommand};
use co2_predictor::{
    config::AppConfig,
    db,
    repositories::{SqliteEmissionRepository, SqliteUserRepository},
    services::{
        prediction_service::format_prediction, CreateUserRequest, EmissionModel,
        PredictionRequest, PredictionService, UpdatePasswordRequest, UserService,
    },
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "co2-cli")]
#[command(about = "Admin tool for the CO2 emission predictor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Run the model for one vehicle without starting the server
    Predict {
        /// Engine size in litres
        #[arg(short, long)]
        engine_size: f64,

        /// Vehicle class, e.g. "SUV - SMALL"
        #[arg(short, long)]
        vehicle_class: String,

        /// Model file (defaults to MODEL_PATH)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Prediction history commands
    Emissions {
        #[command(subcommand)]
        command: EmissionCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Create the users and emissions tables
    Init,
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user and their prediction history
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum EmissionCommands {
    /// List a user's stored predictions, newest first
    List {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// Maximum number of records to display
        #[arg(short, long, default_value_t = 50)]
        limit: i64,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

fn password_pair(password: Option<String>) -> anyhow::Result<(String, String)> {
    match password {
        Some(pw) => Ok((pw.clone(), pw)),
        None => {
            let password = get_password("Password")?;
            let confirm = get_password("Confirm password")?;
            Ok((password, confirm))
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;
    Ok(pool)
}

fn user_service(pool: &SqlitePool) -> UserService {
    UserService::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteEmissionRepository::new(pool.clone())),
    )
}

async fn require_user_id(service: &UserService, email: &str) -> anyhow::Result<i64> {
    service
        .find_user_by_email(email)
        .await?
        .map(|user| user.id)
        .ok_or_else(|| anyhow::anyhow!("User not found: {}", email))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Db { command } => match command {
            DbCommands::Init => {
                connect(&config).await?;
                println!("Tables created successfully!");
            }
        },
        Commands::User { command } => {
            let pool = connect(&config).await?;
            let service = user_service(&pool);

            match command {
                UserCommands::Create { email, password } => {
                    let (password, password_confirm) = password_pair(password)?;
                    let user = service
                        .create_user(CreateUserRequest {
                            email,
                            password,
                            password_confirm: Some(password_confirm),
                        })
                        .await?;
                    println!("Created user {} ({})", user.email, user.id);
                }
                UserCommands::List { limit, offset } => {
                    let users = service.list_users(Some(limit), Some(offset)).await?;
                    if users.is_empty() {
                        println!("No users found");
                    }
                    for user in users {
                        println!(
                            "{:>6}  {:<40}  {}",
                            user.id,
                            user.email,
                            user.created_at.unwrap_or_default()
                        );
                    }
                }
                UserCommands::Delete { email } => {
                    let user_id = require_user_id(&service, &email).await?;
                    service.delete_user(user_id).await?;
                    println!("Deleted user {}", email);
                }
                UserCommands::SetPassword { email, password } => {
                    let user_id = require_user_id(&service, &email).await?;
                    let (new_password, new_password_confirm) = password_pair(password)?;
                    service
                        .update_password(UpdatePasswordRequest {
                            user_id,
                            new_password,
                            new_password_confirm: Some(new_password_confirm),
                        })
                        .await?;
                    println!("Password updated for {}", email);
                }
            }
        }
        Commands::Predict {
            engine_size,
            vehicle_class,
            model,
        } => {
            let model_path = model.unwrap_or(config.model_path);
            let model = EmissionModel::from_path(&model_path)?;

            // Offline runs never write history, so the pool stays lazy and unused.
            let pool = SqlitePool::connect_lazy(&config.database_url)?;
            let service = PredictionService::new(
                Arc::new(model),
                Arc::new(SqliteEmissionRepository::new(pool)),
            );

            let prediction = service
                .predict(
                    PredictionRequest {
                        engine_size,
                        vehicle_class,
                    },
                    None,
                )
                .await?;
            println!("{}", format_prediction(prediction));
        }
        Commands::Emissions { command } => match command {
            EmissionCommands::List { email, limit } => {
                let pool = connect(&config).await?;
                let service = user_service(&pool);
                let user_id = require_user_id(&service, &email).await?;

                let records = service.emission_history(user_id, limit).await?;
                if records.is_empty() {
                    println!("No predictions stored for {}", email);
                }
                for record in records {
                    println!(
                        "{}  {:<28}  {:>4.1} L  {:>8.2} g/km",
                        record.created_at.unwrap_or_default(),
                        record.vehicle_class,
                        record.engine_size,
                        record.carbon_emission
                    );
                }
            }
        },
    }

    Ok(())
}
