use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use rollcall::store::PgCredentialStore;
use rollcall_cli::{create_admin, create_classroom};
use rollcall_config::AuthConfig;
use rollcall_db::{DatabaseConfig, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "rollcall-cli")]
#[command(about = "Rollcall CLI - Administrative tools for Rollcall", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Full name
        #[arg(short = 'n', long)]
        full_name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create a classroom students can register against
    CreateClassroom {
        /// Classroom name
        #[arg(short = 'n', long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    match cli.command {
        Commands::CreateAdmin {
            email,
            full_name,
            password,
        } => {
            let email = match email {
                Some(email) => email,
                None => Input::new().with_prompt("Email address").interact_text()?,
            };
            let full_name = match full_name {
                Some(name) => name,
                None => Input::new().with_prompt("Full name").interact_text()?,
            };
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords don't match")
                    .interact()?,
            };

            let auth_config = AuthConfig::from_env()?;
            let store = PgCredentialStore::new(pool);
            let account =
                create_admin(&store, &auth_config, &email, &full_name, &password).await?;

            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", account.identity.email);
            println!("   ID: {}", account.identity.id);
        }
        Commands::CreateClassroom { name } => {
            let id = create_classroom(&pool, &name).await?;
            println!("✅ Classroom '{}' created with id {}", name.trim(), id);
        }
    }

    Ok(())
}
