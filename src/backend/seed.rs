/**
 * Account Administration Tool
 *
 * Operates on accounts in the configured PostgreSQL database.
 *
 * # Usage
 *
 * ```text
 * forum-seed admin              create or promote the administrator
 * forum-seed deactivate <email> block sign-in and existing tokens
 * forum-seed activate <email>   re-enable an account
 * ```
 *
 * # Environment
 *
 * - `DATABASE_URL` - required
 * - `ADMIN_USERNAME` - default `admin`
 * - `ADMIN_EMAIL` - required for `admin`
 * - `ADMIN_PASSWORD` - required when `admin` creates a new account
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use forum::backend::server::config::{load_store, ServerConfig};

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("admin");

    let config = ServerConfig::load()?;
    if config.database_url.is_none() {
        return Err("DATABASE_URL must be set".into());
    }
    let store = load_store(&config).await?;

    match (command, args.get(1)) {
        ("admin", _) => seed_admin(store.as_ref(), config.bcrypt_cost).await,
        ("activate", Some(email)) => set_active(store.as_ref(), email, true).await,
        ("deactivate", Some(email)) => set_active(store.as_ref(), email, false).await,
        _ => Err("usage: forum-seed [admin | activate <email> | deactivate <email>]".into()),
    }
}

#[cfg(feature = "ssr")]
async fn seed_admin(
    store: &dyn forum::backend::store::ForumStore,
    bcrypt_cost: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    use forum::backend::auth::users::hash_password;
    use forum::backend::store::NewUser;
    use forum::shared::user::{normalize_email, RegisterRequest, Role};
    use forum::shared::validation::check;

    let email = std::env::var("ADMIN_EMAIL").map_err(|_| "ADMIN_EMAIL must be set")?;
    let email = normalize_email(&email);

    if let Some(existing) = store.find_user_by_email(&email).await? {
        if existing.role == Role::Admin {
            println!("{} is already an administrator", existing.username);
        } else {
            store.set_user_role(existing.id, Role::Admin).await?;
            println!("Promoted {} ({}) to administrator", existing.username, existing.id);
        }
        return Ok(());
    }

    let request = RegisterRequest {
        username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        email,
        password: std::env::var("ADMIN_PASSWORD").map_err(|_| "ADMIN_PASSWORD must be set")?,
    }
    .normalized();
    check(&request)?;

    let user = store
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password, bcrypt_cost)?,
            role: Role::Admin,
        })
        .await?;
    println!("Created administrator {} ({})", user.username, user.id);
    Ok(())
}

#[cfg(feature = "ssr")]
async fn set_active(
    store: &dyn forum::backend::store::ForumStore,
    email: &str,
    active: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = forum::shared::user::normalize_email(email);
    let user = store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| format!("no account with email {}", email))?;
    store.set_user_active(user.id, active).await?;
    println!(
        "{} {} ({})",
        if active { "Activated" } else { "Deactivated" },
        user.username,
        user.id
    );
    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("The seed tool requires the 'ssr' feature to be enabled.");
    std::process::exit(1);
}
