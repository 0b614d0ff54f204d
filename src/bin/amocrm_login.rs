//! Authorize an integration against an amoCRM account.
//!
//! Without an authorization code, prints the URL of the consent page. With
//! one, reuses the stored token or exchanges the code, then prints the
//! account name.
//!
//! ```sh
//! export AMOCRM_CLIENT_ID=... AMOCRM_CLIENT_SECRET=... AMOCRM_REDIRECT_URL=...
//! export AMOCRM_DOMAIN=mycompany
//! cargo run --bin amocrm-login
//! AMOCRM_AUTH_CODE='def502...' cargo run --bin amocrm-login
//! ```

use amocrm_api::rest::{random_state, Accounts, AuthorizeMode};
use amocrm_api::{AmoCrm, FileTokenStorage, OAuthConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let oauth = OAuthConfig::from_env()?;
    let domain = std::env::var("AMOCRM_DOMAIN").map_err(|_| {
        "AMOCRM_DOMAIN environment variable is not set (the account subdomain)"
    })?;

    let mut crm = AmoCrm::new(oauth)?.with_storage(FileTokenStorage::new(&domain)?);
    crm.set_domain(&domain)?;

    let code = std::env::var("AMOCRM_AUTH_CODE").unwrap_or_default();
    if code.is_empty() {
        let state = random_state();
        let url = crm.authorize_url(&state, AuthorizeMode::PostMessage.as_str())?;
        println!("Open this page and grant access:\n\n  {url}\n");
        println!("Then re-run with AMOCRM_AUTH_CODE set to the returned code.");
        println!("Expect state={state} on the redirect.");
        return Ok(());
    }

    let token = crm.load_token_or_authorize(&code).await?;
    info!(expires_at = %token.expires_at, "Token installed");

    let account = crm.accounts().current("").await?;
    println!(
        "Authorized to {} ({})",
        account.name.as_deref().unwrap_or("<unnamed>"),
        account.subdomain.as_deref().unwrap_or(&domain),
    );

    Ok(())
}
