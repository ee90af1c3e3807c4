use crate::context::CliContext;
use anyhow::Result;
use citybuzz_core::user::{Credentials, RegisterRequest};

pub async fn whoami(ctx: &CliContext) -> Result<()> {
    match ctx.client.session.current_user().await {
        Some(user) => println!("{} (@{}) {}", user.display_name(), user.username, user.id),
        None => println!("Not logged in"),
    }
    Ok(())
}

pub async fn login(ctx: &CliContext, identifier: &str, password: &str) -> Result<()> {
    let user = ctx
        .client
        .session
        .login(&Credentials::new(identifier, password))
        .await?;
    println!("Logged in as {} (@{})", user.display_name(), user.username);
    Ok(())
}

pub async fn register(ctx: &CliContext, request: &RegisterRequest) -> Result<()> {
    let user = ctx.client.session.register(request).await?;
    println!("Account @{} created. Run `citybuzz login` to sign in.", user.username);
    Ok(())
}

pub async fn logout(ctx: &CliContext) -> Result<()> {
    ctx.client.logout().await?;
    println!("Logged out");
    Ok(())
}
