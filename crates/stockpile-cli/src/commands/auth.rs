use anyhow::Result;
use colored::Colorize;

use stockpile_client::{ApiClient, ApiError, NewUser};

use crate::cli::{LoginArgs, RegisterArgs};
use crate::output::{print_error, print_success};

pub async fn login(client: &ApiClient, args: &LoginArgs) -> Result<()> {
    match client.auth().login(&args.username, &args.password).await {
        Ok(user) => {
            let name = if user.first_name.is_empty() {
                user.username.clone()
            } else {
                format!("{} {}", user.first_name, user.last_name)
            };
            print_success(&format!("Logged in as {}", name.cyan()));
            Ok(())
        }
        Err(ApiError::Unauthorized { .. }) => {
            anyhow::bail!("Incorrect username or password")
        }
        Err(err) => Err(err.into()),
    }
}

pub fn logout(client: &ApiClient) -> Result<()> {
    if client.session().is_authenticated() {
        client.auth().logout()?;
        print_success("Logged out (session cleared)");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub fn whoami(client: &ApiClient, profile: &str) -> Result<()> {
    match client.session().user() {
        Some(user) => {
            println!("{}: {}", "Profile".cyan(), profile);
            println!("{}: {} {}", "Name".cyan(), user.first_name, user.last_name);
            println!("{}: {}", "Email".cyan(), user.email);
        }
        None => {
            print_error(&format!("Not logged in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}

pub async fn register(client: &ApiClient, args: &RegisterArgs) -> Result<()> {
    let new_user = NewUser {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
    };
    match client.auth().register(&new_user).await {
        Ok(created) => {
            print_success(&format!("Registered {}", created.email.cyan()));
            Ok(())
        }
        Err(ApiError::EmailTaken) => {
            anyhow::bail!("Email {} is already in use", args.email)
        }
        Err(err) => Err(err.into()),
    }
}
