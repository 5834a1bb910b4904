//! Sign-in, sign-out and session commands

use tracing::{error, warn};

use super::{enter, print_redirect, prompt_line};
use crate::error::handle_api_error;
use crate::routes::Route;
use crate::schema::SignInForm;
use crate::screens::{Notification, dashboard};
use crate::state::AppState;

pub async fn cmd_login(
    state: &AppState,
    email: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    if let Err(redirect) = enter(state, Route::SignIn).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let password = match password {
        Some(password) => password,
        None => prompt_line("Senha: ")?,
    };
    let form = SignInForm {
        email: email.to_string(),
        password,
    };

    let credenciais = match form.validate_form() {
        Ok(credenciais) => credenciais,
        Err(errors) => {
            println!("Formulário inválido: {errors}");
            return Ok(());
        }
    };

    match state.session.sign_in(&credenciais).await {
        Ok(session) => {
            println!("✓ Bem-vindo, {}", session.user.name);
            println!();
            println!("{}", dashboard::render(&session));
        }
        Err(e) => {
            error!(error = %e, "Sign-in failed");
            println!("{}", Notification::error(&handle_api_error(&e)));
        }
    }
    Ok(())
}

pub async fn cmd_logout(state: &AppState) -> anyhow::Result<()> {
    state.session.restore_cookies();
    if let Err(e) = state.session.sign_out().await {
        warn!(error = %e, "Sign-out did not reach the server");
    }
    println!("✓ Sessão encerrada.");
    Ok(())
}

pub async fn cmd_whoami(state: &AppState) -> anyhow::Result<()> {
    match enter(state, Route::Dashboard).await {
        Ok((_, Some(session))) => println!("{}", dashboard::render(&session)),
        Ok((_, None)) => {}
        Err(redirect) => print_redirect(&redirect),
    }
    Ok(())
}
