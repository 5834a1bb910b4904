mod abrir;
mod auth;
mod chaves;
mod emprestimos;
mod operadores;

pub use abrir::{cmd_abrir, open};
pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use chaves::{
    cmd_chaves_buscar, cmd_chaves_devolver, cmd_chaves_list, cmd_chaves_retirar, cmd_chaves_show,
};
pub use emprestimos::{
    cmd_emprestimo_administrativo, cmd_emprestimos_buscar, cmd_emprestimos_list, cmd_emprestimos_show,
};
pub use operadores::{cmd_operadores_cadastrar, cmd_operadores_list, cmd_operadores_remover};

use std::io::Write;

use anyhow::Context;

use crate::routes::{Redirect, RedirectReason, Route};
use crate::screens::{ActionError, Done};
use crate::session::Session;
use crate::state::AppState;

/// Restores the saved session and runs the route guard for `route`.
async fn enter(state: &AppState, route: Route) -> Result<(Route, Option<Session>), Redirect> {
    let session = state.session.acquire().await;
    route.guard(session.as_ref()).map(|route| (route, session))
}

fn print_redirect(redirect: &Redirect) {
    match redirect.reason {
        RedirectReason::Unauthenticated => {
            println!("Sessão não encontrada ou expirada.");
            println!("Entre com: chaveiro login <email>");
        }
        RedirectReason::Forbidden => {
            println!("Acesso restrito a administradores.");
            println!("Redirecionando para {}", redirect.to);
        }
        RedirectReason::AlreadySignedIn => {
            println!("Sessão já iniciada.");
            println!("Redirecionando para {}", redirect.to);
        }
    }
}

/// Prints the outcome of a write and hands back its value when it went through.
fn report<T>(result: Result<Done<T>, ActionError>) -> Option<T> {
    match result {
        Ok(done) => {
            println!("{}", done.notification);
            Some(done.value)
        }
        Err(ActionError::Invalid(errors)) => {
            println!("Formulário inválido:");
            if let Some(form) = &errors.form {
                println!("  {form}");
            }
            for (field, messages) in &errors.fields {
                for message in messages {
                    println!("  {field}: {message}");
                }
            }
            None
        }
        Err(err) => {
            println!("{err}");
            None
        }
    }
}

/// Splits a `field=value` control.
fn split_control(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .with_context(|| format!("Filter must be written field=value, got '{raw}'"))
}

/// Reads one line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
