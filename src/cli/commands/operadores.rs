//! Operator management commands

use super::{enter, open, print_redirect, prompt_line, report};
use crate::constants::messages::REMOVE_OPERATOR_WARNING;
use crate::domain::OperadorId;
use crate::routes::Route;
use crate::schema::SignUpForm;
use crate::screens::operadores;
use crate::state::AppState;

pub async fn cmd_operadores_list(state: &AppState) -> anyhow::Result<()> {
    open(state, &Route::Operadores.location()).await
}

pub async fn cmd_operadores_cadastrar(
    state: &AppState,
    nome: &str,
    email: &str,
    senha: Option<String>,
) -> anyhow::Result<()> {
    if let Err(redirect) = enter(state, Route::CadastroOperador).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let password = match senha {
        Some(senha) => senha,
        None => prompt_line("Senha do novo operador: ")?,
    };
    let form = SignUpForm {
        name: nome.to_string(),
        email: email.to_string(),
        password,
    };

    if let Some(user) = report(operadores::cadastrar(state, &form).await) {
        println!("  ID: {} | {} <{}>", user.id, user.name, user.email);
    }
    Ok(())
}

pub async fn cmd_operadores_remover(state: &AppState, id: &str, yes: bool) -> anyhow::Result<()> {
    if let Err(redirect) = enter(state, Route::Operadores).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let confirmed = if yes {
        true
    } else {
        println!("Remover o operador {id}?");
        println!("{REMOVE_OPERATOR_WARNING}");
        let input = prompt_line("Digite 'y' para confirmar, qualquer outra coisa para cancelar: ")?;
        input.trim().eq_ignore_ascii_case("y")
    };

    report(operadores::remover(state, &OperadorId::new(id), confirmed).await);
    Ok(())
}
