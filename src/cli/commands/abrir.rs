//! Open command handler

use super::{enter, print_redirect};
use crate::filters::Location;
use crate::routes::Route;
use crate::screens::{chaves::ChavesScreen, dashboard, emprestimos, operadores};
use crate::session::Session;
use crate::state::AppState;
use crate::view::render;

pub async fn cmd_abrir(state: &AppState, raw: &str) -> anyhow::Result<()> {
    open(state, &Location::parse(raw)).await
}

/// Resolves `location` through the route table and guards, then renders it.
///
/// A refused route is followed once to where the guard sends the operator.
pub async fn open(state: &AppState, location: &Location) -> anyhow::Result<()> {
    let defaults = emprestimos::default_range(state.config.filters.loan_window_days);
    let route = match Route::parse(location, defaults) {
        Ok(route) => route,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let (route, session) = match enter(state, route).await {
        Ok(entered) => entered,
        Err(redirect) => {
            print_redirect(&redirect);
            let session = state.session.current().await;
            (redirect.to, session)
        }
    };

    println!("{}", route.title());
    render_route(state, route, session.as_ref()).await;
    Ok(())
}

async fn render_route(state: &AppState, route: Route, session: Option<&Session>) {
    match route {
        Route::Index | Route::SignIn => {
            println!("Entre com: chaveiro login <email>");
        }
        Route::Dashboard => {
            if let Some(session) = session {
                println!("{}", dashboard::render(session));
            }
        }
        Route::Chaves(filter) => {
            let mut screen = ChavesScreen::new(state, filter.to_location());
            let listing = screen.load().await;
            println!("{}", render::render_chaves(listing));
            println!();
            println!("→ {}", screen.location());
        }
        Route::Emprestimos(filter) => {
            let defaults = emprestimos::default_range(state.config.filters.loan_window_days);
            let mut screen =
                emprestimos::EmprestimosScreen::new(state, filter.to_location(), defaults);
            let listing = screen.load().await;
            println!("{}", render::render_emprestimos(listing));
            println!();
            println!("→ {}", screen.location());
        }
        Route::Emprestimo(id) => {
            let detalhe = emprestimos::detalhe(state, &id).await;
            println!("{}", render::render_emprestimo(&detalhe));
        }
        Route::EmprestimoAdministrativo => {
            println!(
                "Use: chaveiro emprestimos administrativo --chave <id> --justificativa <texto> --retirada <data> [--status DEVOLVIDO --retorno <data>]"
            );
        }
        Route::Operadores => {
            let listing = operadores::listar(state).await;
            println!("{}", render::render_operadores(&listing));
        }
        Route::CadastroOperador => {
            println!("Use: chaveiro operadores cadastrar --nome <nome> --email <email>");
        }
    }
}
