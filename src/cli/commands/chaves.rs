//! Key listing and loan commands

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{enter, open, print_redirect, report, split_control};
use crate::domain::ChaveId;
use crate::filters::{ChavesControl, ChavesFilter, Location};
use crate::models::StatusChave;
use crate::routes::Route;
use crate::schema::MatriculaForm;
use crate::screens::acoes;
use crate::screens::chaves::{self, ChavesScreen, KeyPanel};
use crate::state::AppState;
use crate::view::render;

fn location_from(filtros: &[String]) -> anyhow::Result<Location> {
    let mut location = Location::new(ChavesFilter::PATH);
    for raw in filtros {
        let (field, value) = split_control(raw)?;
        ChavesControl::parse(field, value)?.apply(&mut location);
    }
    Ok(location)
}

pub async fn cmd_chaves_list(state: &AppState, filtros: &[String]) -> anyhow::Result<()> {
    open(state, &location_from(filtros)?).await
}

pub async fn cmd_chaves_show(state: &AppState, id: &str, status: &str) -> anyhow::Result<()> {
    let status: StatusChave = status.parse()?;
    let filter = ChavesFilter {
        status,
        ..ChavesFilter::default()
    };

    if let Err(redirect) = enter(state, Route::Chaves(filter.clone())).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let Some(chave) = chaves::find(state, &filter, id).await else {
        println!("Chave {id} não encontrada entre as chaves com status {status}.");
        println!("Use 'chaveiro chaves list -f status={status}' para ver os IDs.");
        return Ok(());
    };

    let panel = KeyPanel::load(state, chave, status).await;
    println!("{}", panel.render());
    println!();
    if panel.status().is_disponivel() {
        println!("Retirar: chaveiro chaves retirar {id} <matricula>");
    } else {
        println!("Devolver: chaveiro chaves devolver {id} <matricula>");
    }
    Ok(())
}

pub async fn cmd_chaves_retirar(state: &AppState, id: &str, matricula: &str) -> anyhow::Result<()> {
    if let Err(redirect) = enter(state, Route::Chaves(ChavesFilter::disponiveis())).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let result =
        acoes::gerar_emprestimo(state, &ChaveId::new(id), &MatriculaForm::new(matricula)).await;
    if let Some(emprestimo) = report(result).flatten() {
        println!("→ {}", Route::Emprestimo(emprestimo.id).location());
    }
    Ok(())
}

pub async fn cmd_chaves_devolver(
    state: &AppState,
    id: &str,
    matricula: &str,
) -> anyhow::Result<()> {
    if let Err(redirect) = enter(state, Route::Chaves(ChavesFilter::disponiveis())).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let result =
        acoes::retornar_emprestimo(state, &ChaveId::new(id), &MatriculaForm::new(matricula))
            .await;
    if let Some(emprestimo) = report(result).flatten() {
        println!("→ {}", Route::Emprestimo(emprestimo.id).location());
    }
    Ok(())
}

/// Re-renders the listing each time a line of stdin settles as the new code.
pub async fn cmd_chaves_buscar(state: &AppState, filtros: &[String]) -> anyhow::Result<()> {
    let location = location_from(filtros)?;
    if let Err(redirect) = enter(state, Route::Chaves(ChavesFilter::from_location(&location))).await
    {
        print_redirect(&redirect);
        return Ok(());
    }

    let mut screen = ChavesScreen::new(state, location);
    println!("{}", render::render_chaves(screen.load().await));
    println!();
    println!("Digite o código da chave (Ctrl-D para sair):");

    let (tx, rx) = mpsc::channel(16);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    screen
        .search(rx, state.config.filters.debounce(), |screen| {
            println!("{}", render::render_chaves(screen.listing()));
            println!("→ {}", screen.location());
        })
        .await;

    reader.abort();
    Ok(())
}
