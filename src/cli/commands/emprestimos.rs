//! Loan history and administrative loan commands

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{enter, open, print_redirect, report, split_control};
use crate::domain::EmprestimoId;
use crate::filters::{EmprestimosControl, EmprestimosFilter, Location};
use crate::routes::Route;
use crate::schema::EmprestimoAdministrativoForm;
use crate::screens::acoes;
use crate::screens::emprestimos::{EmprestimosScreen, default_range};
use crate::state::AppState;
use crate::view::render;

fn location_from(filtros: &[String]) -> anyhow::Result<Location> {
    let mut location = Location::new(EmprestimosFilter::PATH);
    for raw in filtros {
        let (field, value) = split_control(raw)?;
        EmprestimosControl::parse(field, value)?.apply(&mut location)?;
    }
    Ok(location)
}

pub async fn cmd_emprestimos_list(state: &AppState, filtros: &[String]) -> anyhow::Result<()> {
    open(state, &location_from(filtros)?).await
}

pub async fn cmd_emprestimos_show(state: &AppState, id: &str) -> anyhow::Result<()> {
    open(state, &Route::Emprestimo(EmprestimoId::new(id)).location()).await
}

/// Re-renders the listing as `field=value` lines from stdin settle.
pub async fn cmd_emprestimos_buscar(state: &AppState, filtros: &[String]) -> anyhow::Result<()> {
    let location = location_from(filtros)?;
    let defaults = default_range(state.config.filters.loan_window_days);
    let filter = EmprestimosFilter::from_location(&location, defaults);
    if let Err(redirect) = enter(state, Route::Emprestimos(filter)).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let mut screen = EmprestimosScreen::new(state, location, defaults);
    println!("{}", render::render_emprestimos(screen.load().await));
    println!();
    println!("Digite campo=valor, ex.: nomeSolicitante=Ana (Ctrl-D para sair):");

    let (tx, rx) = mpsc::channel(16);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let control = split_control(&line).and_then(|(field, value)| {
                EmprestimosControl::parse(field, value).map_err(anyhow::Error::from)
            });
            match control {
                Ok(control) => {
                    if tx.send(control).await.is_err() {
                        break;
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
    });

    screen
        .search(rx, state.config.filters.debounce(), |screen| {
            println!("{}", render::render_emprestimos(screen.listing()));
            println!("→ {}", screen.location());
        })
        .await;

    reader.abort();
    Ok(())
}

pub async fn cmd_emprestimo_administrativo(
    state: &AppState,
    form: EmprestimoAdministrativoForm,
) -> anyhow::Result<()> {
    if let Err(redirect) = enter(state, Route::EmprestimoAdministrativo).await {
        print_redirect(&redirect);
        return Ok(());
    }

    let result = acoes::emprestimo_administrativo(state, &form).await;
    if let Some(emprestimo) = report(result).flatten() {
        println!("→ {}", Route::Emprestimo(emprestimo.id).location());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_control_writes_both_bounds() {
        let location = location_from(&[
            "status=PENDENTE".to_string(),
            "periodo=2025-01-08..2025-01-01".to_string(),
        ])
        .unwrap();
        assert_eq!(
            location.to_string(),
            "/listar-emprestimos?status=PENDENTE&dataRetirada=2025-01-01&dataRetorno=2025-01-08"
        );
    }

    #[test]
    fn test_half_period_is_rejected() {
        assert!(location_from(&["periodo=2025-01-01..".to_string()]).is_err());
    }
}
