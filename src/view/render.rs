use crate::constants::messages::{
    CHAVES_EMPTY, CHAVES_ERROR, DETAIL_ERROR, EMPRESTIMOS_EMPTY, EMPRESTIMOS_ERROR,
    HOLDER_UNKNOWN, LOADING, NOT_RETURNED, OPERADORES_EMPTY, OPERADORES_ERROR,
    RESERVATION_TITLE, RESERVATION_WARNING,
};
use crate::models::{Chave, ChaveLocal, Emprestimo, EmprestimoDetalhado, Operador, Usuario};
use crate::query::QueryState;

use super::chave::{CartaoChave, ChaveSection, legenda_campus, marcador};
use super::emprestimo::{EmprestimoSection, LinhaEmprestimo, emprestimo_sections};
use super::format_instant;

fn separator() -> String {
    format!("{:-<70}", "")
}

fn yes_no(value: bool) -> &'static str {
    if value { "Sim" } else { "Não" }
}

/// Loading, error and empty states share one shape across listings.
fn placeholder<T>(state: &QueryState<T>, error: &str, empty: &str) -> Option<String> {
    match state {
        QueryState::Loading => Some(LOADING.to_string()),
        QueryState::Error => Some(error.to_string()),
        QueryState::Empty => Some(empty.to_string()),
        QueryState::Ready(_) => None,
    }
}

#[must_use]
pub fn render_chaves(state: &QueryState<Vec<Chave>>) -> String {
    let mut lines = vec!["Legenda:".to_string()];
    for (localizacao, texto) in legenda_campus() {
        lines.push(format!("  {} {texto}", marcador(localizacao)));
    }
    lines.push(separator());

    if let Some(message) = placeholder(state, CHAVES_ERROR, CHAVES_EMPTY) {
        lines.push(message);
        return lines.join("\n");
    }

    let chaves = state.ready().map_or(&[][..], Vec::as_slice);
    for chave in chaves {
        let cartao = CartaoChave::from(chave);
        lines.push(format!("{} {}", cartao.marcador(), cartao.titulo));
        lines.push(format!(
            "  ID: {} | {} | {}",
            cartao.id,
            cartao.localizacao,
            cartao.tipo.label()
        ));
    }
    lines.push(String::new());
    lines.push(format!("{} chave(s)", chaves.len()));
    lines.join("\n")
}

/// Options panel of one key.
#[must_use]
pub fn render_chave_panel(chave: &Chave, sections: &[ChaveSection<'_>]) -> String {
    let mut lines = vec![chave.titulo(), format!("[{}]", chave.tipo().label()), separator()];

    for section in sections {
        match section {
            ChaveSection::Armario(armario) => {
                lines.push("Informações da chave".to_string());
                lines.push(format!("  Bloco: {}", armario.bloco));
                lines.push(format!("  Localização: {}", armario.localizacao));
            }
            ChaveSection::Ambiente(ambiente) => {
                lines.push("Informações do ambiente".to_string());
                lines.push(format!("  Localização: {}", ambiente.localizacao));
                lines.push(format!("  Capacidade do ambiente: {}", ambiente.capacidade));
            }
            ChaveSection::AvisoReserva => {
                lines.push(format!("! {RESERVATION_TITLE}"));
                lines.push(format!("  {RESERVATION_WARNING}"));
            }
            ChaveSection::Portador(portador) => {
                lines.push("Com a chave".to_string());
                lines.push(format!("  Solicitante: {}", portador.nome));
                lines.push(format!(
                    "  Retirada em: {}",
                    format_instant(portador.data_retirada)
                ));
            }
            ChaveSection::PortadorDesconhecido => lines.push(HOLDER_UNKNOWN.to_string()),
        }
    }

    lines.join("\n")
}

#[must_use]
pub fn render_emprestimos(state: &QueryState<Vec<Emprestimo>>) -> String {
    if let Some(message) = placeholder(state, EMPRESTIMOS_ERROR, EMPRESTIMOS_EMPTY) {
        return message;
    }

    let emprestimos = state.ready().map_or(&[][..], Vec::as_slice);
    let mut lines = vec![
        format!("Empréstimos ({} total)", emprestimos.len()),
        separator(),
    ];
    for emprestimo in emprestimos {
        let linha = LinhaEmprestimo::from(emprestimo);
        lines.push(format!("• {} [{}] {}", linha.id, linha.status, linha.tipo));
        lines.push(format!(
            "  Retirada: {} | Retorno: {}",
            linha.retirada, linha.retorno
        ));
        lines.push(format!("  Justificativa: {}", linha.justificativa));
    }
    lines.join("\n")
}

#[must_use]
pub fn render_emprestimo(state: &QueryState<EmprestimoDetalhado>) -> String {
    let Some(detalhe) = state.ready() else {
        return if state.is_loading() {
            LOADING.to_string()
        } else {
            DETAIL_ERROR.to_string()
        };
    };

    let mut lines = vec![format!(
        "Informações sobre o empréstimo: {}",
        detalhe.emprestimo.id
    )];

    for section in emprestimo_sections(detalhe) {
        match section {
            EmprestimoSection::Chave(chave) => {
                lines.push(separator());
                lines.push(format!("Chave [{}]", chave.tipo()));
                lines.push(format!("  ID: {}", chave.id));
                lines.push(format!("  Código: {}", chave.codigo()));
                match &chave.local {
                    ChaveLocal::Ambiente { ambiente, .. } => {
                        lines.push(format!("  Nome: {}", ambiente.nome));
                        lines.push(format!("  Localização: {}", ambiente.localizacao));
                        lines.push(format!("  Capacidade: {} pessoas", ambiente.capacidade));
                        lines.push(format!(
                            "  Precisa de Reserva Prévia: {}",
                            yes_no(ambiente.precisa_reserva)
                        ));
                    }
                    ChaveLocal::Armario { armario, .. } => {
                        lines.push(format!("  Localização: {}", armario.localizacao));
                        lines.push(format!("  Bloco: {}", armario.bloco));
                    }
                }
            }
            EmprestimoSection::Emprestimo(emprestimo) => {
                lines.push(separator());
                lines.push("Empréstimo".to_string());
                lines.push(format!("  Status: {}", emprestimo.status()));
                lines.push(format!(
                    "  Data retirada: {}",
                    format_instant(emprestimo.data_retirada)
                ));
                if let Some(retorno) = emprestimo.situacao.data_retorno() {
                    lines.push(format!("  Data devolução: {}", format_instant(retorno)));
                }
                lines.push(format!("  Tipo de empréstimo: {}", emprestimo.tipo()));
            }
            EmprestimoSection::Justificativa(texto) => {
                lines.push(format!("  Justificativa: {texto}"));
            }
            EmprestimoSection::Solicitante(usuario) => {
                lines.push(separator());
                lines.push("Usuário solicitante".to_string());
                push_usuario(&mut lines, Some(usuario));
            }
            EmprestimoSection::UsuarioDevolucao(usuario) => {
                lines.push(separator());
                lines.push("Usuário que devolveu".to_string());
                push_usuario(&mut lines, usuario);
            }
            EmprestimoSection::OperadorSolicitacao(operador) => {
                lines.push(separator());
                lines.push("Operador da solicitação".to_string());
                push_operador(&mut lines, operador);
            }
            EmprestimoSection::OperadorDevolucao(operador) => {
                lines.push(separator());
                lines.push("Operador da devolução".to_string());
                push_operador(&mut lines, operador);
            }
            EmprestimoSection::NaoDevolvido => {
                lines.push(separator());
                lines.push(NOT_RETURNED.to_string());
            }
        }
    }

    lines.join("\n")
}

fn push_usuario(lines: &mut Vec<String>, usuario: Option<&Usuario>) {
    match usuario {
        Some(u) => {
            lines.push(format!("  ID: {}", u.id));
            lines.push(format!("  Nome: {}", u.nome));
            lines.push(format!("  Matrícula: {}", u.matricula));
        }
        None => lines.push("  -".to_string()),
    }
}

fn push_operador(lines: &mut Vec<String>, operador: Option<&Operador>) {
    match operador {
        Some(o) => {
            lines.push(format!("  ID: {}", o.id));
            lines.push(format!("  Nome: {}", o.name));
            lines.push(format!("  E-mail: {}", o.email));
            lines.push(format!("  Permissão: {}", o.role));
        }
        None => lines.push("  -".to_string()),
    }
}

#[must_use]
pub fn render_operadores(state: &QueryState<Vec<Operador>>) -> String {
    if let Some(message) = placeholder(state, OPERADORES_ERROR, OPERADORES_EMPTY) {
        return message;
    }

    let operadores = state.ready().map_or(&[][..], Vec::as_slice);
    let mut lines = vec![
        format!("Operadores ({} total)", operadores.len()),
        separator(),
    ];
    for o in operadores {
        lines.push(format!("• {} <{}> [{}]", o.name, o.email, o.role));
        lines.push(format!("  ID: {}", o.id));
    }
    lines.join("\n")
}
