pub mod chave;
pub mod emprestimo;
pub mod enums;
pub mod operador;
pub mod usuario;

use thiserror::Error;

pub use chave::{Ambiente, Armario, Chave, ChaveComEmprestimos, ChaveLocal};
pub use emprestimo::{
    Devolucao, Emprestimo, EmprestimoComSolicitante, EmprestimoDetalhado, Modalidade, Situacao,
};
pub use enums::{
    Localizacao, StatusChave, StatusEmprestimo, TipoAmbiente, TipoChave, TipoEmprestimo,
};
pub use operador::{Operador, OperadorResumo};
pub use usuario::{Usuario, UsuarioNome};

/// Payload that parsed as JSON but is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("key {id} is inconsistent: {reason}")]
    InconsistentKey { id: String, reason: &'static str },

    #[error("loan {id} is inconsistent: {reason}")]
    InconsistentLoan { id: String, reason: &'static str },
}
