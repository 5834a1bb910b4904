use chrono::{DateTime, Utc};

use crate::constants::messages::{CAMPUS_SNO_LEGEND, CAMPUS_VELHA_LEGEND};
use crate::domain::ChaveId;
use crate::models::{
    Ambiente, Armario, Chave, ChaveComEmprestimos, ChaveLocal, Localizacao, StatusChave, TipoChave,
};

/// One block of the key options panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChaveSection<'a> {
    Armario(&'a Armario),
    Ambiente(&'a Ambiente),
    /// Shown right after the room when it needs a reservation.
    AvisoReserva,
    Portador(Portador<'a>),
    /// The key is out but the holder could not be resolved.
    PortadorDesconhecido,
}

/// Who has the key right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portador<'a> {
    pub nome: &'a str,
    pub data_retirada: DateTime<Utc>,
}

/// Whether the panel has to look up the key's loans before rendering.
#[must_use]
pub const fn holder_lookup_needed(status: StatusChave) -> bool {
    !status.is_disponivel()
}

/// Sections of the options panel for a key listed under `status`.
///
/// `detalhe` is the key-with-loans lookup and is ignored for available keys.
#[must_use]
pub fn chave_sections<'a>(
    chave: &'a Chave,
    status: StatusChave,
    detalhe: Option<&'a ChaveComEmprestimos>,
) -> Vec<ChaveSection<'a>> {
    let mut sections = Vec::with_capacity(3);

    match &chave.local {
        ChaveLocal::Armario { armario, .. } => sections.push(ChaveSection::Armario(armario)),
        ChaveLocal::Ambiente { ambiente, .. } => {
            sections.push(ChaveSection::Ambiente(ambiente));
            if ambiente.precisa_reserva {
                sections.push(ChaveSection::AvisoReserva);
            }
        }
    }

    if holder_lookup_needed(status) {
        let portador = detalhe
            .and_then(ChaveComEmprestimos::emprestimo_atual)
            .map(|atual| Portador {
                nome: &atual.solicitante.nome,
                data_retirada: atual.emprestimo.data_retirada,
            });
        sections.push(portador.map_or(ChaveSection::PortadorDesconhecido, ChaveSection::Portador));
    }

    sections
}

/// A key as shown in the listing grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartaoChave {
    pub id: ChaveId,
    pub titulo: String,
    pub localizacao: Localizacao,
    pub tipo: TipoChave,
}

impl From<&Chave> for CartaoChave {
    fn from(chave: &Chave) -> Self {
        Self {
            id: chave.id.clone(),
            titulo: chave.titulo(),
            localizacao: chave.localizacao(),
            tipo: chave.tipo(),
        }
    }
}

impl CartaoChave {
    /// Campus marker drawn at the start of the card.
    #[must_use]
    pub const fn marcador(&self) -> &'static str {
        marcador(self.localizacao)
    }
}

#[must_use]
pub const fn marcador(localizacao: Localizacao) -> &'static str {
    match localizacao {
        Localizacao::Sno => "▌",
        Localizacao::Velha => "░",
    }
}

/// Legend printed above the key grid.
#[must_use]
pub const fn legenda_campus() -> [(Localizacao, &'static str); 2] {
    [
        (Localizacao::Sno, CAMPUS_SNO_LEGEND),
        (Localizacao::Velha, CAMPUS_VELHA_LEGEND),
    ]
}
