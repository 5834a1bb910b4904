//! CLI module - Command-line interface for Chaveiro
//!
//! Every screen of the console is a subcommand. Listing commands take the same
//! `field=value` controls the screens commit and print the location they end
//! on, which `chaveiro abrir` accepts back.

mod commands;

use clap::{Parser, Subcommand};

/// Chaveiro - Key lending console
/// Operator client for the university key-lending service
#[derive(Parser)]
#[command(name = "chaveiro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Sign in with e-mail and password
    #[command(alias = "signin")]
    Login {
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign out and forget the saved session
    #[command(alias = "signout")]
    Logout,

    /// Show the signed-in operator and the menu
    #[command(alias = "dashboard")]
    Whoami,

    /// Browse keys and open or close loans
    #[command(alias = "c")]
    Chaves {
        #[command(subcommand)]
        command: ChavesCommands,
    },

    /// Loan history and administrative loans
    #[command(alias = "e")]
    Emprestimos {
        #[command(subcommand)]
        command: EmprestimosCommands,
    },

    /// Manage operator accounts (admin only)
    #[command(alias = "o")]
    Operadores {
        #[command(subcommand)]
        command: OperadoresCommands,
    },

    /// Open a location such as `/listar-emprestimos?status=PENDENTE`
    #[command(alias = "open")]
    Abrir { location: String },
}

#[derive(Subcommand)]
pub enum ChavesCommands {
    /// List keys
    #[command(alias = "ls")]
    List {
        /// Filter control, e.g. `-f tipo=ARMARIO -f status=indisponivel`
        #[arg(short, long = "filtro")]
        filtros: Vec<String>,
    },

    /// Show the options panel of a key
    Show {
        id: String,

        /// Listing the key is looked up in
        #[arg(long, default_value = "disponivel")]
        status: String,
    },

    /// Open a loan of a key
    #[command(alias = "retirada")]
    Retirar { id: String, matricula: String },

    /// Return a borrowed key
    #[command(alias = "devolucao")]
    Devolver { id: String, matricula: String },

    /// Filter by code while typing; one line of stdin per keystroke burst
    Buscar {
        #[arg(short, long = "filtro")]
        filtros: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum EmprestimosCommands {
    /// List loans
    #[command(alias = "ls")]
    List {
        /// Filter control, e.g. `-f status=PENDENTE -f periodo=2025-01-01..2025-01-08`
        #[arg(short, long = "filtro")]
        filtros: Vec<String>,
    },

    /// Show one loan
    Show { id: String },

    /// Filter while typing; one `field=value` line of stdin per keystroke burst
    Buscar {
        #[arg(short, long = "filtro")]
        filtros: Vec<String>,
    },

    /// Record an administrative loan (admin only)
    #[command(alias = "adm")]
    Administrativo {
        #[arg(long)]
        chave: String,

        #[arg(long)]
        justificativa: String,

        /// ISO-8601 date-time
        #[arg(long)]
        retirada: String,

        /// PENDENTE or DEVOLVIDO
        #[arg(long, default_value = "PENDENTE")]
        status: String,

        /// ISO-8601 date-time, required when DEVOLVIDO
        #[arg(long)]
        retorno: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum OperadoresCommands {
    /// List operators
    #[command(alias = "ls")]
    List,

    /// Create an operator account
    #[command(alias = "cadastro")]
    Cadastrar {
        #[arg(long)]
        nome: String,

        #[arg(long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(long)]
        senha: Option<String>,
    },

    /// Remove an operator account
    #[command(alias = "rm")]
    Remover {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub use commands::*;
