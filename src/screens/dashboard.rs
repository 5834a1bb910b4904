use crate::filters::{ChavesFilter, EmprestimosFilter};
use crate::session::Session;

/// Entry of the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub href: &'static str,
}

/// Menu entries the operator can open. Operator management is admin only.
#[must_use]
pub fn menu(session: &Session) -> Vec<MenuItem> {
    let mut items = vec![
        MenuItem {
            label: "Dashboard",
            href: "/dashboard",
        },
        MenuItem {
            label: "Empréstimos",
            href: ChavesFilter::PATH,
        },
        MenuItem {
            label: "Listar Empréstimos",
            href: EmprestimosFilter::PATH,
        },
    ];
    if session.is_admin() {
        items.push(MenuItem {
            label: "Operadores",
            href: "/operadores",
        });
    }
    items
}

#[must_use]
pub fn render(session: &Session) -> String {
    let mut lines = vec![
        format!("Olá, {} ({})", session.user.name, session.user.role),
        format!("{:-<70}", ""),
    ];
    for item in menu(session) {
        lines.push(format!("  {:<20} chaveiro abrir {}", item.label, item.href));
    }
    lines.join("\n")
}
