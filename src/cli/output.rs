//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::models::{AccountView, Role};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Format a role as a colored string
pub fn format_role(role: Role) -> String {
    match role {
        Role::Privileged => role.to_string().magenta().bold().to_string(),
        Role::Ordinary => role.to_string(),
    }
}

/// Build the account table
pub fn account_table(accounts: &[AccountView]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
            Cell::new("Phone").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for account in accounts {
        let role_color = if account.role.is_privileged() {
            Color::Magenta
        } else {
            Color::Reset
        };

        table.add_row(vec![
            Cell::new(&account.name),
            Cell::new(&account.email),
            Cell::new(account.role.to_string()).fg(role_color),
            Cell::new(&account.phone),
            Cell::new(account.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    table
}

/// Print a table of accounts
pub fn print_account_table(accounts: &[AccountView]) {
    if accounts.is_empty() {
        info("No accounts found. Register one with POST /api/v1/auth/register");
        return;
    }

    println!("{}", account_table(accounts));
}
