//! MySQL statements for developer databases.
//!
//! Identifiers are validated names (see `domain::project::validate_name`);
//! they are still quoted so `-` and `.` survive. Statements are fed to
//! `mysql` on stdin, never through a shell.

/// Credentials and target of a developer database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSpec {
    pub name: String,
    pub user: String,
    pub password: String,
}

/// Probe: succeeds only when the account exists.
#[must_use]
pub fn user_exists_sql(user: &str) -> String {
    format!("SHOW GRANTS FOR {};\n", account(user))
}

#[must_use]
pub fn create_user_sql(user: &str, password: &str) -> String {
    format!(
        "CREATE USER {} IDENTIFIED BY '{}';\n",
        account(user),
        escape_literal(password)
    )
}

/// Probe: succeeds only when the database exists.
#[must_use]
pub fn database_exists_sql(name: &str) -> String {
    format!("USE {};\n", quote_ident(name))
}

#[must_use]
pub fn create_database_sql(name: &str) -> String {
    format!(
        "CREATE DATABASE {} DEFAULT CHARACTER SET utf8 DEFAULT COLLATE utf8_general_ci;\n",
        quote_ident(name)
    )
}

#[must_use]
pub fn grant_sql(name: &str, user: &str) -> String {
    format!(
        "GRANT ALL ON {}.* TO {};\nFLUSH PRIVILEGES;\n",
        quote_ident(name),
        account(user)
    )
}

fn account(user: &str) -> String {
    format!("'{}'@'localhost'", escape_literal(user))
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "''")
}
