//! Developer database provisioning: user, database, grants.
//!
//! Each step probes first and creates only when the probe fails. The
//! probe-then-create pair is not atomic; two concurrent runs for the same
//! developer and project may both try to create.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ShellRunner};
use crate::application::services::exec;
use crate::domain::database::{self, DatabaseSpec};
use crate::domain::ShellCommand;

/// What `provision_database` had to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseOutcome {
    pub user_created: bool,
    pub database_created: bool,
}

/// `mysql --user=<admin>` run as root with `sql` on stdin.
fn mysql(admin: &str, sql: String) -> ShellCommand {
    ShellCommand::new("mysql")
        .arg(format!("--user={admin}"))
        .stdin(sql)
        .as_root()
}

/// Create the database account unless it already exists.
///
/// Returns `true` when the account was created.
///
/// # Errors
///
/// Fails if the creation statement fails.
pub async fn create_user(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    admin: &str,
    user: &str,
    password: &str,
) -> Result<bool> {
    if exec::probe(shell, &mysql(admin, database::user_exists_sql(user))).await? {
        reporter.warn(&format!("database user {user} already exists"));
        return Ok(false);
    }
    exec::run(shell, reporter, &mysql(admin, database::create_user_sql(user, password))).await?;
    reporter.step(&format!("created database user {user}"));
    Ok(true)
}

/// Create the database unless it already exists.
///
/// Returns `true` when the database was created.
///
/// # Errors
///
/// Fails if the creation statement fails.
pub async fn create_database(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    admin: &str,
    name: &str,
) -> Result<bool> {
    if exec::probe(shell, &mysql(admin, database::database_exists_sql(name))).await? {
        reporter.warn(&format!("database {name} already exists"));
        return Ok(false);
    }
    exec::run(shell, reporter, &mysql(admin, database::create_database_sql(name))).await?;
    reporter.step(&format!("created database {name}"));
    Ok(true)
}

/// Grant the account full privileges on the database.
///
/// # Errors
///
/// Fails if the grant fails.
pub async fn grant_privileges(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    admin: &str,
    name: &str,
    user: &str,
) -> Result<()> {
    exec::run(shell, reporter, &mysql(admin, database::grant_sql(name, user))).await?;
    Ok(())
}

/// User, then database, then grants.
///
/// # Errors
///
/// Stops at the first failing step.
pub async fn provision_database(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    admin: &str,
    spec: &DatabaseSpec,
) -> Result<DatabaseOutcome> {
    let user_created = create_user(shell, reporter, admin, &spec.user, &spec.password).await?;
    let database_created = create_database(shell, reporter, admin, &spec.name).await?;
    grant_privileges(shell, reporter, admin, &spec.name, &spec.user).await?;
    reporter.success(&format!("database {} ready for {}", spec.name, spec.user));
    Ok(DatabaseOutcome {
        user_created,
        database_created,
    })
}
