//! Join workflow against a recording shell and an in-memory Git host.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::Cell;

use fct_cli::application::services::join::{self, JoinRequest};
use fct_cli::application::services::webserver::ServerTemplates;
use fct_cli::domain::config;
use fct_cli::domain::{RunAs, ToolbeltError};

use crate::helpers::{
    FakeRepoHost, NGINX_TEMPLATE, RecordingReporter, RecordingShell, UWSGI_TEMPLATE,
    provisioning_settings, settings_without,
};

fn request() -> JoinRequest {
    JoinRequest {
        slug: "shop".to_string(),
        developer: "alice".to_string(),
        db_password: "s3cret".to_string(),
        reload: true,
    }
}

fn templates() -> ServerTemplates<'static> {
    ServerTemplates {
        uwsgi: UWSGI_TEMPLATE,
        nginx: NGINX_TEMPLATE,
    }
}

#[tokio::test]
async fn test_join_runs_files_then_database_then_webserver() {
    let shell = RecordingShell::new();
    let reporter = RecordingReporter::new();

    let url = join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &reporter,
        templates(),
        &request(),
    )
    .await
    .expect("join succeeds");

    assert_eq!(url, "http://shop.alice.dev.example.com/");
    let clone = shell.position("git clone").expect("cloned");
    let pip = shell.position("/home/alice/envs/shop/bin/pip install").expect("pip");
    let mysql = shell.position("-- mysql").expect("mysql");
    let uwsgi = shell.position("tee /etc/uwsgi/apps-available").expect("uwsgi");
    let nginx = shell.position("tee /etc/nginx/sites-available").expect("nginx");
    let reload = shell.position("service nginx reload").expect("reload");
    assert!(clone < pip && pip < mysql && mysql < uwsgi && uwsgi < nginx && nginx < reload);
}

#[tokio::test]
async fn test_join_clones_from_host_url_into_scratch_dir() {
    let shell = RecordingShell::new();

    join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &RecordingReporter::new(),
        templates(),
        &request(),
    )
    .await
    .expect("join succeeds");

    assert!(shell.ran("git clone git@git.example.com:team/shop.git /tmp/fct-join.k3Jd9QxZ"));
    assert!(shell.ran("cp -a /tmp/fct-join.k3Jd9QxZ/. /home/alice/projects/shop"));
    assert!(shell.ran("chgrp -R developers /home/alice/projects/shop"));
    assert!(shell.ran("install -r /home/alice/projects/shop/requirements.txt"));
}

#[tokio::test]
async fn test_join_file_steps_run_as_developer() {
    let shell = RecordingShell::new();

    join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &RecordingReporter::new(),
        templates(),
        &request(),
    )
    .await
    .expect("join succeeds");

    let calls = shell.calls.borrow();
    let clone = calls
        .iter()
        .find(|c| c.program == "git")
        .expect("git clone recorded");
    assert_eq!(clone.run_as, RunAs::User("alice".to_string()));
    let mysql = calls
        .iter()
        .find(|c| c.program == "mysql")
        .expect("mysql recorded");
    assert_eq!(mysql.run_as, RunAs::Root);
}

#[tokio::test]
async fn test_join_missing_setting_fails_before_connecting_or_running() {
    let shell = RecordingShell::new();
    let connected = Cell::new(false);

    let err = join::join(
        &settings_without(config::PROJECTS_PATH_TEMPLATE),
        |_| {
            connected.set(true);
            Ok(FakeRepoHost::empty())
        },
        &shell,
        &RecordingReporter::new(),
        templates(),
        &request(),
    )
    .await
    .expect_err("missing setting");

    match err.downcast_ref::<ToolbeltError>() {
        Some(ToolbeltError::Configuration { key, .. }) => {
            assert_eq!(key, config::PROJECTS_PATH_TEMPLATE);
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(!connected.get());
    assert!(shell.calls.borrow().is_empty());
}

#[tokio::test]
async fn test_join_invalid_slug_is_rejected_before_any_command() {
    let shell = RecordingShell::new();
    let mut bad = request();
    bad.slug = "shop; rm -rf /".to_string();

    let err = join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &RecordingReporter::new(),
        templates(),
        &bad,
    )
    .await
    .expect_err("invalid slug");

    assert!(matches!(
        err.downcast_ref::<ToolbeltError>(),
        Some(ToolbeltError::InvalidInput(_))
    ));
    assert!(shell.calls.borrow().is_empty());
}

#[tokio::test]
async fn test_join_clone_failure_stops_before_database() {
    let shell = RecordingShell::new().failing("git clone", 128, "fatal: repository not found\n");

    let err = join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &RecordingReporter::new(),
        templates(),
        &request(),
    )
    .await
    .expect_err("clone fails");

    match err.downcast_ref::<ToolbeltError>() {
        Some(ToolbeltError::RemoteExecution {
            command,
            target,
            stderr,
            ..
        }) => {
            assert!(command.contains("git clone"));
            assert_eq!(target, "dev.example.com");
            assert_eq!(stderr, "fatal: repository not found");
        }
        other => panic!("expected remote execution error, got {other:?}"),
    }
    assert!(!shell.ran("mysql"));
    assert!(!shell.ran("tee"));
}

#[tokio::test]
async fn test_join_clones_into_the_dir_mktemp_created_for_the_developer() {
    let shell = RecordingShell::new().answering("mktemp -d", "/var/tmp/fct-join.Qa81xZ0p\n");

    join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &RecordingReporter::new(),
        templates(),
        &request(),
    )
    .await
    .expect("join succeeds");

    let mktemp = shell
        .position("sudo -u alice -H -- mktemp -d -t fct-join.XXXXXXXX")
        .expect("scratch dir allocated as the developer");
    let clone = shell
        .position("git clone git@git.example.com:team/shop.git /var/tmp/fct-join.Qa81xZ0p")
        .expect("cloned into the allocated dir");
    assert!(mktemp < clone);
    assert!(shell.ran("cp -a /var/tmp/fct-join.Qa81xZ0p/. /home/alice/projects/shop"));
    assert!(shell.ran("rm -rf /var/tmp/fct-join.Qa81xZ0p"));
    assert!(!shell.ran("/tmp/fct-join.k3Jd9QxZ"));
}

#[tokio::test]
async fn test_join_stops_when_mktemp_prints_no_path() {
    let shell = RecordingShell::new().answering("mktemp -d", "mktemp: warning\n");

    let err = join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &RecordingReporter::new(),
        templates(),
        &request(),
    )
    .await
    .expect_err("no scratch dir");

    assert!(matches!(
        err.downcast_ref::<ToolbeltError>(),
        Some(ToolbeltError::RemoteExecution { .. })
    ));
    assert!(!shell.ran("git clone"));
}

#[tokio::test]
async fn test_join_cleanup_failure_only_warns() {
    let shell = RecordingShell::new().failing("rm -rf /tmp/fct-join.k3Jd9QxZ/.git", 1, "busy");
    let reporter = RecordingReporter::new();

    join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &reporter,
        templates(),
        &request(),
    )
    .await
    .expect("cleanup failures are not fatal");

    assert!(
        reporter
            .warnings()
            .iter()
            .any(|w| w.contains("rm -rf /tmp/fct-join.k3Jd9QxZ/.git"))
    );
    assert!(shell.ran("service nginx reload"));
}

#[tokio::test]
async fn test_join_without_reload_skips_nginx_reload() {
    let shell = RecordingShell::new();
    let reporter = RecordingReporter::new();
    let mut no_reload = request();
    no_reload.reload = false;

    join::join(
        &provisioning_settings(),
        |_| Ok(FakeRepoHost::empty()),
        &shell,
        &reporter,
        templates(),
        &no_reload,
    )
    .await
    .expect("join succeeds");

    assert!(!shell.ran("service nginx reload"));
    assert!(reporter.warnings().iter().any(|w| w.contains("reload skipped")));
}

#[test]
fn test_plan_uses_developer_as_database_user() {
    let plan = join::plan(&provisioning_settings(), &request()).expect("plan");
    assert_eq!(plan.database.name, "shop_alice");
    assert_eq!(plan.database.user, "alice");
    assert_eq!(plan.database.password, "s3cret");
    assert_eq!(plan.mysql_admin, "root");
    assert_eq!(plan.layout.project_dir, "/home/alice/projects/shop");
}

#[test]
fn test_plan_defaults_mysql_admin_to_root() {
    let plan = join::plan(&settings_without(config::MYSQL_ADMIN_USER), &request()).expect("plan");
    assert_eq!(plan.mysql_admin, config::DEFAULT_MYSQL_ADMIN);
}
