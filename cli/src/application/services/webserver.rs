//! uwsgi + nginx configuration for one developer instance.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ShellRunner};
use crate::application::services::config_writer::{self, ConfigFile};
use crate::application::services::exec;
use crate::domain::template::{self, TemplateContext};
use crate::domain::{DeveloperLayout, ShellCommand};

pub const UWSGI_AVAILABLE: &str = "/etc/uwsgi/apps-available";
pub const UWSGI_ENABLED: &str = "/etc/uwsgi/apps-enabled";
pub const NGINX_AVAILABLE: &str = "/etc/nginx/sites-available";
pub const NGINX_ENABLED: &str = "/etc/nginx/sites-enabled";

/// Template texts for the two server configs.
#[derive(Debug, Clone, Copy)]
pub struct ServerTemplates<'a> {
    pub uwsgi: &'a str,
    pub nginx: &'a str,
}

/// Values available to both templates.
#[must_use]
pub fn server_context(layout: &DeveloperLayout) -> TemplateContext {
    template::context([
        ("project", layout.slug.as_str()),
        ("developer", layout.developer.as_str()),
        ("server_name", layout.server_name.as_str()),
        ("socket", layout.socket_path.as_str()),
        ("project_dir", layout.project_dir.as_str()),
        ("env_dir", layout.env_dir.as_str()),
        ("group", layout.group.as_str()),
    ])
}

/// Write and enable the uwsgi and nginx configs, then reload nginx unless
/// `reload` is false.
///
/// # Errors
///
/// Stops at the first failing write, link or reload.
pub async fn write_webserver_config(
    shell: &impl ShellRunner,
    reporter: &impl ProgressReporter,
    layout: &DeveloperLayout,
    templates: ServerTemplates<'_>,
    reload: bool,
) -> Result<()> {
    let ctx = server_context(layout);
    let name = &layout.server_name;

    let uwsgi_available = format!("{UWSGI_AVAILABLE}/{name}.ini");
    let uwsgi_enabled = format!("{UWSGI_ENABLED}/{name}.ini");
    config_writer::write_config(
        shell,
        reporter,
        &ConfigFile {
            name: "uwsgi.ini.tmpl",
            template: templates.uwsgi,
            context: &ctx,
            destination: &uwsgi_available,
            privileged: true,
        },
    )
    .await?;
    config_writer::link_enabled(shell, reporter, &uwsgi_available, &uwsgi_enabled).await?;

    let nginx_available = format!("{NGINX_AVAILABLE}/{name}");
    let nginx_enabled = format!("{NGINX_ENABLED}/{name}");
    config_writer::write_config(
        shell,
        reporter,
        &ConfigFile {
            name: "nginx.conf.tmpl",
            template: templates.nginx,
            context: &ctx,
            destination: &nginx_available,
            privileged: true,
        },
    )
    .await?;
    config_writer::link_enabled(shell, reporter, &nginx_available, &nginx_enabled).await?;

    if reload {
        exec::run(
            shell,
            reporter,
            &ShellCommand::new("service").args(["nginx", "reload"]).as_root(),
        )
        .await?;
        reporter.step("reloaded nginx");
    } else {
        reporter.warn("nginx reload skipped");
    }
    Ok(())
}
