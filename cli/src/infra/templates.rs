//! Embedded configuration templates.
//!
//! At compile time, `include_dir!` embeds everything under `assets/`:
//!   - `uwsgi.ini.tmpl`  : per-instance uwsgi app
//!   - `nginx.conf.tmpl` : per-instance nginx site
//!   - `fctrc.tmpl`      : defaults and prompts for `fct config init`

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};

use crate::application::services::webserver::ServerTemplates;

static EMBEDDED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

pub const UWSGI_TEMPLATE: &str = "uwsgi.ini.tmpl";
pub const NGINX_TEMPLATE: &str = "nginx.conf.tmpl";
pub const BOOTSTRAP_TEMPLATE: &str = "fctrc.tmpl";

/// Text of one embedded template.
///
/// # Errors
///
/// Returns an error if no template with the given `name` exists or it is not
/// UTF-8.
pub fn get_template(name: &str) -> Result<&'static str> {
    EMBEDDED_TEMPLATES
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .with_context(|| format!("embedded template not found: {name}"))
}

/// The uwsgi and nginx templates.
///
/// # Errors
///
/// See [`get_template`].
pub fn server_templates() -> Result<ServerTemplates<'static>> {
    Ok(ServerTemplates {
        uwsgi: get_template(UWSGI_TEMPLATE)?,
        nginx: get_template(NGINX_TEMPLATE)?,
    })
}
