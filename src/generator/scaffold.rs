//! Project-level files rendered from compile-time Askama templates.

use askama::Template;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::GeneratorConfig;
use crate::error::{GenError, Result};
use crate::model::Project;
use crate::render::helpers::{kebab_case, snake_case};

/// Runtime packages every generated project depends on.
pub const BASE_DEPENDENCIES: &[(&str, &str)] = &[
    ("@prisma/client", "^5.22.0"),
    ("cors", "^2.8.5"),
    ("dotenv", "^16.4.5"),
    ("express", "^4.21.1"),
    ("zod", "^3.23.8"),
];

/// Development packages every generated project depends on.
pub const BASE_DEV_DEPENDENCIES: &[(&str, &str)] = &[
    ("@types/cors", "^2.8.17"),
    ("@types/express", "^4.17.21"),
    ("@types/node", "^20.17.6"),
    ("prisma", "^5.22.0"),
    ("ts-node-dev", "^2.0.0"),
    ("typescript", "^5.6.3"),
];

/// One `"name": "version"` pair, both already JSON-quoted.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub name: String,
    pub version: String,
}

/// Template data for `package.json`. String fields are JSON literals.
#[derive(Template)]
#[template(path = "scaffold/package.json.txt", escape = "none")]
pub struct PackageJsonTemplate {
    pub name: String,
    pub description: String,
    pub node_engine: String,
    pub dependencies: Vec<ManifestEntry>,
    pub dev_dependencies: Vec<ManifestEntry>,
}

#[derive(Template)]
#[template(path = "scaffold/env.example.txt", escape = "none")]
pub struct EnvExampleTemplate {
    pub port: u16,
    pub database: String,
}

#[derive(Template)]
#[template(path = "scaffold/tsconfig.json.txt", escape = "none")]
pub struct TsconfigTemplate;

#[derive(Template)]
#[template(path = "scaffold/schema.prisma.txt", escape = "none")]
pub struct PrismaSchemaTemplate {
    pub project_name: String,
    /// Rendered `model` blocks, without trailing newlines
    pub models: Vec<String>,
}

/// A controller router mounted by the entrypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMount {
    pub router_name: String,
    pub file_stem: String,
    pub mount_path: String,
}

#[derive(Template)]
#[template(path = "scaffold/index.ts.txt", escape = "none")]
pub struct EntrypointTemplate {
    pub service: String,
    pub port: u16,
    pub routes: Vec<RouteMount>,
}

#[derive(Template)]
#[template(path = "scaffold/Dockerfile.txt", escape = "none")]
pub struct DockerfileTemplate {
    pub node_version: String,
    pub port: u16,
}

#[derive(Template)]
#[template(path = "scaffold/docker-compose.yml.txt", escape = "none")]
pub struct ComposeTemplate {
    pub port: u16,
    pub database: String,
}

fn json_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn manifest_entries(base: &[(&str, &str)], extra: &BTreeMap<String, String>) -> Vec<ManifestEntry> {
    let mut merged: BTreeMap<&str, &str> = base.iter().copied().collect();
    for (name, version) in extra {
        merged.insert(name, version);
    }
    merged
        .into_iter()
        .map(|(name, version)| ManifestEntry {
            name: json_string(name),
            version: json_string(version),
        })
        .collect()
}

/// npm package name for a project: its kebab form, or `app`.
pub fn package_name(project: &Project) -> String {
    let name = kebab_case(&project.name);
    if name.is_empty() {
        "app".to_string()
    } else {
        name
    }
}

fn database_name(project: &Project) -> String {
    let name = snake_case(&project.name);
    if name.is_empty() {
        "app".to_string()
    } else {
        name
    }
}

fn finish<T: Template>(file: &str, template: &T) -> Result<String> {
    let mut out = template.render().map_err(|err| GenError::Render {
        template: file.to_string(),
        message: err.to_string(),
    })?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

pub fn package_json(project: &Project, config: &GeneratorConfig) -> Result<String> {
    let template = PackageJsonTemplate {
        name: json_string(&package_name(project)),
        description: json_string(project.description()),
        node_engine: json_string(&format!(">={}", config.node_version)),
        dependencies: manifest_entries(BASE_DEPENDENCIES, &config.dependencies),
        dev_dependencies: manifest_entries(BASE_DEV_DEPENDENCIES, &config.dev_dependencies),
    };
    finish("package.json", &template)
}

pub fn tsconfig() -> Result<String> {
    finish("tsconfig.json", &TsconfigTemplate)
}

pub fn env_example(project: &Project, config: &GeneratorConfig) -> Result<String> {
    let template = EnvExampleTemplate {
        port: config.default_port,
        database: database_name(project),
    };
    finish(".env.example", &template)
}

pub fn prisma_schema(project: &Project, models: Vec<String>) -> Result<String> {
    let template = PrismaSchemaTemplate {
        project_name: project.name.replace('\n', " "),
        models,
    };
    finish("prisma/schema.prisma", &template)
}

pub fn entrypoint(
    project: &Project,
    config: &GeneratorConfig,
    routes: Vec<RouteMount>,
) -> Result<String> {
    let routes = routes
        .into_iter()
        .map(|route| RouteMount {
            mount_path: route.mount_path.replace('\'', "\\'"),
            ..route
        })
        .collect();
    let template = EntrypointTemplate {
        service: package_name(project),
        port: config.default_port,
        routes,
    };
    finish("src/index.ts", &template)
}

pub fn dockerfile(config: &GeneratorConfig) -> Result<String> {
    let template = DockerfileTemplate {
        node_version: config.node_version.clone(),
        port: config.default_port,
    };
    finish("Dockerfile", &template)
}

pub fn compose(project: &Project, config: &GeneratorConfig) -> Result<String> {
    let template = ComposeTemplate {
        port: config.default_port,
        database: database_name(project),
    };
    finish("docker-compose.yml", &template)
}
