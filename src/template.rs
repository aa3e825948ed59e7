//! Rendering of the bundled CAPI/CAPZ object templates.

use std::collections::BTreeMap;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub const KUBEADM_CONTROL_PLANE: &str = "kubeadm_controlplane_azure.yaml";
pub const CONTROL_PLANE_MACHINE_TEMPLATE: &str = "controlplane_azure_machine_template.yaml";
pub const WORKERS_KUBEADM_CONFIG_TEMPLATE: &str = "workers_kubeadm_config_template_azure.yaml";
pub const WORKERS_MACHINE_TEMPLATE: &str = "workers_azure_machine_template.yaml";
pub const WORKERS_MACHINE_DEPLOYMENT: &str = "workers_machine_deployment.yaml";

const TEMPLATES: [(&str, &str); 5] = [
    (
        KUBEADM_CONTROL_PLANE,
        include_str!("../templates/kubeadm_controlplane_azure.yaml.j2"),
    ),
    (
        CONTROL_PLANE_MACHINE_TEMPLATE,
        include_str!("../templates/controlplane_azure_machine_template.yaml.j2"),
    ),
    (
        WORKERS_KUBEADM_CONFIG_TEMPLATE,
        include_str!("../templates/workers_kubeadm_config_template_azure.yaml.j2"),
    ),
    (
        WORKERS_MACHINE_TEMPLATE,
        include_str!("../templates/workers_azure_machine_template.yaml.j2"),
    ),
    (
        WORKERS_MACHINE_DEPLOYMENT,
        include_str!("../templates/workers_machine_deployment.yaml.j2"),
    ),
];

/// Variables available to a single template invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateConfig(BTreeMap<String, String>);

impl TemplateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Renderer over the templates compiled into the binary.
    pub fn new() -> Result<Self> {
        Self::with_templates(TEMPLATES.iter().copied())
    }

    pub fn with_templates(
        templates: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Result<Self> {
        let mut env = Environment::new();
        // Missing variables must fail instead of rendering as empty strings.
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        for (name, source) in templates {
            env.add_template(name, source)
                .map_err(|source| Error::RenderTemplateFailed {
                    template: name.to_string(),
                    source,
                })?;
        }
        Ok(Self { env })
    }

    pub fn render(&self, name: &str, config: &TemplateConfig) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|source| Error::TemplateNotFound {
                template: name.to_string(),
                source,
            })?;
        template
            .render(&config.0)
            .map_err(|source| Error::RenderTemplateFailed {
                template: name.to_string(),
                source,
            })
    }

    /// Renders `name` and parses the output into `K`.
    pub fn render_object<K: DeserializeOwned>(
        &self,
        name: &str,
        config: &TemplateConfig,
    ) -> Result<K> {
        let rendered = self.render(name, config)?;
        parse(name, &rendered)
    }
}

pub fn parse<K: DeserializeOwned>(template: &str, rendered: &str) -> Result<K> {
    serde_yaml::from_str(rendered).map_err(|source| Error::ParseRenderedObjectFailed {
        template: template.to_string(),
        source,
    })
}
