// loan-document-service/src/generators/mod.rs

mod borrower_info;
mod direct_debit_mandate;

use crate::error::Result;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub use borrower_info::{BorrowerInfoGenerator, BorrowerInfoPage};
pub use direct_debit_mandate::{DirectDebitMandateGenerator, MandatePage};

pub const BORROWER_INFO_TEMPLATE: &str = "borrower_info";
pub const DIRECT_DEBIT_MANDATE_TEMPLATE: &str = "direct_debit_mandate";

const EMBEDDED_TEMPLATES: [(&str, &str); 2] = [
    (
        BORROWER_INFO_TEMPLATE,
        include_str!("../../templates/borrower_info.html.hbs"),
    ),
    (
        DIRECT_DEBIT_MANDATE_TEMPLATE,
        include_str!("../../templates/direct_debit_mandate.html.hbs"),
    ),
];

/// Turns a fully resolved page model into HTML.
pub trait Generator: Send + Sync {
    type Page: Serialize;

    fn generate(&self, page: &Self::Page) -> Result<String>;
}

/// Handlebars registry holding every document template.
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Registers the templates compiled into the binary. A file named
    /// `<template>.html.hbs` inside `override_dir` replaces the built-in copy.
    pub fn new(override_dir: Option<&Path>) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        for (name, source) in EMBEDDED_TEMPLATES {
            let override_path = override_dir
                .map(|dir| dir.join(format!("{}.html.hbs", name)))
                .filter(|path| path.is_file());

            match override_path {
                Some(path) => {
                    info!(template = name, path = %path.display(), "Loading template override");
                    handlebars.register_template_file(name, &path)?;
                }
                None => handlebars.register_template_string(name, source)?,
            }
        }

        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        Ok(self.handlebars.render(name, context)?)
    }
}
