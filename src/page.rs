//! Server-side page composition.
//!
//! The page is a pure function of the menu data. Templates are compiled in
//! and rendered with minijinja; `.html` names get HTML auto-escaping.

use minijinja::{context, Environment};

use crate::builder::{EXTRA_TOPPING_FEE, INCLUDED_TOPPINGS};
use crate::menu::{Menu, Money};

mod templates;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("failed to render page: {0}")]
    Template(#[from] minijinja::Error),
}

pub struct Page {
    env: Environment<'static>,
}

impl Page {
    pub fn new() -> Result<Self, PageError> {
        let mut env = Environment::new();
        env.add_filter("dollars", |cents: u32| Money::from_cents(cents).to_string());
        for (name, source) in templates::ALL {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Renders the full document: header, hero, menu, deals, footer and the
    /// voice widget mount.
    pub fn render(&self, menu: &Menu) -> Result<String, PageError> {
        self.render_template(templates::PAGE, menu)
    }

    /// Renders only the menu section.
    pub fn render_menu(&self, menu: &Menu) -> Result<String, PageError> {
        self.render_template(templates::MENU, menu)
    }

    fn render_template(&self, name: &str, menu: &Menu) -> Result<String, PageError> {
        let template = self.env.get_template(name)?;
        let html = template.render(context! {
            menu => menu,
            included_toppings => INCLUDED_TOPPINGS,
            extra_topping_fee => EXTRA_TOPPING_FEE,
        })?;
        tracing::debug!(template = name, bytes = html.len(), "rendered template");
        Ok(html)
    }
}
