//! The "build your own pizza" wizard.
//!
//! A linear six-step flow (crust, size, sauce, cheese, toppings, review)
//! over an in-memory selection. Nothing is persisted: completing or
//! cancelling the flow discards the selection.

use crate::menu::{Money, Size};

/// Toppings included in the base price.
pub const INCLUDED_TOPPINGS: usize = 4;
/// Charged for every topping past [`INCLUDED_TOPPINGS`].
pub const EXTRA_TOPPING_FEE: Money = Money::from_cents(150);

/// Toppings offered by the builder, in display order.
pub const TOPPINGS: &[&str] = &[
    "Pepperoni",
    "Sausage",
    "Ham",
    "Bacon",
    "Chicken",
    "Mushrooms",
    "Onions",
    "Bell Peppers",
    "Olives",
    "Pineapple",
    "Jalapeños",
    "Spinach",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crust {
    #[default]
    Thick,
    Thin,
}

impl Crust {
    pub fn label(self) -> &'static str {
        match self {
            Crust::Thick => "Thick Crust",
            Crust::Thin => "Thin Crust",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sauce {
    #[default]
    Tomato,
    Garlic,
    Bbq,
    Buffalo,
}

impl Sauce {
    pub fn label(self) -> &'static str {
        match self {
            Sauce::Tomato => "Traditional Tomato",
            Sauce::Garlic => "White Garlic",
            Sauce::Bbq => "BBQ",
            Sauce::Buffalo => "Buffalo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cheese {
    #[default]
    Mozzarella,
    FourCheese,
    Light,
    Extra,
}

impl Cheese {
    pub fn label(self) -> &'static str {
        match self {
            Cheese::Mozzarella => "Mozzarella",
            Cheese::FourCheese => "Four-Cheese Blend",
            Cheese::Light => "Light Cheese",
            Cheese::Extra => "Extra Cheese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Crust = 1,
    Size,
    Sauce,
    Cheese,
    Toppings,
    Review,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Crust => "Crust",
            Step::Size => "Size",
            Step::Sauce => "Sauce",
            Step::Cheese => "Cheese",
            Step::Toppings => "Toppings",
            Step::Review => "Review Your Pizza",
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Crust => Some(Step::Size),
            Step::Size => Some(Step::Sauce),
            Step::Sauce => Some(Step::Cheese),
            Step::Cheese => Some(Step::Toppings),
            Step::Toppings => Some(Step::Review),
            Step::Review => None,
        }
    }

    fn previous(self) -> Option<Step> {
        match self {
            Step::Crust => None,
            Step::Size => Some(Step::Crust),
            Step::Sauce => Some(Step::Size),
            Step::Cheese => Some(Step::Sauce),
            Step::Toppings => Some(Step::Cheese),
            Step::Review => Some(Step::Toppings),
        }
    }
}

/// Base size price plus the fee for toppings past the included four.
pub fn price_for(size: Size, topping_count: usize) -> Money {
    size.price() + EXTRA_TOPPING_FEE.times(extra_toppings(topping_count) as u32)
}

pub fn extra_toppings(topping_count: usize) -> usize {
    topping_count.saturating_sub(INCLUDED_TOPPINGS)
}

/// Price breakdown for a size and a set of toppings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Quote {
    pub size_price: Money,
    pub extra_toppings: usize,
    pub extra_fee: Money,
    pub total: Money,
    pub total_display: String,
}

impl Quote {
    /// Duplicate toppings count once. Unknown toppings are rejected.
    pub fn new(size: Size, toppings: &[String]) -> Result<Self, BuilderError> {
        let mut distinct: Vec<&str> = Vec::with_capacity(toppings.len());
        for topping in toppings {
            if !TOPPINGS.contains(&topping.as_str()) {
                return Err(BuilderError::UnknownTopping(topping.clone()));
            }
            if !distinct.contains(&topping.as_str()) {
                distinct.push(topping);
            }
        }
        let extra = extra_toppings(distinct.len());
        let total = price_for(size, distinct.len());
        Ok(Self {
            size_price: size.price(),
            extra_toppings: extra,
            extra_fee: EXTRA_TOPPING_FEE.times(extra as u32),
            total,
            total_display: total.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct CustomPizzaSelection {
    pub crust: Crust,
    pub size: Size,
    pub sauce: Sauce,
    pub cheese: Cheese,
    /// In selection order, without duplicates.
    pub toppings: Vec<String>,
}

impl CustomPizzaSelection {
    pub fn price(&self) -> Money {
        price_for(self.size, self.toppings.len())
    }

    pub fn extra_toppings(&self) -> usize {
        extra_toppings(self.toppings.len())
    }

    /// Whether `topping` is selected and falls past the included ones.
    pub fn is_extra_topping(&self, topping: &str) -> bool {
        self.toppings
            .iter()
            .position(|t| t == topping)
            .is_some_and(|idx| idx >= INCLUDED_TOPPINGS)
    }

    /// Label/value pairs shown on the review step.
    pub fn review_lines(&self) -> Vec<(&'static str, String)> {
        let toppings = if self.toppings.is_empty() {
            "No toppings selected".to_string()
        } else {
            self.toppings.join(", ")
        };
        vec![
            ("Crust", self.crust.label().to_string()),
            ("Size", self.size.name().to_string()),
            ("Sauce", self.sauce.label().to_string()),
            ("Cheese", self.cheese.label().to_string()),
            ("Toppings", toppings),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// A toast-style message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("No toppings selected")]
    NoToppings,
    #[error("the pizza can only be added from the review step")]
    NotAtReview,
    #[error("unknown topping: {0}")]
    UnknownTopping(String),
    #[error("the pizza builder is closed")]
    Closed,
}

impl BuilderError {
    pub fn notice(&self) -> Notice {
        let description = match self {
            BuilderError::NoToppings => "Please select at least one topping".to_string(),
            other => other.to_string(),
        };
        Notice {
            title: match self {
                BuilderError::NoToppings => "No toppings selected".to_string(),
                _ => "Can't do that yet".to_string(),
            },
            description,
            variant: NoticeVariant::Destructive,
        }
    }
}

/// Result of moving backwards through the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Step(Step),
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPizza {
    pub selection: CustomPizzaSelection,
    pub price: Money,
    pub notice: Notice,
}

#[derive(Debug, Default)]
pub struct PizzaBuilder {
    open: bool,
    step: Option<Step>,
    selection: CustomPizzaSelection,
}

impl PizzaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the flow at the first step with default choices.
    pub fn open(&mut self) {
        self.open = true;
        self.step = Some(Step::Crust);
        self.selection = CustomPizzaSelection::default();
        tracing::debug!("pizza builder opened");
    }

    pub fn close(&mut self) {
        self.open = false;
        self.step = None;
        self.selection = CustomPizzaSelection::default();
        tracing::debug!("pizza builder closed");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> Option<Step> {
        self.step
    }

    pub fn selection(&self) -> &CustomPizzaSelection {
        &self.selection
    }

    pub fn price(&self) -> Money {
        self.selection.price()
    }

    fn current(&self) -> Result<Step, BuilderError> {
        match (self.open, self.step) {
            (true, Some(step)) => Ok(step),
            _ => Err(BuilderError::Closed),
        }
    }

    pub fn set_crust(&mut self, crust: Crust) -> Result<(), BuilderError> {
        self.current()?;
        self.selection.crust = crust;
        Ok(())
    }

    pub fn set_size(&mut self, size: Size) -> Result<(), BuilderError> {
        self.current()?;
        self.selection.size = size;
        Ok(())
    }

    pub fn set_sauce(&mut self, sauce: Sauce) -> Result<(), BuilderError> {
        self.current()?;
        self.selection.sauce = sauce;
        Ok(())
    }

    pub fn set_cheese(&mut self, cheese: Cheese) -> Result<(), BuilderError> {
        self.current()?;
        self.selection.cheese = cheese;
        Ok(())
    }

    /// Adds the topping at the end of the selection, or removes it if present.
    /// Returns whether the topping is selected afterwards.
    pub fn toggle_topping(&mut self, topping: &str) -> Result<bool, BuilderError> {
        self.current()?;
        if !TOPPINGS.contains(&topping) {
            return Err(BuilderError::UnknownTopping(topping.to_string()));
        }
        let toppings = &mut self.selection.toppings;
        if let Some(idx) = toppings.iter().position(|t| t == topping) {
            toppings.remove(idx);
            Ok(false)
        } else {
            toppings.push(topping.to_string());
            Ok(true)
        }
    }

    pub fn next(&mut self) -> Result<Step, BuilderError> {
        let step = self.current()?;
        if step == Step::Toppings && self.selection.toppings.is_empty() {
            tracing::debug!("blocked leaving toppings step with no toppings");
            return Err(BuilderError::NoToppings);
        }
        let next = step.next().unwrap_or(step);
        self.step = Some(next);
        tracing::debug!(step = next.number(), "pizza builder advanced");
        Ok(next)
    }

    /// Steps back; from the first step this cancels the flow instead.
    pub fn previous(&mut self) -> Result<Navigation, BuilderError> {
        let step = self.current()?;
        match step.previous() {
            Some(prev) => {
                self.step = Some(prev);
                Ok(Navigation::Step(prev))
            }
            None => {
                self.close();
                Ok(Navigation::Closed)
            }
        }
    }

    pub fn complete(&mut self) -> Result<CompletedPizza, BuilderError> {
        if self.current()? != Step::Review {
            return Err(BuilderError::NotAtReview);
        }
        let selection = std::mem::take(&mut self.selection);
        let price = selection.price();
        self.close();
        tracing::info!(%price, toppings = selection.toppings.len(), "custom pizza added");
        Ok(CompletedPizza {
            notice: Notice {
                title: "Pizza Added".to_string(),
                description: format!(
                    "Your custom pizza has been added to your order! Total: {}",
                    price
                ),
                variant: NoticeVariant::Default,
            },
            selection,
            price,
        })
    }
}
