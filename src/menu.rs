//! Static menu data for the restaurant.
//!
//! Everything here is read-only and compiled in. Prices are held in cents
//! so that the builder arithmetic stays exact.

use std::fmt;

/// An amount of US currency in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Money(u32);

impl Money {
    pub const fn from_cents(cents: u32) -> Self {
        Money(cents)
    }

    pub const fn cents(self) -> u32 {
        self.0
    }

    pub fn times(self, count: u32) -> Self {
        Money(self.0 * count)
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

impl Size {
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    pub fn price(self) -> Money {
        match self {
            Size::Small => Money::from_cents(1000),
            Size::Medium => Money::from_cents(1500),
            Size::Large => Money::from_cents(2000),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
        }
    }

    pub fn diameter(self) -> &'static str {
        match self {
            Size::Small => "10\"",
            Size::Medium => "12\"",
            Size::Large => "16\"",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PizzaSize {
    pub name: &'static str,
    pub diameter: &'static str,
    pub price: Money,
}

impl From<Size> for PizzaSize {
    fn from(size: Size) -> Self {
        Self {
            name: size.name(),
            diameter: size.diameter(),
            price: size.price(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ToppingCategory {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SpecialtyPizza {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub description: &'static str,
    pub price: Money,
    pub quantity: Option<&'static str>,
    pub allergens: &'static [&'static str],
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Deal {
    pub title: &'static str,
    pub description: &'static str,
    pub price: Money,
    pub original_price: Money,
    pub image: &'static str,
    pub days: Option<&'static str>,
}

impl Deal {
    pub fn savings(&self) -> Money {
        self.original_price - self.price
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneralInfo {
    pub hours: &'static str,
    pub location: &'static str,
    pub summary: &'static str,
    pub wait_time: &'static str,
}

pub const RESTAURANT_NAME: &str = "MaMaMia Pizza";

pub const GENERAL_INFO: GeneralInfo = GeneralInfo {
    hours: "We're open Monday through Thursday from 11 AM to 10 PM, Friday and Saturday from 11 AM to midnight, and Sunday from noon to 9 PM.",
    location: "We're located at 123 Main Street AIcity Vapiland, next to Vapi Challenge, with parking available in front and in the rear lot.",
    summary: "We offer specialty pizzas, custom pizzas, garlic knots, wings, salads, soft drinks, and desserts.",
    wait_time: "Pickup orders are ready in about 15-20 minutes.",
};

pub const TOPPING_CATEGORIES: &[ToppingCategory] = &[
    ToppingCategory {
        name: "Meats",
        items: &["Pepperoni", "Sausage", "Ham", "Bacon", "Chicken", "Ground Beef", "Anchovies"],
    },
    ToppingCategory {
        name: "Veggies",
        items: &[
            "Mushrooms",
            "Onions",
            "Green Peppers",
            "Black Olives",
            "Tomatoes",
            "Spinach",
            "Jalapeños",
            "Pineapple",
            "Artichoke Hearts",
        ],
    },
    // Toppings, not the base cheese choice.
    ToppingCategory {
        name: "Cheeses",
        items: &["Extra Cheese", "Feta", "Cheddar", "Provolone", "Mozzarella"],
    },
];

pub const SPECIALTY_PIZZAS: &[SpecialtyPizza] = &[
    SpecialtyPizza {
        name: "Margherita",
        description: "Fresh mozzarella, tomato sauce, and fresh basil.",
    },
    SpecialtyPizza {
        name: "Pepperoni",
        description: "Classic pepperoni with mozzarella on tomato sauce.",
    },
    SpecialtyPizza {
        name: "Supreme",
        description: "Pepperoni, sausage, mushrooms, bell peppers, onions, and olives.",
    },
    SpecialtyPizza {
        name: "Vegetarian",
        description: "Mushrooms, onions, bell peppers, spinach, olives, and tomatoes.",
    },
    SpecialtyPizza {
        name: "Hawaiian",
        description: "Ham and pineapple over tomato sauce with mozzarella.",
    },
    SpecialtyPizza {
        name: "Meat Lovers",
        description: "Pepperoni, sausage, ham, and bacon.",
    },
    SpecialtyPizza {
        name: "BBQ Chicken",
        description: "Grilled chicken, BBQ sauce, red onions, and mozzarella.",
    },
];

pub const SIDES: &[MenuItem] = &[
    MenuItem {
        name: "Garlic Knots",
        description: "Fresh baked and brushed with garlic butter and herbs.",
        price: Money::from_cents(500),
        quantity: Some("6 pcs"),
        allergens: &["Gluten", "Dairy"],
    },
    MenuItem {
        name: "Chicken Wings",
        description: "Choose from Buffalo, BBQ, or Plain with blue cheese dressing.",
        price: Money::from_cents(700),
        quantity: Some("6 pcs"),
        allergens: &[],
    },
    MenuItem {
        name: "House Salad",
        description: "Fresh greens, tomatoes, cucumbers, onions with your choice of dressing.",
        price: Money::from_cents(600),
        quantity: None,
        allergens: &["Dairy-free option"],
    },
    MenuItem {
        name: "Caesar Salad",
        description: "Crisp romaine, parmesan cheese, croutons with Caesar dressing.",
        price: Money::from_cents(600),
        quantity: None,
        allergens: &["Gluten", "Dairy"],
    },
];

pub const BEVERAGES: &[MenuItem] = &[
    MenuItem {
        name: "Soda (Can)",
        description: "Coke, Diet Coke, Sprite, Dr. Pepper",
        price: Money::from_cents(200),
        quantity: None,
        allergens: &[],
    },
    MenuItem {
        name: "Soda (2-liter)",
        description: "Coke, Diet Coke, Sprite, Dr. Pepper",
        price: Money::from_cents(350),
        quantity: None,
        allergens: &[],
    },
    MenuItem {
        name: "Bottled Water",
        description: "Pure spring water",
        price: Money::from_cents(150),
        quantity: None,
        allergens: &[],
    },
];

pub const DESSERTS: &[MenuItem] = &[MenuItem {
    name: "Chocolate Chip Cookies",
    description: "Freshly baked daily.",
    price: Money::from_cents(400),
    quantity: Some("3 pcs"),
    allergens: &["Gluten", "Dairy", "Eggs"],
}];

pub const DEALS: &[Deal] = &[
    Deal {
        title: "Two-for-Tuesday",
        description: "Two medium one-topping pizzas for one great price!",
        price: Money::from_cents(2500),
        original_price: Money::from_cents(3000),
        image: "https://images.unsplash.com/photo-1513104890138-7c749659a591?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80",
        days: Some("Tuesday Only"),
    },
    Deal {
        title: "Family Special",
        description: "One large two-topping pizza, garlic knots, and a 2-liter soda",
        price: Money::from_cents(2899),
        original_price: Money::from_cents(3350),
        image: "https://images.unsplash.com/photo-1534308983496-4fabb1a015ee?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80",
        days: None,
    },
    Deal {
        title: "Lunch Special",
        description: "Personal pizza with one topping and a can of soda",
        price: Money::from_cents(899),
        original_price: Money::from_cents(1200),
        image: "https://images.unsplash.com/photo-1571066811602-716837d681de?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80",
        days: Some("Mon-Fri, 11am-3pm"),
    },
];

pub const ALLERGEN_NOTES: &[&str] = &[
    "Cheese is 100% dairy",
    "All food is made in the same kitchen; veggies and meat are prepped separately",
    "Please inform staff of any allergies when ordering",
];

pub const GLUTEN_FREE_NOTE: &str =
    "Gluten-free crust available in small size only for an additional $2.00.";

/// The whole menu, as served to the page and the JSON endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Menu {
    pub restaurant: &'static str,
    pub info: GeneralInfo,
    pub sizes: Vec<PizzaSize>,
    pub specialty_pizzas: &'static [SpecialtyPizza],
    pub topping_categories: &'static [ToppingCategory],
    pub sides: &'static [MenuItem],
    pub beverages: &'static [MenuItem],
    pub desserts: &'static [MenuItem],
    pub deals: &'static [Deal],
    pub allergen_notes: &'static [&'static str],
    pub gluten_free_note: &'static str,
}

impl Menu {
    pub fn house() -> Self {
        Self {
            restaurant: RESTAURANT_NAME,
            info: GENERAL_INFO,
            sizes: Size::ALL.iter().copied().map(PizzaSize::from).collect(),
            specialty_pizzas: SPECIALTY_PIZZAS,
            topping_categories: TOPPING_CATEGORIES,
            sides: SIDES,
            beverages: BEVERAGES,
            desserts: DESSERTS,
            deals: DEALS,
            allergen_notes: ALLERGEN_NOTES,
            gluten_free_note: GLUTEN_FREE_NOTE,
        }
    }
}
