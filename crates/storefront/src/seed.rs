//! Built-in catalog used the first time a collection is read.
//!
//! A collection key that has never been written is populated from these
//! arrays and persisted, so a fresh data directory has something to browse.
//! Timestamps are fixed so "newest" ordering is deterministic.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::model::{Banner, BlogPost, Entity, Flashcard, FlashcardDeck, Product};

/// Entities that have a built-in seed collection.
pub trait Seeded: Entity {
    fn seed() -> Vec<Self>;
}

/// 2024-01-01T00:00:00Z plus `days`.
fn stamp(days: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_704_067_200 + days * 86_400, 0).unwrap_or_default()
}

static PRODUCTS: Lazy<Vec<Product>> = Lazy::new(|| {
    let rows: [(&str, &str, &str, f64, f64, u32); 12] = [
        (
            "Walnut Desk Lamp",
            "Warm dimmable light in oiled walnut",
            "home",
            89.0,
            4.6,
            14,
        ),
        (
            "Linen Throw",
            "Stonewashed linen, 130 x 170 cm",
            "home",
            64.0,
            4.3,
            22,
        ),
        (
            "Ceramic Planter",
            "Matte glaze with drainage tray",
            "home",
            29.5,
            4.1,
            40,
        ),
        (
            "Pour-Over Kettle",
            "Gooseneck kettle with thermometer",
            "kitchen",
            72.0,
            4.8,
            9,
        ),
        (
            "Stoneware Mug",
            "Hand-thrown, 350 ml",
            "kitchen",
            18.0,
            4.5,
            120,
        ),
        (
            "Chef Knife",
            "21 cm carbon steel blade",
            "kitchen",
            129.0,
            4.9,
            6,
        ),
        (
            "Noise-Cancelling Headphones",
            "Over-ear, 30 hour battery",
            "audio",
            249.0,
            4.7,
            11,
        ),
        (
            "Bookshelf Speakers",
            "Passive pair, walnut veneer",
            "audio",
            310.0,
            4.4,
            5,
        ),
        (
            "Portable Speaker",
            "Splash-proof bluetooth speaker",
            "audio",
            59.0,
            3.9,
            31,
        ),
        (
            "Canvas Backpack",
            "Waxed canvas with leather straps",
            "outdoor",
            95.0,
            4.2,
            17,
        ),
        (
            "Insulated Bottle",
            "Keeps drinks cold for 24 hours",
            "outdoor",
            24.0,
            4.6,
            75,
        ),
        (
            "Trail Headlamp",
            "Rechargeable, 400 lumen",
            "outdoor",
            39.0,
            4.0,
            0,
        ),
    ];
    rows
        .iter()
        .enumerate()
        .map(|(i, (name, description, category, price, rating, stock))| {
            let created = stamp(i as i64 * 3);
            Product {
                id: i as u64 + 1,
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                price: *price,
                rating: *rating,
                stock: *stock,
                image: format!("/images/products/{}.jpg", i + 1),
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
});

static BLOG_POSTS: Lazy<Vec<BlogPost>> = Lazy::new(|| {
    let rows: [(&str, &str, &str, &str, &[&str]); 6] = [
        (
            "Caring for Carbon Steel",
            "Keep your knife sharp and rust-free.",
            "kitchen",
            "Mara Lind",
            &["knives", "care"],
        ),
        (
            "Brewing Better Pour-Over",
            "Grind size, water temperature and patience.",
            "kitchen",
            "Tom Okafor",
            &["coffee"],
        ),
        (
            "Small Rooms, Warm Light",
            "Layered lighting for compact spaces.",
            "home",
            "Mara Lind",
            &["lighting", "interiors"],
        ),
        (
            "Packing for a Day Hike",
            "What actually belongs in the bag.",
            "outdoor",
            "Ines Duarte",
            &["hiking", "gear"],
        ),
        (
            "Speaker Placement Basics",
            "Where to put them and why it matters.",
            "audio",
            "Tom Okafor",
            &["hifi"],
        ),
        (
            "Studying with Flashcards",
            "Spaced repetition without the software.",
            "learning",
            "Ines Duarte",
            &["study", "flashcards"],
        ),
    ];
    rows
        .iter()
        .enumerate()
        .map(|(i, (title, excerpt, category, author, tags))| {
            let created = stamp(i as i64 * 5 + 2);
            BlogPost {
                id: i as u64 + 1,
                title: title.to_string(),
                excerpt: excerpt.to_string(),
                body: format!("{}\n\n{}", excerpt, "Full article coming soon."),
                author: author.to_string(),
                category: category.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
});

static BANNERS: Lazy<Vec<Banner>> = Lazy::new(|| {
    let rows: [(&str, &str, &str, &str); 3] = [
        (
            "Autumn Collection",
            "New linen and ceramics",
            "/products?category=home",
            "home-hero",
        ),
        (
            "Free Shipping",
            "On orders over 50",
            "/help/shipping",
            "home-strip",
        ),
        (
            "Study Smarter",
            "Browse flashcard decks",
            "/flashcards",
            "sidebar",
        ),
    ];
    rows
        .iter()
        .enumerate()
        .map(|(i, (title, subtitle, link, placement))| {
            let created = stamp(i as i64);
            Banner {
                id: i as u64 + 1,
                title: title.to_string(),
                subtitle: subtitle.to_string(),
                image: format!("/images/banners/{}.jpg", i + 1),
                link: link.to_string(),
                placement: placement.to_string(),
                position: i as u32,
                active: true,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
});

static FLASHCARD_DECKS: Lazy<Vec<FlashcardDeck>> = Lazy::new(|| {
    let decks: [(&str, &str, &str, &[(&str, &str)]); 4] = [
        (
            "Spanish Basics",
            "Everyday words and greetings",
            "languages",
            &[
                ("hola", "hello"),
                ("gracias", "thank you"),
                ("adios", "goodbye"),
            ],
        ),
        (
            "Rust Ownership",
            "Borrowing rules in brief",
            "programming",
            &[
                ("How many mutable borrows at once?", "One"),
                (
                    "What does `move` do in a closure?",
                    "Takes ownership of captures",
                ),
            ],
        ),
        (
            "World Capitals",
            "Capitals of European countries",
            "geography",
            &[
                ("Portugal", "Lisbon"),
                ("Norway", "Oslo"),
                ("Austria", "Vienna"),
                ("Greece", "Athens"),
            ],
        ),
        (
            "Coffee Ratios",
            "Brewing numbers worth memorising",
            "kitchen",
            &[("Pour-over ratio", "1:16"), ("Espresso ratio", "1:2")],
        ),
    ];
    decks
        .iter()
        .enumerate()
        .map(|(i, (title, description, category, cards))| {
            let created = stamp(i as i64 * 7 + 1);
            FlashcardDeck {
                id: i as u64 + 1,
                title: title.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                cards: cards.iter().map(|(f, b)| Flashcard::new(*f, *b)).collect(),
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
});

impl Seeded for Product {
    fn seed() -> Vec<Self> {
        PRODUCTS.clone()
    }
}

impl Seeded for BlogPost {
    fn seed() -> Vec<Self> {
        BLOG_POSTS.clone()
    }
}

impl Seeded for Banner {
    fn seed() -> Vec<Self> {
        BANNERS.clone()
    }
}

impl Seeded for FlashcardDeck {
    fn seed() -> Vec<Self> {
        FLASHCARD_DECKS.clone()
    }
}
