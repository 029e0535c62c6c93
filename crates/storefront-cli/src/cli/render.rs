//! Output formatting. Every function returns a `String`; printing happens in
//! `commands.rs`, so rendering can be tested without a terminal.

use serde::Serialize;
use storefront::cart::CartItem;
use storefront::chat::{ChatMessage, ChatRole};
use storefront::model::{Banner, BlogPost, FlashcardDeck, Product};
use storefront::query::QueryResult;
use storefront::session::{Role, Session};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles;

const NAME_WIDTH: usize = 32;
const CATEGORY_WIDTH: usize = 12;

/// Pad or truncate `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{}{}", text, " ".repeat(padding));
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

fn footer<E>(result: &QueryResult<E>) -> String {
    let mut line = format!(
        "Page {} of {} ({} total)",
        result.page,
        result.total_pages.max(1),
        result.total
    );
    if result.has_next_page() {
        line.push_str(&format!(", next: --page {}", result.page + 1));
    }
    format!("{}\n", styles::muted().apply_to(line))
}

fn empty(noun: &str) -> String {
    format!("{}\n", styles::muted().apply_to(format!("No {} match.", noun)))
}

pub fn product_table(result: &QueryResult<Product>) -> String {
    if result.items.is_empty() {
        return empty("products") + &footer(result);
    }
    let mut out = String::new();
    for p in &result.items {
        let stock = if p.stock == 0 {
            styles::warning().apply_to("sold out").to_string()
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{:>4}  {}  {}  {}  {:.1}★  {}\n",
            styles::id().apply_to(p.id),
            fit(&p.name, NAME_WIDTH),
            styles::muted().apply_to(fit(&p.category, CATEGORY_WIDTH)),
            styles::price().apply_to(format!("{:>9.2}", p.price)),
            p.rating,
            stock
        ));
    }
    out + &footer(result)
}

pub fn product_detail(p: &Product) -> String {
    format!(
        "{} {}\n{}\n\n{}\nPrice:  {}\nRating: {:.1}\nStock:  {}\n{}\n",
        styles::id().apply_to(format!("#{}", p.id)),
        styles::heading().apply_to(&p.name),
        styles::muted().apply_to(&p.category),
        p.description,
        styles::price().apply_to(format!("{:.2}", p.price)),
        p.rating,
        p.stock,
        styles::muted().apply_to(format!("Updated {}", p.updated_at.format("%Y-%m-%d %H:%M")))
    )
}

pub fn blog_table(result: &QueryResult<BlogPost>) -> String {
    if result.items.is_empty() {
        return empty("posts") + &footer(result);
    }
    let mut out = String::new();
    for post in &result.items {
        out.push_str(&format!(
            "{:>4}  {}  {}  {}\n",
            styles::id().apply_to(post.id),
            fit(&post.title, NAME_WIDTH),
            styles::muted().apply_to(fit(&post.author, 16)),
            styles::muted().apply_to(post.created_at.format("%Y-%m-%d"))
        ));
    }
    out + &footer(result)
}

pub fn deck_table(result: &QueryResult<FlashcardDeck>) -> String {
    if result.items.is_empty() {
        return empty("decks") + &footer(result);
    }
    let mut out = String::new();
    for deck in &result.items {
        out.push_str(&format!(
            "{:>4}  {}  {}  {} cards\n",
            styles::id().apply_to(deck.id),
            fit(&deck.title, NAME_WIDTH),
            styles::muted().apply_to(fit(&deck.category, CATEGORY_WIDTH)),
            deck.card_count()
        ));
    }
    out + &footer(result)
}

pub fn banner_list(banners: &[Banner]) -> String {
    if banners.is_empty() {
        return empty("banners");
    }
    banners
        .iter()
        .map(|b| {
            format!(
                "{:>4}  {}  {}  {}\n",
                styles::id().apply_to(b.id),
                fit(&b.placement, CATEGORY_WIDTH),
                styles::heading().apply_to(fit(&b.title, NAME_WIDTH)),
                styles::muted().apply_to(&b.link)
            )
        })
        .collect()
}

pub fn cart_table(items: &[CartItem], subtotal: f64) -> String {
    if items.is_empty() {
        return format!("{}\n", styles::muted().apply_to("Your cart is empty."));
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "{:>4}  {}  {:>3} x {:>8.2}  {}\n",
            styles::id().apply_to(item.product_id),
            fit(&item.name, NAME_WIDTH),
            item.quantity,
            item.unit_price,
            styles::price().apply_to(format!("{:>9.2}", item.line_total()))
        ));
    }
    out.push_str(&format!(
        "{}  {}\n",
        fit("Subtotal", NAME_WIDTH + 22),
        styles::price().apply_to(format!("{:>9.2}", subtotal))
    ));
    out
}

pub fn chat_transcript(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return format!("{}\n", styles::muted().apply_to("No messages yet."));
    }
    messages.iter().map(chat_message).collect()
}

pub fn chat_message(message: &ChatMessage) -> String {
    let who = match message.role {
        ChatRole::User => styles::heading().apply_to("you"),
        ChatRole::Assistant => styles::success().apply_to("support"),
    };
    format!(
        "{} {}: {}\n",
        styles::muted().apply_to(message.at.format("%H:%M")),
        who,
        message.text
    )
}

pub fn session_line(session: Option<&Session>) -> String {
    match session {
        Some(s) => {
            let role = match s.role {
                Role::Admin => styles::success().apply_to("admin"),
                Role::Customer => styles::muted().apply_to("customer"),
            };
            format!(
                "{} <{}> ({}), expires {}\n",
                s.user.name,
                s.user.email,
                role,
                s.expires_at.format("%Y-%m-%d %H:%M UTC")
            )
        }
        None => format!("{}\n", styles::muted().apply_to("Not signed in.")),
    }
}

pub fn success(message: impl std::fmt::Display) -> String {
    format!("{}\n", styles::success().apply_to(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storefront::model::{Entity, ProductDraft};

    fn page(
        items: Vec<Product>,
        total: usize,
        page: u32,
        total_pages: u32,
    ) -> QueryResult<Product> {
        QueryResult {
            items,
            total,
            page,
            total_pages,
        }
    }

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit("Mug", 6), "Mug   ");
    }

    #[test]
    fn fit_truncates_by_display_width() {
        let out = fit("日本語のテキスト", 7);
        assert_eq!(out.width(), 7);
        assert!(out.contains('…'));
    }

    #[test]
    fn empty_page_keeps_total_in_footer() {
        let out = product_table(&page(vec![], 14, 5, 2));
        assert!(out.contains("No products match."));
        assert!(out.contains("Page 5 of 2 (14 total)"));
    }

    #[test]
    fn table_lists_names_and_next_page_hint() {
        let mug = Product::from_draft(2, ProductDraft::new("Mug", "kitchen", 18.0), Utc::now());
        let out = product_table(&page(vec![mug], 13, 1, 2));
        assert!(out.contains("Mug"));
        assert!(out.contains("18.00"));
        assert!(out.contains("next: --page 2"));
    }

    #[test]
    fn signed_out_session_line() {
        assert!(session_line(None).contains("Not signed in."));
    }

    #[test]
    fn json_is_pretty_printed() {
        let out = json(&vec![1, 2]).unwrap();
        assert!(out.starts_with("[\n"));
    }
}
