use crate::booking::LANDOS_BARBEQUE;
use askama_axum::Template;
use axum::extract::Query;

fn page_title(page: &str) -> String {
    format!("{} - {}", page, LANDOS_BARBEQUE.name)
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    title: String,
    active_page: &'static str,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    title: String,
    active_page: &'static str,
}

#[derive(Template)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    title: String,
    active_page: &'static str,
}

#[derive(Template)]
#[template(path = "book-event.html")]
pub struct BookEventTemplate {
    title: String,
    active_page: &'static str,
    phone: &'static str,
    success: bool,
    error: bool,
}

/// Banner flags. Only the literal string `true` switches one on, and the last
/// occurrence of a repeated key wins.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Banners {
    success: bool,
    error: bool,
}

impl Banners {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let flag = |key: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .is_some_and(|(_, value)| value == "true")
        };
        Self {
            success: flag("success"),
            error: flag("error"),
        }
    }
}

pub async fn index() -> IndexTemplate {
    IndexTemplate {
        title: LANDOS_BARBEQUE.name.to_string(),
        active_page: "home",
    }
}

pub async fn about() -> AboutTemplate {
    AboutTemplate {
        title: page_title("About"),
        active_page: "about",
    }
}

pub async fn menu() -> MenuTemplate {
    MenuTemplate {
        title: page_title("Menu"),
        active_page: "menu",
    }
}

// Raw pairs so a repeated or odd parameter never turns into a rejection.
pub async fn book_event(Query(pairs): Query<Vec<(String, String)>>) -> BookEventTemplate {
    let banners = Banners::from_pairs(&pairs);
    BookEventTemplate {
        title: page_title("Book an Event"),
        active_page: "book-event",
        phone: LANDOS_BARBEQUE.phone,
        success: banners.success,
        error: banners.error,
    }
}
