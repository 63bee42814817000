//! CSS selectors for the DOM-based retailers.
//!
//! Each field is a [`SelectorChain`]: alternatives are tried in order, so put
//! the current markup first and keep older class names behind it.
//!
//! **Update process**: When extraction comes back empty, capture the page
//! with `--debug-dir`, update the chain here, and add a test fixture.

use crate::extract::SelectorChain;
use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for Amazon India search results.
pub mod amazon {
    use super::*;

    /// Result container, one per product tile (also matches ads and widgets).
    pub static CONTAINER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[data-asin]").unwrap());

    /// Price block. Containers without one are not products.
    pub static PRICE_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.a-price").unwrap());

    pub static NAME: LazyLock<SelectorChain> = LazyLock::new(|| {
        SelectorChain::parse(&[
            "h2.a-size-medium.a-color-base.a-text-normal",
            "h2 span.a-text-normal",
            "h2 a span",
            ".a-size-base-plus.a-text-normal",
        ])
        .unwrap()
    });

    pub static PRICE: LazyLock<SelectorChain> =
        LazyLock::new(|| SelectorChain::parse(&["span.a-price span.a-offscreen"]).unwrap());

    pub static RATING: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::parse(&["span.a-icon-alt"]).unwrap());

    pub static REVIEWS: LazyLock<SelectorChain> =
        LazyLock::new(|| SelectorChain::parse(&["span.a-size-base.s-underline-text"]).unwrap());

    pub static IMAGE: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::parse(&["img.s-image"]).unwrap());

    /// CAPTCHA form.
    pub static CAPTCHA: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "form[action*='validateCaptcha'], \
             img[src*='captcha']",
        )
        .unwrap()
    });

    /// Dog page (Amazon's 503 error page).
    pub static DOG_PAGE: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(
            "img[alt*='Dogs of Amazon'], \
             img[alt*='the dog ate'], \
             .a-box-inner a[href='/ref=cs_503_link']",
        )
        .unwrap()
    });
}

/// Selectors for rendered Flipkart search results.
pub mod flipkart {
    use super::*;

    /// Login overlay close button.
    pub const POPUP_CLOSE: &str = "._2KpZ6l._2doB4z, ._30XB9F";

    /// Present once product tiles have rendered.
    pub const LISTING_READY: &str = "div._4rR01T, a.s1Q9rs, a.WKTcLC";

    /// Container layouts: list view, grid view, newer card markup, then any
    /// tile carrying a product id. Only the first layout found is used.
    pub static CONTAINER_LAYOUTS: LazyLock<SelectorChain> = LazyLock::new(|| {
        SelectorChain::parse(&["div._1AtVbE", "div._1xHGtK._373qXS", "div.cPHDOP", "div[data-id]"]).unwrap()
    });

    pub static NAME: LazyLock<SelectorChain> = LazyLock::new(|| {
        SelectorChain::parse(&["a.WKTcLC", "div._4rR01T", "a.s1Q9rs", "div._2WkVRV"]).unwrap()
    });

    pub static PRICE: LazyLock<SelectorChain> =
        LazyLock::new(|| SelectorChain::parse(&["div.Nx9bqj", "div._30jeq3"]).unwrap());

    pub static RATING: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::parse(&["div._3LWZlK"]).unwrap());

    pub static REVIEWS: LazyLock<SelectorChain> = LazyLock::new(|| SelectorChain::parse(&["span._2_R_DZ"]).unwrap());

    pub static IMAGE: LazyLock<SelectorChain> =
        LazyLock::new(|| SelectorChain::parse(&["img._53J4C-", "img._396cs4"]).unwrap());
}
