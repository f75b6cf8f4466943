//! Per-site selectors and thresholds.
//!
//! Page structure is site-owned and changes without notice; everything a
//! strategy needs to know about a site lives here as plain data.

use crate::browser::Key;

/// How a grid site's inline `data:` sources are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlinePolicy {
    /// Keep a recognized inline jpeg/png `src`. When `src` is missing or an
    /// unrecognized `data:` placeholder, read `lazy_attr` instead.
    Prefer { lazy_attr: &'static str },
    /// Drop every `data:` source.
    Reject,
}

/// A thumbnail grid read in one pass after scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSite {
    /// Element that receives PageDown presses.
    pub scroll_target: &'static str,
    /// PageDown presses per reveal pass.
    pub reveal_steps: usize,
    /// Optional "show more results" control; a second reveal pass follows a click.
    pub load_more: Option<&'static str>,
    /// Result cells.
    pub cell: &'static str,
    /// Image inside each cell; `None` when the cell selector matches the image itself.
    pub image: Option<&'static str>,
    pub inline: InlinePolicy,
}

/// A full-resolution viewer walked one item at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSite {
    /// Element that receives advance keys.
    pub key_target: &'static str,
    /// Result clicked to open the viewer.
    pub first_item: &'static str,
    /// Active viewer pane; `None` when images are located page-wide.
    pub container: Option<&'static str>,
    /// Full-resolution image(s), under `container` when set.
    pub image: &'static str,
    /// Loading indicator under `container`, visible until the image has loaded.
    pub loading: Option<&'static str>,
    /// Keys sent, in order, to move to the next item.
    pub advance: &'static [Key],
    /// Consecutive stalled iterations before the walk ends.
    pub patience: u32,
}

pub const GOOGLE_GRID: GridSite = GridSite {
    scroll_target: "body",
    reveal_steps: 60,
    load_more: Some(r#"input[type="button"]"#),
    cell: r#"div[class="bRMDJf islir"]"#,
    image: Some("img"),
    inline: InlinePolicy::Prefer {
        lazy_attr: "data-iurl",
    },
};

pub const NAVER_GRID: GridSite = GridSite {
    scroll_target: "body",
    reveal_steps: 60,
    load_more: None,
    cell: r#"div[class="photo_bx api_ani_send _photoBox"] img[class="_image _listImage"]"#,
    image: None,
    inline: InlinePolicy::Reject,
};

pub const GOOGLE_CAROUSEL: CarouselSite = CarouselSite {
    key_target: "body",
    first_item: r#"div[data-ri="0"]"#,
    container: Some(r#"#islsp div[class="v4dQwb"]"#),
    image: r#"img[class="n3VNCb"]"#,
    loading: Some(r#"div[class="k7O2sd"]"#),
    advance: &[Key::ArrowRight],
    patience: 30,
};

pub const NAVER_CAROUSEL: CarouselSite = CarouselSite {
    key_target: "body",
    first_item: r#"div[class="photo_bx api_ani_send _photoBox"]"#,
    container: None,
    image: r#"div[class="image _imageBox"] > img[class="_image"]"#,
    loading: None,
    advance: &[Key::ArrowRight, Key::PageDown],
    patience: 100,
};
