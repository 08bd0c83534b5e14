//! HTML parser for listing and detail pages
//!
//! This module handles parsing HTML content to extract:
//! - Item blocks from a listing page and the fields of each block
//! - Allow-listed streaming links from a detail page
//! - Genres, release date, actors and description from a detail page
//!
//! Every function here takes a string and returns owned data. Parsed
//! documents never outlive the call, so nothing here is held across an
//! `.await`. Structural surprises are never errors: a missing element
//! yields the default value for its field.

use crate::film::{
    FilmDetails, StreamLink, StreamService, NO_DESCRIPTION, NO_RELEASE_DATE, UNKNOWN_TITLE,
};
use scraper::{ElementRef, Html, Selector};

/// Markup of one listing item, detached from its page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub html: String,
}

/// Fields read directly from a listing item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Image `alt` text, or the unknown-title placeholder
    pub title: String,

    /// Image `src`, relative to the site root
    pub image_src: Option<String>,

    /// Detail page `href`, relative to the site root
    pub detail_href: Option<String>,
}

/// Splits a listing page into its item blocks, in document order
///
/// An item block is any `div` carrying the `movie-item2` class.
pub fn extract_item_blocks(html: &str) -> Vec<RawItem> {
    let document = Html::parse_document(html);
    let Ok(item_selector) = Selector::parse("div.movie-item2") else {
        return Vec::new();
    };

    document
        .select(&item_selector)
        .map(|element| RawItem {
            html: element.html(),
        })
        .collect()
}

/// Reads title, image and detail link from one item block
///
/// # Example
///
/// ```
/// use film_scraper::crawler::parse_listing_entry;
///
/// let entry = parse_listing_entry(
///     r#"<div class="movie-item2">
///          <div class="mi2-img"><img alt=" Dune " src="/img/dune.jpg"></div>
///          <a class="mi2-in-link" href="/films/dune.html"></a>
///        </div>"#,
/// );
/// assert_eq!(entry.title, "Dune");
/// assert_eq!(entry.image_src.as_deref(), Some("/img/dune.jpg"));
/// assert_eq!(entry.detail_href.as_deref(), Some("/films/dune.html"));
/// ```
pub fn parse_listing_entry(fragment: &str) -> ListingEntry {
    let fragment = Html::parse_fragment(fragment);

    let title = first_attr(&fragment, "div.mi2-img > img[alt]", "alt")
        .filter(|alt| !alt.is_empty())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    ListingEntry {
        title,
        image_src: first_attr(&fragment, "div.mi2-img > img[src]", "src"),
        detail_href: first_attr(&fragment, "a.mi2-in-link[href]", "href"),
    }
}

/// Returns the trimmed attribute of the first element matching `css`
fn first_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
}

/// Extracts the allow-listed streaming links of a detail page
///
/// Player blocks are `div` elements carrying both the `lien` and `fx-row`
/// classes. The service name comes from the block's `span.serv` and the link
/// from its `data-url` attribute. Blocks naming an unknown service, or no
/// service at all, are skipped. Duplicate services are all kept.
pub fn extract_stream_links(html: &str) -> Vec<StreamLink> {
    let document = Html::parse_document(html);
    let (Ok(player_selector), Ok(service_selector)) =
        (Selector::parse("div.lien.fx-row"), Selector::parse("span.serv"))
    else {
        return Vec::new();
    };

    document
        .select(&player_selector)
        .filter_map(|player| {
            let name = player
                .select(&service_selector)
                .next()
                .map(|span| span.text().collect::<String>())
                .unwrap_or_default();
            let service = StreamService::from_name(name.trim())?;

            let url = player
                .value()
                .attr("data-url")
                .map(str::trim)
                .unwrap_or_default()
                .to_string();

            Some(StreamLink { service, url })
        })
        .collect()
}

/// Fills one field of `FilmDetails` from a labelled details item
type DetailRule = fn(ElementRef<'_>, &mut FilmDetails);

/// Label text found in a details item, and how to read that item
///
/// Labels are tried in order and the first one contained in the item's text
/// wins.
const DETAIL_RULES: &[(&str, DetailRule)] = &[
    ("Genre:", read_genres),
    ("Date de sortie:", read_release_date),
    ("Acteurs:", read_actors),
];

fn read_genres(item: ElementRef<'_>, details: &mut FilmDetails) {
    details.genres = anchor_texts(item);
}

fn read_release_date(item: ElementRef<'_>, details: &mut FilmDetails) {
    details.release_date = first_span_text(item).unwrap_or_else(|| NO_RELEASE_DATE.to_string());
}

fn read_actors(item: ElementRef<'_>, details: &mut FilmDetails) {
    details.actors = anchor_texts(item);
}

/// Extracts genres, release date, actors and description from a detail page
///
/// Fields that cannot be found keep the values of `FilmDetails::default()`.
pub fn extract_film_details(html: &str) -> FilmDetails {
    let document = Html::parse_document(html);
    let mut details = FilmDetails::default();

    if let Ok(item_selector) = Selector::parse("li.details-f") {
        for item in document.select(&item_selector) {
            let text = item.text().collect::<String>();
            if let Some((_, rule)) = DETAIL_RULES.iter().find(|(label, _)| text.contains(label)) {
                rule(item, &mut details);
            }
        }
    }

    details.description =
        extract_description(&document).unwrap_or_else(|| NO_DESCRIPTION.to_string());

    details
}

/// Trimmed, non-empty texts of every anchor inside `element`
fn anchor_texts(element: ElementRef<'_>) -> Vec<String> {
    let Ok(anchor_selector) = Selector::parse("a") else {
        return Vec::new();
    };

    element
        .select(&anchor_selector)
        .map(|anchor| anchor.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Trimmed text of the first `span` inside `element`, if non-empty
fn first_span_text(element: ElementRef<'_>) -> Option<String> {
    let span_selector = Selector::parse("span").ok()?;
    element
        .select(&span_selector)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Text of the first paragraph following the `p.full-desc` marker
///
/// Text fragments are trimmed, blanks dropped, and the rest joined with
/// single spaces.
fn extract_description(document: &Html) -> Option<String> {
    let marker_selector = Selector::parse("p.full-desc").ok()?;
    let marker = document.select(&marker_selector).next()?;

    let paragraph = marker
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "p")?;

    let text = paragraph
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Some(text).filter(|text| !text.is_empty())
}
