//! Park site extraction from state and site pages
//!
//! A state page lists links to its park sites; each site page carries a hero
//! section (name and designation) and a footer contact block (locality,
//! region, postal code and phone). Nothing here is cached: the pages are
//! cached by the document fetcher.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use super::html::{find, selector, text_in, ExtractionError};
use super::ParkSite;

static PARK_LIST: LazyLock<Selector> = LazyLock::new(|| selector("#list_parks"));
static PARK_ENTRY: LazyLock<Selector> = LazyLock::new(|| selector(".list_left"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

static HERO: LazyLock<Selector> = LazyLock::new(|| selector(".Hero-titleContainer"));
static HERO_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".Hero-title"));
static HERO_DESIGNATION: LazyLock<Selector> = LazyLock::new(|| selector(".Hero-designation"));

static CONTACT: LazyLock<Selector> = LazyLock::new(|| selector(".ParkFooter-contact"));
static LOCALITY: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[itemprop="addressLocality"]"#));
static REGION: LazyLock<Selector> = LazyLock::new(|| selector(r#"[itemprop="addressRegion"]"#));
static POSTAL_CODE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[itemprop="postalCode"]"#));
static TELEPHONE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[itemprop="telephone"]"#));

/// Site page links of a state page, in document order
///
/// Takes the first link of every `.list_left` entry inside `#list_parks`,
/// resolved against `base_url`. Entries without a link are skipped.
pub fn extract_site_links(state_page: &str, base_url: &Url) -> Result<Vec<Url>, ExtractionError> {
    let document = Html::parse_document(state_page);
    let park_list = find(&document, &PARK_LIST, "park list")?;

    park_list
        .select(&PARK_ENTRY)
        .filter_map(|entry| entry.select(&LINK).next())
        .map(|link| {
            let href = link.value().attr("href").unwrap_or_default();
            base_url
                .join(href)
                .map_err(|source| ExtractionError::InvalidLink {
                    href: href.to_string(),
                    source,
                })
        })
        .collect()
}

/// Builds a [`ParkSite`] from a site page
///
/// Fails on the first missing anchor; no partial record is produced.
pub fn extract_site(site_page: &str) -> Result<ParkSite, ExtractionError> {
    let document = Html::parse_document(site_page);

    let hero = find(&document, &HERO, "hero title container")?;
    let name = text_in(hero, &HERO_TITLE, "hero title")?;
    let category = text_in(hero, &HERO_DESIGNATION, "hero designation")?;

    let contact = find(&document, &CONTACT, "footer contact block")?;
    let city = text_in(contact, &LOCALITY, "address locality")?;
    let state = text_in(contact, &REGION, "address region")?;
    let zipcode = text_in(contact, &POSTAL_CODE, "postal code")?;
    let phone = text_in(contact, &TELEPHONE, "telephone")?;

    Ok(ParkSite {
        category,
        name,
        address: format!("{}, {}", city, state),
        zipcode,
        phone,
    })
}
