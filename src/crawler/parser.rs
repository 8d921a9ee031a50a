//! HTML parser for partner profile pages
//!
//! Extraction is purely structural:
//!
//! 1. `div.partner-contact` → `a.url` → `href` gives the company website
//! 2. `div.tab-content#overview` → first nested `div` → `div.tab-inner`
//! 3. The `p` elements inside that block map positionally onto
//!    [`ProfileField::PARAGRAPH_ORDER`]
//!
//! Any missing container is a hard failure for the page. Paragraph
//! positions are not checked against labels, so a markup change on the
//! portal silently shifts values between columns.

use crate::record::{ProfileField, Record};
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Fields extracted from one profile page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyProfile {
    /// Target of the contact block's website anchor
    pub website: String,

    /// Overview values in paragraph order, at most five
    pub details: Vec<(ProfileField, String)>,
}

impl CompanyProfile {
    /// Copies the extracted fields onto a record
    pub fn apply_to(self, record: &mut Record) {
        record.website = Some(self.website);
        for (field, value) in self.details {
            record.set_field(field, value);
        }
    }
}

/// Parses a profile page
///
/// # Arguments
///
/// * `html` - Raw response body; decoded as UTF-8 with lossy replacement
///
/// # Returns
///
/// * `Ok(CompanyProfile)` - All required containers were found
/// * `Err(ParseError::MissingElement)` - A required container was absent
///
/// # Example
///
/// ```
/// use partner_crawl::crawler::parse_profile;
///
/// let html = br#"<div class="partner-contact"><a class="url" href="https://acme.example">Site</a></div>
/// <div class="tab-content" id="overview"><div><div class="tab-inner">
///   <p>Gold</p><p>APAC</p>
/// </div></div></div>"#;
/// let profile = parse_profile(html).unwrap();
/// assert_eq!(profile.website, "https://acme.example");
/// assert_eq!(profile.details.len(), 2);
/// ```
pub fn parse_profile(html: &[u8]) -> Result<CompanyProfile, ParseError> {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    let website = extract_website(&document)?;
    let details = extract_details(&document)?;

    Ok(CompanyProfile { website, details })
}

/// Parses a profile page and writes its fields into `record`
///
/// The record is only modified when the whole page parses; a failure
/// leaves it exactly as it was.
pub fn apply_profile(html: &[u8], record: &mut Record) -> Result<(), ParseError> {
    let profile = parse_profile(html)?;
    profile.apply_to(record);
    Ok(())
}

fn extract_website(document: &Html) -> Result<String, ParseError> {
    let contact = select_in_document(document, "div.partner-contact", "contact block")?;
    let anchor = select_in(contact, "a.url", "contact website anchor")?;

    anchor
        .value()
        .attr("href")
        .map(|href| href.trim().to_string())
        .ok_or(ParseError::MissingElement("contact website href"))
}

fn extract_details(document: &Html) -> Result<Vec<(ProfileField, String)>, ParseError> {
    let overview = select_in_document(document, "div.tab-content#overview", "overview block")?;
    let nested = select_in(overview, "div", "overview nested block")?;
    let inner = select_in(nested, "div.tab-inner", "overview detail block")?;

    let Ok(paragraph) = Selector::parse("p") else {
        return Err(ParseError::MissingElement("overview paragraphs"));
    };

    let details = inner
        .select(&paragraph)
        .zip(ProfileField::PARAGRAPH_ORDER)
        .map(|(p, field)| (field, p.text().collect::<String>().trim().to_string()))
        .collect();

    Ok(details)
}

/// Returns the first element in the document matching `css`
fn select_in_document<'a>(
    document: &'a Html,
    css: &str,
    name: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    let selector = Selector::parse(css).map_err(|_| ParseError::MissingElement(name))?;
    document
        .select(&selector)
        .next()
        .ok_or(ParseError::MissingElement(name))
}

/// Returns the first descendant of `scope` matching `css`, never `scope` itself
fn select_in<'a>(
    scope: ElementRef<'a>,
    css: &str,
    name: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    let selector = Selector::parse(css).map_err(|_| ParseError::MissingElement(name))?;
    scope
        .select(&selector)
        .find(|element| element.id() != scope.id())
        .ok_or(ParseError::MissingElement(name))
}
