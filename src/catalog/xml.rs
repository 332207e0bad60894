//! Parsing for the XML bodies returned by the catalit protocol.
//!
//! Responses signal outcomes in-band: an authorization failure is a
//! distinguished root element, not an HTTP status. Parsing therefore
//! produces discriminated types rather than leaking raw documents to
//! the caller.

use roxmltree::Document;

use super::client::Session;
use super::error::CatalogError;

/// Root tag the service uses to signal rejected credentials.
const AUTH_FAILED_TAG: &str = "catalit-authorization-failed";

/// Outcome of a `catalit_authorise` call.
#[derive(Debug, Clone)]
pub enum AuthResponse {
    /// Credentials accepted; carries the session and display metadata.
    Authorized(Session),
    /// Credentials rejected by the service.
    Rejected,
}

/// One page of the owned-items listing.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    /// Total number of owned items, as declared by the service.
    pub total: u64,
    /// The items on this page, in listing order.
    pub items: Vec<RemoteItem>,
}

/// A single owned item as described by the listing.
///
/// Immutable once parsed; the engine never mutates catalog data.
#[derive(Debug, Clone)]
pub struct RemoteItem {
    /// Stable remote identifier, independent of format.
    pub hub_id: String,
    /// Declared filename; may be empty, which the engine treats as a
    /// fatal data error.
    pub filename: String,
    /// Available format variants with their declared sizes.
    pub variants: Vec<FormatVariant>,
}

/// A format the item is available in, with its declared byte size.
///
/// The tag is kept as the raw wire string: listings can mention tags
/// outside the closed set users may request, and those are harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatVariant {
    /// Wire format tag (e.g. `epub`, `fb2.zip`).
    pub format: String,
    /// Declared size of that variant in bytes.
    pub size: u64,
}

impl RemoteItem {
    /// Declared size for the given wire tag, or `None` when the item has
    /// no such variant. Absence means the size is unknown, not zero.
    #[must_use]
    pub fn declared_size(&self, format: &str) -> Option<u64> {
        self.variants
            .iter()
            .find(|variant| variant.format == format)
            .map(|variant| variant.size)
    }
}

/// Parses a `catalit_authorise` response body.
///
/// # Errors
///
/// Returns `CatalogError::Protocol` when the body is not valid XML or an
/// authorized response lacks the `sid`/`login`/`mail` attributes.
pub fn parse_auth_response(body: &str) -> Result<AuthResponse, CatalogError> {
    let doc = Document::parse(body)
        .map_err(|e| CatalogError::protocol(format!("malformed authorise response: {e}")))?;
    let root = doc.root_element();

    if root.tag_name().name() == AUTH_FAILED_TAG {
        return Ok(AuthResponse::Rejected);
    }

    let attr = |name: &str| {
        root.attribute(name)
            .map(str::to_string)
            .ok_or_else(|| CatalogError::protocol(format!("missing '{name}' attribute")))
    };

    Ok(AuthResponse::Authorized(Session {
        sid: attr("sid")?,
        login: attr("login")?,
        mail: attr("mail")?,
    }))
}

/// Parses a `catalit_browser` response body into a catalog page.
///
/// Child elements without a `hub_id` attribute (ads, separators) are
/// skipped; `file` variants with unparsable sizes are dropped.
///
/// # Errors
///
/// Returns `CatalogError::Protocol` when the body is not valid XML or the
/// root lacks a numeric `records` attribute.
pub fn parse_catalog_page(body: &str) -> Result<CatalogPage, CatalogError> {
    let doc = Document::parse(body)
        .map_err(|e| CatalogError::protocol(format!("malformed browser response: {e}")))?;
    let root = doc.root_element();

    let total = root
        .attribute("records")
        .and_then(|records| records.parse::<u64>().ok())
        .ok_or_else(|| CatalogError::protocol("missing or non-numeric 'records' attribute"))?;

    let items = root
        .children()
        .filter(|node| node.is_element())
        .filter_map(|node| {
            let hub_id = node.attribute("hub_id")?.to_string();
            let filename = node.attribute("filename").unwrap_or_default().to_string();
            let variants = node
                .descendants()
                .filter(|elem| elem.tag_name().name() == "file")
                .filter_map(|elem| {
                    Some(FormatVariant {
                        format: elem.attribute("type")?.to_string(),
                        size: elem.attribute("size")?.parse().ok()?,
                    })
                })
                .collect();
            Some(RemoteItem {
                hub_id,
                filename,
                variants,
            })
        })
        .collect();

    Ok(CatalogPage { total, items })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response_authorized() {
        let body = r#"<catalit-authorization-ok sid="abc123" login="reader" mail="reader@example.com"/>"#;
        match parse_auth_response(body).unwrap() {
            AuthResponse::Authorized(session) => {
                assert_eq!(session.sid, "abc123");
                assert_eq!(session.login, "reader");
                assert_eq!(session.mail, "reader@example.com");
            }
            AuthResponse::Rejected => panic!("expected Authorized"),
        }
    }

    #[test]
    fn test_parse_auth_response_rejected_by_root_tag() {
        let body = r#"<catalit-authorization-failed/>"#;
        assert!(matches!(
            parse_auth_response(body).unwrap(),
            AuthResponse::Rejected
        ));
    }

    #[test]
    fn test_parse_auth_response_missing_sid_is_protocol_error() {
        let body = r#"<catalit-authorization-ok login="reader" mail="reader@example.com"/>"#;
        let err = parse_auth_response(body).unwrap_err();
        assert!(matches!(err, CatalogError::Protocol { .. }));
        assert!(err.to_string().contains("sid"), "got: {err}");
    }

    #[test]
    fn test_parse_auth_response_malformed_xml() {
        let err = parse_auth_response("not xml at all <<<").unwrap_err();
        assert!(matches!(err, CatalogError::Protocol { .. }));
    }

    #[test]
    fn test_parse_catalog_page_single_item() {
        let body = r#"
            <catalit-fb2-books records="1">
              <fb2-book hub_id="42" filename="mybook.fb2">
                <files>
                  <file type="epub" size="204800"/>
                  <file type="fb2.zip" size="102400"/>
                </files>
              </fb2-book>
            </catalit-fb2-books>"#;
        let page = parse_catalog_page(body).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);

        let item = &page.items[0];
        assert_eq!(item.hub_id, "42");
        assert_eq!(item.filename, "mybook.fb2");
        assert_eq!(item.declared_size("epub"), Some(204_800));
        assert_eq!(item.declared_size("fb2.zip"), Some(102_400));
        assert_eq!(item.declared_size("mobi.prc"), None);
    }

    #[test]
    fn test_parse_catalog_page_preserves_listing_order() {
        let body = r#"
            <catalit-fb2-books records="3">
              <fb2-book hub_id="1" filename="a.fb2"/>
              <fb2-book hub_id="2" filename="b.fb2"/>
              <fb2-book hub_id="3" filename="c.fb2"/>
            </catalit-fb2-books>"#;
        let page = parse_catalog_page(body).unwrap();
        let ids: Vec<&str> = page.items.iter().map(|i| i.hub_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_parse_catalog_page_skips_children_without_hub_id() {
        let body = r#"
            <catalit-fb2-books records="1">
              <banner url="https://example.com/ad"/>
              <fb2-book hub_id="7" filename="real.fb2"/>
            </catalit-fb2-books>"#;
        let page = parse_catalog_page(body).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].hub_id, "7");
    }

    #[test]
    fn test_parse_catalog_page_missing_filename_becomes_empty() {
        let body = r#"
            <catalit-fb2-books records="1">
              <fb2-book hub_id="9"/>
            </catalit-fb2-books>"#;
        let page = parse_catalog_page(body).unwrap();
        assert_eq!(page.items[0].filename, "");
    }

    #[test]
    fn test_parse_catalog_page_drops_unparsable_variant_sizes() {
        let body = r#"
            <catalit-fb2-books records="1">
              <fb2-book hub_id="5" filename="x.fb2">
                <file type="epub" size="not-a-number"/>
                <file type="fb3" size="1000"/>
              </fb2-book>
            </catalit-fb2-books>"#;
        let page = parse_catalog_page(body).unwrap();
        assert_eq!(page.items[0].declared_size("epub"), None);
        assert_eq!(page.items[0].declared_size("fb3"), Some(1000));
    }

    #[test]
    fn test_parse_catalog_page_missing_records_is_protocol_error() {
        let err = parse_catalog_page("<catalit-fb2-books/>").unwrap_err();
        assert!(matches!(err, CatalogError::Protocol { .. }));
        assert!(err.to_string().contains("records"), "got: {err}");
    }
}
