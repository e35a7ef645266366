//! Classification of S3 XML response bodies.
//!
//! S3 serves two document shapes the resolver cares about: error documents
//! (`<Error><Code>..</Code><BucketName>..</BucketName></Error>`) and public
//! listings (`<ListBucketResult><Name>..</Name>..</ListBucketResult>`).
//! Anything that does not parse as one of these is simply not a signal.

use quick_xml::events::Event;
use quick_xml::Reader;

/// An S3 signal extracted from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySignal {
    /// An S3 error document.
    ErrorDoc {
        code: String,
        bucket_name: Option<String>,
    },
    /// A fully public bucket listing.
    Listing { name: String },
}

/// Parse a response body and extract the S3 signal, if any. Malformed XML
/// and non-S3 documents yield `None`.
pub fn classify(body: &str) -> Option<BodySignal> {
    let mut reader = Reader::from_reader(body.as_bytes());
    reader.config_mut().trim_text(true);

    // Find the root element, skipping declarations and comments.
    let root = loop {
        match reader.read_event().ok()? {
            Event::Start(e) => break e.name().as_ref().to_vec(),
            Event::Eof => return None,
            _ => {}
        }
    };

    match root.as_slice() {
        b"Error" => {
            let mut code = None;
            let mut bucket_name = None;
            read_children(&mut reader, |name, text| match name {
                b"Code" => code = Some(text),
                b"BucketName" => bucket_name = Some(text),
                _ => {}
            })?;
            Some(BodySignal::ErrorDoc {
                code: code?,
                bucket_name,
            })
        }
        b"ListBucketResult" => {
            let mut name = None;
            read_children(&mut reader, |child, text| {
                if child == b"Name" {
                    name = Some(text);
                }
            })?;
            Some(BodySignal::Listing { name: name? })
        }
        _ => None,
    }
}

/// Walk the direct children of the current element, handing each child's
/// name and text content to `visit`. Nested structures are skipped so a
/// `<Name>` inside `<Contents>` is never mistaken for the bucket name.
fn read_children(
    reader: &mut Reader<&[u8]>,
    mut visit: impl FnMut(&[u8], String),
) -> Option<()> {
    loop {
        match reader.read_event().ok()? {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                let text = read_text(reader)?;
                visit(&name, text);
            }
            Event::End(_) | Event::Eof => return Some(()),
            _ => {}
        }
    }
}

/// Read the text content of the current element, consuming through its end
/// tag and skipping any nested elements.
fn read_text(reader: &mut Reader<&[u8]>) -> Option<String> {
    let mut text = String::new();
    let mut depth = 0u32;
    loop {
        match reader.read_event().ok()? {
            Event::Text(e) if depth == 0 => {
                let unescaped = e.unescape().ok()?;
                text.push_str(&unescaped);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Some(text);
                }
                depth -= 1;
            }
            Event::Eof => return None,
            _ => {}
        }
    }
}
