//! Shared fixtures: in-process PDF generation and multipart request building.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use serde_json::Value;
use tower::ServiceExt;

use pdfpeek::{create_router, AppState, Config};

pub const BOUNDARY: &str = "----pdfpeek-test-boundary";

/// Optional document information written into generated PDFs.
#[derive(Default)]
pub struct PdfInfo<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub creation_date: Option<&'a str>,
    pub language: Option<&'a str>,
}

/// Build a PDF with one page per entry of `pages`, each showing its text in
/// Helvetica.
pub fn build_pdf(pages: &[&str], info: PdfInfo<'_>) -> Vec<u8> {
    save(build_document(pages, info))
}

/// Build a one-page PDF encrypted with 40-bit RC4 (standard handler, R2).
///
/// The file opens with the empty user password unless
/// `requires_user_password` is set, in which case the stored `/U` entry
/// cannot be matched without the real password.
pub fn build_encrypted_pdf(text: &str, info: PdfInfo<'_>, requires_user_password: bool) -> Vec<u8> {
    let mut doc = build_document(&[text], info);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(b"pdfpeek-fixture-id".to_vec(), StringFormat::Hexadecimal),
            Object::String(b"pdfpeek-fixture-id".to_vec(), StringFormat::Hexadecimal),
        ],
    );

    let mut encrypt = dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(vec![0x4f; 32], StringFormat::Hexadecimal),
        "P" => -4,
    };
    if requires_user_password {
        encrypt.set("U", Object::String(vec![0; 32], StringFormat::Hexadecimal));
    }
    let encrypt_id = doc.add_object(encrypt);
    doc.trailer.set("Encrypt", encrypt_id);

    // RC4 is symmetric, so the reader's decryption routine also encrypts.
    let key = get_encryption_key(&doc, "", false).expect("encryption key derives");
    for (&id, object) in doc.objects.iter_mut() {
        if id == encrypt_id {
            continue;
        }
        let Ok(cipher) = decrypt_object(&key, id, &*object) else {
            continue;
        };
        match object {
            Object::Stream(stream) => stream.set_content(cipher),
            Object::String(content, _) => *content = cipher,
            _ => {}
        }
    }

    let info_id = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .expect("fixture has an Info dictionary");
    let info_dict = doc
        .get_object_mut(info_id)
        .and_then(Object::as_dict_mut)
        .expect("Info is a dictionary");
    for (_, value) in info_dict.iter_mut() {
        if let Ok(cipher) = decrypt_object(&key, info_id, &*value) {
            *value = Object::String(cipher, StringFormat::Hexadecimal);
        }
    }

    save(doc)
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("generated PDF serializes");
    bytes
}

fn build_document(pages: &[&str], info: PdfInfo<'_>) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| add_page(&mut doc, pages_id, text).into())
        .collect();

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(lang) = info.language {
        catalog.set("Lang", Object::string_literal(lang));
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let mut info_dict = lopdf::Dictionary::new();
    if let Some(title) = info.title {
        info_dict.set("Title", Object::string_literal(title));
    }
    if let Some(author) = info.author {
        info_dict.set("Author", Object::string_literal(author));
    }
    if let Some(date) = info.creation_date {
        info_dict.set("CreationDate", Object::string_literal(date));
    }
    if info_dict.len() > 0 {
        let info_id = doc.add_object(info_dict);
        doc.trailer.set("Info", info_id);
    }

    doc
}

fn add_page(doc: &mut Document, parent: ObjectId, text: &str) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("content stream encodes"),
    ));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => parent,
        "Contents" => content_id,
    })
}

/// One part of a multipart form.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: Vec<u8>,
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn text(name: &'a str, value: &str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("request builds")
}

/// A multipart request whose body is empty, as sent for an empty form.
pub fn empty_multipart_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::empty())
        .expect("request builds")
}

pub fn app(config: Config) -> Router {
    create_router(AppState::new(config).expect("state builds"))
}

pub fn default_app() -> Router {
    app(Config::default())
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}
