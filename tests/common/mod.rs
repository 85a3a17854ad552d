//! In-memory PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Resource name of the regular sans font.
pub const REGULAR: &str = "F1";
/// Resource name of the bold sans font.
pub const BOLD: &str = "F2";
/// Resource name of the serif font.
pub const SERIF: &str = "F3";

enum Item {
    Text {
        font: &'static str,
        size: f32,
        text: String,
    },
    Image,
    Form {
        font: &'static str,
        size: f32,
        text: String,
    },
}

/// Builds a PDF page by page. Every text item is written as its own
/// `BT ... ET` block, one line below the previous one.
#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<Vec<Item>>,
    title: Option<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            title: None,
        }
    }

    /// Start a new page.
    pub fn page(mut self) -> Self {
        self.pages.push(Vec::new());
        self
    }

    /// Set the Info dictionary title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Add one text item to the current page.
    pub fn text(mut self, font: &'static str, size: f32, text: &str) -> Self {
        self.current().push(Item::Text {
            font,
            size,
            text: text.to_string(),
        });
        self
    }

    /// Add `count` regular 12pt body lines to the current page.
    pub fn body(mut self, count: usize) -> Self {
        for i in 0..count {
            self = self.text(REGULAR, 12.0, &format!("Body line {}", i));
        }
        self
    }

    /// Paint the image XObject on the current page.
    pub fn image(mut self) -> Self {
        self.current().push(Item::Image);
        self
    }

    /// Add one text item drawn inside its own Form XObject.
    pub fn form(mut self, font: &'static str, size: f32, text: &str) -> Self {
        self.current().push(Item::Form {
            font,
            size,
            text: text.to_string(),
        });
        self
    }

    fn current(&mut self) -> &mut Vec<Item> {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Serialize the document.
    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font = |base: &str| {
            dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base,
                "Encoding" => "WinAnsiEncoding",
            }
        };
        let regular_id = doc.add_object(font("Helvetica"));
        let bold_id = doc.add_object(font("Helvetica-Bold"));
        let serif_id = doc.add_object(font("Times-Roman"));
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 1,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0x80],
        ));

        let fonts = dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
            SERIF => serif_id,
        };
        let mut xobjects = dictionary! { "Im1" => image_id };
        let forms = self.pages.iter().flatten().filter_map(|item| match item {
            Item::Form { font, size, text } => Some((*font, *size, text.as_str())),
            _ => None,
        });
        for (index, (font, size, text)) in forms.enumerate() {
            let content = Content {
                operations: text_operations(font, size, 0.0, text),
            };
            let form_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "BBox" => vec![0.into(), 0.into(), 468.into(), Object::Real(size * 2.0)],
                    "Resources" => dictionary! { "Font" => fonts.clone() },
                },
                content.encode().expect("encode form stream"),
            ));
            xobjects.set(form_name(index), form_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let mut kids = Vec::new();
        let mut form_index = 0;
        for items in &self.pages {
            let content = Content {
                operations: page_operations(items, &mut form_index),
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title.as_str()),
                "Producer" => Object::string_literal("pdfoutline tests"),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("save fixture pdf");
        buf
    }
}

fn form_name(index: usize) -> String {
    format!("Fm{}", index + 1)
}

fn text_operations(font: &str, size: f32, y: f32, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
        ),
        Operation::new("Td", vec![Object::Integer(72), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

fn page_operations(items: &[Item], form_index: &mut usize) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut y = 760.0_f32;
    for item in items {
        match item {
            Item::Text { font, size, text } => {
                ops.extend(text_operations(font, *size, y, text));
                y -= size * 1.5;
            }
            Item::Form { size, .. } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        Object::Integer(1),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(1),
                        Object::Integer(0),
                        Object::Real(y),
                    ],
                ));
                ops.push(Operation::new(
                    "Do",
                    vec![Object::Name(form_name(*form_index).into_bytes())],
                ));
                ops.push(Operation::new("Q", vec![]));
                *form_index += 1;
                y -= size * 1.5;
            }
            Item::Image => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        Object::Integer(100),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(100),
                        Object::Integer(72),
                        Object::Real(y - 100.0),
                    ],
                ));
                ops.push(Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]));
                ops.push(Operation::new("Q", vec![]));
                y -= 110.0;
            }
        }
    }
    ops
}

/// Write `data` to `dir/name`.
pub fn write_pdf(dir: &std::path::Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write fixture");
    path
}
