use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    codec::format_decimal,
    error::{Result, ScsError},
};

pub const SCS_FILE_EXTENSION: &str = "scs11";

const XML_INDENT: usize = 4;

pub trait ScsText {
    fn to_scs_text(&self) -> String;
}

impl ScsText for bool {
    fn to_scs_text(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

impl ScsText for f64 {
    fn to_scs_text(&self) -> String {
        format_decimal(*self)
    }
}

impl ScsText for str {
    fn to_scs_text(&self) -> String {
        self.to_string()
    }
}

impl ScsText for String {
    fn to_scs_text(&self) -> String {
        self.clone()
    }
}

macro_rules! integer_text {
    ($($ty:ty),*) => {
        $(impl ScsText for $ty {
            fn to_scs_text(&self) -> String {
                self.to_string()
            }
        })*
    };
}

integer_text!(u8, u16, u32, i32, i64, usize);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScsElement {
    pub name: String,
    pub text: Option<String>,
    pub children: Vec<ScsElement>,
}

impl ScsElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text<T: ScsText + ?Sized>(name: impl Into<String>, value: &T) -> Self {
        Self {
            name: name.into(),
            text: Some(value.to_scs_text()),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: ScsElement) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn push_text<T: ScsText + ?Sized>(&mut self, name: impl Into<String>, value: &T) -> &mut Self {
        self.push(Self::with_text(name, value))
    }

    pub fn child(&self, name: &str) -> Option<&ScsElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ScsElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn descendant(&self, name: &str) -> Option<&ScsElement> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.descendant(name)
            }
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.descendant(name).and_then(ScsElement::text)
    }

    pub fn required_text(&self, name: &str) -> Result<&str> {
        self.text_of(name)
            .ok_or_else(|| ScsError::malformed(format!("<{}> has no <{}>", self.name, name)))
    }

    pub fn integer(&self, name: &str) -> Result<Option<i64>> {
        self.parsed(name, |text| text.parse::<i64>().ok())
    }

    pub fn float(&self, name: &str) -> Result<Option<f64>> {
        self.parsed(name, |text| text.parse::<f64>().ok())
    }

    // SCS booleans are 0/1; absent means false.
    pub fn boolean(&self, name: &str) -> Result<bool> {
        Ok(self.integer(name)?.is_some_and(|value| value != 0))
    }

    pub fn parsed<T>(&self, name: &str, parse: impl FnOnce(&str) -> Option<T>) -> Result<Option<T>> {
        match self.text_of(name) {
            None => Ok(None),
            Some(text) => parse(text.trim()).map(Some).ok_or_else(|| {
                ScsError::malformed(format!("<{}> has an invalid value '{}'", name, text))
            }),
        }
    }

    fn from_node(node: roxmltree::Node) -> Self {
        let children: Vec<_> = node
            .children()
            .filter(|child| child.is_element())
            .map(Self::from_node)
            .collect();
        let text = if children.is_empty() {
            Some(node.text().unwrap_or_default().to_string())
        } else {
            None
        };
        Self {
            name: node.tag_name().name().to_string(),
            text,
            children,
        }
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match (&self.text, self.children.is_empty()) {
            (Some(text), true) if !text.is_empty() => {
                writer.write_event(Event::Start(BytesStart::new(self.name.as_str())))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
            }
            (_, true) => {
                writer.write_event(Event::Empty(BytesStart::new(self.name.as_str())))?;
            }
            (_, false) => {
                writer.write_event(Event::Start(BytesStart::new(self.name.as_str())))?;
                for child in &self.children {
                    child.write(writer)?;
                }
                writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScsDocument {
    pub root: ScsElement,
}

impl Default for ScsDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ScsDocument {
    pub fn new() -> Self {
        Self {
            root: ScsElement::new("Production"),
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let xml = roxmltree::Document::parse(contents)?;
        let root = ScsElement::from_node(xml.root_element());
        if root.name != "Production" {
            return Err(ScsError::malformed(format!(
                "root element is <{}>, expected <Production>",
                root.name
            )));
        }
        Ok(Self { root })
    }

    pub fn head(&self) -> Option<&ScsElement> {
        self.root.child("Head")
    }

    pub fn cues(&self) -> impl Iterator<Item = &ScsElement> {
        self.root.children_named("Cue")
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', XML_INDENT);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.root.write(&mut writer)?;
        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| ScsError::malformed(format!("non UTF-8 output: {}", e)))?;
        xml.push('\n');
        Ok(xml)
    }
}
