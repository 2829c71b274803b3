// src/xml.rs

//! Rendering and parsing of the backup XML.
//!
//! Tag and attribute names below are a compatibility contract with existing
//! backup files and must never change.

use std::fmt::Display;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::AppError;
use crate::handlers::legacy::LegacyQuestion;
use crate::migration::{FieldRule, OPTION_FIELDS, PART_FIELDS, find_rule};
use crate::models::record::Record;
use crate::models::tree::{FormulasTree, TreeRecord};

pub const ROOT_TAG: &str = "plugin_qtype_formulas_question";
pub const OPTIONS_TAG: &str = "formulas";
pub const ANSWERS_TAG: &str = "formulas_answers";
pub const ANSWER_TAG: &str = "formulas_answer";
pub const ID_ATTR: &str = "id";

const LEGACY_QUESTION_TAG: &str = "FORMULAS";
const LEGACY_ANSWERS_TAG: &str = "ANSWERS";
const LEGACY_ANSWER_TAG: &str = "ANSWER";

fn xml_err<E: Display>(err: E) -> AppError {
    AppError::Xml(err.to_string())
}

/// Minimal element tree; enough for the flat records of this schema.
#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    fn open(start: &BytesStart<'_>) -> Result<Self, AppError> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_err)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_err)?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            ..Self::default()
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_ignore_case(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Children without children of their own, as name/text pairs.
    fn leaf_fields(&self) -> Record {
        self.children
            .iter()
            .filter(|c| c.children.is_empty())
            .map(|c| (c.name.clone(), c.text.clone()))
            .collect()
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<(), AppError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        Ok(())
    } else if root.is_none() {
        *root = Some(node);
        Ok(())
    } else {
        Err(AppError::Xml("more than one root element".to_string()))
    }
}

fn parse_document(xml: &str) -> Result<XmlNode, AppError> {
    // Text is not trimmed: leaf values must survive byte for byte.
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(XmlNode::open(&e)?),
            Ok(Event::Empty(e)) => {
                let node = XmlNode::open(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| AppError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape().map_err(xml_err)?);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AppError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(AppError::Xml(format!("element <{}> is not closed", open.name)));
    }
    root.ok_or_else(|| AppError::Xml("document has no root element".to_string()))
}

fn tree_record(node: &XmlNode) -> Result<TreeRecord, AppError> {
    let raw = node
        .attr(ID_ATTR)
        .ok_or_else(|| AppError::MissingField(format!("{}/@{}", node.name, ID_ATTR)))?;
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid(ID_ATTR, raw))?;
    Ok(TreeRecord {
        id,
        fields: node.leaf_fields(),
    })
}

/// Parses a backup document into the record tree.
///
/// The `formulas_answers` section is optional; a question without it has no parts.
pub fn parse_backup(xml: &str) -> Result<FormulasTree, AppError> {
    let root = parse_document(xml)?;

    let options_node = root
        .child(OPTIONS_TAG)
        .ok_or_else(|| AppError::Xml(format!("missing <{}> element", OPTIONS_TAG)))?;
    let options = tree_record(options_node)?;

    let answers = match root.child(ANSWERS_TAG) {
        Some(section) => section
            .children
            .iter()
            .filter(|c| c.name == ANSWER_TAG)
            .map(tree_record)
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(FormulasTree { options, answers })
}

/// Parses a pre-XML-era archive fragment (`<FORMULAS>` with upper-case tags).
///
/// Field names are returned as found; the legacy importer normalizes them.
pub fn parse_legacy(xml: &str) -> Result<LegacyQuestion, AppError> {
    let root = parse_document(xml)?;
    let question = if root.name.eq_ignore_ascii_case(LEGACY_QUESTION_TAG) {
        &root
    } else {
        root.child_ignore_case(LEGACY_QUESTION_TAG).ok_or_else(|| {
            AppError::Xml(format!("missing <{}> element", LEGACY_QUESTION_TAG))
        })?
    };

    let answers = question.child_ignore_case(LEGACY_ANSWERS_TAG).map(|section| {
        section
            .children
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case(LEGACY_ANSWER_TAG))
            .map(XmlNode::leaf_fields)
            .collect()
    });

    Ok(LegacyQuestion {
        fields: question.leaf_fields(),
        answers,
    })
}

fn write_field(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), AppError> {
    if value.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(xml_err)?;
        return Ok(());
    }
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

fn write_record(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    record: &TreeRecord,
    rules: &[FieldRule],
) -> Result<(), AppError> {
    let id = record.id.to_string();
    writer
        .write_event(Event::Start(
            BytesStart::new(tag).with_attributes([(ID_ATTR, id.as_str())]),
        ))
        .map_err(xml_err)?;

    for rule in rules {
        if let Some(value) = record.fields.get(rule.name) {
            write_field(writer, rule.name, value)?;
        }
    }
    // Fields outside the schema follow in name order.
    for (name, value) in record.fields.iter() {
        if name != ID_ATTR && find_rule(rules, name).is_none() {
            write_field(writer, name, value)?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)?;
    Ok(())
}

/// Renders the record tree as a backup document.
pub fn write_backup(tree: &FormulasTree) -> Result<String, AppError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT_TAG)))
        .map_err(xml_err)?;

    write_record(&mut writer, OPTIONS_TAG, &tree.options, OPTION_FIELDS)?;

    writer
        .write_event(Event::Start(BytesStart::new(ANSWERS_TAG)))
        .map_err(xml_err)?;
    for answer in &tree.answers {
        write_record(&mut writer, ANSWER_TAG, answer, PART_FIELDS)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(ANSWERS_TAG)))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner()).map_err(xml_err)
}
