// src/models/format.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How the markup of a text field is interpreted.
/// Stored and exchanged as its integer code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum TextFormat {
    Moodle = 0,
    #[default]
    Html = 1,
    Plain = 2,
    Markdown = 4,
}

impl TextFormat {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(TextFormat::Moodle),
            1 => Some(TextFormat::Html),
            2 => Some(TextFormat::Plain),
            4 => Some(TextFormat::Markdown),
            _ => None,
        }
    }
}

impl From<TextFormat> for i32 {
    fn from(format: TextFormat) -> Self {
        format.code()
    }
}

impl TryFrom<i32> for TextFormat {
    type Error = AppError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        TextFormat::from_code(code).ok_or_else(|| AppError::invalid("format", code.to_string()))
    }
}

impl FromStr for TextFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .ok()
            .and_then(TextFormat::from_code)
            .ok_or_else(|| AppError::invalid("format", s))
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Numbering style shown in front of the parts of a question.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
pub enum AnswerNumbering {
    #[serde(rename = "abc")]
    #[sqlx(rename = "abc")]
    LowerAlpha,
    #[serde(rename = "ABCD")]
    #[sqlx(rename = "ABCD")]
    UpperAlpha,
    #[serde(rename = "123")]
    #[sqlx(rename = "123")]
    Numeric,
    #[serde(rename = "iii")]
    #[sqlx(rename = "iii")]
    LowerRoman,
    #[serde(rename = "IIII")]
    #[sqlx(rename = "IIII")]
    UpperRoman,
    #[default]
    #[serde(rename = "none")]
    #[sqlx(rename = "none")]
    Unnumbered,
}

impl AnswerNumbering {
    pub fn as_str(self) -> &'static str {
        match self {
            AnswerNumbering::LowerAlpha => "abc",
            AnswerNumbering::UpperAlpha => "ABCD",
            AnswerNumbering::Numeric => "123",
            AnswerNumbering::LowerRoman => "iii",
            AnswerNumbering::UpperRoman => "IIII",
            AnswerNumbering::Unnumbered => "none",
        }
    }
}

impl FromStr for AnswerNumbering {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abc" => Ok(AnswerNumbering::LowerAlpha),
            "ABCD" => Ok(AnswerNumbering::UpperAlpha),
            "123" => Ok(AnswerNumbering::Numeric),
            "iii" => Ok(AnswerNumbering::LowerRoman),
            "IIII" => Ok(AnswerNumbering::UpperRoman),
            "none" => Ok(AnswerNumbering::Unnumbered),
            other => Err(AppError::invalid("answernumbering", other)),
        }
    }
}

impl fmt::Display for AnswerNumbering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
