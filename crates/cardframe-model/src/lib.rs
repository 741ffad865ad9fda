//! Typed object model for declarative JSON cards.
//! Construction is lenient: semantically invalid values degrade to defaults
//! and surface as warnings instead of failing the whole card.

pub mod actions;
pub mod diagnostics;
pub mod elements;
pub mod parse;

pub use actions::{Action, OpenUrlAction, ShowCardAction, SubmitAction};
pub use diagnostics::{Diagnostic, Severity};
pub use elements::{
    ActionSet, Card, Column, ColumnSet, ColumnWidth, Container, ContainerStyle, Element, Fact,
    FactSet, HorizontalAlignment, Image, ImageSize, InputText, Media, MediaSource, TextBlock,
    TextSize, TextWeight, UnknownElement, VerticalContentAlignment,
};
pub use parse::{ParseResult, parse_card, parse_card_str};
