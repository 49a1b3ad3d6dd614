//! Fretboard Core Types and Definitions
//!
//! This crate provides the foundational types for fretboard diagrams. It includes:
//!
//! - **Notes**: Chromatic pitch classes and sharp/flat naming ([`note`] module)
//! - **Strings**: The six guitar strings and their open pitches ([`string`] module)
//! - **Positions**: Validated fret positions per string ([`position`] module)
//! - **Diagram**: The immutable parameters of a single render ([`diagram::Diagram`])
//! - **Layout**: Pixel geometry of the fretboard grid ([`layout`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Layered SVG drawables ([`draw`] module)

pub mod color;
pub mod diagram;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod note;
pub mod position;
pub mod string;
