use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::{Edges, Size};

use super::edges::EdgeSpec;

/// Primary axis of a box layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Children are sequenced left to right (hbox).
    #[default]
    Row,
    /// Children are sequenced top to bottom (vbox).
    Column,
}

impl Direction {
    /// Extent of `size` along the primary axis.
    pub fn major(self, size: Size) -> i32 {
        match self {
            Direction::Row => size.width,
            Direction::Column => size.height,
        }
    }

    /// Extent of `size` along the cross axis.
    pub fn minor(self, size: Size) -> i32 {
        match self {
            Direction::Row => size.height,
            Direction::Column => size.width,
        }
    }

    /// Map a (primary, cross) pair back to physical (horizontal, vertical).
    pub fn pack(self, major: i32, minor: i32) -> (i32, i32) {
        match self {
            Direction::Row => (major, minor),
            Direction::Column => (minor, major),
        }
    }

    pub fn leading(self, edges: &Edges) -> i32 {
        match self {
            Direction::Row => edges.left,
            Direction::Column => edges.top,
        }
    }

    pub fn trailing(self, edges: &Edges) -> i32 {
        match self {
            Direction::Row => edges.right,
            Direction::Column => edges.bottom,
        }
    }

    pub fn cross_leading(self, edges: &Edges) -> i32 {
        match self {
            Direction::Row => edges.top,
            Direction::Column => edges.left,
        }
    }

    pub fn cross_trailing(self, edges: &Edges) -> i32 {
        match self {
            Direction::Row => edges.bottom,
            Direction::Column => edges.right,
        }
    }

    pub fn main_edges(self, edges: &Edges) -> i32 {
        self.leading(edges).saturating_add(self.trailing(edges))
    }

    pub fn cross_edges(self, edges: &Edges) -> i32 {
        self.cross_leading(edges)
            .saturating_add(self.cross_trailing(edges))
    }
}

impl FromStr for Direction {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "row" | "hbox" | "horizontal" => Ok(Direction::Row),
            "column" | "vbox" | "vertical" => Ok(Direction::Column),
            other => Err(LayoutError::configuration("direction", other)),
        }
    }
}

/// Cross-axis policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Middle,
    Stretch,
    StretchMax,
}

impl FromStr for Align {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            // `top` is the hbox spelling, `left` the vbox one.
            "start" | "top" | "left" => Ok(Align::Start),
            "middle" | "center" => Ok(Align::Middle),
            "stretch" => Ok(Align::Stretch),
            "stretchmax" => Ok(Align::StretchMax),
            other => Err(LayoutError::configuration("align", other)),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Align::Start => "start",
            Align::Middle => "middle",
            Align::Stretch => "stretch",
            Align::StretchMax => "stretchmax",
        };
        f.write_str(name)
    }
}

/// Primary-axis placement of the whole content block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pack {
    #[default]
    Start,
    Center,
    End,
}

impl FromStr for Pack {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "start" => Ok(Pack::Start),
            "center" => Ok(Pack::Center),
            "end" => Ok(Pack::End),
            other => Err(LayoutError::configuration("pack", other)),
        }
    }
}

impl fmt::Display for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pack::Start => "start",
            Pack::Center => "center",
            Pack::End => "end",
        };
        f.write_str(name)
    }
}

/// Per-container box layout configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub padding: Edges,
    pub align: Align,
    pub pack: Pack,
}

impl LayoutConfig {
    pub fn row() -> Self {
        Self::default()
    }

    pub fn column() -> Self {
        Self {
            direction: Direction::Column,
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn with_pack(mut self, pack: Pack) -> Self {
        self.pack = pack;
        self
    }

    /// Load a configuration from JSON, e.g.
    /// `{"direction":"column","align":"center","padding":"10 5"}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let spec: LayoutConfigSpec = serde_json::from_str(text)?;
        Self::try_from(spec)
    }
}

/// Untyped configuration as it appears in data files; validated into a
/// [`LayoutConfig`] with `TryFrom`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfigSpec {
    pub direction: Option<String>,
    pub padding: Option<EdgeSpec>,
    pub align: Option<String>,
    pub pack: Option<String>,
}

impl TryFrom<LayoutConfigSpec> for LayoutConfig {
    type Error = LayoutError;

    fn try_from(spec: LayoutConfigSpec) -> Result<Self> {
        let mut config = LayoutConfig::default();
        if let Some(direction) = spec.direction {
            config.direction = direction.parse()?;
        }
        if let Some(padding) = spec.padding {
            config.padding = Edges::try_from(padding)?;
        }
        if let Some(align) = spec.align {
            config.align = align.parse()?;
        }
        if let Some(pack) = spec.pack {
            config.pack = pack.parse()?;
        }
        Ok(config)
    }
}
