//! Core types for spark-remote.
//!
//! These types are shared by the wire format, the state store, the layout
//! managers and the painter interface. Anything that crosses a module
//! boundary lives here.

use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw wire value.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Id of a slot in the variable store.
    VariableId,
    "v"
);

id_type!(
    /// Id of a component, as assigned by the writer.
    ComponentId,
    "c"
);

id_type!(
    /// Id of a declared action.
    ActionId,
    "a"
);

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
///
/// On the wire colors travel as a packed ARGB `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color. Also the fallback for unresolved color references.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Unpack a wire ARGB value.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Pack into a wire ARGB value.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

// =============================================================================
// Visibility
// =============================================================================

/// Three-state visibility resolved before measurement.
///
/// `Invisible` keeps its space but is never painted. `Gone` is laid out as
/// if it were absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Visibility {
    #[default]
    Visible = 0,
    Invisible = 1,
    Gone = 2,
}

impl Visibility {
    /// Resolve an integer variable value. Unknown values are visible.
    pub const fn from_int(value: i32) -> Self {
        match value {
            1 => Self::Invisible,
            2 => Self::Gone,
            _ => Self::Visible,
        }
    }

    /// Whether the component takes part in layout.
    #[inline]
    pub const fn takes_space(self) -> bool {
        !matches!(self, Self::Gone)
    }

    /// Whether the component produces painter calls.
    #[inline]
    pub const fn is_drawn(self) -> bool {
        matches!(self, Self::Visible)
    }
}

impl TryFrom<u8> for Visibility {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Visible),
            1 => Ok(Self::Invisible),
            2 => Ok(Self::Gone),
            other => Err(other),
        }
    }
}

// =============================================================================
// Layout Enums
// =============================================================================

/// Main-axis distribution of remaining space in a Row or Column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Arrangement {
    #[default]
    Start = 0,
    Center = 1,
    End = 2,
    SpaceBetween = 3,
    SpaceAround = 4,
    SpaceEvenly = 5,
}

impl TryFrom<u8> for Arrangement {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Center),
            2 => Ok(Self::End),
            3 => Ok(Self::SpaceBetween),
            4 => Ok(Self::SpaceAround),
            5 => Ok(Self::SpaceEvenly),
            other => Err(other),
        }
    }
}

/// Alignment along one axis (cross axis for Row/Column, either axis for Box).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Alignment {
    #[default]
    Start = 0,
    Center = 1,
    End = 2,
}

impl Alignment {
    /// Offset of an item of size `item` inside `space`.
    #[inline]
    pub fn offset(self, space: f32, item: f32) -> f32 {
        let free = (space - item).max(0.0);
        match self {
            Self::Start => 0.0,
            Self::Center => free / 2.0,
            Self::End => free,
        }
    }
}

impl TryFrom<u8> for Alignment {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Center),
            2 => Ok(Self::End),
            other => Err(other),
        }
    }
}

/// Requested size along one axis.
///
/// ```
/// use spark_remote::types::Dimension;
///
/// let width = Dimension::Fixed(100.0); // exactly 100 units
/// let height = Dimension::Fill;        // all available space
/// let auto = Dimension::Wrap;          // content-determined
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Size to content.
    #[default]
    Wrap,
    /// Absolute size in layout units.
    Fixed(f32),
    /// Take all definite available space.
    Fill,
}

impl Dimension {
    /// Wire tag for the dimension kind.
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Wrap => 0,
            Self::Fixed(_) => 1,
            Self::Fill => 2,
        }
    }

    /// Wire value (zero for non-fixed kinds).
    pub const fn value(&self) -> f32 {
        match self {
            Self::Fixed(v) => *v,
            _ => 0.0,
        }
    }

    /// Rebuild from wire tag and value.
    pub fn from_wire(tag: u8, value: f32) -> Option<Self> {
        match tag {
            0 => Some(Self::Wrap),
            1 => Some(Self::Fixed(value)),
            2 => Some(Self::Fill),
            _ => None,
        }
    }
}

/// Input trigger a touch-action modifier binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TouchTrigger {
    #[default]
    Down = 0,
    Up = 1,
}

impl TryFrom<u8> for TouchTrigger {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Down),
            1 => Ok(Self::Up),
            other => Err(other),
        }
    }
}

/// Padding around a component's content, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Same padding on all four sides.
    pub const fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Component-wise sum.
    pub fn add(self, other: Self) -> Self {
        Self::new(
            self.left + other.left,
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
        )
    }
}

/// Where a visibility modifier takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilitySource {
    Literal(Visibility),
    /// Integer variable (or integer expression) resolved every frame.
    Variable(VariableId),
}

// =============================================================================
// Dirty Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-component invalidation state.
    ///
    /// Combine with bitwise OR: `DirtyFlags::LAYOUT | DirtyFlags::PAINT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirtyFlags: u8 {
        const NONE = 0;
        /// Size or position may change.
        const LAYOUT = 1 << 0;
        /// Painted output may change.
        const PAINT = 1 << 1;
    }
}

impl DirtyFlags {
    /// Everything a state change can affect. Visibility is resolved during
    /// layout, so a visibility change is a layout change.
    pub const ALL: Self = Self::LAYOUT.union(Self::PAINT);
}
